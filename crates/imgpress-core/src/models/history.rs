use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful conversion. Rows are append-only: they are inserted by the
/// batch path and only ever removed by an explicit delete.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub original_format: String,
    pub converted_format: String,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
    /// Key of the stored converted file; absent when storage was skipped.
    pub storage_key: Option<String>,
    pub converted_at: DateTime<Utc>,
}

/// History entry as returned by `GET /history`: size humanized, timestamp
/// rendered as `DD.MM.YYYY HH:MM`.
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_format: String,
    pub converted_format: String,
    pub width: i64,
    pub height: i64,
    pub file_size: String,
    pub converted_at: String,
}

impl From<HistoryRecord> for HistoryEntryResponse {
    fn from(record: HistoryRecord) -> Self {
        HistoryEntryResponse {
            id: record.id,
            filename: record.filename,
            original_format: record.original_format,
            converted_format: record.converted_format,
            width: record.width,
            height: record.height,
            file_size: format_file_size(record.file_size),
            converted_at: record.converted_at.format("%d.%m.%Y %H:%M").to_string(),
        }
    }
}

/// Human-readable byte size: one decimal place, divide by 1024 per step.
pub fn format_file_size(size: i64) -> String {
    let mut size = size as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(0), "0.0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_format_file_size_terabytes() {
        let two_tb: i64 = 2 * 1024_i64.pow(4);
        assert_eq!(format_file_size(two_tb), "2.0 TB");
    }

    #[test]
    fn test_history_response_formatting() {
        let record = HistoryRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            filename: "photo.png".to_string(),
            original_format: "PNG".to_string(),
            converted_format: "JPEG".to_string(),
            width: 100,
            height: 50,
            file_size: 2048,
            storage_key: None,
            converted_at: DateTime::parse_from_rfc3339("2026-03-05T14:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let response = HistoryEntryResponse::from(record);
        assert_eq!(response.file_size, "2.0 KB");
        assert_eq!(response.converted_at, "05.03.2026 14:30");
    }
}
