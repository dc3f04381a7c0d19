//! Batch conversion orchestrator: runs the pipeline over every uploaded
//! file, persists each success, and packages the response payload.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use imgpress_core::AppError;
use imgpress_db::HistoryRepository;
use imgpress_processing::{
    convert, output_filename, source_format_label, ConversionRequest, OutputFormat,
};
use imgpress_storage::Storage;
use uuid::Uuid;

/// One file pulled out of the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Batch-wide settings shared by every file in one upload.
#[derive(Debug, Clone, Copy)]
pub struct BatchParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: OutputFormat,
    pub quality: u8,
}

/// One successfully converted file, ready for the response.
#[derive(Debug)]
pub struct ConversionResult {
    pub filename: String,
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// What the upload handler sends back: the lone file itself, or a zip of
/// all of them.
#[derive(Debug)]
pub enum BatchOutcome {
    Single(ConversionResult),
    Archive { filename: String, data: Bytes },
}

const ARCHIVE_NAME: &str = "images.zip";

/// Runs a whole upload batch. Per-file failures are logged and skipped;
/// only a batch with zero successes is an error.
#[derive(Clone)]
pub struct BatchConverter {
    history: HistoryRepository,
    storage: Arc<dyn Storage>,
}

impl BatchConverter {
    pub fn new(history: HistoryRepository, storage: Arc<dyn Storage>) -> Self {
        Self { history, storage }
    }

    /// Convert every file, record each success in the ledger, and package
    /// the results. A file that fails at any stage (decode, resize, encode,
    /// storage, ledger insert) is skipped without affecting the others.
    #[tracing::instrument(skip(self, files), fields(batch.size = files.len()))]
    pub async fn run(
        &self,
        user_id: Uuid,
        files: Vec<UploadedFile>,
        params: BatchParams,
    ) -> Result<BatchOutcome, AppError> {
        let mut results = Vec::with_capacity(files.len());

        for file in files {
            match self.convert_one(user_id, &file, params).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    tracing::warn!(
                        filename = %file.filename,
                        error = %err,
                        "skipping file that failed to convert"
                    );
                }
            }
        }

        match results.len() {
            0 => Err(AppError::BadRequest(
                "no image could be processed".to_string(),
            )),
            1 => Ok(BatchOutcome::Single(results.swap_remove(0))),
            _ => {
                let data = build_zip(&results)?;
                Ok(BatchOutcome::Archive {
                    filename: ARCHIVE_NAME.to_string(),
                    data,
                })
            }
        }
    }

    async fn convert_one(
        &self,
        user_id: Uuid,
        file: &UploadedFile,
        params: BatchParams,
    ) -> Result<ConversionResult, AppError> {
        let request = ConversionRequest {
            data: file.data.clone(),
            width: params.width,
            height: params.height,
            format: params.format,
            quality: params.quality,
        };
        // Decode/resize/encode is CPU-bound; keep it off the async executor.
        let output = tokio::task::spawn_blocking(move || convert(&request))
            .await
            .map_err(|e| AppError::Internal(format!("conversion task failed: {e}")))?
            .map_err(|e| AppError::ImageProcessing(e.to_string()))?;

        let storage_key = format!("converted/{}.{}", Uuid::new_v4(), params.format.extension());
        self.storage
            .store(&storage_key, &output.data)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        // The ledger keeps the name the user uploaded; the response carries
        // the renamed output.
        let filename = output_filename(&file.filename, params.format);
        self.history
            .record(
                user_id,
                &file.filename,
                &source_format_label(&file.filename),
                &params.format.to_string(),
                i64::from(output.width),
                i64::from(output.height),
                output.data.len() as i64,
                Some(&storage_key),
            )
            .await?;

        Ok(ConversionResult {
            filename,
            data: output.data,
            width: output.width,
            height: output.height,
        })
    }
}

/// Package converted files into an uncompressed zip. The payloads are
/// already compressed image data, so deflating again buys nothing.
fn build_zip(results: &[ConversionResult]) -> Result<Bytes, AppError> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);

        for (index, result) in results.iter().enumerate() {
            let entry_name =
                sanitize_entry_name(&result.filename, &format!("unnamed_{index}"));
            zip.start_file(&entry_name, options)
                .map_err(|e| AppError::Internal(format!("failed to add zip entry: {e}")))?;
            zip.write_all(&result.data)
                .map_err(|e| AppError::Internal(format!("failed to write zip entry: {e}")))?;
        }

        zip.finish()
            .map_err(|e| AppError::Internal(format!("failed to finalize zip: {e}")))?;
    }
    Ok(Bytes::from(buffer))
}

/// Reduce a client-supplied filename to its base name so a crafted name
/// cannot place a zip entry outside the extraction directory.
pub fn sanitize_entry_name(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use imgpress_db::UserRepository;
    use imgpress_storage::LocalStorage;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use std::io::Cursor;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        imgpress_db::schema::init_schema(&pool).await.expect("schema");
        pool
    }

    async fn setup() -> (BatchConverter, HistoryRepository, Uuid, tempfile::TempDir) {
        let pool = memory_pool().await;
        let user = UserRepository::new(pool.clone())
            .create("alice", "hash", "user")
            .await
            .expect("user");
        let dir = tempfile::tempdir().expect("tempdir");
        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(dir.path()).await.expect("storage"));
        let history = HistoryRepository::new(pool);
        (
            BatchConverter::new(history.clone(), storage),
            history,
            user.id,
            dir,
        )
    }

    fn png_file(name: &str, width: u32, height: u32) -> UploadedFile {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 80, 40, 255]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .expect("encode fixture");
        UploadedFile {
            filename: name.to_string(),
            data: Bytes::from(buffer),
        }
    }

    fn params(format: OutputFormat) -> BatchParams {
        BatchParams {
            width: None,
            height: None,
            format,
            quality: 90,
        }
    }

    #[tokio::test]
    async fn test_failed_file_is_skipped_and_survivor_is_single() {
        let (converter, history, user_id, _dir) = setup().await;
        let corrupt = UploadedFile {
            filename: "broken.png".to_string(),
            data: Bytes::from_static(b"not an image"),
        };
        let mut p = params(OutputFormat::Jpeg);
        p.width = Some(100);

        let outcome = converter
            .run(user_id, vec![corrupt, png_file("ok.png", 200, 100)], p)
            .await
            .expect("batch");

        match outcome {
            BatchOutcome::Single(result) => {
                assert_eq!(result.filename, "ok.jpeg");
                assert_eq!((result.width, result.height), (100, 50));
                assert_eq!(
                    image::guess_format(&result.data).expect("guess"),
                    ImageFormat::Jpeg
                );
            }
            other => panic!("expected Single, got {other:?}"),
        }

        // Only the success made it into the ledger, under its uploaded name.
        let rows = history.list_recent(user_id, 10).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "ok.png");
        assert_eq!(rows[0].original_format, "PNG");
        assert_eq!(rows[0].converted_format, "JPEG");
        assert_eq!((rows[0].width, rows[0].height), (100, 50));
    }

    #[tokio::test]
    async fn test_two_successes_become_a_zip() {
        let (converter, history, user_id, _dir) = setup().await;
        let outcome = converter
            .run(
                user_id,
                vec![png_file("a.png", 10, 10), png_file("b.png", 20, 20)],
                params(OutputFormat::Png),
            )
            .await
            .expect("batch");

        let BatchOutcome::Archive { filename, data } = outcome else {
            panic!("expected Archive");
        };
        assert_eq!(filename, "images.zip");

        let mut archive =
            zip::ZipArchive::new(Cursor::new(data.to_vec())).expect("open zip");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        assert_eq!(history.list_recent(user_id, 10).await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn test_all_failures_is_a_bad_request() {
        let (converter, history, user_id, _dir) = setup().await;
        let corrupt = UploadedFile {
            filename: "broken.gif".to_string(),
            data: Bytes::from_static(b"nope"),
        };
        let err = converter
            .run(user_id, vec![corrupt], params(OutputFormat::Gif))
            .await
            .expect_err("batch should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(history.list_recent(user_id, 10).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_success_is_written_to_storage() {
        let (converter, history, user_id, dir) = setup().await;
        converter
            .run(user_id, vec![png_file("one.png", 4, 4)], params(OutputFormat::Bmp))
            .await
            .expect("batch");

        let rows = history.list_recent(user_id, 10).await.expect("list");
        let key = rows[0].storage_key.as_deref().expect("storage key");
        assert!(key.starts_with("converted/"));
        assert!(key.ends_with(".bmp"));
        assert!(dir.path().join(key).exists());
    }

    #[test]
    fn test_sanitize_entry_name() {
        assert_eq!(sanitize_entry_name("../../etc/passwd", "fb"), "passwd");
        assert_eq!(sanitize_entry_name("photo.jpeg", "fb"), "photo.jpeg");
        assert_eq!(sanitize_entry_name("", "fb"), "fb");
        assert_eq!(sanitize_entry_name("..", "fb"), "fb");
    }
}
