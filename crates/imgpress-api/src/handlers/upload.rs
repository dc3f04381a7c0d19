use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use imgpress_core::AppError;
use imgpress_processing::{FormatLookup, OutputFormat};

use crate::auth::UserContext;
use crate::error::HttpAppError;
use crate::services::convert::sanitize_entry_name;
use crate::services::{BatchConverter, BatchOutcome, BatchParams, UploadedFile};
use crate::state::AppState;

/// `POST /upload`: convert every image in the multipart form and return the
/// lone result directly, or a zip when more than one file succeeds.
pub async fn upload(
    user_ctx: UserContext,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut format = OutputFormat::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                // Browsers send an empty part when no file was picked.
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
                files.push(UploadedFile { filename, data });
            }
            "width" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid width field: {e}")))?;
                width = parse_dimension(&value, "width")?;
            }
            "height" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid height field: {e}")))?;
                height = parse_dimension(&value, "height")?;
            }
            "format" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid format field: {e}")))?;
                // Unknown labels fall back to JPEG rather than failing the
                // batch.
                format = match OutputFormat::lookup(&value) {
                    FormatLookup::Known(f) => f,
                    FormatLookup::Unknown => {
                        tracing::debug!(requested = %value, "Unknown output format, using JPEG");
                        OutputFormat::default()
                    }
                };
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("no files uploaded".to_string()).into());
    }

    let converter = BatchConverter::new(state.history.clone(), state.storage.clone());
    let params = BatchParams {
        width,
        height,
        format,
        quality: state.config.jpeg_quality,
    };

    let outcome = converter.run(user_ctx.user_id, files, params).await?;
    build_response(outcome, format)
}

/// Empty form values mean "not requested"; anything else must be a positive
/// integer.
fn parse_dimension(value: &str, name: &str) -> Result<Option<u32>, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 && n <= i64::from(u32::MAX) => Ok(Some(n as u32)),
        Ok(_) => Err(AppError::InvalidInput(format!(
            "{name} must be a positive integer"
        ))),
        Err(_) => Err(AppError::InvalidInput(format!(
            "{name} must be a positive integer"
        ))),
    }
}

fn build_response(outcome: BatchOutcome, format: OutputFormat) -> Result<Response, HttpAppError> {
    let (content_type, filename, data) = match outcome {
        BatchOutcome::Single(result) => (
            format.mime_type(),
            sanitize_entry_name(&result.filename, "converted"),
            result.data,
        ),
        BatchOutcome::Archive { filename, data } => ("application/zip", filename, data),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("failed to build response: {e}")).into())
}
