//! Request handlers.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use rrx_core::models::config::RrxConfig;
use rrx_core::{
    CompletionBackend, ExtractedRecord, PatternExtractor, ReceiptParser, extract_text_from_upload,
};

use crate::AppState;
use crate::error::ApiError;

/// Name of the multipart part carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Pattern extraction response.
#[derive(Debug, Serialize)]
pub struct PatternResponse {
    pub filename: String,
    pub records: Vec<ExtractedRecord>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
}

/// Model extraction response.
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub filename: String,
    /// Decoded JSON from the model reply, if any.
    pub data: Option<Value>,
    pub warning: Option<String>,
    pub processing_time_ms: u64,
}

struct Upload {
    filename: String,
    data: Bytes,
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

pub async fn health<B: CompletionBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "rrx-web",
        "version": env!("CARGO_PKG_VERSION"),
        "model_enabled": state.model.is_some(),
    }))
}

/// Extract records from an uploaded PDF with the field patterns.
pub async fn extract_pattern<B: CompletionBackend + 'static>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> Result<Json<PatternResponse>, ApiError> {
    let start = Instant::now();
    let upload = read_upload(multipart).await?;
    info!("Pattern extraction for {} ({} bytes)", upload.filename, upload.data.len());

    let text = document_text(&state.config, upload.data).await?;
    let result = PatternExtractor::new().parse(&text);

    Ok(Json(PatternResponse {
        filename: upload.filename,
        records: result.records,
        warnings: result.warnings,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Extract fields from an uploaded PDF with the completion model.
pub async fn extract_model<B: CompletionBackend + 'static>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> Result<Json<ModelResponse>, ApiError> {
    let start = Instant::now();
    let extractor = state.model.clone().ok_or(ApiError::ModelDisabled)?;

    let upload = read_upload(multipart).await?;
    info!("Model extraction for {} ({} bytes)", upload.filename, upload.data.len());

    let text = document_text(&state.config, upload.data).await?;
    let result = extractor.extract(&text).await?;

    Ok(Json(ModelResponse {
        filename: upload.filename,
        warning: result.reply.warning().map(str::to_string),
        data: result.data().cloned(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Take the first `file` part, rejecting anything that is not a PDF.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        if !is_pdf(&filename, field.content_type()) {
            return Err(ApiError::UnsupportedMedia(format!(
                "Only PDF uploads are accepted, got {}",
                filename
            )));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(Upload { filename, data });
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    let by_type = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"));
    let by_extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    by_type || by_extension
}

/// Stage and extract on the blocking pool; PDF parsing is CPU-bound.
async fn document_text(config: &RrxConfig, data: Bytes) -> Result<String, ApiError> {
    let separator = config.pdf.page_separator.clone();

    let text = tokio::task::spawn_blocking(move || extract_text_from_upload(&data, &separator))
        .await
        .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))??;

    debug!("Extracted {} characters", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("rr.pdf", None));
        assert!(is_pdf("RR.PDF", Some("application/octet-stream")));
        assert!(is_pdf("upload", Some("application/pdf")));
        assert!(!is_pdf("notes.txt", Some("text/plain")));
        assert!(!is_pdf("archive.pdf.zip", None));
    }
}
