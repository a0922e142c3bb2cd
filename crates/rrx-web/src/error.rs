//! Mapping of extraction failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use rrx_core::RrxError;

/// Errors returned by the upload handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request carried no usable file part.
    BadRequest(String),
    /// The upload is not a PDF.
    UnsupportedMedia(String),
    /// The upload exceeds the configured size.
    TooLarge,
    /// The PDF could not be decoded.
    Unprocessable(String),
    /// The model service failed.
    Upstream(String),
    /// No API key is configured for the model service.
    ModelDisabled,
    /// Anything else.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ModelDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::UnsupportedMedia(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::TooLarge => "Upload exceeds the size limit".to_string(),
            ApiError::Upstream(msg) => format!("Model service error: {}", msg),
            ApiError::ModelDisabled => {
                "Model extraction is disabled: no API key configured".to_string()
            }
        }
    }
}

impl From<RrxError> for ApiError {
    fn from(err: RrxError) -> Self {
        match err {
            RrxError::Pdf(e) => ApiError::Unprocessable(format!("Could not read PDF: {}", e)),
            RrxError::Llm(e) => ApiError::Upstream(e.to_string()),
            RrxError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        warn!("{}: {}", status, message);

        (status, Json(json!({ "error": message }))).into_response()
    }
}
