//! Web upload service for railway receipt extraction.
//!
//! Each upload is handled independently: the PDF is staged to a scoped
//! temporary file, its text extracted, and the chosen extractor applied.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use rrx_core::models::config::RrxConfig;
use rrx_core::{CompletionBackend, ModelExtractor};

pub use error::ApiError;

/// Shared state for request handlers.
pub struct AppState<B> {
    pub config: Arc<RrxConfig>,
    /// Absent when no API key is configured.
    pub model: Option<Arc<ModelExtractor<B>>>,
}

impl<B> AppState<B> {
    pub fn new(config: RrxConfig, model: Option<ModelExtractor<B>>) -> Self {
        Self {
            config: Arc::new(config),
            model: model.map(Arc::new),
        }
    }
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            model: self.model.clone(),
        }
    }
}

/// Build the application router.
pub fn app<B: CompletionBackend + 'static>(state: AppState<B>) -> Router {
    let limit = state.config.pdf.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health::<B>))
        .route("/api/v1/extract/pattern", post(handlers::extract_pattern::<B>))
        .route("/api/v1/extract/model", post(handlers::extract_model::<B>))
        // Enforced while the multipart stream is read, with or without Content-Length
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
