//! Core library for railway receipt (RR) extraction.
//!
//! This crate provides:
//! - PDF text extraction (page order preserved)
//! - Pattern-based RR field extraction with positional zipping
//! - Model-based extraction: prompt construction and permissive reply parsing
//! - The `ExtractedRecord` data model and configuration

pub mod error;
pub mod models;
pub mod pdf;
pub mod receipt;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use error::{Result, RrxError};
pub use models::config::RrxConfig;
pub use models::receipt::{ExtractedRecord, FIELD_NAMES};
pub use pdf::{PdfExtractor, PdfProcessor, extract_text_from_path, extract_text_from_upload};
pub use receipt::{
    ModelExtraction, ModelExtractor, ModelReply, PatternExtraction, PatternExtractor,
    ReceiptParser, extract_records,
};

/// Re-export completion types.
pub use rrx_llm::{CompletionBackend, CompletionRequest, LlmError, OpenAiBackend};
