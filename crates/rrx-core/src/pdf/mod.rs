//! PDF text extraction module.

mod extractor;
mod staging;

pub use extractor::PdfExtractor;
pub use staging::{extract_text_from_path, extract_text_from_upload, stage_upload};

use crate::error::PdfError;

/// Default text inserted between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n";

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF, pages in order.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
