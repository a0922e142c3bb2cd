//! PDF text extraction using pdf-extract, with lopdf as the fallback reader.

use std::panic;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PAGE_SEPARATOR, PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    page_separator: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            page_separator: PAGE_SEPARATOR.to_string(),
        }
    }

    /// Set the text inserted between pages.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Read and load a PDF file.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        Ok(extractor)
    }

    /// Extract the text of every page, in page order.
    pub fn extract_pages(&self) -> Result<Vec<String>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        // pdf-extract can panic on unusual font programs.
        let raw = &self.raw_data;
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(raw)) {
            Ok(Ok(pages)) => {
                debug!("pdf-extract returned {} pages", pages.len());
                Ok(pages)
            }
            Ok(Err(e)) => {
                warn!("pdf-extract failed, falling back to lopdf: {}", e);
                self.extract_pages_with_lopdf(doc)
            }
            Err(_) => {
                warn!("pdf-extract panicked, falling back to lopdf");
                self.extract_pages_with_lopdf(doc)
            }
        }
    }

    fn extract_pages_with_lopdf(&self, doc: &Document) -> Result<Vec<String>> {
        let mut pages = Vec::new();
        for (page_num, _) in doc.get_pages() {
            let text = doc
                .extract_text(&[page_num])
                .map_err(|e| PdfError::TextExtraction(format!("page {}: {}", page_num, e)))?;
            pages.push(text);
        }
        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads from bytes, so hand it the decrypted document
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        let pages = self.extract_pages()?;
        let text = pages.join(&self.page_separator);
        debug!("Extracted {} chars from {} pages", text.len(), pages.len());
        Ok(text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 {
            return Err(PdfError::InvalidPage(page));
        }

        self.extract_pages()?
            .into_iter()
            .nth((page - 1) as usize)
            .ok_or(PdfError::InvalidPage(page))
    }
}
