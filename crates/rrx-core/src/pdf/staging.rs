//! Scoped temporary storage for uploaded PDFs.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{PdfExtractor, PdfProcessor};

/// Write uploaded bytes to a temporary `.pdf` file.
///
/// The file is removed when the returned handle is dropped.
pub fn stage_upload(data: &[u8]) -> crate::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("rrx-upload-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;

    debug!("Staged {} bytes at {}", data.len(), file.path().display());
    Ok(file)
}

/// Extract the full text of the PDF at `path`.
pub fn extract_text_from_path(path: &Path, page_separator: &str) -> crate::Result<String> {
    let extractor = PdfExtractor::from_path(path)?.with_page_separator(page_separator);
    Ok(extractor.extract_text()?)
}

/// Stage uploaded bytes, extract their text, and remove the staged file.
pub fn extract_text_from_upload(data: &[u8], page_separator: &str) -> crate::Result<String> {
    let staged = stage_upload(data)?;
    extract_text_from_path(staged.path(), page_separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PdfError, RrxError};
    use crate::test_support::text_pdf;

    #[test]
    fn test_staged_file_removed_on_drop() {
        let staged = stage_upload(b"%PDF-1.5").unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_staged_file_removed_after_failed_extraction() {
        let staged = stage_upload(b"garbage").unwrap();
        let path = staged.path().to_path_buf();

        let result = extract_text_from_path(&path, "\n");
        assert!(matches!(result, Err(RrxError::Pdf(PdfError::Parse(_)))));

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_extract_text_from_upload() {
        let data = text_pdf(&[&["No. of Wagon: 12"]]);
        let text = extract_text_from_upload(&data, "\n").unwrap();
        assert!(text.contains("No. of Wagon: 12"), "got {:?}", text);
    }

    #[test]
    fn test_extract_text_from_missing_path() {
        let result = extract_text_from_path(Path::new("/nonexistent/rrx/file.pdf"), "\n");
        assert!(matches!(result, Err(RrxError::Io(_))));
    }
}
