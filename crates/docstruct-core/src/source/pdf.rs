//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::error::SourceError;

/// Text extractor for born-digital PDFs.
pub struct PdfExtractor {
    raw_data: Vec<u8>,
    page_count: usize,
}

impl PdfExtractor {
    /// Parse a PDF from memory, decrypting documents with an empty password.
    pub fn load(data: &[u8]) -> Result<Self, SourceError> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::PdfParse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::PdfParse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { raw_data, page_count })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Full document text, pages in order.
    pub fn extract_text(&self) -> Result<String, SourceError> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfExtractor::load(b"not a pdf").err().unwrap();
        assert!(matches!(err, SourceError::PdfParse(_)));
    }
}
