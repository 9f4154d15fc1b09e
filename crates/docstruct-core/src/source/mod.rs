//! Loading document text from files.

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

use std::path::Path;

use tracing::debug;

use crate::error::SourceError;

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Plain text; also used when the file has no extension.
    Text,
    /// Born-digital PDF.
    Pdf,
}

impl InputFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            None | Some("txt") | Some("text") | Some("md") => Ok(Self::Text),
            Some("pdf") => Ok(Self::Pdf),
            Some(other) => Err(SourceError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read the text content of a document.
///
/// Whitespace is left untouched; normalization is an extraction concern.
pub fn load_text(path: &Path) -> Result<String, SourceError> {
    let format = InputFormat::from_path(path)?;
    debug!("Loading {} as {:?}", path.display(), format);

    match format {
        InputFormat::Text => std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        }),
        InputFormat::Pdf => load_pdf(path),
    }
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path) -> Result<String, SourceError> {
    let data = std::fs::read(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let extractor = PdfExtractor::load(&data)?;
    let text = extractor.extract_text()?;
    debug!(
        "Extracted {} characters from {} pages",
        text.len(),
        extractor.page_count()
    );
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(_path: &Path) -> Result<String, SourceError> {
    Err(SourceError::UnsupportedFormat(
        "pdf (built without the `pdf` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("bio.txt")).unwrap(), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("bio")).unwrap(), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("BIO.PDF")).unwrap(), InputFormat::Pdf);
        assert!(matches!(
            InputFormat::from_path(Path::new("bio.docx")),
            Err(SourceError::UnsupportedFormat(ext)) if ext == "docx"
        ));
    }

    #[test]
    fn test_load_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Alice Smith was born\non March 3, 1990.").unwrap();

        let text = load_text(file.path()).unwrap();
        assert_eq!(text, "Alice Smith was born\non March 3, 1990.");
    }

    #[test]
    fn test_missing_file() {
        let err = load_text(Path::new("/nonexistent/bio.txt")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }
}
