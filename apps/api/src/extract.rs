//! Text-extraction collaborator: uploaded bytes in, decoded plain text out.
//! Fails closed — an unsupported format is an error, never silently empty.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("file is not valid UTF-8 text")]
    Encoding,
}

/// Extracts plain text from an uploaded file.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Result<String, ExtractError> {
    match mime_type {
        "application/pdf" => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        "text/plain" | "text/markdown" => String::from_utf8(bytes.to_vec())
            .map_err(|_| ExtractError::Encoding),
        other => Err(ExtractError::Unsupported(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text(b"Jane Doe\nEngineer", "text/plain").unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_unsupported_mime_fails_closed() {
        let err = extract_text(b"GIF89a", "image/gif").unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = extract_text(&[0xff, 0xfe, 0x00], "text/plain").unwrap_err();
        assert!(matches!(err, ExtractError::Encoding));
    }

    #[test]
    fn test_garbage_pdf_reports_pdf_error() {
        let err = extract_text(b"not a pdf at all", "application/pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
