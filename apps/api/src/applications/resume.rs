//! Resume ingestion: extension and size checks on the uploaded blob.
//!
//! The whole file is buffered in memory before persisting; the 10 MiB cap is
//! the only bound. Stored bytes are never transformed.

use bytes::Bytes;

use crate::errors::AppError;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// A validated resume upload, captured verbatim from the multipart field.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub data: Bytes,
    pub size: i64,
    pub mime_type: String,
    pub original_name: String,
}

/// Validates the upload and captures it for embedding into the application
/// record. Extension is checked case-insensitively on the original filename.
pub fn ingest(data: Bytes, declared_mime_type: &str, original_name: &str) -> Result<ResumeUpload, AppError> {
    if !has_allowed_extension(original_name) {
        return Err(AppError::Validation(
            "Only PDF, DOC, DOCX files are allowed".to_string(),
        ));
    }
    if data.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "Resume file exceeds the 10 MiB limit".to_string(),
        ));
    }

    Ok(ResumeUpload {
        size: data.len() as i64,
        data,
        mime_type: declared_mime_type.to_string(),
        original_name: original_name.to_string(),
    })
}

fn has_allowed_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_bytes(len: usize) -> Bytes {
        Bytes::from(vec![0u8; len])
    }

    #[test]
    fn test_accepts_exactly_pdf_doc_docx() {
        for name in ["cv.pdf", "cv.doc", "cv.docx"] {
            assert!(ingest(pdf_bytes(10), "application/pdf", name).is_ok(), "{name}");
        }
        for name in ["cv.txt", "cv.png", "cv.pdf.exe", "cv", "cv.docxx"] {
            assert!(ingest(pdf_bytes(10), "application/pdf", name).is_err(), "{name}");
        }
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(ingest(pdf_bytes(10), "application/pdf", "CV.PDF").is_ok());
        assert!(ingest(pdf_bytes(10), "application/msword", "Resume.DocX").is_ok());
    }

    #[test]
    fn test_size_cap_is_ten_mib() {
        assert!(ingest(pdf_bytes(MAX_RESUME_BYTES), "application/pdf", "cv.pdf").is_ok());
        assert!(ingest(pdf_bytes(MAX_RESUME_BYTES + 1), "application/pdf", "cv.pdf").is_err());
    }

    #[test]
    fn test_upload_captured_verbatim() {
        let data = Bytes::from_static(b"%PDF-1.7 fake");
        let upload = ingest(data.clone(), "application/pdf", "cv.pdf").unwrap();
        assert_eq!(upload.data, data);
        assert_eq!(upload.size, data.len() as i64);
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.original_name, "cv.pdf");
    }
}
