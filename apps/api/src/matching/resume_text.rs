//! Resume text extraction: the boundary to uploaded documents.
//!
//! Extraction failure is never an error for the matcher: it degrades to an
//! empty string, which scores as "every required skill missing".
//!
//! `AppState` holds an `Arc<dyn ResumeTextExtractor>`, so tests can swap in a
//! stub without real PDFs.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

#[async_trait]
pub trait ResumeTextExtractor: Send + Sync {
    /// Returns the document's text, or an empty string if nothing could be read.
    async fn extract_text(&self, file_name: &str, content_type: Option<&str>, data: Bytes)
        -> String;
}

/// PDF via `pdf-extract`, anything else decoded as (lossy) UTF-8 text.
pub struct DocumentTextExtractor;

#[async_trait]
impl ResumeTextExtractor for DocumentTextExtractor {
    async fn extract_text(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> String {
        if !is_pdf(file_name, content_type, &data) {
            return String::from_utf8_lossy(&data).into_owned();
        }

        // PDF parsing is CPU-bound; keep it off the async executor.
        let name = file_name.to_string();
        let extracted =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

        match extracted {
            Ok(Ok(text)) => {
                debug!("Extracted {} chars from {name}", text.len());
                text
            }
            Ok(Err(e)) => {
                warn!("PDF extraction failed for {name}: {e}");
                String::new()
            }
            Err(e) => {
                warn!("spawn_blocking failed during PDF extraction for {name}: {e}");
                String::new()
            }
        }
    }
}

fn is_pdf(file_name: &str, content_type: Option<&str>, data: &[u8]) -> bool {
    content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
        || file_name.to_lowercase().ends_with(".pdf")
        || data.starts_with(b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_detection() {
        assert!(is_pdf("cv.PDF", None, b""));
        assert!(is_pdf("cv", Some("application/pdf"), b""));
        assert!(is_pdf("cv.bin", None, b"%PDF-1.7"));
        assert!(!is_pdf("cv.txt", Some("text/plain"), b"hello"));
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let text = DocumentTextExtractor
            .extract_text("cv.txt", Some("text/plain"), Bytes::from_static(b"Python and AWS"))
            .await;
        assert_eq!(text, "Python and AWS");
    }

    #[tokio::test]
    async fn test_broken_pdf_yields_empty_string() {
        let text = DocumentTextExtractor
            .extract_text("cv.pdf", None, Bytes::from_static(b"%PDF-not really a pdf"))
            .await;
        assert!(text.is_empty());
    }
}
