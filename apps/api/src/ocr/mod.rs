//! OCR — turns an uploaded PDF into best-effort plain text, one page at a time.
//!
//! Backends implement `PageOcr` over a single-page PDF. `ocr_document` splits
//! the upload, runs every page, and tolerates per-page failures.

use async_trait::async_trait;
use lopdf::Document;
use thiserror::Error;
use tracing::{error, info, warn};

pub mod text_layer;
pub mod vision;

pub use text_layer::TextLayerOcr;
pub use vision::VisionOcr;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("OCR task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// OCR over one page, supplied as a standalone single-page PDF.
#[async_trait]
pub trait PageOcr: Send + Sync {
    /// Short backend label for logs.
    fn backend(&self) -> &'static str;

    async fn ocr_page(&self, page_pdf: &[u8]) -> Result<String, OcrError>;
}

/// Splits a PDF into standalone single-page PDFs, in page order.
pub fn split_pages(pdf_bytes: &[u8]) -> Result<Vec<Vec<u8>>, OcrError> {
    let doc = Document::load_mem(pdf_bytes).map_err(|e| OcrError::Pdf(e.to_string()))?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

    page_numbers
        .iter()
        .map(|&keep| {
            let mut page_doc = doc.clone();
            let others: Vec<u32> = page_numbers.iter().copied().filter(|&n| n != keep).collect();
            page_doc.delete_pages(&others);
            page_doc.prune_objects();

            let mut buf = Vec::new();
            page_doc
                .save_to(&mut buf)
                .map_err(|e| OcrError::Pdf(format!("page {keep}: {e}")))?;
            Ok(buf)
        })
        .collect()
}

/// OCRs a whole document.
///
/// Returns `""` when the PDF cannot be opened. A page whose OCR fails
/// contributes `""`. Page texts are joined with `\n`.
pub async fn ocr_document(ocr: &dyn PageOcr, pdf_bytes: &[u8]) -> String {
    let owned = pdf_bytes.to_vec();
    let pages = match tokio::task::spawn_blocking(move || split_pages(&owned)).await {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            error!("Could not open PDF for OCR: {e}");
            return String::new();
        }
        Err(e) => {
            error!("PDF split task failed: {e}");
            return String::new();
        }
    };

    info!("Running {} OCR on {} page(s)", ocr.backend(), pages.len());

    let mut parts = Vec::with_capacity(pages.len());
    for (idx, page) in pages.iter().enumerate() {
        match ocr.ocr_page(page).await {
            Ok(text) => parts.push(text),
            Err(e) => {
                warn!("OCR error for page {idx}: {e}");
                parts.push(String::new());
            }
        }
    }

    parts.join("\n")
}
