//! Local fallback: reads the PDF's embedded text layer instead of calling an OCR service.
//! Scanned documents without a text layer come back empty.

use async_trait::async_trait;

use crate::ocr::{OcrError, PageOcr};

pub struct TextLayerOcr;

#[async_trait]
impl PageOcr for TextLayerOcr {
    fn backend(&self) -> &'static str {
        "text-layer"
    }

    async fn ocr_page(&self, page_pdf: &[u8]) -> Result<String, OcrError> {
        let owned = page_pdf.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await?
            .map_err(|e| OcrError::Pdf(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::ocr_document;
    use crate::ocr::test_support::build_pdf;

    #[tokio::test]
    async fn test_reads_text_layer_page_by_page() {
        let pdf = build_pdf(&["Hello World", "Second Page"]);
        assert_eq!(ocr_document(&TextLayerOcr, &pdf).await, "Hello World\nSecond Page");
    }

    #[tokio::test]
    async fn test_garbage_page_is_an_error() {
        let err = TextLayerOcr.ocr_page(b"not a pdf").await.unwrap_err();
        assert!(matches!(err, OcrError::Pdf(_) | OcrError::Task(_)));
    }
}
