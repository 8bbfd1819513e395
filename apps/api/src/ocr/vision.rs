//! Google Cloud Vision OCR over single-page PDFs (`files:annotate`).

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ocr::{OcrError, PageOcr};

const VISION_FILES_ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/files:annotate";
const PDF_MIME_TYPE: &str = "application/pdf";
const FEATURE_DOCUMENT_TEXT: &str = "DOCUMENT_TEXT_DETECTION";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateFilesRequest<'a> {
    requests: Vec<FileRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileRequest<'a> {
    input_config: InputConfig<'a>,
    features: Vec<Feature<'a>>,
    pages: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputConfig<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    feature_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateFilesResponse {
    #[serde(default)]
    responses: Vec<FileResponse>,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl AnnotateFilesResponse {
    /// Text of the first page of the first file; empty when Vision found none.
    fn into_page_text(self) -> Result<String, OcrError> {
        let Some(page) = self
            .responses
            .into_iter()
            .next()
            .and_then(|file| file.responses.into_iter().next())
        else {
            return Ok(String::new());
        };

        if let Some(status) = page.error {
            return Err(OcrError::Api {
                status: u16::try_from(status.code).unwrap_or(500),
                message: status.message,
            });
        }

        Ok(page.full_text_annotation.map(|a| a.text).unwrap_or_default())
    }
}

/// OCR through Google Vision `DOCUMENT_TEXT_DETECTION`.
#[derive(Clone)]
pub struct VisionOcr {
    client: Client,
    api_key: String,
}

impl VisionOcr {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, OcrError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl PageOcr for VisionOcr {
    fn backend(&self) -> &'static str {
        "vision"
    }

    async fn ocr_page(&self, page_pdf: &[u8]) -> Result<String, OcrError> {
        let body = AnnotateFilesRequest {
            requests: vec![FileRequest {
                input_config: InputConfig {
                    content: BASE64_STANDARD.encode(page_pdf),
                    mime_type: PDF_MIME_TYPE,
                },
                features: vec![Feature {
                    feature_type: FEATURE_DOCUMENT_TEXT,
                }],
                pages: vec![1],
            }],
        };

        let response = self
            .client
            .post(VISION_FILES_ANNOTATE_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response.json::<AnnotateFilesResponse>().await?.into_page_text()
    }
}
