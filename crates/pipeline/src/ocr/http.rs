//! HTTP OCR engine
//!
//! Sends the image to a sidecar exposing `POST /ocr` as multipart
//! (`file`, `lang`) and expects `{"text": "..."}` back.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use lipi_config::OcrConfig;
use lipi_core::{Error, OcrEngine, Result};

use crate::PipelineError;

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: String,
}

/// OCR engine backed by an HTTP sidecar
pub struct HttpOcrEngine {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOcrEngine {
    pub fn new(config: &OcrConfig) -> std::result::Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PipelineError::Setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/ocr", self.endpoint)
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn extract(&self, image: &[u8], languages: &str) -> Result<String> {
        let start = Instant::now();

        let form = Form::new()
            .part("file", Part::bytes(image.to_vec()).file_name("upload"))
            .text("lang", languages.to_string());

        let response = self
            .client
            .post(self.url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Http(format!("OCR request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Recognition(format!(
                "OCR service error {} for '{}': {}",
                status, languages, body
            )));
        }

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| Error::Recognition(format!("Failed to parse OCR response: {}", e)))?;

        tracing::debug!(
            languages,
            chars = parsed.text.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OCR sidecar call"
        );

        Ok(parsed.text)
    }

    fn name(&self) -> &str {
        "http"
    }
}
