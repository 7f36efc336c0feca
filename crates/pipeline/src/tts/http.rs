//! HTTP speech synthesizer
//!
//! `POST /synthesize` with `{"text", "lang"}`; the response body is the
//! encoded audio.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;

use lipi_config::TtsConfig;
use lipi_core::{Error, Result, SpeechSynthesizer};

use crate::PipelineError;

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

/// Speech synthesizer backed by an HTTP sidecar
pub struct HttpSpeechSynthesizer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSpeechSynthesizer {
    pub fn new(config: &TtsConfig) -> std::result::Result<Self, PipelineError> {
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
        format!("{}/synthesize", self.endpoint)
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str, language_tag: &str) -> Result<Vec<u8>> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.url())
            .json(&SynthesizeRequest {
                text,
                lang: language_tag,
            })
            .send()
            .await
            .map_err(|e| Error::Http(format!("TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!(
                "TTS service error {} for '{}': {}",
                status, language_tag, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("Failed to read TTS response: {}", e)))?;

        tracing::debug!(
            language = language_tag,
            chars = text.chars().count(),
            bytes = audio.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "TTS sidecar call"
        );

        Ok(audio.to_vec())
    }

    fn model_name(&self) -> &str {
        "http"
    }
}
