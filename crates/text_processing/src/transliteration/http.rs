//! HTTP transliteration engine
//!
//! Talks to a sidecar exposing `POST /transliterate`:
//!
//! ```text
//! request:  {"text": "...", "from": "devanagari", "to": "itrans"}
//! response: {"text": "..."}
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lipi_config::TransliterationConfig;
use lipi_core::{Error, Result, TransliterationEngine};

#[derive(Debug, Serialize)]
struct TransliterateRequest<'a> {
    text: &'a str,
    from: &'a str,
    to: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransliterateResponse {
    text: String,
}

/// Transliteration engine backed by an HTTP sidecar
pub struct HttpTransliterator {
    config: TransliterationConfig,
    client: reqwest::Client,
}

impl HttpTransliterator {
    pub fn new(config: TransliterationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!("{}/transliterate", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl TransliterationEngine for HttpTransliterator {
    async fn transliterate(&self, text: &str, from_scheme: &str, to_scheme: &str) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.url())
            .json(&TransliterateRequest {
                text,
                from: from_scheme,
                to: to_scheme,
            })
            .send()
            .await
            .map_err(|e| Error::Http(format!("Transliteration request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transliteration(format!(
                "{} -> {} returned {}: {}",
                from_scheme, to_scheme, status, body
            )));
        }

        let parsed: TransliterateResponse = response
            .json()
            .await
            .map_err(|e| Error::Transliteration(format!("Invalid response body: {}", e)))?;

        tracing::trace!(
            from = from_scheme,
            to = to_scheme,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transliteration sidecar call"
        );

        Ok(parsed.text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let engine = HttpTransliterator::new(TransliterationConfig {
            endpoint: "http://localhost:8094/".to_string(),
            timeout_ms: 1000,
        })
        .unwrap();
        assert_eq!(engine.url(), "http://localhost:8094/transliterate");
    }

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(TransliterateRequest {
            text: "नमस्ते",
            from: "devanagari",
            to: "itrans",
        })
        .unwrap();
        assert_eq!(body["from"], "devanagari");
        assert_eq!(body["to"], "itrans");
        assert_eq!(body["text"], "नमस्ते");
    }

    #[tokio::test]
    async fn test_unreachable_sidecar_is_an_error() {
        let engine = HttpTransliterator::new(TransliterationConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout_ms: 500,
        })
        .unwrap();
        assert!(engine.transliterate("a", "iast", "itrans").await.is_err());
    }
}
