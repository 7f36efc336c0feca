//! Text recognition
//!
//! [`TextRecognizer`] wraps an [`OcrEngine`] with the language fallback:
//! a failure on the requested language set is retried once with the
//! configured minimal language, and a second failure yields empty text
//! rather than an error.

mod http;

pub use http::HttpOcrEngine;

use std::sync::Arc;

use lipi_config::OcrConfig;
use lipi_core::{OcrEngine, RecognitionOutcome};

use crate::PipelineError;

/// Create the OCR engine described by config
pub fn create_ocr_engine(config: &OcrConfig) -> Result<Arc<dyn OcrEngine>, PipelineError> {
    tracing::info!(endpoint = %config.endpoint, "Using HTTP OCR engine");
    Ok(Arc::new(HttpOcrEngine::new(config)?))
}

/// OCR with a single fallback retry
pub struct TextRecognizer {
    engine: Arc<dyn OcrEngine>,
    default_languages: String,
    fallback_language: String,
}

impl TextRecognizer {
    pub fn new(engine: Arc<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            engine,
            default_languages: config.default_languages.clone(),
            fallback_language: config.fallback_language.clone(),
        }
    }

    /// Recognize text in `image`
    ///
    /// `languages` overrides the configured default hint when non-blank.
    pub async fn recognize(&self, image: &[u8], languages: Option<&str>) -> RecognitionOutcome {
        let primary = languages
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_languages.as_str());

        let primary_error = match self.engine.extract(image, primary).await {
            Ok(text) => return RecognitionOutcome::Recognized(text.trim().to_string()),
            Err(e) => e,
        };

        if primary == self.fallback_language {
            tracing::error!(
                error = %primary_error,
                engine = self.engine.name(),
                languages = primary,
                "OCR failed"
            );
            return RecognitionOutcome::Degraded {
                reason: primary_error.to_string(),
            };
        }

        tracing::warn!(
            error = %primary_error,
            engine = self.engine.name(),
            languages = primary,
            fallback = %self.fallback_language,
            "OCR failed, retrying with fallback language"
        );

        match self.engine.extract(image, &self.fallback_language).await {
            Ok(text) => RecognitionOutcome::RecognizedWithFallback(text.trim().to_string()),
            Err(e) => {
                tracing::error!(error = %e, "OCR fallback failed, treating text as empty");
                RecognitionOutcome::Degraded {
                    reason: e.to_string(),
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lipi_core::{Error, Result};
    use std::sync::Mutex;

    /// Succeeds only for the listed language hints, recording every call
    struct ScriptedOcr {
        accepts: Vec<&'static str>,
        text: &'static str,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedOcr {
        fn new(accepts: Vec<&'static str>, text: &'static str) -> Self {
            Self {
                accepts,
                text,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OcrEngine for ScriptedOcr {
        async fn extract(&self, _image: &[u8], languages: &str) -> Result<String> {
            self.calls.lock().unwrap().push(languages.to_string());
            if self.accepts.contains(&languages) {
                Ok(self.text.to_string())
            } else {
                Err(Error::Recognition(format!("missing traineddata for {}", languages)))
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn config() -> OcrConfig {
        OcrConfig {
            default_languages: "eng+hin".to_string(),
            fallback_language: "eng".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_primary_success_trims() {
        let engine = Arc::new(ScriptedOcr::new(vec!["eng+hin"], "  नमस्ते \n"));
        let recognizer = TextRecognizer::new(engine.clone(), &config());

        let outcome = recognizer.recognize(b"img", None).await;
        assert_eq!(outcome, RecognitionOutcome::Recognized("नमस्ते".to_string()));
        assert_eq!(engine.calls(), vec!["eng+hin"]);
    }

    #[tokio::test]
    async fn test_request_hint_overrides_default() {
        let engine = Arc::new(ScriptedOcr::new(vec!["tam"], "வணக்கம்"));
        let recognizer = TextRecognizer::new(engine.clone(), &config());

        let outcome = recognizer.recognize(b"img", Some("tam")).await;
        assert_eq!(outcome.text(), "வணக்கம்");
        assert_eq!(engine.calls(), vec!["tam"]);
    }

    #[tokio::test]
    async fn test_retry_with_fallback_language() {
        let engine = Arc::new(ScriptedOcr::new(vec!["eng"], "hello"));
        let recognizer = TextRecognizer::new(engine.clone(), &config());

        let outcome = recognizer.recognize(b"img", Some("xyz")).await;
        assert_eq!(outcome, RecognitionOutcome::RecognizedWithFallback("hello".to_string()));
        assert!(outcome.is_degraded());
        assert_eq!(engine.calls(), vec!["xyz", "eng"]);
    }

    #[tokio::test]
    async fn test_both_attempts_fail_yields_empty_text() {
        let engine = Arc::new(ScriptedOcr::new(vec![], "unused"));
        let recognizer = TextRecognizer::new(engine.clone(), &config());

        let outcome = recognizer.recognize(b"img", None).await;
        assert!(matches!(outcome, RecognitionOutcome::Degraded { .. }));
        assert_eq!(outcome.text(), "");
        assert_eq!(engine.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_when_primary_is_fallback() {
        let engine = Arc::new(ScriptedOcr::new(vec![], "unused"));
        let recognizer = TextRecognizer::new(engine.clone(), &config());

        let outcome = recognizer.recognize(b"img", Some("eng")).await;
        assert!(matches!(outcome, RecognitionOutcome::Degraded { .. }));
        assert_eq!(engine.calls(), vec!["eng"]);
    }
}
