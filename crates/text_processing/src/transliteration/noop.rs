use async_trait::async_trait;

use lipi_core::{Error, Result, TransliterationEngine};

/// Engine used when no sidecar is configured
///
/// Every call fails, so the orchestrator ends up returning its input.
#[derive(Debug, Default)]
pub struct NoopTransliterator;

impl NoopTransliterator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransliterationEngine for NoopTransliterator {
    async fn transliterate(&self, _text: &str, from_scheme: &str, to_scheme: &str) -> Result<String> {
        Err(Error::Transliteration(format!(
            "no engine configured for {} -> {}",
            from_scheme, to_scheme
        )))
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transliteration::TransliterationOrchestrator;
    use lipi_core::{Script, TransliterationRoute};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_noop_degrades_to_pass_through() {
        let orchestrator = TransliterationOrchestrator::new(Arc::new(NoopTransliterator::new()));
        let outcome = orchestrator
            .transliterate("ਸਤ ਸ੍ਰੀ ਅਕਾਲ", Script::Gurmukhi, Script::Devanagari)
            .await;
        assert_eq!(outcome.text, "ਸਤ ਸ੍ਰੀ ਅਕਾਲ");
        assert_eq!(outcome.route, TransliterationRoute::PassThrough);
    }

    #[tokio::test]
    async fn test_create_transliterator_without_endpoint() {
        let engine = crate::transliteration::create_transliterator(
            &lipi_config::TransliterationConfig {
                endpoint: String::new(),
                timeout_ms: 1000,
            },
        );
        assert_eq!(engine.name(), "noop");
    }
}
