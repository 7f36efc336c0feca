//! Transliteration between scripts
//!
//! The orchestrator resolves schemes through the [`SchemeRegistry`] and
//! drives an external [`TransliterationEngine`]:
//! - identical schemes short-circuit without touching the engine
//! - a failed direct conversion is retried through the intermediate scheme
//! - if that fails too, the input is returned unchanged
//!
//! Callers never see a transliteration error.

mod http;
mod noop;

pub use http::HttpTransliterator;
pub use noop::NoopTransliterator;

use std::sync::Arc;
use std::time::Instant;

use lipi_config::TransliterationConfig;
use lipi_core::{
    Result, SchemeRegistry, Script, TransliterationEngine, TransliterationOutcome,
    TransliterationRoute, INTERMEDIATE_SCHEME,
};

use crate::schwa::delete_word_final_schwa;

/// Create the transliteration engine described by config
///
/// An empty endpoint disables the sidecar; every conversion then falls
/// through to the original text.
pub fn create_transliterator(config: &TransliterationConfig) -> Arc<dyn TransliterationEngine> {
    if config.endpoint.trim().is_empty() {
        tracing::warn!("No transliteration endpoint configured, using pass-through engine");
        return Arc::new(NoopTransliterator::new());
    }

    match HttpTransliterator::new(config.clone()) {
        Ok(engine) => {
            tracing::info!(endpoint = %config.endpoint, "Using HTTP transliteration engine");
            Arc::new(engine)
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build HTTP transliterator, using pass-through");
            Arc::new(NoopTransliterator::new())
        },
    }
}

/// Converts text between scripts with graceful degradation
pub struct TransliterationOrchestrator {
    engine: Arc<dyn TransliterationEngine>,
    registry: SchemeRegistry,
}

impl TransliterationOrchestrator {
    pub fn new(engine: Arc<dyn TransliterationEngine>) -> Self {
        Self::with_registry(engine, SchemeRegistry::global().clone())
    }

    pub fn with_registry(engine: Arc<dyn TransliterationEngine>, registry: SchemeRegistry) -> Self {
        Self { engine, registry }
    }

    /// Convert `text` written in `source` into `target`, returning only the text
    pub async fn convert(&self, text: &str, source: Script, target: Script) -> String {
        self.transliterate(text, source, target).await.text
    }

    /// Convert `text` written in `source` into `target`
    ///
    /// Devanagari romanized into Latin additionally goes through schwa
    /// deletion.
    pub async fn transliterate(
        &self,
        text: &str,
        source: Script,
        target: Script,
    ) -> TransliterationOutcome {
        let from_scheme = self.registry.source_scheme(source);
        let to_scheme = self.registry.target_scheme(target);

        let mut outcome = self.convert_schemes(text, from_scheme, to_scheme).await;

        if source == Script::Devanagari && target == Script::Latin {
            outcome.text = delete_word_final_schwa(&outcome.text);
        }

        outcome
    }

    /// Convert between explicit scheme ids
    pub async fn convert_schemes(
        &self,
        text: &str,
        from_scheme: &str,
        to_scheme: &str,
    ) -> TransliterationOutcome {
        if from_scheme == to_scheme {
            return TransliterationOutcome {
                text: text.to_string(),
                route: TransliterationRoute::Identity,
            };
        }

        let start = Instant::now();
        match self.engine.transliterate(text, from_scheme, to_scheme).await {
            Ok(converted) => {
                tracing::debug!(
                    from = from_scheme,
                    to = to_scheme,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Transliterated directly"
                );
                return TransliterationOutcome {
                    text: converted,
                    route: TransliterationRoute::Direct,
                };
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    engine = self.engine.name(),
                    from = from_scheme,
                    to = to_scheme,
                    "Direct transliteration failed, pivoting through {}",
                    INTERMEDIATE_SCHEME
                );
            },
        }

        match self.pivot(text, from_scheme, to_scheme).await {
            Ok(converted) => TransliterationOutcome {
                text: converted,
                route: TransliterationRoute::Pivot,
            },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    engine = self.engine.name(),
                    from = from_scheme,
                    to = to_scheme,
                    "Pivot transliteration failed, returning original text"
                );
                TransliterationOutcome {
                    text: text.to_string(),
                    route: TransliterationRoute::PassThrough,
                }
            },
        }
    }

    async fn pivot(&self, text: &str, from_scheme: &str, to_scheme: &str) -> Result<String> {
        let intermediate = self.hop(text, from_scheme, INTERMEDIATE_SCHEME).await?;
        self.hop(&intermediate, INTERMEDIATE_SCHEME, to_scheme).await
    }

    async fn hop(&self, text: &str, from_scheme: &str, to_scheme: &str) -> Result<String> {
        if from_scheme == to_scheme {
            return Ok(text.to_string());
        }
        self.engine.transliterate(text, from_scheme, to_scheme).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lipi_core::Error;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine backed by a fixed table of (from, to) pairs
    struct TableEngine {
        table: HashMap<(String, String), String>,
        calls: AtomicUsize,
    }

    impl TableEngine {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(from, to, out)| ((from.to_string(), to.to_string()), out.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TransliterationEngine for TableEngine {
        async fn transliterate(&self, _text: &str, from: &str, to: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table
                .get(&(from.to_string(), to.to_string()))
                .cloned()
                .ok_or_else(|| Error::Transliteration(format!("unsupported {} -> {}", from, to)))
        }

        fn name(&self) -> &str {
            "table"
        }
    }

    #[tokio::test]
    async fn test_identity_short_circuit() {
        let engine = Arc::new(TableEngine::new(&[]));
        let orchestrator = TransliterationOrchestrator::new(engine.clone());

        for scheme in ["devanagari", "tamil", "itrans", "iast", "made-up"] {
            let outcome = orchestrator.convert_schemes("कखग abc", scheme, scheme).await;
            assert_eq!(outcome.text, "कखग abc");
            assert_eq!(outcome.route, TransliterationRoute::Identity);
        }
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_same_script_is_identity() {
        let engine = Arc::new(TableEngine::new(&[]));
        let orchestrator = TransliterationOrchestrator::new(engine.clone());

        for script in Script::DETECTABLE {
            let text = orchestrator.convert("some text", script, script).await;
            assert_eq!(text, "some text");
        }
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_direct_conversion() {
        let engine = Arc::new(TableEngine::new(&[("tamil", "devanagari", "वणक्कम्")]));
        let orchestrator = TransliterationOrchestrator::new(engine);

        let outcome = orchestrator
            .transliterate("வணக்கம்", Script::Tamil, Script::Devanagari)
            .await;
        assert_eq!(outcome.text, "वणक्कम्");
        assert_eq!(outcome.route, TransliterationRoute::Direct);
    }

    #[tokio::test]
    async fn test_pivot_through_intermediate() {
        let engine = Arc::new(TableEngine::new(&[
            ("telugu", "iast", "namaskāraṁ"),
            ("iast", "kannada", "ನಮಸ್ಕಾರಂ"),
        ]));
        let orchestrator = TransliterationOrchestrator::new(engine.clone());

        let outcome = orchestrator
            .transliterate("నమస్కారం", Script::Telugu, Script::Kannada)
            .await;
        assert_eq!(outcome.text, "ನಮಸ್ಕಾರಂ");
        assert_eq!(outcome.route, TransliterationRoute::Pivot);
        // direct attempt + two hops
        assert_eq!(engine.calls(), 3);
    }

    #[tokio::test]
    async fn test_pass_through_when_everything_fails() {
        let engine = Arc::new(TableEngine::new(&[("telugu", "iast", "namaskāraṁ")]));
        let orchestrator = TransliterationOrchestrator::new(engine);

        let outcome = orchestrator
            .transliterate("నమస్కారం", Script::Telugu, Script::Kannada)
            .await;
        assert_eq!(outcome.text, "నమస్కారం");
        assert!(outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_unknown_source_reads_as_intermediate() {
        let engine = Arc::new(TableEngine::new(&[("iast", "tamil", "கா")]));
        let orchestrator = TransliterationOrchestrator::new(engine.clone());

        let outcome = orchestrator
            .transliterate("kā", Script::Unknown, Script::Tamil)
            .await;
        assert_eq!(outcome.text, "கா");
        assert_eq!(outcome.route, TransliterationRoute::Direct);
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_pivot_hop_skipped_when_source_is_intermediate() {
        // "iast" -> "iast" is a no-op hop, so only the final hop hits the engine
        let engine = Arc::new(TableEngine::new(&[("iast", "gujarati", "ક")]));
        let orchestrator = TransliterationOrchestrator::new(engine.clone());

        let converted = orchestrator.pivot("ka", "iast", "gujarati").await.unwrap();
        assert_eq!(converted, "ક");
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_schwa_deletion_for_devanagari_to_latin() {
        let engine = Arc::new(TableEngine::new(&[("devanagari", "itrans", "kamala  nayana")]));
        let orchestrator = TransliterationOrchestrator::new(engine);

        let text = orchestrator
            .convert("कमल नयन", Script::Devanagari, Script::Latin)
            .await;
        assert_eq!(text, "kamal nayan");
    }

    #[tokio::test]
    async fn test_schwa_deletion_not_applied_to_other_sources() {
        let engine = Arc::new(TableEngine::new(&[("bengali", "itrans", "kamala")]));
        let orchestrator = TransliterationOrchestrator::new(engine);

        let text = orchestrator
            .convert("কমল", Script::Bengali, Script::Latin)
            .await;
        assert_eq!(text, "kamala");
    }
}
