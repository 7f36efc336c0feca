//! Transcription pipeline
//!
//! Runs one request through every stage in order:
//!
//! ```text
//! image → OCR (fallback retry) → script detection → transliteration → TTS → artifact
//! ```
//!
//! Only invalid input is returned as an error. Every other stage degrades
//! into its outcome value and the pipeline carries on.

use std::sync::Arc;
use std::time::Instant;

use lipi_config::Settings;
use lipi_core::{
    OcrEngine, Result, SchemeRegistry, Script, ScriptDetector, SpeechSynthesizer,
    TranscriptionOutcome, TranscriptionRequest, TransliterationEngine,
};
use lipi_text_processing::{create_transliterator, TransliterationOrchestrator};

use crate::metrics::{
    record_degraded, record_stage_latency, STAGE_OCR, STAGE_TRANSLITERATION, STAGE_TTS,
};
use crate::ocr::{create_ocr_engine, TextRecognizer};
use crate::tts::{create_speech_synthesizer, ArtifactStore, AudioSynthesizer, ChunkingConfig};
use crate::PipelineError;

pub struct TranscriptionPipeline {
    recognizer: TextRecognizer,
    detector: ScriptDetector,
    transliterator: TransliterationOrchestrator,
    synthesizer: AudioSynthesizer,
    registry: SchemeRegistry,
    max_upload_bytes: usize,
}

impl TranscriptionPipeline {
    /// Build with the HTTP sidecar backends named in `settings`
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, PipelineError> {
        let ocr = create_ocr_engine(&settings.ocr)?;
        let transliteration = create_transliterator(&settings.transliteration);
        let speech = create_speech_synthesizer(&settings.tts)?;
        Self::with_engines(settings, ocr, transliteration, speech)
    }

    /// Build around caller-supplied engines
    pub fn with_engines(
        settings: &Settings,
        ocr: Arc<dyn OcrEngine>,
        transliteration: Arc<dyn TransliterationEngine>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> std::result::Result<Self, PipelineError> {
        let store = Arc::new(ArtifactStore::new(&settings.storage)?);

        Ok(Self {
            recognizer: TextRecognizer::new(ocr, &settings.ocr),
            detector: ScriptDetector::new(),
            transliterator: TransliterationOrchestrator::new(transliteration),
            synthesizer: AudioSynthesizer::new(
                speech,
                store,
                ChunkingConfig::from(&settings.tts),
            ),
            registry: SchemeRegistry::global().clone(),
            max_upload_bytes: settings.server.max_upload_bytes,
        })
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        self.synthesizer.store()
    }

    /// Run the full pipeline for one upload
    pub async fn run(&self, request: &TranscriptionRequest) -> Result<TranscriptionOutcome> {
        request.validate(self.max_upload_bytes)?;
        let started = Instant::now();

        let stage = Instant::now();
        let recognition = self
            .recognizer
            .recognize(&request.image, request.ocr_languages.as_deref())
            .await;
        record_stage_latency(STAGE_OCR, stage.elapsed());
        if recognition.is_degraded() {
            record_degraded(STAGE_OCR);
        }

        let original_text = recognition.text().to_string();
        if original_text.trim().is_empty() {
            tracing::info!(
                target_script = %request.target_script,
                degraded = recognition.is_degraded(),
                "No text found in image"
            );
            return Ok(TranscriptionOutcome::no_text(
                request.target_script.clone(),
                recognition,
            ));
        }

        let detected = self.detector.detect(&original_text);
        let target = request.target();

        let stage = Instant::now();
        let transliteration = self
            .transliterator
            .transliterate(&original_text, detected, target)
            .await;
        record_stage_latency(STAGE_TRANSLITERATION, stage.elapsed());
        if transliteration.is_degraded() {
            record_degraded(STAGE_TRANSLITERATION);
        }

        let language_tag = self.registry.resolve_language_tag(detected, target);

        // Latin input is spoken in its converted form
        let speech_text = if detected == Script::Latin {
            &transliteration.text
        } else {
            &original_text
        };

        let stage = Instant::now();
        let synthesis = self.synthesizer.synthesize(speech_text, language_tag).await;
        record_stage_latency(STAGE_TTS, stage.elapsed());
        if synthesis.artifact().is_none() {
            record_degraded(STAGE_TTS);
        }

        tracing::info!(
            detected = %detected,
            target = %request.target_script,
            language = language_tag,
            route = ?transliteration.route,
            audio = synthesis.artifact().map(|a| a.id.as_str()).unwrap_or(""),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Transcription complete"
        );

        Ok(TranscriptionOutcome {
            original_text,
            transliterated_text: transliteration.text,
            detected_script: detected,
            target_script: request.target_script.clone(),
            language_tag: language_tag.to_string(),
            recognition,
            route: Some(transliteration.route),
            synthesis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lipi_core::{Error, RecognitionOutcome, SynthesisOutcome, TransliterationRoute};
    use tempfile::TempDir;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn extract(&self, _image: &[u8], _languages: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingOcr;

    #[async_trait]
    impl OcrEngine for FailingOcr {
        async fn extract(&self, _image: &[u8], _languages: &str) -> Result<String> {
            Err(Error::Recognition("tesseract exited".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Knows exactly one word
    struct NamasteEngine;

    #[async_trait]
    impl TransliterationEngine for NamasteEngine {
        async fn transliterate(&self, text: &str, from: &str, to: &str) -> Result<String> {
            match (text, from, to) {
                ("नमस्ते", "devanagari", "itrans") => Ok("namaste".to_string()),
                ("hello", "itrans", "devanagari") => Ok("हेल्लो".to_string()),
                _ => Err(Error::Transliteration(format!("{} -> {}", from, to))),
            }
        }

        fn name(&self) -> &str {
            "namaste"
        }
    }

    /// Echoes text and language as the audio payload
    struct EchoTts;

    #[async_trait]
    impl SpeechSynthesizer for EchoTts {
        async fn synthesize(&self, text: &str, language_tag: &str) -> Result<Vec<u8>> {
            Ok(format!("{}:{}", language_tag, text).into_bytes())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct BrokenTts;

    #[async_trait]
    impl SpeechSynthesizer for BrokenTts {
        async fn synthesize(&self, _text: &str, _language_tag: &str) -> Result<Vec<u8>> {
            Err(Error::Synthesis("voice not installed".to_string()))
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    fn settings(dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.storage.audio_dir = dir.path().to_string_lossy().to_string();
        settings
    }

    fn pipeline(
        dir: &TempDir,
        ocr: impl OcrEngine,
        tts: impl SpeechSynthesizer,
    ) -> TranscriptionPipeline {
        TranscriptionPipeline::with_engines(
            &settings(dir),
            Arc::new(ocr),
            Arc::new(NamasteEngine),
            Arc::new(tts),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_devanagari_to_latin() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FixedOcr("नमस्ते"), EchoTts);

        let outcome = pipeline
            .run(&TranscriptionRequest::new(b"png".to_vec(), "latin"))
            .await
            .unwrap();

        assert_eq!(outcome.detected_script, Script::Devanagari);
        assert!(outcome.transliterated_text.starts_with("namast"));
        assert_eq!(outcome.language_tag, "hi");
        assert_eq!(outcome.route, Some(TransliterationRoute::Direct));

        // original-language text is what gets spoken
        let artifact = outcome.artifact().unwrap();
        assert_eq!(std::fs::read(&artifact.path).unwrap(), "hi:नमस्ते".as_bytes());
    }

    #[tokio::test]
    async fn test_latin_input_speaks_converted_text() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FixedOcr("hello"), EchoTts);

        let outcome = pipeline
            .run(&TranscriptionRequest::new(b"png".to_vec(), "devanagari"))
            .await
            .unwrap();

        assert_eq!(outcome.detected_script, Script::Latin);
        assert_eq!(outcome.transliterated_text, "हेल्लो");
        assert_eq!(outcome.language_tag, "en");
        let artifact = outcome.artifact().unwrap();
        assert_eq!(std::fs::read(&artifact.path).unwrap(), "en:हेल्लो".as_bytes());
    }

    #[tokio::test]
    async fn test_no_text_is_soft_outcome() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FailingOcr, EchoTts);

        let outcome = pipeline
            .run(&TranscriptionRequest::new(b"png".to_vec(), "tamil"))
            .await
            .unwrap();

        assert!(!outcome.has_text());
        assert_eq!(outcome.detected_script, Script::Unknown);
        assert_eq!(outcome.target_script, "tamil");
        assert!(matches!(outcome.recognition, RecognitionOutcome::Degraded { .. }));
        assert_eq!(outcome.synthesis, SynthesisOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_soft() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FixedOcr("नमस्ते"), BrokenTts);

        let outcome = pipeline
            .run(&TranscriptionRequest::new(b"png".to_vec(), "latin"))
            .await
            .unwrap();

        assert!(outcome.has_text());
        assert!(outcome.artifact().is_none());
        assert!(matches!(outcome.synthesis, SynthesisOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_unknown_target_falls_back() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FixedOcr("நன்றி"), EchoTts);

        let outcome = pipeline
            .run(&TranscriptionRequest::new(b"png".to_vec(), "Klingon"))
            .await
            .unwrap();

        assert_eq!(outcome.target_script, "klingon");
        assert_eq!(outcome.detected_script, Script::Tamil);
        // engine knows no tamil pairs, so the text passes through
        assert_eq!(outcome.transliterated_text, "நன்றி");
        assert_eq!(outcome.route, Some(TransliterationRoute::PassThrough));
        assert_eq!(outcome.language_tag, "ta");
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, FixedOcr("unused"), EchoTts);

        let err = pipeline
            .run(&TranscriptionRequest::new(Vec::new(), "latin"))
            .await
            .unwrap_err();
        assert!(err.is_input());
    }
}
