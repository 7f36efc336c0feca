//! Application State
//!
//! Shared across all handlers; everything inside is immutable after
//! startup.

use std::sync::Arc;

use lipi_config::Settings;
use lipi_core::{OcrEngine, SpeechSynthesizer, TransliterationEngine};
use lipi_pipeline::{ArtifactStore, PipelineError, TranscriptionPipeline};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub pipeline: Arc<TranscriptionPipeline>,
}

impl AppState {
    /// State backed by the sidecar services named in `config`
    pub fn new(config: Settings) -> Result<Self, PipelineError> {
        let pipeline = TranscriptionPipeline::from_settings(&config)?;
        Ok(Self::from_parts(config, pipeline))
    }

    /// State around caller-supplied engines
    pub fn with_engines(
        config: Settings,
        ocr: Arc<dyn OcrEngine>,
        transliteration: Arc<dyn TransliterationEngine>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Result<Self, PipelineError> {
        let pipeline = TranscriptionPipeline::with_engines(&config, ocr, transliteration, speech)?;
        Ok(Self::from_parts(config, pipeline))
    }

    fn from_parts(config: Settings, pipeline: TranscriptionPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        self.pipeline.store()
    }
}
