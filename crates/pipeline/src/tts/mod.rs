//! Speech synthesis and artifact storage

mod chunker;
mod http;
mod store;
mod synthesizer;

pub use chunker::{chunk_text, split_sentences, ChunkingConfig};
pub use http::HttpSpeechSynthesizer;
pub use store::{ArtifactStore, PendingArtifact};
pub use synthesizer::AudioSynthesizer;

use std::sync::Arc;

use lipi_config::TtsConfig;
use lipi_core::SpeechSynthesizer;

use crate::PipelineError;

/// Create the speech synthesizer described by config
pub fn create_speech_synthesizer(
    config: &TtsConfig,
) -> Result<Arc<dyn SpeechSynthesizer>, PipelineError> {
    tracing::info!(endpoint = %config.endpoint, "Using HTTP speech synthesizer");
    Ok(Arc::new(HttpSpeechSynthesizer::new(config)?))
}
