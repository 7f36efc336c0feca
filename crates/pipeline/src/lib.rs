//! Recognition and synthesis pipeline
//!
//! This crate composes the per-request flow:
//! - Text recognition with language fallback (OCR sidecar)
//! - Script detection and transliteration
//! - Speech synthesis with chunk-and-merge fallback
//! - Artifact storage with atomic visibility

pub mod metrics;
pub mod ocr;
pub mod orchestrator;
pub mod tts;

pub use ocr::{create_ocr_engine, HttpOcrEngine, TextRecognizer};
pub use orchestrator::TranscriptionPipeline;
pub use tts::{
    chunk_text, create_speech_synthesizer, split_sentences, ArtifactStore, AudioSynthesizer,
    ChunkingConfig, HttpSpeechSynthesizer,
};

use thiserror::Error;

/// Pipeline errors
///
/// Internal to the stages; the public stage entry points turn these into
/// outcome values.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Engine error: {0}")]
    Engine(#[from] lipi_core::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Engine returned empty audio")]
    EmptyAudio,

    #[error("No speakable text")]
    NothingToSpeak,

    #[error("Chunk {index} failed: {reason}")]
    Chunk { index: usize, reason: String },

    #[error("Setup error: {0}")]
    Setup(String),
}
