//! Core traits and types for lipi
//!
//! This crate provides foundational types used across all other crates:
//! - Script definitions and character-frequency detection
//! - Script → transliteration scheme / speech language tables
//! - Collaborator traits for OCR, transliteration, and speech synthesis
//! - Request, result, and per-stage outcome types
//! - Error types

pub mod error;
pub mod scheme;
pub mod script;
pub mod traits;
pub mod transcription;

pub use error::{Error, Result};
pub use scheme::{
    SchemeMapping, SchemeRegistry, DEFAULT_LANGUAGE_TAG, DEFAULT_SOURCE_SCHEME,
    DEFAULT_TARGET_SCHEME, INTERMEDIATE_SCHEME,
};
pub use script::{Script, ScriptDetector};
pub use transcription::{
    AudioArtifact, RecognitionOutcome, SynthesisOutcome, TranscriptionOutcome,
    TranscriptionRequest, TranscriptionResult, TransliterationOutcome, TransliterationRoute,
    NO_TEXT_FOUND,
};

// Trait re-exports
pub use traits::{OcrEngine, SpeechSynthesizer, TransliterationEngine};
