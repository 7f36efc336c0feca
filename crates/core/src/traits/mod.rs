//! Collaborator traits
//!
//! The recognition, transliteration, and speech engines are external
//! systems reached through these narrow interfaces. This enables:
//! - Pluggable backends (HTTP sidecars, in-process engines)
//! - Testing with mocks
//!
//! ```text
//! OcrEngine:              image bytes → text
//! TransliterationEngine:  text (scheme A) → text (scheme B)
//! SpeechSynthesizer:      text → encoded audio bytes
//! ```

mod recognition;
mod speech;
mod text_processing;

pub use recognition::OcrEngine;
pub use speech::SpeechSynthesizer;
pub use text_processing::TransliterationEngine;
