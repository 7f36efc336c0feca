//! Text processing for lipi
//!
//! - **Transliteration**: scheme resolution, direct and pivot conversion
//!   with pass-through degradation
//! - **Schwa deletion**: spoken-form cleanup for romanized Devanagari
//!
//! # Example
//!
//! ```ignore
//! use lipi_text_processing::{create_transliterator, TransliterationOrchestrator};
//!
//! let engine = create_transliterator(&settings.transliteration);
//! let orchestrator = TransliterationOrchestrator::new(engine);
//!
//! let text = orchestrator.convert("नमस्ते", Script::Devanagari, Script::Latin).await;
//! ```

pub mod schwa;
pub mod transliteration;

pub use schwa::delete_word_final_schwa;
pub use transliteration::{
    create_transliterator, HttpTransliterator, NoopTransliterator, TransliterationOrchestrator,
};
