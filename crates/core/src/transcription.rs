//! Request, result, and per-stage outcome types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Error, Result, Script};

/// Message reported when recognition yields no text
pub const NO_TEXT_FOUND: &str = "No text found in image";

/// Input bundle for one transcription
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Raw image bytes
    pub image: Vec<u8>,
    /// Requested target script key, lower-cased
    pub target_script: String,
    /// Language hint passed opaquely to the OCR collaborator
    pub ocr_languages: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(image: Vec<u8>, target_script: impl Into<String>) -> Self {
        Self {
            image,
            target_script: target_script.into().trim().to_lowercase(),
            ocr_languages: None,
        }
    }

    pub fn with_ocr_languages(mut self, languages: impl Into<String>) -> Self {
        self.ocr_languages = Some(languages.into());
        self
    }

    /// Parsed target; unrecognised keys resolve to `Script::Unknown`
    pub fn target(&self) -> Script {
        Script::from_key(&self.target_script)
    }

    /// Reject empty or oversized uploads
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if self.image.is_empty() {
            return Err(Error::Input("Empty file".to_string()));
        }
        if self.image.len() > max_bytes {
            return Err(Error::Input(format!(
                "File too large: {} bytes (maximum {})",
                self.image.len(),
                max_bytes
            )));
        }
        Ok(())
    }
}

/// A generated audio file under a unique identifier
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// File name inside the storage directory, also the public id
    pub id: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

/// How text recognition concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Primary language set succeeded
    Recognized(String),
    /// Primary failed, fallback language succeeded
    RecognizedWithFallback(String),
    /// Both attempts failed; treated as empty text
    Degraded { reason: String },
}

impl RecognitionOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Recognized(text) | Self::RecognizedWithFallback(text) => text,
            Self::Degraded { .. } => "",
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Recognized(_))
    }
}

/// Which path produced a transliteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransliterationRoute {
    /// Source and target scheme were equal
    Identity,
    /// Single engine call
    Direct,
    /// Two hops through the intermediate scheme
    Pivot,
    /// Every engine call failed; original text returned
    PassThrough,
}

/// Result of converting text between schemes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransliterationOutcome {
    pub text: String,
    pub route: TransliterationRoute,
}

impl TransliterationOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self.route, TransliterationRoute::PassThrough)
    }
}

/// How audio synthesis concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// One call over the full text
    Direct(AudioArtifact),
    /// Direct call failed; `chunks` pieces were merged
    Chunked { artifact: AudioArtifact, chunks: usize },
    /// Both paths failed; no artifact exists
    Failed { reason: String },
    /// Nothing to speak
    Skipped,
}

impl SynthesisOutcome {
    pub fn artifact(&self) -> Option<&AudioArtifact> {
        match self {
            Self::Direct(artifact) | Self::Chunked { artifact, .. } => Some(artifact),
            Self::Failed { .. } | Self::Skipped => None,
        }
    }
}

/// Everything the pipeline learned about one request
///
/// The HTTP layer turns this into a [`TranscriptionResult`] once it knows
/// how to address the audio artifact.
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub original_text: String,
    pub transliterated_text: String,
    pub detected_script: Script,
    pub target_script: String,
    pub language_tag: String,
    pub recognition: RecognitionOutcome,
    pub route: Option<TransliterationRoute>,
    pub synthesis: SynthesisOutcome,
}

impl TranscriptionOutcome {
    /// Recognition produced nothing usable
    pub fn no_text(target_script: impl Into<String>, recognition: RecognitionOutcome) -> Self {
        Self {
            original_text: String::new(),
            transliterated_text: String::new(),
            detected_script: Script::Unknown,
            target_script: target_script.into(),
            language_tag: String::new(),
            recognition,
            route: None,
            synthesis: SynthesisOutcome::Skipped,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.original_text.is_empty()
    }

    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.synthesis.artifact()
    }
}

/// JSON body returned by the transcription endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub original_text: String,
    pub transliterated_text: String,
    pub detected_script: String,
    pub target_script: String,
    #[serde(rename = "langCode")]
    pub lang_code: String,
    pub audio_url: String,
    pub error: String,
}

impl TranscriptionResult {
    /// Build from a pipeline outcome; `audio_url` is empty when no artifact exists
    pub fn from_outcome(outcome: &TranscriptionOutcome, audio_url: Option<String>) -> Self {
        if !outcome.has_text() {
            return Self {
                original_text: String::new(),
                transliterated_text: String::new(),
                detected_script: Script::Unknown.key().to_string(),
                target_script: outcome.target_script.clone(),
                lang_code: String::new(),
                audio_url: String::new(),
                error: NO_TEXT_FOUND.to_string(),
            };
        }

        Self {
            original_text: outcome.original_text.clone(),
            transliterated_text: outcome.transliterated_text.clone(),
            detected_script: outcome.detected_script.key().to_string(),
            target_script: outcome.target_script.clone(),
            lang_code: outcome.language_tag.clone(),
            audio_url: audio_url.unwrap_or_default(),
            error: String::new(),
        }
    }
}
