//! Error types shared across lipi crates

use thiserror::Error;

/// Failures raised by collaborators and pipeline stages
///
/// Most stages degrade instead of returning these to the request layer;
/// only `Input` (and anything unanticipated) is surfaced to clients.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing upload, rejected before any pipeline work
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Transliteration failed: {0}")]
    Transliteration(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Transport or status failure talking to a sidecar service
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error stems from the caller's input
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
