//! Centralized default values
//!
//! Single source of truth for defaults referenced by both the settings
//! structs and the components that consume them.

/// Sidecar service endpoints (defaults for local development)
pub mod endpoints {
    /// OCR sidecar (tesseract wrapper)
    pub const OCR_DEFAULT: &str = "http://127.0.0.1:8093";

    /// Transliteration sidecar
    pub const TRANSLITERATION_DEFAULT: &str = "http://127.0.0.1:8094";

    /// Speech synthesis sidecar
    pub const TTS_DEFAULT: &str = "http://127.0.0.1:8095";
}

/// Text recognition defaults
pub mod ocr {
    /// Multi-language hint covering the supported scripts
    pub const DEFAULT_LANGUAGES: &str = "eng+hin+tam+tel+kan+mal+ben+guj+pan";

    /// Minimal language set used when the requested set fails
    pub const FALLBACK_LANGUAGE: &str = "eng";

    pub const TIMEOUT_MS: u64 = 60_000;
}

/// Speech synthesis defaults
pub mod tts {
    /// Above this many sentence pieces, pieces are re-bucketed
    pub const MAX_PIECES: usize = 12;

    /// Soft cap on characters per re-bucketed piece
    pub const MAX_CHUNK_CHARS: usize = 300;

    pub const TIMEOUT_MS: u64 = 60_000;
}

/// Artifact storage defaults
pub mod storage {
    pub const AUDIO_DIR: &str = "audio";
    pub const ARTIFACT_PREFIX: &str = "tts_";
    pub const ARTIFACT_EXTENSION: &str = "mp3";
}

/// Server defaults
pub mod server {
    pub const PORT: u16 = 5000;

    /// Upload limit (10 MiB)
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    /// Host substituted into audio URLs when the request came in on a
    /// loopback or wildcard address. Override with the LAN address the
    /// clients can reach.
    pub const FALLBACK_HOST: &str = "127.0.0.1";
}
