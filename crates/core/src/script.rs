//! Script definitions and character-frequency script detection
//!
//! Covers the nine major Indic scripts plus Latin. Each script owns one or
//! more inclusive Unicode codepoint ranges; Latin owns the ASCII block.

use serde::{Deserialize, Serialize};

/// Writing systems recognised by the detector
///
/// Declaration order is the fixed enumeration order used to break ties
/// during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Latin,
    Unknown,
}

impl Script {
    /// Scripts that own codepoint ranges, in detection order
    pub const DETECTABLE: [Script; 10] = [
        Script::Devanagari,
        Script::Bengali,
        Script::Gurmukhi,
        Script::Gujarati,
        Script::Oriya,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
        Script::Latin,
    ];

    /// Inclusive codepoint ranges owned by this script
    pub fn unicode_ranges(&self) -> &'static [(u32, u32)] {
        match self {
            Self::Devanagari => &[(0x0900, 0x097F)],
            Self::Bengali => &[(0x0980, 0x09FF)],
            Self::Gurmukhi => &[(0x0A00, 0x0A7F)],
            Self::Gujarati => &[(0x0A80, 0x0AFF)],
            Self::Oriya => &[(0x0B00, 0x0B7F)],
            Self::Tamil => &[(0x0B80, 0x0BFF)],
            Self::Telugu => &[(0x0C00, 0x0C7F)],
            Self::Kannada => &[(0x0C80, 0x0CFF)],
            Self::Malayalam => &[(0x0D00, 0x0D7F)],
            Self::Latin => &[(0x0000, 0x007F)],
            Self::Unknown => &[],
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        self.unicode_ranges()
            .iter()
            .any(|&(start, end)| code >= start && code <= end)
    }

    /// Wire key used in requests and responses
    pub fn key(&self) -> &'static str {
        match self {
            Self::Devanagari => "devanagari",
            Self::Bengali => "bengali",
            Self::Gurmukhi => "gurmukhi",
            Self::Gujarati => "gujarati",
            Self::Oriya => "oriya",
            Self::Tamil => "tamil",
            Self::Telugu => "telugu",
            Self::Kannada => "kannada",
            Self::Malayalam => "malayalam",
            Self::Latin => "latin",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire key (case-insensitive). Unrecognised keys map to `Unknown`.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        Self::DETECTABLE
            .iter()
            .copied()
            .find(|s| s.key() == key)
            .unwrap_or(Self::Unknown)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::Latin
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Classifies text by counting characters per script block
///
/// This is a frequency heuristic, not a language model: mixed-script input
/// resolves to whichever script has the most characters, ties going to the
/// script declared first in [`Script::DETECTABLE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the dominant script of `text`
    pub fn detect(&self, text: &str) -> Script {
        if text.trim().is_empty() {
            return Script::Unknown;
        }

        let counts = self.count(text);

        let mut best = Script::Unknown;
        let mut best_count = 0usize;
        for (script, count) in Script::DETECTABLE.iter().zip(counts.iter()) {
            if *count > best_count {
                best = *script;
                best_count = *count;
            }
        }

        tracing::trace!(script = %best, matched = best_count, "Script detected");
        best
    }

    /// Per-script character counts, indexed like [`Script::DETECTABLE`]
    pub fn count(&self, text: &str) -> [usize; 10] {
        let mut counts = [0usize; 10];
        for c in text.chars() {
            for (idx, script) in Script::DETECTABLE.iter().enumerate() {
                if script.contains_char(c) {
                    counts[idx] += 1;
                }
            }
        }
        counts
    }
}
