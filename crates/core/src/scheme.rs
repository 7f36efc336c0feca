//! Script → transliteration scheme and speech language tables
//!
//! Lookups are total: every [`Script`] value resolves to a scheme and a
//! language tag, falling back to the defaults below when unmapped.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::Script;

/// Script-neutral romanization used as the pivot for two-hop conversion
pub const INTERMEDIATE_SCHEME: &str = "iast";

/// Scheme used for unmapped source scripts
pub const DEFAULT_SOURCE_SCHEME: &str = INTERMEDIATE_SCHEME;

/// ASCII-friendly scheme used for unmapped target scripts
pub const DEFAULT_TARGET_SCHEME: &str = "itrans";

/// Language tag used when neither script maps to one
pub const DEFAULT_LANGUAGE_TAG: &str = "en";

/// Transliteration scheme and speech language for one script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeMapping {
    pub scheme: &'static str,
    pub language_tag: &'static str,
}

const MAPPINGS: [(Script, SchemeMapping); 10] = [
    (Script::Devanagari, SchemeMapping { scheme: "devanagari", language_tag: "hi" }),
    (Script::Bengali, SchemeMapping { scheme: "bengali", language_tag: "bn" }),
    (Script::Gurmukhi, SchemeMapping { scheme: "gurmukhi", language_tag: "pa" }),
    (Script::Gujarati, SchemeMapping { scheme: "gujarati", language_tag: "gu" }),
    (Script::Oriya, SchemeMapping { scheme: "oriya", language_tag: "or" }),
    (Script::Tamil, SchemeMapping { scheme: "tamil", language_tag: "ta" }),
    (Script::Telugu, SchemeMapping { scheme: "telugu", language_tag: "te" }),
    (Script::Kannada, SchemeMapping { scheme: "kannada", language_tag: "kn" }),
    (Script::Malayalam, SchemeMapping { scheme: "malayalam", language_tag: "ml" }),
    // ITRANS keeps romanized output ASCII-only
    (Script::Latin, SchemeMapping { scheme: "itrans", language_tag: "en" }),
];

static DEFAULT_REGISTRY: Lazy<SchemeRegistry> = Lazy::new(SchemeRegistry::new);

/// Immutable lookup tables built once at startup
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    mappings: HashMap<Script, SchemeMapping>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self {
            mappings: MAPPINGS.iter().copied().collect(),
        }
    }

    /// Shared process-wide registry
    pub fn global() -> &'static SchemeRegistry {
        &DEFAULT_REGISTRY
    }

    /// Direct table hit, `None` for unmapped scripts
    pub fn mapping(&self, script: Script) -> Option<SchemeMapping> {
        self.mappings.get(&script).copied()
    }

    /// Scheme to read text written in `script`
    pub fn source_scheme(&self, script: Script) -> &'static str {
        self.mapping(script)
            .map(|m| m.scheme)
            .unwrap_or(DEFAULT_SOURCE_SCHEME)
    }

    /// Scheme to write text into `script`
    pub fn target_scheme(&self, script: Script) -> &'static str {
        self.mapping(script)
            .map(|m| m.scheme)
            .unwrap_or(DEFAULT_TARGET_SCHEME)
    }

    /// Speech language for a single script, if mapped
    pub fn language_tag(&self, script: Script) -> Option<&'static str> {
        self.mapping(script).map(|m| m.language_tag)
    }

    /// Speech language for a request: detected script first, then the
    /// target script, then [`DEFAULT_LANGUAGE_TAG`]
    pub fn resolve_language_tag(&self, detected: Script, target: Script) -> &'static str {
        self.language_tag(detected)
            .or_else(|| self.language_tag(target))
            .unwrap_or(DEFAULT_LANGUAGE_TAG)
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_hits() {
        let registry = SchemeRegistry::new();
        assert_eq!(registry.source_scheme(Script::Devanagari), "devanagari");
        assert_eq!(registry.target_scheme(Script::Latin), "itrans");
        assert_eq!(registry.language_tag(Script::Tamil), Some("ta"));
        assert_eq!(registry.language_tag(Script::Oriya), Some("or"));
    }

    #[test]
    fn test_unknown_fallbacks() {
        let registry = SchemeRegistry::new();
        assert_eq!(registry.source_scheme(Script::Unknown), "iast");
        assert_eq!(registry.target_scheme(Script::Unknown), "itrans");
        assert_eq!(registry.language_tag(Script::Unknown), None);
    }

    #[test]
    fn test_language_tag_resolution_order() {
        let registry = SchemeRegistry::new();
        assert_eq!(
            registry.resolve_language_tag(Script::Telugu, Script::Latin),
            "te"
        );
        assert_eq!(
            registry.resolve_language_tag(Script::Unknown, Script::Kannada),
            "kn"
        );
        assert_eq!(
            registry.resolve_language_tag(Script::Unknown, Script::Unknown),
            "en"
        );
    }

    #[test]
    fn test_every_script_resolves() {
        let registry = SchemeRegistry::global();
        let all = Script::DETECTABLE
            .iter()
            .copied()
            .chain(std::iter::once(Script::Unknown));
        for script in all {
            assert!(!registry.source_scheme(script).is_empty());
            assert!(!registry.target_scheme(script).is_empty());
            assert!(!registry.resolve_language_tag(script, script).is_empty());
        }
    }
}
