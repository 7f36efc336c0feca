//! Transliteration engine trait

use crate::Result;
use async_trait::async_trait;

/// Character-mapping engine between transliteration schemes
///
/// Scheme identifiers are opaque strings such as `"devanagari"`,
/// `"itrans"`, or `"iast"`.
#[async_trait]
pub trait TransliterationEngine: Send + Sync + 'static {
    /// Convert `text` from `from_scheme` to `to_scheme`
    ///
    /// Fails on unsupported scheme pairs.
    async fn transliterate(&self, text: &str, from_scheme: &str, to_scheme: &str)
        -> Result<String>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}
