//! Optical character recognition trait

use crate::Result;
use async_trait::async_trait;

/// OCR interface
///
/// `languages` is an opaque hint such as `"eng+hin+tam"`, passed to the
/// engine unchanged.
#[async_trait]
pub trait OcrEngine: Send + Sync + 'static {
    /// Extract text from encoded image bytes
    async fn extract(&self, image: &[u8], languages: &str) -> Result<String>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}
