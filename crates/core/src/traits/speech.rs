//! Speech synthesis trait

use crate::Result;
use async_trait::async_trait;

/// Text-to-Speech interface
///
/// Implementations return a complete, independently playable audio
/// segment. Segments from separate calls must tolerate byte-level
/// concatenation (MPEG audio frames do).
///
/// # Example
///
/// ```ignore
/// let tts: Arc<dyn SpeechSynthesizer> = Arc::new(HttpSpeechSynthesizer::new(config)?);
/// let mp3 = tts.synthesize("नमस्ते", "hi").await?;
/// ```
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize `text` in the language identified by `language_tag`
    ///
    /// May fail on unsupported tags or oversized input.
    async fn synthesize(&self, text: &str, language_tag: &str) -> Result<Vec<u8>>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
