//! Audio synthesis with chunk-and-merge fallback
//!
//! One direct call over the full text is tried first. If it fails, the
//! text is split into sentence pieces, each piece is synthesized into its
//! own temporary file, and the files are concatenated in order. Any piece
//! failing, or the future being dropped, discards the whole attempt.

use std::sync::Arc;

use lipi_core::{AudioArtifact, SpeechSynthesizer, SynthesisOutcome};

use super::chunker::{chunk_text, ChunkingConfig};
use super::store::ArtifactStore;
use crate::PipelineError;

pub struct AudioSynthesizer {
    engine: Arc<dyn SpeechSynthesizer>,
    store: Arc<ArtifactStore>,
    chunking: ChunkingConfig,
}

impl AudioSynthesizer {
    pub fn new(
        engine: Arc<dyn SpeechSynthesizer>,
        store: Arc<ArtifactStore>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            engine,
            store,
            chunking,
        }
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// Synthesize `text` into a stored artifact
    ///
    /// Never fails outward: both paths failing yields
    /// [`SynthesisOutcome::Failed`].
    pub async fn synthesize(&self, text: &str, language_tag: &str) -> SynthesisOutcome {
        if text.trim().is_empty() {
            return SynthesisOutcome::Skipped;
        }

        match self.synthesize_direct(text, language_tag).await {
            Ok(artifact) => return SynthesisOutcome::Direct(artifact),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    engine = self.engine.model_name(),
                    language = language_tag,
                    chars = text.chars().count(),
                    "Direct synthesis failed, falling back to chunks"
                );
            },
        }

        match self.synthesize_chunked(text, language_tag).await {
            Ok((artifact, chunks)) => {
                tracing::info!(artifact = %artifact.id, chunks, "Chunked synthesis succeeded");
                SynthesisOutcome::Chunked { artifact, chunks }
            },
            Err(e) => {
                tracing::error!(error = %e, language = language_tag, "Chunked synthesis failed");
                SynthesisOutcome::Failed {
                    reason: e.to_string(),
                }
            },
        }
    }

    async fn synthesize_direct(
        &self,
        text: &str,
        language_tag: &str,
    ) -> Result<AudioArtifact, PipelineError> {
        let audio = self.engine.synthesize(text, language_tag).await?;
        if audio.is_empty() {
            return Err(PipelineError::EmptyAudio);
        }
        self.store.persist(&audio).await
    }

    async fn synthesize_chunked(
        &self,
        text: &str,
        language_tag: &str,
    ) -> Result<(AudioArtifact, usize), PipelineError> {
        let pieces = chunk_text(text, &self.chunking);
        if pieces.is_empty() {
            return Err(PipelineError::NothingToSpeak);
        }

        let mut pending = self.store.begin();

        for (index, piece) in pieces.iter().enumerate() {
            let audio = self
                .synthesize_piece(piece, language_tag)
                .await
                .map_err(|e| PipelineError::Chunk {
                    index,
                    reason: e.to_string(),
                })?;
            self.store.write_chunk(&mut pending, index, &audio).await?;
        }

        let chunks = pending.chunk_count();
        let artifact = self.store.assemble(pending).await?;
        Ok((artifact, chunks))
    }

    async fn synthesize_piece(
        &self,
        piece: &str,
        language_tag: &str,
    ) -> Result<Vec<u8>, PipelineError> {
        let audio = self.engine.synthesize(piece, language_tag).await?;
        if audio.is_empty() {
            return Err(PipelineError::EmptyAudio);
        }
        Ok(audio)
    }
}
