//! Audio artifact storage
//!
//! Artifacts are named `{prefix}{32 hex}.{extension}` inside one
//! directory. Every write lands in a dot-prefixed `.part` file first and
//! is renamed into place, so readers only ever see complete files.

use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use lipi_config::StorageConfig;
use lipi_core::AudioArtifact;

use crate::PipelineError;

/// Temporary files of an artifact that is not yet published
///
/// Dropping it unpublished removes every file it tracks, so a failed or
/// cancelled write leaves nothing behind.
#[derive(Debug)]
pub struct PendingArtifact {
    id: String,
    staging: PathBuf,
    chunks: Vec<PathBuf>,
    published: bool,
}

impl PendingArtifact {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl Drop for PendingArtifact {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        for path in self.chunks.iter().chain(std::iter::once(&self.staging)) {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
                }
            }
        }
    }
}

/// Directory of generated audio
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
    id_pattern: Regex,
}

impl ArtifactStore {
    pub fn new(config: &StorageConfig) -> Result<Self, PipelineError> {
        let id_pattern = Regex::new(&format!(
            r"^{}[0-9a-f]{{32}}\.{}$",
            regex::escape(&config.artifact_prefix),
            regex::escape(&config.artifact_extension)
        ))
        .map_err(|e| PipelineError::Setup(format!("Invalid artifact naming: {}", e)))?;

        Ok(Self {
            dir: PathBuf::from(&config.audio_dir),
            prefix: config.artifact_prefix.clone(),
            extension: config.artifact_extension.clone(),
            id_pattern,
        })
    }

    /// Create the storage directory if missing
    pub async fn ensure_dir(&self) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Whether the directory exists and accepts writes
    pub async fn is_writable(&self) -> bool {
        if self.ensure_dir().await.is_err() {
            return false;
        }
        let probe = self.dir.join(format!(".probe-{}", Uuid::new_v4().simple()));
        let writable = tokio::fs::write(&probe, b"").await.is_ok();
        let _ = tokio::fs::remove_file(&probe).await;
        writable
    }

    /// Fresh, collision-resistant artifact id
    pub fn allocate_id(&self) -> String {
        format!("{}{}.{}", self.prefix, Uuid::new_v4().simple(), self.extension)
    }

    /// Whether `id` has the shape of a finished artifact name
    pub fn is_artifact_id(&self, id: &str) -> bool {
        self.id_pattern.is_match(id)
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }

    fn staging_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!(".{}.part", id))
    }

    pub fn chunk_path(&self, id: &str, index: usize) -> PathBuf {
        self.dir.join(format!(".{}.{}.part", id, index))
    }

    /// Write `bytes` as a new artifact
    pub async fn persist(&self, bytes: &[u8]) -> Result<AudioArtifact, PipelineError> {
        self.ensure_dir().await?;
        let mut pending = self.begin();

        tokio::fs::write(&pending.staging, bytes).await?;
        let artifact = self
            .publish(pending.id.clone(), &pending.staging, bytes.len() as u64)
            .await?;
        pending.published = true;
        Ok(artifact)
    }

    /// Reserve a fresh id and track its temporaries
    pub fn begin(&self) -> PendingArtifact {
        let id = self.allocate_id();
        PendingArtifact {
            staging: self.staging_path(&id),
            id,
            chunks: Vec::new(),
            published: false,
        }
    }

    /// Write chunk `index` of `pending`
    pub async fn write_chunk(
        &self,
        pending: &mut PendingArtifact,
        index: usize,
        bytes: &[u8],
    ) -> Result<(), PipelineError> {
        self.ensure_dir().await?;
        let path = self.chunk_path(&pending.id, index);
        // tracked before the write so a partial file is still removed
        pending.chunks.push(path.clone());
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    /// Concatenate the chunks of `pending` in order and publish the result
    ///
    /// Chunk files are removed whether or not assembly succeeds.
    pub async fn assemble(
        &self,
        mut pending: PendingArtifact,
    ) -> Result<AudioArtifact, PipelineError> {
        let byte_len = self.concatenate(&pending.staging, &pending.chunks).await?;
        let artifact = self
            .publish(pending.id.clone(), &pending.staging, byte_len)
            .await?;
        self.remove_paths(&pending.chunks).await;
        pending.published = true;
        Ok(artifact)
    }

    async fn concatenate(&self, target: &Path, chunks: &[PathBuf]) -> Result<u64, PipelineError> {
        let mut out = tokio::fs::File::create(target).await?;
        let mut total = 0u64;
        for chunk in chunks {
            let bytes = tokio::fs::read(chunk).await?;
            out.write_all(&bytes).await?;
            total += bytes.len() as u64;
        }
        out.flush().await?;
        out.sync_all().await?;
        Ok(total)
    }

    async fn publish(
        &self,
        id: String,
        staging: &Path,
        byte_len: u64,
    ) -> Result<AudioArtifact, PipelineError> {
        let path = self.path_for(&id);
        if let Err(e) = tokio::fs::rename(staging, &path).await {
            let _ = tokio::fs::remove_file(staging).await;
            return Err(e.into());
        }

        tracing::debug!(artifact = %id, byte_len, "Artifact published");
        Ok(AudioArtifact { id, path, byte_len })
    }

    /// Best-effort removal
    async fn remove_paths(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
                }
            }
        }
    }

    /// Path of a finished artifact, if `id` names one that exists
    pub async fn resolve(&self, id: &str) -> Option<PathBuf> {
        if !self.is_artifact_id(id) {
            return None;
        }
        let path = self.path_for(id);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ArtifactStore {
        ArtifactStore::new(&StorageConfig {
            audio_dir: dir.path().to_string_lossy().to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn dir_entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_id_shape() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let id = store.allocate_id();
        assert!(id.starts_with("tts_"));
        assert!(id.ends_with(".mp3"));
        assert_eq!(id.len(), "tts_".len() + 32 + ".mp3".len());
        assert!(store.is_artifact_id(&id));
        assert_ne!(id, store.allocate_id());
    }

    #[test]
    fn test_rejects_foreign_ids() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let id = store.allocate_id();

        assert!(!store.is_artifact_id(&format!(".{}.part", id)));
        assert!(!store.is_artifact_id(&format!(".{}.0.part", id)));
        assert!(!store.is_artifact_id("../etc/passwd"));
        assert!(!store.is_artifact_id("tts_XYZ.mp3"));
        assert!(!store.is_artifact_id(""));
    }

    #[tokio::test]
    async fn test_persist_and_resolve() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let artifact = store.persist(b"ID3audio").await.unwrap();
        assert_eq!(artifact.byte_len, 8);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"ID3audio");
        assert_eq!(store.resolve(&artifact.id).await, Some(artifact.path.clone()));
        // nothing staged is left behind
        assert_eq!(dir_entries(&dir), vec![artifact.id]);
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.resolve(&store.allocate_id()).await, None);
    }

    #[tokio::test]
    async fn test_assemble_concatenates_in_order_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut pending = store.begin();
        let id = pending.id().to_string();

        for (index, bytes) in [b"aa".as_slice(), b"bbb", b"c"].iter().enumerate() {
            store.write_chunk(&mut pending, index, bytes).await.unwrap();
        }
        assert_eq!(pending.chunk_count(), 3);

        let artifact = store.assemble(pending).await.unwrap();
        assert_eq!(artifact.id, id);
        assert_eq!(artifact.byte_len, 6);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"aabbbc");
        assert_eq!(dir_entries(&dir), vec![id]);
    }

    #[tokio::test]
    async fn test_assemble_failure_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut pending = store.begin();

        store.write_chunk(&mut pending, 0, b"aa").await.unwrap();
        store.write_chunk(&mut pending, 1, b"bb").await.unwrap();
        std::fs::remove_file(store.chunk_path(pending.id(), 1)).unwrap();

        assert!(store.assemble(pending).await.is_err());
        assert!(dir_entries(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_dropped_pending_artifact_removes_chunks() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut pending = store.begin();

        store.write_chunk(&mut pending, 0, b"aa").await.unwrap();
        store.write_chunk(&mut pending, 1, b"bb").await.unwrap();
        assert_eq!(dir_entries(&dir).len(), 2);

        drop(pending);
        assert!(dir_entries(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_is_writable_creates_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested/audio");
        let store = ArtifactStore::new(&StorageConfig {
            audio_dir: nested.to_string_lossy().to_string(),
            ..Default::default()
        })
        .unwrap();

        assert!(store.is_writable().await);
        assert!(nested.is_dir());
    }
}
