//! Disk-persisted fingerprint cache of synthesized clips.
//!
//! Entries live at `{cache_dir}/{voice_id}_{sha256(text)}.mp3`. The cache is
//! pure memoization: deleting it changes latency and provider traffic, never
//! the rendered podcast. Concurrent writers to one key race with last write
//! winning, which is safe because a key's content is reproducible.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::audio::{AudioClip, AudioCodec};
use crate::error::{PodcastError, Result};

/// Deterministic fingerprint of `(text, voice_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    voice_id: String,
    digest: String,
}

impl CacheKey {
    /// Fingerprint trimmed `text` spoken by `voice_id`.
    pub fn new(text: &str, voice_id: &str) -> Self {
        let digest = Sha256::digest(text.trim().as_bytes());
        Self {
            voice_id: voice_id.to_string(),
            digest: format!("{digest:x}"),
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// File name for this key; the voice id is reduced to filename-safe characters.
    pub fn file_name(&self) -> String {
        format!("{}_{}.mp3", sanitize_voice_id(&self.voice_id), self.digest)
    }
}

fn sanitize_voice_id(voice_id: &str) -> String {
    let cleaned: String = voice_id
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "voice".to_string()
    } else {
        cleaned
    }
}

/// Maps `(text, voice_id)` to a previously synthesized clip on disk.
#[derive(Clone)]
pub struct FingerprintCache {
    dir: PathBuf,
    codec: Arc<dyn AudioCodec>,
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("dir", &self.dir)
            .field("codec", &"..")
            .finish()
    }
}

impl FingerprintCache {
    pub fn new(dir: impl Into<PathBuf>, codec: Arc<dyn AudioCodec>) -> Self {
        Self {
            dir: dir.into(),
            codec,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `(text, voice_id)`, whether or not it exists.
    pub fn path_for(&self, text: &str, voice_id: &str) -> PathBuf {
        self.dir.join(CacheKey::new(text, voice_id).file_name())
    }

    /// Return the cached clip, or `None` on a miss.
    ///
    /// An entry that fails to decode is deleted and reported as a miss so the
    /// next [`store`](Self::store) replaces it.
    pub async fn lookup(&self, text: &str, voice_id: &str) -> Result<Option<AudioClip>> {
        let path = self.path_for(text, voice_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PodcastError::Io(err)),
        };

        match self.codec.decode(&bytes).await {
            Ok(clip) => {
                tracing::debug!(path = %path.display(), voice_id, "cache hit");
                Ok(Some(clip))
            }
            Err(PodcastError::Decode(reason)) => {
                tracing::warn!(
                    path = %path.display(),
                    voice_id,
                    reason = %reason,
                    "removing corrupt cache entry"
                );
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => return Err(PodcastError::Io(err)),
                }
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Encode `clip` as MP3 and write it under the key for `(text, voice_id)`.
    pub async fn store(&self, text: &str, voice_id: &str, clip: &AudioClip) -> Result<PathBuf> {
        let bytes = self.codec.encode(clip).await?;
        self.store_encoded(text, voice_id, &bytes).await
    }

    /// Write already-encoded MP3 bytes under the key for `(text, voice_id)`.
    pub async fn store_encoded(&self, text: &str, voice_id: &str, mp3: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(text, voice_id);
        tokio::fs::write(&path, mp3).await?;
        tracing::debug!(path = %path.display(), voice_id, bytes = mp3.len(), "cached clip");
        Ok(path)
    }

    /// Delete every `.mp3` entry in the cache directory, returning the count.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(PodcastError::Io(err)),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "mp3") && path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
