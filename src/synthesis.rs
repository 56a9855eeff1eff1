//! Cached text-to-clip synthesis.

use std::sync::Arc;

use crate::audio::{AudioClip, AudioCodec};
use crate::cache::FingerprintCache;
use crate::error::{PodcastError, Result};
use crate::provider::{SpeechProvider, SpeechRequest, VoiceSettings};

/// Turns one text segment plus a voice id into a decoded clip, consulting the
/// fingerprint cache before calling the provider.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    provider: Arc<dyn SpeechProvider>,
    codec: Arc<dyn AudioCodec>,
    cache: FingerprintCache,
    voice_settings: VoiceSettings,
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("cache", &self.cache)
            .field("voice_settings", &self.voice_settings)
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesizer {
    pub fn new(
        provider: Arc<dyn SpeechProvider>,
        codec: Arc<dyn AudioCodec>,
        cache: FingerprintCache,
    ) -> Self {
        Self {
            provider,
            codec,
            cache,
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }

    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    pub fn codec(&self) -> &Arc<dyn AudioCodec> {
        &self.codec
    }

    /// Synthesize `text` with `voice_id`.
    ///
    /// Blank text fails with [`PodcastError::InvalidInput`] before any I/O. A
    /// cache hit returns without a network call. On a miss the provider's
    /// payload is decoded (malformed audio is [`PodcastError::Decode`]) and
    /// written back to the cache.
    pub async fn synthesize(&self, text: &str, voice_id: &str, model_id: Option<&str>) -> Result<AudioClip> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PodcastError::InvalidInput(
                "empty text cannot be synthesized".to_string(),
            ));
        }

        if let Some(clip) = self.cache.lookup(text, voice_id).await? {
            return Ok(clip);
        }

        let mut request = SpeechRequest::new(text, voice_id).with_model(model_id);
        request.voice_settings = self.voice_settings;
        let mp3 = self.provider.synthesize(&request).await?;

        let clip = self.codec.decode(&mp3).await.map_err(|err| match err {
            PodcastError::Decode(reason) => {
                PodcastError::Decode(format!("provider returned undecodable audio: {reason}"))
            }
            other => other,
        })?;

        // Provider bytes are already MP3.
        if let Err(err) = self.cache.store_encoded(text, voice_id, &mp3).await {
            tracing::warn!(voice_id, error = %err, "failed to write cache entry");
        }
        Ok(clip)
    }
}
