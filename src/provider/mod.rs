//! Speech-synthesis provider abstraction.

pub mod elevenlabs;
pub mod http;

pub use elevenlabs::ElevenLabsProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PodcastError;

/// Voice-quality parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

/// One text segment to be spoken by one voice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: Option<String>,
    pub voice_settings: VoiceSettings,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            model_id: None,
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn with_model(mut self, model_id: Option<impl Into<String>>) -> Self {
        self.model_id = model_id.map(Into::into);
        self
    }
}

/// Trait for text-to-speech providers.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize speech, returning raw MP3 bytes.
    ///
    /// Implementations do not retry; a failed call surfaces immediately.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PodcastError>;
}
