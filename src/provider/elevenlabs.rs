//! ElevenLabs text-to-speech provider (`/text-to-speech/{voice_id}`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::http::{
    api_key_headers, error_body, error_detail, response_mime, shared_client, trim_trailing_slash,
};
use super::{SpeechProvider, SpeechRequest, VoiceSettings};
use crate::error::PodcastError;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const AUDIO_MPEG: &str = "audio/mpeg";

/// ElevenLabs HTTP client. Never retries; callers decide what to do on failure.
#[derive(Debug, Clone)]
pub struct ElevenLabsProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<&'a str>,
}

impl ElevenLabsProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new_with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate_request(&self, request: &SpeechRequest) -> Result<(), PodcastError> {
        if self.api_key.trim().is_empty() {
            return Err(PodcastError::Configuration(
                "Missing ElevenLabs API key".to_string(),
            ));
        }
        if request.text.trim().is_empty() {
            return Err(PodcastError::InvalidInput(
                "Speech text cannot be empty".to_string(),
            ));
        }
        if request.voice_id.trim().is_empty() {
            return Err(PodcastError::InvalidInput(
                "Voice id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PodcastError> {
        self.validate_request(request)?;

        let url = format!(
            "{}/text-to-speech/{}",
            trim_trailing_slash(&self.base_url),
            request.voice_id.trim()
        );
        let headers = api_key_headers(&self.api_key, AUDIO_MPEG)?;
        let body = SynthesisBody {
            text: request.text.trim(),
            voice_settings: request.voice_settings,
            model_id: request.model_id.as_deref(),
        };

        tracing::debug!(voice_id = %request.voice_id, chars = body.text.len(), "requesting speech");
        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await?;

            parse_speech_response(response).await
        })
        .await
    }
}

async fn parse_speech_response(response: reqwest::Response) -> Result<Vec<u8>, PodcastError> {
    let status = response.status().as_u16();
    let mime = response_mime(&response);

    if status != 200 || mime != AUDIO_MPEG {
        let body = error_body(response.text().await);
        let detail = if status == 200 {
            format!("expected {AUDIO_MPEG}, got '{mime}': {}", error_detail(&body))
        } else {
            error_detail(&body)
        };
        return Err(PodcastError::provider(status, detail));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(PodcastError::Decode(
            "Speech response contained empty audio payload".to_string(),
        ));
    }
    Ok(bytes.to_vec())
}
