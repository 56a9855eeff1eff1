//! Shared HTTP client and response helpers.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::error::PodcastError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Per-request deadlines are applied by callers with
/// [`with_timeout`](crate::util::timeout::with_timeout).
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Headers for an ElevenLabs-style API (`xi-api-key`).
pub fn api_key_headers(api_key: &str, accept: &'static str) -> Result<HeaderMap, PodcastError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let key = HeaderValue::from_str(api_key).map_err(|_| {
        PodcastError::Configuration("API key contains characters not allowed in a header".to_string())
    })?;
    headers.insert("xi-api-key", key);
    Ok(headers)
}

/// Lower-cased MIME type of a response, without parameters.
pub fn response_mime(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Render an error body for diagnostics: compact JSON when it parses,
/// otherwise the raw text.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Error-response body text, or a marker when the body itself could not be read.
pub fn error_body(body: reqwest::Result<String>) -> String {
    match body {
        Ok(text) => text,
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

pub(crate) fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}
