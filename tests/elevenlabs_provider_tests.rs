use std::time::Duration;

use podforge::error::PodcastError;
use podforge::provider::{ElevenLabsProvider, SpeechProvider, SpeechRequest};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MP3: &[u8] = b"ID3\x04\x00fake-mp3-frames";

fn speech_request() -> SpeechRequest {
    SpeechRequest::new("Hello world.", "voice-1").with_model(Some("eleven_turbo_v2"))
}

#[tokio::test]
async fn synthesize_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .and(header("xi-api-key", "test-key"))
        .and(header("accept", "audio/mpeg"))
        .and(body_string_contains("\"stability\":0.5"))
        .and(body_string_contains("\"model_id\":\"eleven_turbo_v2\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(MP3),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri());
    let bytes = provider
        .synthesize(&speech_request())
        .await
        .expect("speech should succeed");

    assert_eq!(bytes, MP3);
}

#[tokio::test]
async fn model_id_is_omitted_when_unset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .and(body_json(json!({
            "text": "hello",
            "voice_settings": {"stability": 0.5, "similarity_boost": 0.5}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(MP3),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", format!("{}/", server.uri()));
    provider
        .synthesize(&SpeechRequest::new("  hello  ", "voice-1"))
        .await
        .expect("speech should succeed");
}

#[tokio::test]
async fn non_success_status_surfaces_json_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": {"status": "invalid_api_key", "message": "Invalid API key"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("bad-key", server.uri());
    let err = provider.synthesize(&speech_request()).await.unwrap_err();

    match err {
        PodcastError::Provider { status, detail } => {
            assert_eq!(status, 401);
            assert!(detail.contains("invalid_api_key"), "detail: {detail}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("  upstream exploded\n"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri());
    let err = provider.synthesize(&speech_request()).await.unwrap_err();

    assert!(matches!(
        err,
        PodcastError::Provider { status: 500, ref detail } if detail == "upstream exploded"
    ));
}

#[tokio::test]
async fn success_status_with_wrong_content_type_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<html>maintenance</html>"),
        )
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri());
    let err = provider.synthesize(&speech_request()).await.unwrap_err();

    match err {
        PodcastError::Provider { status, detail } => {
            assert_eq!(status, 200);
            assert!(detail.contains("text/html"), "detail: {detail}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_audio_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri());
    let err = provider.synthesize(&speech_request()).await.unwrap_err();
    assert!(matches!(err, PodcastError::Decode(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(MP3)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri())
        .with_timeout(Duration::from_millis(50));
    let err = provider.synthesize(&speech_request()).await.unwrap_err();
    assert!(matches!(err, PodcastError::Timeout(50)));
}

#[tokio::test]
async fn blank_text_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new_with_base_url("test-key", server.uri());
    let err = provider
        .synthesize(&SpeechRequest::new("   ", "voice-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, PodcastError::InvalidInput(_)));
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let provider = ElevenLabsProvider::new_with_base_url("", "http://127.0.0.1:9");
    let err = provider.synthesize(&speech_request()).await.unwrap_err();
    assert!(matches!(err, PodcastError::Configuration(_)));
}
