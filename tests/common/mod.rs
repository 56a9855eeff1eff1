//! Shared test helpers: a raw-PCM codec and a scriptable speech provider.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use podforge::audio::codec::{pcm_from_le_bytes, pcm_to_le_bytes};
use podforge::audio::{AudioClip, AudioCodec, PcmFormat};
use podforge::cache::FingerprintCache;
use podforge::error::PodcastError;
use podforge::podcast::PodcastAssembler;
use podforge::provider::{SpeechProvider, SpeechRequest};
use podforge::synthesis::SpeechSynthesizer;
use podforge::voice::VoiceCatalog;

/// 1 kHz mono: one sample per millisecond keeps duration math exact.
pub const TEST_FORMAT: PcmFormat = PcmFormat::new(1_000, 1);

/// Payload prefix the test codec refuses to decode.
pub const CORRUPT_PREFIX: &[u8] = b"BAD!";

/// Treats "MP3" bytes as little-endian 16-bit PCM at [`TEST_FORMAT`].
#[derive(Debug, Default)]
pub struct PcmCodec {
    pub decodes: AtomicUsize,
    pub encodes: AtomicUsize,
}

#[async_trait]
impl AudioCodec for PcmCodec {
    fn format(&self) -> PcmFormat {
        TEST_FORMAT
    }

    async fn decode(&self, mp3: &[u8]) -> Result<AudioClip, PodcastError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        if mp3.is_empty() || mp3.len() % 2 != 0 || mp3.starts_with(CORRUPT_PREFIX) {
            return Err(PodcastError::Decode("not test pcm".to_string()));
        }
        Ok(AudioClip::new(TEST_FORMAT, pcm_from_le_bytes(mp3)))
    }

    async fn encode(&self, clip: &AudioClip) -> Result<Vec<u8>, PodcastError> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        Ok(pcm_to_le_bytes(clip.samples()))
    }
}

/// Non-zero sample value identifying `text`.
pub fn marker(text: &str) -> i16 {
    let sum: u32 = text.bytes().map(u32::from).sum();
    (sum % 30_000) as i16 + 1
}

/// Length in samples (= ms) of the stub clip for `text`.
pub fn clip_len(text: &str) -> usize {
    text.len() * 10
}

/// The PCM bytes the stub provider returns for `text`.
pub fn stub_payload(text: &str) -> Vec<u8> {
    pcm_to_le_bytes(&vec![marker(text); clip_len(text)])
}

type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// Records every request and answers with [`stub_payload`].
#[derive(Default)]
pub struct StubProvider {
    calls: AtomicUsize,
    requests: Mutex<Vec<SpeechRequest>>,
    failures: HashMap<String, (u16, String)>,
    raw: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    on_call: Option<CallHook>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail requests for `text` with a provider error.
    pub fn fail_on(mut self, text: &str, status: u16, detail: &str) -> Self {
        self.failures
            .insert(text.to_string(), (status, detail.to_string()));
        self
    }

    /// Return `bytes` verbatim for `text`.
    pub fn respond_raw(mut self, text: &str, bytes: &[u8]) -> Self {
        self.raw.insert(text.to_string(), bytes.to_vec());
        self
    }

    /// Delay the response for `text`.
    pub fn delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Run `hook(call_number)` (1-based) at the start of each call.
    pub fn on_call(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn voices(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.voice_id).collect()
    }
}

#[async_trait]
impl SpeechProvider for StubProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PodcastError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(hook) = &self.on_call {
            hook(call);
        }
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delays.get(&request.text) {
            tokio::time::sleep(*delay).await;
        }
        if let Some((status, detail)) = self.failures.get(&request.text) {
            return Err(PodcastError::provider(*status, detail.clone()));
        }
        if let Some(bytes) = self.raw.get(&request.text) {
            return Ok(bytes.clone());
        }
        Ok(stub_payload(&request.text))
    }
}

pub struct Harness {
    pub provider: Arc<StubProvider>,
    pub codec: Arc<PcmCodec>,
    pub synthesizer: SpeechSynthesizer,
}

impl Harness {
    pub fn new(provider: StubProvider, cache_dir: &Path) -> Self {
        let provider = Arc::new(provider);
        let codec = Arc::new(PcmCodec::default());
        let cache = FingerprintCache::new(cache_dir, codec.clone());
        let synthesizer = SpeechSynthesizer::new(provider.clone(), codec.clone(), cache);
        Self {
            provider,
            codec,
            synthesizer,
        }
    }

    pub fn assembler(&self) -> PodcastAssembler {
        PodcastAssembler::new(self.synthesizer.clone(), VoiceCatalog::default())
    }
}

/// Write `value` as JSON to `dir/name`.
pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

/// Decode a file written through [`PcmCodec`].
pub fn read_pcm(path: &Path) -> Vec<i16> {
    pcm_from_le_bytes(&std::fs::read(path).unwrap())
}

/// Expected samples: 1 s lead-in, then each text's clip followed by `gap_ms` of silence.
pub fn expected_samples(texts: &[&str], gap_ms: usize) -> Vec<i16> {
    let mut samples = vec![0; 1_000];
    for text in texts {
        samples.extend(std::iter::repeat(marker(text)).take(clip_len(text)));
        samples.extend(std::iter::repeat(0).take(gap_ms));
    }
    samples
}

/// Names in `dir` ending with `.partial`.
pub fn partial_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".partial"))
        .collect()
}
