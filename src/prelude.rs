//! Convenience re-exports for common use.

pub use crate::audio::{AudioClip, AudioCodec, FfmpegCodec, PcmFormat};
pub use crate::cache::FingerprintCache;
pub use crate::config::PodcastConfig;
pub use crate::error::{PodcastError, Result};
pub use crate::podcast::{PipelineStage, PodcastArtifact, PodcastAssembler, PodcastRequest};
pub use crate::provider::{ElevenLabsProvider, SpeechProvider, SpeechRequest};
pub use crate::segment::{load_segments, Segment};
pub use crate::synthesis::SpeechSynthesizer;
pub use crate::voice::{resolve_voice_ids, VoiceCatalog};
