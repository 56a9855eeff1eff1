//! Podcast assembly: segments → voices → clips → one exported MP3.
//!
//! A request moves through `Loading → Resolving → Synthesizing → Assembling →
//! Exported`, and any stage may end in `Failed`. Nothing is resumable; a
//! failed request starts over from `Loading`. The first segment failure
//! aborts the whole request and the destination file is left untouched.

mod export;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::audio::{AudioClip, AudioCodec, FfmpegCodec};
use crate::cache::FingerprintCache;
use crate::config::PodcastConfig;
use crate::error::{PodcastError, Result};
use crate::provider::ElevenLabsProvider;
use crate::segment::{load_segments, Segment};
use crate::synthesis::SpeechSynthesizer;
use crate::voice::{resolve_voice_ids, VoiceAssignment, VoiceCatalog};

/// Silence before the first segment.
pub const LEAD_IN: Duration = Duration::from_millis(1000);
/// Default silence after each segment.
pub const DEFAULT_GAP: Duration = Duration::from_millis(400);
/// Longest accepted gap between segments.
pub const MAX_GAP: Duration = Duration::from_secs(60);
/// Default output file name, resolved against the working directory.
pub const DEFAULT_OUTPUT_NAME: &str = "podcast_final.mp3";

/// Progress of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Resolving,
    Synthesizing { index: usize, total: usize },
    Assembling,
    Exported { path: PathBuf },
    Failed { reason: String },
}

/// Callback receiving every stage transition.
pub type ProgressSink = Arc<dyn Fn(&PipelineStage) + Send + Sync>;

/// Inputs for one podcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastRequest {
    /// JSON segment source.
    pub source: PathBuf,
    /// Catalog labels chosen by the user, used round-robin.
    pub selected_labels: Vec<String>,
    /// Silence appended after every segment.
    pub gap: Duration,
    /// Destination; relative paths resolve against the working directory.
    pub output_path: PathBuf,
}

impl PodcastRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            selected_labels: Vec::new(),
            gap: DEFAULT_GAP,
            output_path: PathBuf::from(DEFAULT_OUTPUT_NAME),
        }
    }

    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.selected_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}

/// The exported podcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastArtifact {
    /// Absolute path of the written MP3.
    pub path: PathBuf,
    /// Length of the assembled audio, lead-in and gaps included.
    pub duration: Duration,
    /// Segments that were spoken.
    pub segments: usize,
}

/// Orchestrates loading, voice resolution, synthesis and export.
#[derive(Clone)]
pub struct PodcastAssembler {
    synthesizer: SpeechSynthesizer,
    catalog: VoiceCatalog,
    model_id: Option<String>,
    concurrency: usize,
    progress: Option<ProgressSink>,
}

impl std::fmt::Debug for PodcastAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodcastAssembler")
            .field("synthesizer", &self.synthesizer)
            .field("catalog", &self.catalog)
            .field("model_id", &self.model_id)
            .field("concurrency", &self.concurrency)
            .field("progress", &self.progress.as_ref().map(|_| ".."))
            .finish()
    }
}

impl PodcastAssembler {
    pub fn new(synthesizer: SpeechSynthesizer, catalog: VoiceCatalog) -> Self {
        Self {
            synthesizer,
            catalog,
            model_id: None,
            concurrency: 1,
            progress: None,
        }
    }

    /// Build the production pipeline: ElevenLabs provider, ffmpeg codec and
    /// disk cache. Missing credentials or a missing ffmpeg binary fail here,
    /// before any request is accepted.
    pub async fn from_config(config: &PodcastConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let ffmpeg = FfmpegCodec::new(&config.ffmpeg_path);
        ffmpeg.probe().await?;
        let codec: Arc<dyn AudioCodec> = Arc::new(ffmpeg);

        let provider = ElevenLabsProvider::new_with_base_url(api_key, config.base_url.as_str())
            .with_timeout(config.request_timeout);
        let cache = FingerprintCache::new(&config.cache_dir, codec.clone());
        let synthesizer = SpeechSynthesizer::new(Arc::new(provider), codec, cache);

        Ok(Self::new(synthesizer, config.catalog())
            .with_model_id(config.model_id.clone())
            .with_concurrency(config.concurrency))
    }

    pub fn with_model_id(mut self, model_id: Option<impl Into<String>>) -> Self {
        self.model_id = model_id.map(Into::into);
        self
    }

    /// Number of segments synthesized at once. Output order never changes.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Load `request.source` and render it to `request.output_path`.
    pub async fn generate_podcast(&self, request: &PodcastRequest) -> Result<PodcastArtifact> {
        self.generate_podcast_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`generate_podcast`](Self::generate_podcast), aborting with
    /// [`PodcastError::Cancelled`] once `cancel` fires.
    pub async fn generate_podcast_with_cancel(
        &self,
        request: &PodcastRequest,
        cancel: &CancellationToken,
    ) -> Result<PodcastArtifact> {
        let result = async {
            self.emit(PipelineStage::Loading);
            if cancel.is_cancelled() {
                return Err(PodcastError::Cancelled);
            }
            let segments = load_segments(&request.source)?;
            self.render_segments(
                &segments,
                &request.selected_labels,
                request.gap,
                &request.output_path,
                cancel,
            )
            .await
        }
        .await;
        self.report(result)
    }

    /// Render already-loaded segments.
    ///
    /// Segments whose text is blank are skipped; if every segment is blank the
    /// result is [`PodcastError::NoAudioProduced`].
    pub async fn render(
        &self,
        segments: &[Segment],
        selected_labels: &[String],
        gap: Duration,
        output_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<PodcastArtifact> {
        let result = self
            .render_segments(segments, selected_labels, gap, output_path, cancel)
            .await;
        self.report(result)
    }

    async fn render_segments(
        &self,
        segments: &[Segment],
        selected_labels: &[String],
        gap: Duration,
        output_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<PodcastArtifact> {
        if gap > MAX_GAP {
            return Err(PodcastError::InvalidInput(format!(
                "gap of {} ms exceeds the {} ms maximum",
                gap.as_millis(),
                MAX_GAP.as_millis()
            )));
        }

        self.emit(PipelineStage::Resolving);
        let base_voice_ids = resolve_voice_ids(selected_labels, &self.catalog);
        let assignment = VoiceAssignment::build(segments, &base_voice_ids, &self.catalog);
        tracing::debug!(voices = ?base_voice_ids, "resolved base voices");

        let clips = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PodcastError::Cancelled),
            clips = self.synthesize_all(segments, &assignment, cancel) => clips?,
        };

        if clips.is_empty() {
            return Err(PodcastError::NoAudioProduced);
        }

        self.emit(PipelineStage::Assembling);
        let format = self.synthesizer.codec().format();
        let lead_in = AudioClip::silent(format, LEAD_IN);
        let pause = AudioClip::silent(format, gap);
        let mut parts: Vec<&AudioClip> = Vec::with_capacity(clips.len() * 2 + 1);
        parts.push(&lead_in);
        for clip in &clips {
            parts.push(clip);
            parts.push(&pause);
        }
        let podcast = AudioClip::concat(parts)?;

        if cancel.is_cancelled() {
            return Err(PodcastError::Cancelled);
        }
        let encoded = self.synthesizer.codec().encode(&podcast).await?;
        let path = export::absolute(output_path)?;
        export::write_atomically(&path, &encoded).await?;

        tracing::info!(
            path = %path.display(),
            segments = clips.len(),
            duration_ms = podcast.duration().as_millis() as u64,
            "podcast exported"
        );
        self.emit(PipelineStage::Exported { path: path.clone() });
        Ok(PodcastArtifact {
            path,
            duration: podcast.duration(),
            segments: clips.len(),
        })
    }

    /// Synthesize every non-blank segment, returning clips in segment order.
    async fn synthesize_all(
        &self,
        segments: &[Segment],
        assignment: &VoiceAssignment,
        cancel: &CancellationToken,
    ) -> Result<Vec<AudioClip>> {
        let total = segments.len();
        let jobs = segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| !segment.text.trim().is_empty());

        stream::iter(jobs)
            .map(move |(position, segment)| async move {
                if cancel.is_cancelled() {
                    return Err(PodcastError::Cancelled);
                }
                let voice_id = assignment.voice_for(position).ok_or_else(|| {
                    PodcastError::InvalidInput(format!("no voice assigned to segment {position}"))
                })?;
                self.emit(PipelineStage::Synthesizing {
                    index: position,
                    total,
                });
                tracing::info!(index = position, total, voice_id, "synthesizing segment");
                self.synthesizer
                    .synthesize(&segment.text, voice_id, self.model_id.as_deref())
                    .await
                    .map_err(|err| err.at_segment(position))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            tracing::error!(error = %err, "podcast generation failed");
            self.emit(PipelineStage::Failed {
                reason: err.to_string(),
            });
        }
        result
    }

    fn emit(&self, stage: PipelineStage) {
        tracing::debug!(stage = ?stage, "pipeline stage");
        if let Some(sink) = &self.progress {
            sink(&stage);
        }
    }
}
