//! Segment loading: turn a JSON segment source into canonical [`Segment`]s.
//!
//! Two source shapes are accepted:
//!
//! ```json
//! ["paragraph one", "paragraph two"]
//! [{"text": "paragraph one", "speaker": "Host"}, {"text": "paragraph two"}]
//! ```
//!
//! Both may be mixed in one array. Entries whose text is blank after trimming
//! are dropped, as are elements that are neither strings nor records.

pub mod script;

pub use script::{parse_script_lines, split_paragraphs, write_segments};

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::error::Category;

use crate::error::{PodcastError, Result};

/// One unit of narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position among the surviving segments, 0-based.
    pub index: usize,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Optional speaker tag (free-form or a voice-catalog label).
    pub speaker: Option<String>,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            speaker: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSegment {
    Plain(String),
    Record(RawRecord),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    speaker: Option<serde_json::Value>,
}

/// Load segments from a JSON file.
///
/// Fails with [`PodcastError::NotFound`] when the file does not exist and with
/// [`PodcastError::EmptyInput`] when nothing survives filtering.
pub fn load_segments(path: impl AsRef<Path>) -> Result<Vec<Segment>> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(PodcastError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(PodcastError::Io(err)),
    };

    let segments = parse_segments(&raw)?;
    tracing::debug!(path = %path.display(), count = segments.len(), "loaded segments");
    Ok(segments)
}

/// Parse segments from an in-memory JSON document.
pub fn parse_segments(json: &str) -> Result<Vec<Segment>> {
    let raw: Vec<RawSegment> = serde_json::from_str(json).map_err(|err| match err.classify() {
        Category::Data => PodcastError::MalformedSource(format!(
            "expected a JSON array of strings or {{\"text\", \"speaker\"}} records: {err}"
        )),
        _ => PodcastError::Serialization(err),
    })?;

    let segments = normalize(raw);
    if segments.is_empty() {
        return Err(PodcastError::EmptyInput(
            "segment source contains no non-empty text".to_string(),
        ));
    }
    Ok(segments)
}

fn normalize(raw: Vec<RawSegment>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(raw.len());
    for item in raw {
        let (text, speaker) = match item {
            RawSegment::Plain(text) => (text, None),
            RawSegment::Record(record) => {
                (record.text.unwrap_or_default(), speaker_tag(record.speaker))
            }
            RawSegment::Other(value) => {
                tracing::debug!(%value, "skipping unsupported segment element");
                continue;
            }
        };

        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let speaker = speaker
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        segments.push(Segment {
            index: segments.len(),
            text: text.to_string(),
            speaker,
        });
    }
    segments
}

/// A speaker tag is only meaningful as a string; anything else is dropped
/// and the record's text is kept.
fn speaker_tag(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(speaker) => Some(speaker),
        serde_json::Value::Null => None,
        other => {
            tracing::warn!(speaker = %other, "ignoring non-string speaker tag");
            None
        }
    }
}
