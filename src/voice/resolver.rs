//! Voice resolution: selected labels and speaker tags to per-segment voice ids.

use super::catalog::VoiceCatalog;
use crate::segment::Segment;

/// Resolve user-selected labels into an ordered, non-empty list of voice ids.
///
/// Unknown labels are skipped. When nothing resolves, the catalog's fallback
/// pair is returned so round-robin always has two distinct voices.
pub fn resolve_voice_ids<S: AsRef<str>>(selected_labels: &[S], catalog: &VoiceCatalog) -> Vec<String> {
    let mut ids: Vec<String> = selected_labels
        .iter()
        .filter_map(|label| {
            let label = label.as_ref();
            let id = catalog.voice_id(label);
            if id.is_none() {
                tracing::debug!(label, "ignoring unknown voice label");
            }
            id
        })
        .map(ToString::to_string)
        .collect();

    if ids.is_empty() {
        ids = catalog
            .fallback_pair()
            .iter()
            .map(|id| (*id).to_string())
            .collect();
    }
    ids
}

/// Voice id for every segment position, fixed before synthesis starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceAssignment {
    voices: Vec<String>,
}

impl VoiceAssignment {
    /// Assign a voice to each segment position.
    ///
    /// A speaker tag that exactly matches a catalog label wins; otherwise the
    /// position indexes `base_voice_ids` round-robin.
    pub fn build(segments: &[Segment], base_voice_ids: &[String], catalog: &VoiceCatalog) -> Self {
        let fallback = catalog.fallback_pair();
        let voices = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let overridden = segment
                    .speaker
                    .as_deref()
                    .and_then(|speaker| catalog.voice_id(speaker.trim()));
                match overridden {
                    Some(id) => id.to_string(),
                    None if base_voice_ids.is_empty() => fallback[i % fallback.len()].to_string(),
                    None => base_voice_ids[i % base_voice_ids.len()].clone(),
                }
            })
            .collect();
        Self { voices }
    }

    /// Voice id for the segment at `position`.
    pub fn voice_for(&self, position: usize) -> Option<&str> {
        self.voices.get(position).map(String::as_str)
    }

    pub fn voices(&self) -> &[String] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
