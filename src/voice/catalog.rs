//! Voice catalog: human-readable labels mapped to provider voice ids.

use std::collections::BTreeMap;

use strum::{Display, EnumString};

/// Most voices a caller may select for one podcast.
pub const MAX_SELECTED_VOICES: usize = 4;

/// Voice id used when no selected label resolves ("Female – Rachel").
pub const FALLBACK_FEMALE_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
/// Voice id used when no selected label resolves ("Male – Adam").
pub const FALLBACK_MALE_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";

const DEFAULT_VOICES: [(&str, &str); 8] = [
    ("Female – Rachel", "21m00Tcm4TlvDq8ikWAM"),
    ("Female – Bella", "EXAVITQu4vr4xnSDxMaL"),
    ("Female – Elli", "MF3mGyEYCl7XYWbV9V6O"),
    ("Female – Sarah", "pMsXgVXv3BLzUgSXRplE"),
    ("Male – Adam", "pNInz6obpgDQGcFmaJgB"),
    ("Male – Antony", "ErXwobaYiN019PkySvjV"),
    ("Male – Josh", "TxGEqnHWrfWFTfGW9XjX"),
    ("Male – Eric", "cjVigY5qzO86Huf0OWal"),
];

/// Conventional gender of a catalog voice, derived from its label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    fn from_label(label: &str) -> Option<Self> {
        let prefix = label.split(['–', '-']).next()?.trim();
        prefix.parse().ok()
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceEntry {
    pub label: String,
    pub voice_id: String,
    pub gender: Option<Gender>,
}

/// Immutable label → voice-id mapping, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    entries: Vec<VoiceEntry>,
    fallback: [String; 2],
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_VOICES)
    }
}

impl VoiceCatalog {
    /// Build a catalog from `(label, voice_id)` pairs.
    ///
    /// Later duplicates of a label are ignored. The fallback pair is the first
    /// female and first male entry, or the built-in pair when either is absent.
    pub fn from_pairs<L, V>(pairs: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<VoiceEntry> = Vec::new();
        for (label, voice_id) in pairs {
            let label = label.into().trim().to_string();
            let voice_id = voice_id.into().trim().to_string();
            if label.is_empty() || voice_id.is_empty() {
                continue;
            }
            if entries.iter().any(|e| e.label == label) {
                continue;
            }
            entries.push(VoiceEntry {
                gender: Gender::from_label(&label),
                label,
                voice_id,
            });
        }

        let first_of = |gender: Gender| {
            entries
                .iter()
                .find(|e| e.gender == Some(gender))
                .map(|e| e.voice_id.clone())
        };
        let fallback = match (first_of(Gender::Female), first_of(Gender::Male)) {
            (Some(female), Some(male)) if female != male => [female, male],
            _ => [
                FALLBACK_FEMALE_VOICE_ID.to_string(),
                FALLBACK_MALE_VOICE_ID.to_string(),
            ],
        };

        Self { entries, fallback }
    }

    /// Build a catalog from a config map, falling back to the default catalog
    /// when the map is empty.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        if map.is_empty() {
            return Self::default();
        }
        Self::from_pairs(map.iter().map(|(l, v)| (l.as_str(), v.as_str())))
    }

    /// Exact-label lookup.
    pub fn voice_id(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.voice_id.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.voice_id(label).is_some()
    }

    pub fn entries(&self) -> &[VoiceEntry] {
        &self.entries
    }

    pub fn entries_by_gender(&self, gender: Gender) -> impl Iterator<Item = &VoiceEntry> {
        self.entries.iter().filter(move |e| e.gender == Some(gender))
    }

    /// Two distinct voice ids used when nothing else resolves.
    pub fn fallback_pair(&self) -> [&str; 2] {
        [&self.fallback[0], &self.fallback[1]]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
