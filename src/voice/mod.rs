//! Voice catalog and per-segment voice resolution.

pub mod catalog;
pub mod resolver;

pub use catalog::{
    Gender, VoiceCatalog, VoiceEntry, FALLBACK_FEMALE_VOICE_ID, FALLBACK_MALE_VOICE_ID,
    MAX_SELECTED_VOICES,
};
pub use resolver::{resolve_voice_ids, VoiceAssignment};
