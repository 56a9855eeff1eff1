//! Error types for podforge.

pub mod unified;

pub use unified::ErrorCategory;

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for every pipeline operation.
#[derive(Error, Debug)]
pub enum PodcastError {
    #[error("Segment source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No usable segments: {0}")]
    EmptyInput(String),

    #[error("Malformed segment source: {0}")]
    MalformedSource(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Speech provider failed (status {status}): {detail}")]
    Provider { status: u16, detail: String },

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("No audio produced: every segment was empty")]
    NoAudioProduced,

    #[error("Audio export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Segment {index} failed: {source}")]
    Segment {
        index: usize,
        #[source]
        source: Box<PodcastError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Request cancelled")]
    Cancelled,
}

impl PodcastError {
    /// Create a provider error from a status code and response detail.
    pub fn provider(status: u16, detail: impl Into<String>) -> Self {
        Self::Provider {
            status,
            detail: detail.into(),
        }
    }

    /// Attach the index of the segment that produced this error.
    pub fn at_segment(self, index: usize) -> Self {
        match self {
            // Cancellation is not a segment failure.
            Self::Cancelled => Self::Cancelled,
            other => Self::Segment {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The failing segment index, if this error was raised for one.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::Segment { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The underlying error with any segment wrapper removed.
    pub fn root(&self) -> &PodcastError {
        match self {
            Self::Segment { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_)
            | Self::EmptyInput(_)
            | Self::MalformedSource(_)
            | Self::InvalidInput(_)
            | Self::NoAudioProduced
            | Self::Serialization(_) => ErrorCategory::Input,
            Self::Provider { .. } | Self::Network(_) | Self::Timeout(_) => {
                ErrorCategory::Provider
            }
            Self::Decode(_) | Self::Export(_) => ErrorCategory::Codec,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Io,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Segment { source, .. } => source.category(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PodcastError>;
