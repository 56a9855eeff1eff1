//! Error classification for callers that route on failure kind.

/// Broad error category used to pick exit codes and user-facing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The segment source or caller-supplied text was unusable.
    Input,
    /// The speech provider (or the network path to it) failed.
    Provider,
    /// Audio could not be decoded or encoded.
    Codec,
    /// Missing credentials, bad config file, missing codec binary.
    Configuration,
    /// Local filesystem failure.
    Io,
    /// The caller cancelled the request.
    Cancelled,
}

impl ErrorCategory {
    /// Process exit code used by the CLI for this category.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Input => 2,
            Self::Provider => 3,
            Self::Codec => 4,
            Self::Configuration => 5,
            Self::Io => 6,
            Self::Cancelled => 130,
        }
    }
}
