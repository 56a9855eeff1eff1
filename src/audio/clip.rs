//! In-memory PCM audio clips.

use std::time::Duration;

use crate::error::{PodcastError, Result};

/// Sample layout shared by every clip a codec produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmFormat {
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Interleaved sample count for `duration`, rounded down to whole frames.
    ///
    /// Saturates at `usize::MAX` instead of overflowing.
    pub fn samples_for(&self, duration: Duration) -> usize {
        let frames = duration.as_millis().saturating_mul(u128::from(self.sample_rate)) / 1000;
        usize::try_from(frames)
            .unwrap_or(usize::MAX)
            .saturating_mul(usize::from(self.channels))
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::new(44_100, 1)
    }
}

/// Decoded audio: interleaved signed 16-bit samples.
///
/// Clips are never mutated after construction; joining always builds a new clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    format: PcmFormat,
    samples: Vec<i16>,
}

impl AudioClip {
    pub fn new(format: PcmFormat, samples: Vec<i16>) -> Self {
        Self { format, samples }
    }

    /// Silence of the given length.
    pub fn silent(format: PcmFormat, duration: Duration) -> Self {
        Self {
            format,
            samples: vec![0; format.samples_for(duration)],
        }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        let per_second = self.format.sample_rate as u64 * self.format.channels.max(1) as u64;
        if per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.samples.len() as u64 * 1_000_000 / per_second)
    }

    /// A new clip holding `self` followed by `next`.
    pub fn then(&self, next: &AudioClip) -> Result<AudioClip> {
        Self::concat([self, next])
    }

    /// Join clips in order. All parts must share one [`PcmFormat`].
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a AudioClip>) -> Result<AudioClip> {
        let parts: Vec<&AudioClip> = parts.into_iter().collect();
        let Some(first) = parts.first() else {
            return Err(PodcastError::Export("no audio to join".to_string()));
        };
        let format = first.format;
        if let Some(odd) = parts.iter().find(|p| p.format != format) {
            return Err(PodcastError::Export(format!(
                "cannot join {} Hz/{} ch audio with {} Hz/{} ch audio",
                format.sample_rate, format.channels, odd.format.sample_rate, odd.format.channels
            )));
        }

        let total = parts.iter().map(|p| p.samples.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for part in &parts {
            samples.extend_from_slice(&part.samples);
        }
        Ok(AudioClip { format, samples })
    }
}
