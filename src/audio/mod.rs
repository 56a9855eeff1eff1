//! Audio primitives: PCM clips and the MP3 codec seam.

pub mod clip;
pub mod codec;

pub use clip::{AudioClip, PcmFormat};
pub use codec::{AudioCodec, FfmpegCodec};
