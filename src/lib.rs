//! Podforge: multi-speaker podcast synthesis.
//!
//! Takes an ordered list of text segments (optionally speaker-tagged),
//! assigns each a voice, synthesizes speech through a TTS provider with a
//! content-addressed disk cache, and joins the clips with silence into a
//! single MP3.
//!
//! # Quick Start
//!
//! ```no_run
//! use podforge::prelude::*;
//!
//! # async fn example() -> podforge::error::Result<()> {
//! let config = PodcastConfig::load(None)?;
//! let assembler = PodcastAssembler::from_config(&config).await?;
//! let request = PodcastRequest::new("segments.json")
//!     .with_labels(["Female – Rachel", "Male – Adam"]);
//! let artifact = assembler.generate_podcast(&request).await?;
//! println!("wrote {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod cache;
pub mod config;
pub mod error;
pub mod podcast;
pub mod prelude;
pub mod provider;
pub mod segment;
pub mod synthesis;
pub mod util;
pub mod voice;

#[cfg(feature = "cli")]
pub mod cli;
