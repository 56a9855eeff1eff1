//! MP3 encode/decode.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::clip::{AudioClip, PcmFormat};
use crate::error::{PodcastError, Result};

/// Converts between MP3 bytes and [`AudioClip`]s.
///
/// Every decoded clip uses [`AudioCodec::format`], so clips from different
/// sources can be joined directly.
#[async_trait]
pub trait AudioCodec: Send + Sync {
    /// PCM layout of decoded clips.
    fn format(&self) -> PcmFormat;

    /// Decode an MP3 payload. Fails with [`PodcastError::Decode`].
    async fn decode(&self, mp3: &[u8]) -> Result<AudioClip>;

    /// Encode a clip as MP3. Fails with [`PodcastError::Export`].
    async fn encode(&self, clip: &AudioClip) -> Result<Vec<u8>>;
}

const DEFAULT_BITRATE: &str = "128k";

/// Codec backed by an external `ffmpeg` binary, streaming through pipes.
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    binary: PathBuf,
    format: PcmFormat,
    bitrate: String,
}

impl Default for FfmpegCodec {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegCodec {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            format: PcmFormat::default(),
            bitrate: DEFAULT_BITRATE.to_string(),
        }
    }

    pub fn with_format(mut self, format: PcmFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }

    /// Check that the binary runs. A missing binary is a configuration error.
    pub async fn probe(&self) -> Result<()> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(PodcastError::Configuration(format!(
                "{} -version exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        Ok(())
    }

    fn spawn_error(&self, err: std::io::Error) -> PodcastError {
        if err.kind() == std::io::ErrorKind::NotFound {
            PodcastError::Configuration(format!(
                "audio codec '{}' not found; install ffmpeg or set ffmpeg_path",
                self.binary.display()
            ))
        } else {
            PodcastError::Io(err)
        }
    }

    /// Run ffmpeg with `input` on stdin, returning stdout or stderr text.
    async fn pipe(&self, args: &[String], input: Vec<u8>) -> Result<std::result::Result<Vec<u8>, String>> {
        let mut child = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                // ffmpeg may close stdin early on bad input; its exit status reports that.
                let _ = stdin.write_all(&input).await;
                let _ = stdin.shutdown().await;
            })
        });

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            let _ = writer.await;
        }

        if output.status.success() {
            Ok(Ok(output.stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Ok(Err(format!("ffmpeg exited with {}: {stderr}", output.status)))
        }
    }

    fn pcm_args(&self) -> [String; 6] {
        [
            "-f".to_string(),
            "s16le".to_string(),
            "-ar".to_string(),
            self.format.sample_rate.to_string(),
            "-ac".to_string(),
            self.format.channels.to_string(),
        ]
    }
}

#[async_trait]
impl AudioCodec for FfmpegCodec {
    fn format(&self) -> PcmFormat {
        self.format
    }

    async fn decode(&self, mp3: &[u8]) -> Result<AudioClip> {
        if mp3.is_empty() {
            return Err(PodcastError::Decode("empty audio payload".to_string()));
        }
        let mut args: Vec<String> = ["-f", "mp3", "-i", "pipe:0"]
            .into_iter()
            .map(String::from)
            .collect();
        args.extend(self.pcm_args());
        args.push("pipe:1".to_string());

        let pcm = self.pipe(&args, mp3.to_vec()).await?.map_err(PodcastError::Decode)?;
        if pcm.is_empty() {
            return Err(PodcastError::Decode("payload contained no audio frames".to_string()));
        }
        Ok(AudioClip::new(self.format, pcm_from_le_bytes(&pcm)))
    }

    async fn encode(&self, clip: &AudioClip) -> Result<Vec<u8>> {
        if clip.format() != self.format {
            return Err(PodcastError::Export(format!(
                "clip is {} Hz/{} ch but codec expects {} Hz/{} ch",
                clip.format().sample_rate,
                clip.format().channels,
                self.format.sample_rate,
                self.format.channels
            )));
        }
        let mut args: Vec<String> = self.pcm_args().into();
        args.extend(
            ["-i", "pipe:0", "-f", "mp3", "-b:a", self.bitrate.as_str(), "pipe:1"]
                .into_iter()
                .map(String::from),
        );

        let mp3 = self
            .pipe(&args, pcm_to_le_bytes(clip.samples()))
            .await?
            .map_err(PodcastError::Export)?;
        if mp3.is_empty() {
            return Err(PodcastError::Export("encoder produced no output".to_string()));
        }
        Ok(mp3)
    }
}

/// Little-endian bytes to samples; a trailing odd byte is dropped.
pub fn pcm_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

pub fn pcm_to_le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
