//! Configuration (layered: defaults < config file < environment < CLI flags).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PodcastError, Result};
use crate::podcast::{DEFAULT_GAP, DEFAULT_OUTPUT_NAME};
use crate::provider::elevenlabs::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::voice::VoiceCatalog;

pub const DEFAULT_MODEL_ID: &str = "eleven_turbo_v2";
pub const DEFAULT_CACHE_DIR: &str = "audio_cache";

/// Environment variables read by [`PodcastConfig::apply_env`].
pub const ENV_VARS: [&str; 6] = [
    "ELEVEN_API_KEY",
    "ELEVENLABS_BASE_URL",
    "PODFORGE_MODEL_ID",
    "PODFORGE_CACHE_DIR",
    "PODFORGE_FFMPEG",
    "PODFORGE_CONCURRENCY",
];

/// Everything needed to build a pipeline, resolved once at start-up.
#[derive(Clone, PartialEq)]
pub struct PodcastConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// `None` lets the provider pick its default model.
    pub model_id: Option<String>,
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
    pub gap: Duration,
    pub output: PathBuf,
    pub concurrency: usize,
    pub ffmpeg_path: PathBuf,
    /// Custom label → voice-id catalog; empty means the built-in catalog.
    pub voices: BTreeMap<String, String>,
}

impl fmt::Debug for PodcastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodcastConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("cache_dir", &self.cache_dir)
            .field("request_timeout", &self.request_timeout)
            .field("gap", &self.gap)
            .field("output", &self.output)
            .field("concurrency", &self.concurrency)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("voices", &self.voices.len())
            .finish()
    }
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: Some(DEFAULT_MODEL_ID.to_string()),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            request_timeout: DEFAULT_TIMEOUT,
            gap: DEFAULT_GAP,
            output: PathBuf::from(DEFAULT_OUTPUT_NAME),
            concurrency: 1,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            voices: BTreeMap::new(),
        }
    }
}

/// On-disk TOML shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_key: Option<String>,
    base_url: Option<String>,
    model_id: Option<String>,
    cache_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    gap_ms: Option<u64>,
    output: Option<PathBuf>,
    concurrency: Option<usize>,
    ffmpeg_path: Option<PathBuf>,
    #[serde(default)]
    voices: BTreeMap<String, String>,
}

impl PodcastConfig {
    /// Resolve configuration from the config file and the environment.
    ///
    /// An explicit `path` must exist. Without one, `~/.podforge/config.toml`
    /// is used when present. A `.env` file in the working directory is loaded
    /// before environment variables are read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        match path {
            Some(path) => config.apply_file(path)?,
            None => {
                if let Some(default) = Self::default_path().filter(|p| p.is_file()) {
                    config.apply_file(&default)?;
                }
            }
        }
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        config.apply_env()?;
        Ok(config)
    }

    /// `~/.podforge/config.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        directories::UserDirs::new().map(|dirs| dirs.home_dir().join(".podforge").join("config.toml"))
    }

    /// Overlay values from a TOML file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|e| {
            PodcastError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        self.apply_toml(&raw)
            .map_err(|e| PodcastError::Configuration(format!("{}: {e}", path.display())))
    }

    /// Overlay values from TOML text.
    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: ConfigFile =
            toml::from_str(raw).map_err(|e| PodcastError::Configuration(e.to_string()))?;

        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(model) = file.model_id {
            self.model_id = non_blank(model);
        }
        if let Some(dir) = file.cache_dir {
            self.cache_dir = dir;
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.gap_ms {
            self.gap = Duration::from_millis(ms);
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(concurrency) = file.concurrency {
            self.concurrency = concurrency.max(1);
        }
        if let Some(ffmpeg) = file.ffmpeg_path {
            self.ffmpeg_path = ffmpeg;
        }
        if !file.voices.is_empty() {
            self.voices = file.voices;
        }
        Ok(())
    }

    /// Overlay values from process environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("ELEVEN_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("ELEVENLABS_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("PODFORGE_MODEL_ID") {
            self.model_id = non_blank(model);
        }
        if let Some(dir) = lookup("PODFORGE_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(ffmpeg) = lookup("PODFORGE_FFMPEG") {
            self.ffmpeg_path = PathBuf::from(ffmpeg);
        }
        if let Some(raw) = lookup("PODFORGE_CONCURRENCY") {
            let parsed: usize = raw.trim().parse().map_err(|_| {
                PodcastError::Configuration(format!(
                    "PODFORGE_CONCURRENCY must be a positive integer, got '{raw}'"
                ))
            })?;
            self.concurrency = parsed.max(1);
        }
        Ok(())
    }

    /// The provider credential, or a configuration error when it is missing.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                PodcastError::Configuration(
                    "ELEVEN_API_KEY is not set (environment, .env, or config file)".to_string(),
                )
            })
    }

    /// Voice catalog for this configuration.
    pub fn catalog(&self) -> VoiceCatalog {
        VoiceCatalog::from_map(&self.voices)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = PodcastConfig::default();
        assert_eq!(config.model_id.as_deref(), Some("eleven_turbo_v2"));
        assert_eq!(config.gap, Duration::from_millis(400));
        assert_eq!(config.output, PathBuf::from("podcast_final.mp3"));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut config = PodcastConfig::default();
        config
            .apply_toml(
                r#"
                api_key = "from-file"
                gap_ms = 250
                timeout_secs = 10
                model_id = ""
                concurrency = 0

                [voices]
                "Host" = "host-voice"
                "#,
            )
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.gap, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.model_id, None);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.catalog().voice_id("Host"), Some("host-voice"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = PodcastConfig::default();
        let err = config.apply_toml("gap = 3").unwrap_err();
        assert!(matches!(err, PodcastError::Configuration(_)));
    }

    #[test]
    fn environment_wins_over_file() {
        let mut config = PodcastConfig::default();
        config.apply_toml(r#"api_key = "from-file""#).unwrap();

        let env: HashMap<&str, &str> = [
            ("ELEVEN_API_KEY", "from-env"),
            ("PODFORGE_CACHE_DIR", "/tmp/podforge-cache"),
            ("PODFORGE_CONCURRENCY", "3"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env_from(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.require_api_key().unwrap(), "from-env");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/podforge-cache"));
        assert_eq!(config.concurrency, 3);
    }

    #[test]
    fn bad_concurrency_is_a_configuration_error() {
        let mut config = PodcastConfig::default();
        let err = config
            .apply_env_from(|name| (name == "PODFORGE_CONCURRENCY").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, PodcastError::Configuration(_)));
    }

    #[test]
    fn missing_or_blank_key_is_a_configuration_error() {
        let mut config = PodcastConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(PodcastError::Configuration(_))
        ));
        config.api_key = Some("   ".to_string());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = PodcastConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, PodcastError::Configuration(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = PodcastConfig {
            api_key: Some("super-secret".to_string()),
            ..PodcastConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
