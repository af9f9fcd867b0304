//! Configuration settings for luma-mcp.

use crate::poller::PollPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub image: ImageSettings,
    pub video: VideoSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where downloaded assets are written.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir()
                .join("luma-mcp")
                .to_string_lossy()
                .into_owned(),
            log_level: "info".to_string(),
        }
    }
}

/// Luma API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the Luma API.
    pub base_url: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    /// Skip TLS certificate validation.
    pub accept_invalid_certs: bool,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.lumalabs.ai".to_string(),
            api_key_env: "LUMA_API_KEY".to_string(),
            accept_invalid_certs: true,
            request_timeout_secs: 60,
        }
    }
}

impl ApiSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> crate::error::Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(crate::error::LumaError::Config(format!(
                "{} is empty. Set it with: export {}='luma-...'",
                self.api_key_env, self.api_key_env
            ))),
            Err(_) => Err(crate::error::LumaError::Config(format!(
                "{} not set. Set it with: export {}='luma-...'",
                self.api_key_env, self.api_key_env
            ))),
        }
    }
}

/// Completion polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Upper bound of the randomized sleep between polls, in milliseconds.
    pub max_sleep_ms: u64,
    /// Maximum number of status requests per generation.
    pub max_attempts: u32,
    /// Wall-clock limit for a single generation, in seconds.
    pub timeout_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            max_sleep_ms: 1000,
            max_attempts: 600,
            timeout_secs: 900,
        }
    }
}

impl PollingSettings {
    /// Convert into the poller's policy.
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            max_sleep: Duration::from_millis(self.max_sleep_ms),
            max_attempts: self.max_attempts.max(1),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Defaults for image generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Model used when the caller gives none (photon-1, photon-flash-1).
    pub model: String,
    /// Aspect ratio used when the caller gives none.
    pub aspect_ratio: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            model: "photon-1".to_string(),
            aspect_ratio: "16:9".to_string(),
        }
    }
}

/// Defaults for video generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Model used when the caller gives none (ray-2, ray-flash-2, ray-1-6).
    pub model: String,
    pub aspect_ratio: String,
    /// 540p, 720p, 1080p or 4k.
    pub resolution: String,
    /// 5s or 9s.
    pub duration: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            model: "ray-2".to_string(),
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            duration: "5s".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LumaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("luma-mcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
