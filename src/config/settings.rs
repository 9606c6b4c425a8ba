//! Configuration settings for Kort.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub summary: SummarySettings,
    pub rate_limit: RateLimitSettings,
    pub server: ServerSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// YouTube retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Base URL for watch pages (caption track discovery).
    pub watch_base_url: String,
    /// oEmbed endpoint used for title lookup (no API key needed).
    pub oembed_url: String,
    /// Timeout for a single transcript or title fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// User-Agent header sent with watch-page requests.
    pub user_agent: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            watch_base_url: "https://www.youtube.com".to_string(),
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            fetch_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; kort/0.1)".to_string(),
        }
    }
}

/// Summary generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// LLM model used for summary generation.
    pub model: String,
    /// Maximum tokens in the generated summary.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Timeout for one generation call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            request_timeout_secs: 120,
        }
    }
}

/// Per-identity rate limiting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Maximum admitted requests per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
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

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KortError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kort")
            .join("config.toml")
    }
}
