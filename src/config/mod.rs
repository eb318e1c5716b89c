//! Configuration management for gleaner.
//!
//! Configuration is read from `~/.config/gleaner/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::collector::DEFAULT_WORKERS;
use crate::extractor::ExtractorConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Identifying header sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.10136";

pub const DEFAULT_WINDOW_DAYS: i64 = 2;
pub const DEFAULT_CACHE_DIR: &str = "./.url-visit-cache";

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trailing window for feed and sitemap sources, in days
    pub window_days: i64,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_concurrency: usize,
    /// Page cache directory; empty disables caching
    pub cache_dir: String,
    pub extractor: ExtractorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_concurrency: DEFAULT_WORKERS,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &PathBuf) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.clone(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/gleaner/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gleaner").join("config.toml"))
    }

    /// `None` when caching is disabled.
    pub fn cache_path(&self) -> Option<PathBuf> {
        let dir = self.cache_dir.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        format!(
            r##"# gleaner configuration

# Feed and sitemap sources keep items published within this many days
# (plus one day of slack)
window_days = {DEFAULT_WINDOW_DAYS}

# Sent as the User-Agent header on every request
user_agent = "{DEFAULT_USER_AGENT}"

# Per-request timeout in seconds
timeout_secs = 30

# Maximum concurrent requests
max_concurrency = {DEFAULT_WORKERS}

# Successful responses are cached here, keyed by URL hash.
# Set to "" to disable caching.
cache_dir = "{DEFAULT_CACHE_DIR}"

[extractor]
# Paragraphs shorter than this do not count towards a content block
min_paragraph_chars = 25

# Pages yielding less text than this are treated as having no article
min_content_chars = 140

# Elements that never contribute article text
boilerplate_tags = [
    "nav",
    "header",
    "footer",
    "aside",
    "form",
    "script",
    "style",
    "noscript",
    "iframe",
    "svg",
    "button",
    "select",
    "template",
]
"##
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
