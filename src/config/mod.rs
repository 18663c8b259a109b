//! Configuration for mindsync.
//!
//! Configuration is read from `~/.config/mindsync/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! Command-line flags override whatever the file says.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_ID: &str = "1197537175369949199";
pub const DEFAULT_PAGE_SIZE: usize = 150;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
}

/// What to mirror and where to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Guid of the user whose activities are mirrored
    pub user_id: String,

    /// Mirror file, created on the first successful sync
    pub output: PathBuf,

    /// Concurrent detail fetches per page (default: available parallelism)
    pub workers: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            output: PathBuf::from("out.txt"),
            workers: None,
        }
    }
}

/// Remote API endpoints and HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base of the activity feed; `/{user_id}/activities` is appended
    pub feed_base: String,

    /// Base of the single-entity endpoint
    pub entity_base: String,

    /// Entities requested per feed page (default: 150)
    pub page_size: usize,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            feed_base: "https://www.minds.com/api/v2/feeds/container".to_string(),
            entity_base: "https://www.minds.com/api/v2/entities".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            user_agent: concat!("mindsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SyncConfig {
    /// Worker count to use, falling back to the host's parallelism.
    pub fn effective_workers(&self) -> usize {
        self.workers.filter(|w| *w > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

impl Config {
    /// Load configuration from an explicit path, or from the default path.
    ///
    /// An explicit path must exist. At the default path a commented default
    /// file is created when missing. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/mindsync/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("mindsync").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# mindsync configuration
#
# Command-line flags (-u, -o, -w) override the values below.

[sync]
# Guid of the user whose minds are mirrored
user_id = "1197537175369949199"

# Mirror file (relative paths resolve against the working directory)
output = "out.txt"

# Concurrent detail fetches per feed page; defaults to the number of CPUs
# workers = 8

[remote]
feed_base = "https://www.minds.com/api/v2/feeds/container"
entity_base = "https://www.minds.com/api/v2/entities"

# Entities per feed page. A shorter page ends pagination.
page_size = 150

# Request timeout in seconds
timeout_secs = 30
"##
        .to_string()
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
