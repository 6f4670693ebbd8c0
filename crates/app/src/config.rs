use std::fmt;
use std::path::{Path, PathBuf};

use borders::BorderSettings;
use serde::{Deserialize, Serialize};
use territory::WorldId;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "DOMAINS_CONFIG";

/// Server configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Snapshot file of the domain repository.
    pub repository_path: PathBuf,
    /// LZ4-compress snapshots on write.
    pub compress: bool,
    /// Fixed ticks per second driving the border overlay.
    pub tick_hz: f64,
    /// Surface height used until the host installs real terrain.
    pub default_surface_height: i32,
    pub borders: BorderSettings,
    /// World shown by the `preview` window.
    pub preview_world: WorldId,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            repository_path: PathBuf::from("domains.bin"),
            compress: true,
            tick_hz: 20.0,
            default_surface_height: 64,
            borders: BorderSettings::default(),
            preview_world: WorldId(Default::default()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    InvalidTickRate(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid configuration in {}: {source}", path.display())
            }
            ConfigError::InvalidTickRate(hz) => {
                write!(f, "tick_hz must be a positive number, got {hz}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidTickRate(_) => None,
        }
    }
}

impl ServerConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if !(config.tick_hz.is_finite() && config.tick_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(config.tick_hz));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Load from the file named by [`CONFIG_ENV`], or use defaults when it
    /// is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
