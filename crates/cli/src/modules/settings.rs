use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FIGARO_DATA_DIR";

pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_DATA_DIR: &str = ".figaro";

/// Errors that occur while locating or reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory, set {DATA_DIR_ENV}")]
    NoHome,

    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Operator configuration, read once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Print command results.
    pub logging: bool,
    /// Print the cause chain of failures.
    pub trace: bool,
    pub api_url: String,
    pub address_prefix: String,
    /// Fee per gas unit in `units.fee`.
    pub gas_price: String,
    pub display: DisplaySettings,
    pub units: Units,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: true,
            trace: true,
            api_url: "http://127.0.0.1:26657".to_owned(),
            address_prefix: "wasm".to_owned(),
            gas_price: "0.25".to_owned(),
            display: DisplaySettings::default(),
            units: Units::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Show addresses as bech32 rather than raw hex.
    #[serde(alias = "beck32")]
    pub bech32: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { bech32: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Units {
    pub stake: String,
    pub fee: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            stake: "ustake".to_owned(),
            fee: "ufee".to_owned(),
        }
    }
}

impl Settings {
    /// Reads `config.json` from `dir`, writing the defaults there when it is absent.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or created.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);

        if !path.exists() {
            let settings = Self::default();
            settings.write(dir)?;
            info!(path = %path.display(), "Created default configuration");
            return Ok(settings);
        }

        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Like [`Settings::load`], but falls back to defaults with a warning.
    #[must_use]
    pub fn load_or_default(dir: &Path) -> Self {
        Self::load(dir).unwrap_or_else(|err| {
            warn!("{err}, using default configuration");
            Self::default()
        })
    }

    fn write(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(CONFIG_FILE);
        let body = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        fs::write(&path, body).map_err(|source| ConfigError::Io { path, source })
    }
}

/// `$FIGARO_DATA_DIR` when set and non-empty, `~/.figaro` otherwise.
///
/// # Errors
/// Returns error if neither the variable nor a home directory is available.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::home_dir()
            .map(|home| home.join(DEFAULT_DATA_DIR))
            .ok_or(ConfigError::NoHome),
    }
}
