use std::{fs, path::PathBuf};

use common::ledger::LedgerOrder;
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "chirp";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REMOTE: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the ledger service
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Path of the ledger read endpoint, relative to `remote`
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
    /// Path of the submission endpoint, relative to `remote`
    #[serde(default = "default_submission_path")]
    pub submission_path: String,
    /// Order the service returns posts in
    #[serde(default)]
    pub ledger_order: LedgerOrder,
    /// Where minted key artifacts are written
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_ledger_path() -> String {
    "/chain".to_string()
}

fn default_submission_path() -> String {
    "/message".to_string()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            ledger_path: default_ledger_path(),
            submission_path: default_submission_path(),
            ledger_order: LedgerOrder::default(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl AppConfig {
    pub fn remote_url(&self) -> Result<Url, StateError> {
        Url::parse(&self.remote).map_err(|e| StateError::InvalidRemote(e.to_string()))
    }
}

/// On-disk client state. Holds configuration only, never key material.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the chirp directory (~/.chirp)
    pub chirp_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the chirp directory path (custom or default ~/.chirp)
    pub fn chirp_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new chirp state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let chirp_dir = Self::chirp_dir(custom_path)?;

        let config_path = chirp_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.remote_url()?;

        fs::create_dir_all(&chirp_dir)?;
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            chirp_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the chirp directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let chirp_dir = Self::chirp_dir(custom_path)?;
        let config_path = chirp_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            chirp_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("chirp directory not initialized. Run 'chirp init' first")]
    NotInitialized,

    #[error("chirp directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid remote url: {0}")]
    InvalidRemote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
