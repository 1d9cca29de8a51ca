use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::policy::PolicyKind;

pub const DEFAULT_DATA_DIR: &str = ".ricefield";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_LOG_FILTER: &str = "ricefield=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}; delete it to reset: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings passed explicitly to the engine and the CLI. The game
/// rules themselves are fixed and live in `rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for map generation and the opponent; entropy when absent.
    pub seed: Option<u64>,
    pub player_name: String,
    pub opponent_name: String,
    pub policy: PolicyKind,
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_name: "Player".to_string(),
            opponent_name: "Computer".to_string(),
            policy: PolicyKind::Greedy,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Takes the CLI's `--seed`/`--policy` values. Returns whether anything
    /// changed and the file should be written back.
    pub fn apply_overrides(&mut self, seed: Option<u64>, policy: Option<PolicyKind>) -> bool {
        let before = (self.seed, self.policy);
        if let Some(seed) = seed {
            self.seed = Some(seed);
        }
        if let Some(policy) = policy {
            self.policy = policy;
        }
        before != (self.seed, self.policy)
    }

    /// Reads `<dir>/config.json`. A missing or empty file yields the defaults
    /// with `data_dir` pointing at `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let mut config = Self::load(&path)?;
        config.data_dir = dir.to_path_buf();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)
    }
}
