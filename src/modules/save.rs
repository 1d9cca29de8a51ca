use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::modules::state::GameState;
use crate::modules::stats::GameStatistics;

pub const SAVE_FORMAT_VERSION: u32 = 1;

const SAVES_DIR: &str = "saves";
const SESSION_FILE: &str = "session.json";
const STATISTICS_FILE: &str = "statistics.json";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no save found at {0}")]
    NotFound(PathBuf),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse save {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("save is corrupted: checksum {found} does not match {expected}")]
    ChecksumMismatch { expected: String, found: String },
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("save does not describe a valid game: {0}")]
    Invalid(String),
    #[error("invalid save name {0:?}")]
    InvalidName(String),
}

/// A game state on disk, stamped and checksummed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBundle {
    pub version: u32,
    pub saved_at: String,
    pub checksum: String,
    pub state: GameState,
}

impl SaveBundle {
    pub fn new(state: GameState) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now().to_rfc3339(),
            checksum: state_checksum(&state),
            state,
        }
    }

    /// Checks version, checksum and the state's own invariants.
    pub fn verify(&self) -> Result<(), SaveError> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion(self.version));
        }
        let found = state_checksum(&self.state);
        if found != self.checksum {
            return Err(SaveError::ChecksumMismatch {
                expected: self.checksum.clone(),
                found,
            });
        }
        self.state.validate().map_err(SaveError::Invalid)
    }
}

/// Hex SHA-256 of the compact JSON encoding of `state`.
pub fn state_checksum(state: &GameState) -> String {
    let mut hasher = Sha256::new();
    // GameState holds no maps or non-string keys, so this cannot fail.
    if let Ok(bytes) = serde_json::to_vec(state) {
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}

pub fn save_game(path: &Path, bundle: &SaveBundle) -> Result<(), SaveError> {
    write_json(path, bundle)?;
    debug!(path = %path.display(), day = bundle.state.day(), "game saved");
    Ok(())
}

pub fn load_game(path: &Path) -> Result<SaveBundle, SaveError> {
    if !path.exists() {
        return Err(SaveError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(SaveError::NotFound(path.to_path_buf()));
    }
    let bundle: SaveBundle = serde_json::from_slice(&bytes).map_err(|source| SaveError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    bundle.verify()?;
    debug!(path = %path.display(), day = bundle.state.day(), "game loaded");
    Ok(bundle)
}

pub fn saves_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(SAVES_DIR)
}

pub fn slot_path(data_dir: &Path, name: &str) -> Result<PathBuf, SaveError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    Ok(saves_dir(data_dir).join(format!("{name}.json")))
}

/// Slot names in `<data_dir>/saves`, sorted.
pub fn list_saves(data_dir: &Path) -> Result<Vec<String>, SaveError> {
    let dir = saves_dir(data_dir);
    let mut names = Vec::new();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(names),
        Err(source) => return Err(SaveError::Io { path: dir, source }),
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

pub fn save_exists(data_dir: &Path, name: &str) -> bool {
    slot_path(data_dir, name).is_ok_and(|path| path.is_file())
}

pub fn delete_save(data_dir: &Path, name: &str) -> Result<(), SaveError> {
    let path = slot_path(data_dir, name)?;
    if !path.exists() {
        return Err(SaveError::NotFound(path));
    }
    fs::remove_file(&path).map_err(|source| SaveError::Io { path, source })
}

pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

pub fn statistics_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATISTICS_FILE)
}

/// A missing or empty file is an empty history.
pub fn load_statistics(data_dir: &Path) -> Result<GameStatistics, SaveError> {
    let path = statistics_path(data_dir);
    if !path.exists() {
        return Ok(GameStatistics::default());
    }
    let bytes = fs::read(&path).map_err(|source| SaveError::Io {
        path: path.clone(),
        source,
    })?;
    if bytes.is_empty() {
        return Ok(GameStatistics::default());
    }
    serde_json::from_slice(&bytes).map_err(|source| SaveError::Parse { path, source })
}

pub fn save_statistics(data_dir: &Path, stats: &GameStatistics) -> Result<(), SaveError> {
    write_json(&statistics_path(data_dir), stats)
}

/// Writes to a sibling temp file, then renames it over `path`.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    let io_err = |source: io::Error| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(|e| io_err(e.into()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}
