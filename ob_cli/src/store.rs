//! Flat JSON document store.
//!
//! Each tournament lives in `<name>.json` next to its change log in
//! `<name>.changes.json`. Writes go to a uniquely named temp file that is
//! then renamed over the target, so a reader sees either the old snapshot
//! or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use open_bracket::{ChangeLog, CommittedEdit, Tournament};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no tournament named '{0}'")]
    NotFound(String),

    #[error("tournament '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid tournament name '{0}'")]
    InvalidName(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str, suffix: &str) -> StoreResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}{suffix}")))
    }

    pub fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.path(name, ".json")?.exists())
    }

    /// Save a brand new tournament with an empty change log
    pub fn create(&self, name: &str, tournament: &Tournament) -> StoreResult<()> {
        if self.exists(name)? {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        self.save_tournament(name, tournament)?;
        write_atomic(&self.path(name, ".changes.json")?, &ChangeLog::new())
    }

    pub fn load_tournament(&self, name: &str) -> StoreResult<Tournament> {
        read(&self.path(name, ".json")?)?.ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn save_tournament(&self, name: &str, tournament: &Tournament) -> StoreResult<()> {
        write_atomic(&self.path(name, ".json")?, tournament)
    }

    /// The change log, empty when none was written yet
    pub fn load_changes(&self, name: &str) -> StoreResult<ChangeLog> {
        Ok(read(&self.path(name, ".changes.json")?)?.unwrap_or_default())
    }

    /// Persist `tournament` and record `committed` in its change log
    pub fn commit(&self, name: &str, tournament: &Tournament, committed: CommittedEdit) -> StoreResult<()> {
        let mut changes = self.load_changes(name)?;
        changes.push(committed);
        self.save_tournament(name, tournament)?;
        write_atomic(&self.path(name, ".changes.json")?, &changes)
    }
}

fn read<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
    let io = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io)?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        io(source)
    })
}
