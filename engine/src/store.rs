//! Actor records stored as `<name>.json` files in one directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::actor::{Actor, ActorError};
use crate::text::read_text_auto;

const EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid actor name '{0}'")]
    InvalidName(String),
    #[error("actor '{0}' not found")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Actor(#[from] ActorError),
}

#[derive(Debug, Clone)]
pub struct ActorStore {
    dir: PathBuf,
}

/// Reject names that could escape the data directory.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if bad {
        Err(StoreError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// Read and classify an actor file that lives outside any store.
pub fn read_actor_file(path: &Path) -> Result<Actor, StoreError> {
    let text = read_text_auto(path)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    let value = serde_json::from_str(&text)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    Ok(Actor::from_value(value)?)
}

impl ActorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }

    /// Names of every `.json` record, extension stripped, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let io_err = |source| StoreError::Io { path: self.dir.clone(), source };
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        tracing::debug!(dir = %self.dir.display(), count = names.len(), "listed actors");
        Ok(names)
    }

    /// Raw JSON of one record.
    pub fn load(&self, name: &str) -> Result<Value, StoreError> {
        let path = self.path_for(name)?;
        let text = read_text_auto(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io { path: path.clone(), source },
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json { path, source })
    }

    /// One record, parsed into a typed actor.
    pub fn load_actor(&self, name: &str) -> Result<Actor, StoreError> {
        let value = self.load(name)?;
        Ok(Actor::from_value(value)?)
    }

    /// Write `value` as pretty JSON, replacing any existing record.
    ///
    /// Each save writes its own temporary file in the data directory and
    /// renames it into place, so readers see either the old or the new record
    /// and concurrent saves of one name never collide.
    pub fn save(&self, name: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let dir_err = |source| StoreError::Io { path: self.dir.clone(), source };
        fs::create_dir_all(&self.dir).map_err(dir_err)?;

        let body = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(dir_err)?;
        tmp.write_all(body.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| StoreError::Io { path: tmp.path().to_path_buf(), source })?;
        tmp.persist(&path)
            .map_err(|err| StoreError::Io { path: path.clone(), source: err.error })?;

        tracing::info!(name, path = %path.display(), "saved actor");
        Ok(())
    }
}
