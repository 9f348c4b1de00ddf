//! Local JSON-file backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use super::{Persistence, PersistenceError};

/// Stores each record as `<data_dir>/<key>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Io` if the directory cannot be created.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).await?;
        debug!(path = %data_dir.display(), "Opened local data directory");
        Ok(Self { data_dir })
    }

    /// Directory holding the record files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::Unavailable(format!(
                "invalid record key: {key:?}"
            )));
        }
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl Persistence for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
