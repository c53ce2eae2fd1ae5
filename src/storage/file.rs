//! File-backed record storage.
//!
//! Each record is a file inside one directory. The directory is created when the
//! storage is opened, before any read or write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::RecordStorage;
use crate::types::errors::StorageError;

/// Stores each record as `<dir>/<record>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (or creates) the storage directory.
    ///
    /// # Errors
    /// Returns `StorageError::CreateDir` if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, record: &str) -> PathBuf {
        self.dir.join(record)
    }
}

impl RecordStorage for FileStorage {
    fn read(&self, record: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(record)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("record '{}' not found, starting empty", record);
                Ok(None)
            }
            Err(source) => Err(StorageError::Read {
                record: record.to_string(),
                source,
            }),
        }
    }

    /// Writes to a sibling temp file and renames it over the record so a failed
    /// write never leaves a truncated record behind.
    fn write(&self, record: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.record_path(record);
        let tmp = self.dir.join(format!(".{}.tmp", record));
        let to_err = |source| StorageError::Write {
            record: record.to_string(),
            source,
        };
        fs::write(&tmp, contents).map_err(to_err)?;
        fs::rename(&tmp, &path).map_err(to_err)?;
        Ok(())
    }
}
