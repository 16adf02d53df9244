//! System Contract Storage Layer
//!
//! - Ordered tables with incrementally maintained secondary indices
//! - Scoped tables for per-account record sets
//! - File-based snapshots of whole contract states

pub mod table;

pub use table::{Indexed, IndexedTable, Row, ScopedTable, Table};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use sys_core::ErrorKind;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::SnapshotNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Precondition,
        }
    }
}

/// File-based storage for state snapshots
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open storage directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let data_dir = path.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self { data_dir })
    }

    /// Save a snapshot (JSON for inspection, Bincode for loading)
    pub fn save_snapshot<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StorageError> {
        let json_path = self.data_dir.join(format!("{}.json", name));
        let bin_path = self.data_dir.join(format!("{}.bin", name));

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&json_path, json)?;

        let bin = bincode::serialize(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&bin_path, bin)?;

        Ok(())
    }

    /// Load a snapshot (tries Bincode first, falls back to JSON)
    pub fn load_snapshot<T: for<'de> Deserialize<'de>>(
        &self,
        name: &str,
    ) -> Result<T, StorageError> {
        let bin_path = self.data_dir.join(format!("{}.bin", name));
        let json_path = self.data_dir.join(format!("{}.json", name));

        if bin_path.exists() {
            let data = fs::read(&bin_path)?;
            return bincode::deserialize(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        // JSON snapshots may be hand-edited and may predate newer fields
        if json_path.exists() {
            let data = fs::read_to_string(&json_path)?;
            return serde_json::from_str(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        Err(StorageError::SnapshotNotFound(name.to_string()))
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        let bin_path = self.data_dir.join(format!("{}.bin", name));
        let json_path = self.data_dir.join(format!("{}.json", name));
        bin_path.exists() || json_path.exists()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
