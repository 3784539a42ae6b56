//! Durable storage for the precomputed tables.
//!
//! The tables are deterministic functions of the ruleset, so artifacts are a
//! pure cache: present files short-circuit the rebuild, unreadable or
//! missing files just mean recomputation. Callers that cannot write degrade
//! to in-memory operation for the process.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors while reading or writing a table artifact.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table artifact io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table artifact codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Bincode-backed key-value artifacts under one directory.
#[derive(Clone, Debug)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    /// Store rooted at `dir`. The directory is created lazily on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Load a named artifact.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let file = File::open(self.dir.join(name))?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }

    /// Save a named artifact, creating the directory if needed.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let file = File::create(self.dir.join(name))?;
        Ok(bincode::serialize_into(BufWriter::new(file), value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("demonhand-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_round_trip() {
        let dir = scratch_dir("store-roundtrip");
        let store = TableStore::new(&dir);

        let mut table: FxHashMap<u64, u32> = FxHashMap::default();
        table.insert(0b101, 24);
        table.insert(1 << 51, 10);

        store.save("table.bin", &table).unwrap();
        let loaded: FxHashMap<u64, u32> = store.load("table.bin").unwrap();

        assert_eq!(loaded, table);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let store = TableStore::new(scratch_dir("store-missing"));
        let result: Result<FxHashMap<u64, u32>, _> = store.load("absent.bin");
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_corrupt_artifact_is_an_error() {
        let dir = scratch_dir("store-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.bin"), b"not bincode at all").unwrap();

        let store = TableStore::new(&dir);
        let result: Result<FxHashMap<u64, u32>, _> = store.load("bad.bin");
        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
