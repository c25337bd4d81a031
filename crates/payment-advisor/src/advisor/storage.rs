//! JSON file store for the applicant's roster.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::intake::{SchoolRecord, StateRecord};

/// Default roster file name inside the data directory.
pub const ROSTER_FILE: &str = "data.json";

/// Raw roster as stored on disk; validated only when evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFile {
    pub schools: Vec<SchoolRecord>,
    #[serde(default)]
    pub states: Vec<StateRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes roster files below one data directory.
#[derive(Debug, Clone)]
pub struct RosterStore {
    data_dir: PathBuf,
}

impl RosterStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, filename: &str) -> PathBuf {
        self.data_dir.join(filename)
    }

    pub fn save(&self, filename: &str, roster: &RosterFile) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;
        let content = serde_json::to_string_pretty(roster)?;
        fs::write(self.path(filename), content)?;
        Ok(())
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(&self, filename: &str) -> Result<Option<RosterFile>, StorageError> {
        let path = self.path(filename);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).exists()
    }

    pub fn delete(&self, filename: &str) -> Result<(), StorageError> {
        let path = self.path(filename);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::tests::common::{record, state_record};
    use tempfile::tempdir;

    fn sample() -> RosterFile {
        RosterFile {
            schools: vec![record(1, "North University", 1, 10, 20)],
            states: vec![state_record(1, "passed", false, false)],
        }
    }

    #[test]
    fn saved_roster_loads_back() {
        let dir = tempdir().expect("temp dir");
        let store = RosterStore::new(dir.path());

        store.save(ROSTER_FILE, &sample()).expect("saves");

        let loaded = store.load(ROSTER_FILE).expect("loads");
        assert_eq!(loaded, Some(sample()));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().expect("temp dir");
        let store = RosterStore::new(dir.path());

        assert!(store.load("absent.json").expect("load succeeds").is_none());
        assert!(!store.exists("absent.json"));
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempdir().expect("temp dir");
        let store = RosterStore::new(dir.path().join("nested"));
        store.save(ROSTER_FILE, &RosterFile::default()).expect("saves");
        assert!(store.exists(ROSTER_FILE));

        store.delete(ROSTER_FILE).expect("deletes");

        assert!(!store.exists(ROSTER_FILE));
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempdir().expect("temp dir");
        let store = RosterStore::new(dir.path());
        fs::write(dir.path().join(ROSTER_FILE), "{ not json").expect("writes");

        match store.load(ROSTER_FILE) {
            Err(StorageError::Json(_)) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }
}
