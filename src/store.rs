//! Persistence of the accumulated record list.
//!
//! The comparison engine never touches storage. A [`RecordStore`] is handed to
//! the [`crate::session::Session`] that owns the record list.

use crate::error::StorageError;
use crate::parser::{into_records, parse_json};
use crate::tree::Record;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Loads and saves a whole record list.
pub trait RecordStore {
    fn load(&self) -> Result<Vec<Record>, StorageError>;
    fn save(&mut self, records: &[Record]) -> Result<(), StorageError>;
}

/// Stores records as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new content is written to before being renamed into place.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn display(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

impl RecordStore for FileStore {
    /// A missing file is an empty list.
    fn load(&self) -> Result<Vec<Record>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.display(), "record store not found, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.display(),
                    source,
                })
            }
        };

        let node = parse_json(&content).map_err(|e| {
            StorageError::corrupt(
                self.display(),
                crate::error::ParseError::json_error(self.display(), e),
            )
        })?;
        let records = into_records(node, &self.display())
            .map_err(|e| StorageError::corrupt(self.display(), e))?;

        tracing::debug!(path = %self.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    fn save(&mut self, records: &[Record]) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.display(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let array =
            serde_json::Value::Array(records.iter().map(Record::to_json_value).collect());
        // Serializing a serde_json::Value cannot fail.
        let content = serde_json::to_string_pretty(&array).unwrap_or_default();

        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.display(), count = records.len(), "saved records");
        Ok(())
    }
}

/// Keeps records in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<Record>, StorageError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[Record]) -> Result<(), StorageError> {
        self.records = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("records.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trip_keeps_order() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("records.json"));
        let records = vec![
            Record::new()
                .with("z", Node::Number(1.0))
                .with("a", Node::Null),
            Record::new().with("k", Node::Array(vec![Node::Bool(true)])),
        ];

        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_save_leaves_sibling_tmp_alone() {
        let dir = TempDir::new().unwrap();
        let sibling = dir.path().join("records.tmp");
        fs::write(&sibling, "keep me").unwrap();

        let mut store = FileStore::new(dir.path().join("records.json"));
        store.save(&[Record::new().with("a", Node::Null)]).unwrap();

        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
        assert_eq!(store.temp_path(), dir.path().join("records.json.tmp"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store
            .save(&[Record::new().with("a", Node::Number(1.0))])
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
