//! A comparison session: the accumulated record list and its persistence.

use crate::compare::{classify_with, AnnotatedRecord, CompareConfig};
use crate::error::{JcmpError, StorageError};
use crate::parser::{read_records, Source};
use crate::store::RecordStore;
use crate::tree::Record;

/// Owns the ordered record list; the first record added is the baseline.
pub struct Session<S: RecordStore> {
    store: S,
    records: Vec<Record>,
}

impl<S: RecordStore> Session<S> {
    /// Opens a session with whatever the store currently holds.
    pub fn open(store: S) -> Result<Self, StorageError> {
        let records = store.load()?;
        tracing::info!(count = records.len(), "opened comparison session");
        Ok(Self { store, records })
    }

    /// Appends every record from `source` and persists the list.
    ///
    /// Returns the number of records added. On a parse error nothing is added.
    pub fn add(&mut self, source: &Source) -> Result<usize, JcmpError> {
        let incoming = read_records(source)?;
        let added = incoming.len();
        self.add_records(incoming)?;
        Ok(added)
    }

    /// Appends already-parsed records and persists the list.
    pub fn add_records(&mut self, incoming: Vec<Record>) -> Result<(), StorageError> {
        let previous = self.records.len();
        self.records.extend(incoming);
        if let Err(e) = self.store.save(&self.records) {
            self.records.truncate(previous);
            return Err(e);
        }
        tracing::debug!(total = self.records.len(), "records appended");
        Ok(())
    }

    /// Drops all records, starting a new comparison.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.save(&[])?;
        self.records.clear();
        tracing::info!("comparison cleared");
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn compare(&self, config: &CompareConfig) -> Vec<AnnotatedRecord> {
        classify_with(&self.records, config)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
