//! Shared insert-only result store

use crate::harvest::Record;
use crate::CoordinationError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

/// Identifier to record mapping with first-writer-wins inserts
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Mutex<HashMap<String, Record>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` unless `id` is already present
    ///
    /// The presence check and the write happen under one lock acquisition.
    /// Returns `false` when another writer got there first; callers treat
    /// that as a skip.
    pub fn try_insert(&self, id: String, record: Record) -> Result<bool, CoordinationError> {
        let mut records = self.lock()?;
        match records.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
        }
    }

    /// Best-effort presence check used to skip known duplicates before fetching
    pub fn contains(&self, id: &str) -> Result<bool, CoordinationError> {
        Ok(self.lock()?.contains_key(id))
    }

    /// Copies out the full contents
    pub fn snapshot(&self) -> Result<HashMap<String, Record>, CoordinationError> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize, CoordinationError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoordinationError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Record>>, CoordinationError> {
        self.records
            .lock()
            .map_err(|_| CoordinationError::Poisoned("result store"))
    }
}
