//! Link Store Module
//!
//! Persistence seam for link records plus the in-memory implementation.

use std::collections::HashMap;

use crate::error::Result;
use crate::links::LinkRecord;

// == Link Store ==
/// Durable key-value persistence keyed by short code.
///
/// `save` and `delete` must be durable before they return.
pub trait LinkStore: Send + Sync {
    /// Replaces any record stored under the same code.
    fn save(&mut self, record: &LinkRecord) -> Result<()>;

    /// Returns the stored record without checking expiry or quota.
    fn load(&self, code: &str) -> Result<Option<LinkRecord>>;

    /// Removes the record. Deleting an absent code succeeds.
    fn delete(&mut self, code: &str) -> Result<()>;

    /// Every stored record, in no particular order.
    fn list_all(&self) -> Result<Vec<LinkRecord>>;

    fn contains(&self, code: &str) -> Result<bool> {
        Ok(self.load(code)?.is_some())
    }
}

// == Memory Link Store ==
/// HashMap-backed store. Records are copied in and out.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    records: HashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LinkStore for MemoryLinkStore {
    fn save(&mut self, record: &LinkRecord) -> Result<()> {
        self.records
            .insert(record.short_code.clone(), record.clone());
        Ok(())
    }

    fn load(&self, code: &str) -> Result<Option<LinkRecord>> {
        Ok(self.records.get(code).cloned())
    }

    fn delete(&mut self, code: &str) -> Result<()> {
        self.records.remove(code);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn contains(&self, code: &str) -> Result<bool> {
        Ok(self.records.contains_key(code))
    }
}
