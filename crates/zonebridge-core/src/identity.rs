//! Provider identifier tracking
//!
//! Backends address individual entries by an identifier they assign, while
//! grouped records have none. The [`IdentityTracker`] remembers, for each
//! grouped record key and each of its values, the identifier last seen for
//! it while populating.
//!
//! Some backends derive the identifier from the entry name, so every value
//! of a multi-value record shares one identifier. Updating "by id" would
//! then be ambiguous. [`IdentityTracker::is_id_addressable`] tells the
//! change planner whether per-value updates are safe for a record.
//!
//! The tracker is owned by one provider instance and rebuilt on each
//! populate. Nothing is persisted.

use std::collections::{HashMap, HashSet};

use crate::record::{GroupedRecord, RecordKey, RecordValue};

/// Identifiers remembered for one record key
#[derive(Debug, Default, Clone)]
struct KeyIdentity {
    /// value -> last seen id, in value insertion order
    by_value: Vec<(RecordValue, String)>,
    /// every id observed under this key, in observation order
    seen: Vec<String>,
}

/// Remembers backend identifiers per (record, value)
#[derive(Debug, Default, Clone)]
pub struct IdentityTracker {
    keys: HashMap<RecordKey, KeyIdentity>,
}

impl IdentityTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `id` for `value` under `key`
    ///
    /// Upserts the value mapping; the id is always added to the observed
    /// ids of the key, so duplicates are visible to the uniqueness check.
    pub fn remember(&mut self, key: &RecordKey, value: &RecordValue, id: impl Into<String>) {
        let id = id.into();
        let identity = self.keys.entry(key.clone()).or_default();

        match identity.by_value.iter_mut().find(|(v, _)| v == value) {
            Some((_, known)) => *known = id.clone(),
            None => identity.by_value.push((value.clone(), id.clone())),
        }
        identity.seen.push(id);
    }

    /// Identifier remembered for `value` of `record`
    ///
    /// Returns `None` when the record key or the value was never observed,
    /// including records from other zones or other providers.
    pub fn get(&self, record: &GroupedRecord, value: &RecordValue) -> Option<&str> {
        self.keys
            .get(&record.key())?
            .by_value
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, id)| id.as_str())
    }

    /// Every identifier observed for `record`, in observation order
    pub fn get_all_ids(&self, record: &GroupedRecord) -> &[String] {
        self.keys
            .get(&record.key())
            .map(|identity| identity.seen.as_slice())
            .unwrap_or_default()
    }

    /// Whether no identifier of `record` was seen more than once
    ///
    /// Only then can a backend update-by-id be trusted to touch exactly one
    /// value. A record with no remembered ids is trivially addressable.
    pub fn is_id_addressable(&self, record: &GroupedRecord) -> bool {
        let ids = self.get_all_ids(record);
        let distinct: HashSet<&String> = ids.iter().collect();
        distinct.len() == ids.len()
    }

    /// Drop everything remembered for `key`
    pub fn forget(&mut self, key: &RecordKey) {
        self.keys.remove(key);
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Number of tracked record keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
