// # Entry Store
//
// The entry bookkeeping shared by the bundled backends: id assignment,
// filtered listing, and create/update/delete with the rejection rules a
// real DNS API applies.
//
// ## Identifier modes
//
// - Sequential (default): every entry gets its own numeric id.
// - Shared: every entry with the same name gets the same id, the way some
//   APIs derive identifiers from the record name. Records with more than
//   one value are then not id-addressable.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::record::FlatEntry;

/// Flat entries plus the id counter, serializable as one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySet {
    /// Next sequential id
    next_id: u64,
    /// Whether ids are derived from the entry name
    #[serde(default)]
    shared_ids: bool,
    /// Stored entries, in creation order
    entries: Vec<FlatEntry>,
}

impl EntrySet {
    /// Create an empty set with sequential ids
    pub fn new() -> Self {
        Self {
            next_id: 1,
            shared_ids: false,
            entries: Vec::new(),
        }
    }

    /// Create an empty set whose ids are derived from entry names
    pub fn with_shared_ids() -> Self {
        Self {
            shared_ids: true,
            ..Self::new()
        }
    }

    /// Stored entries
    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add entries as they are; entries without an id get one
    pub fn seed(&mut self, entries: impl IntoIterator<Item = FlatEntry>) {
        for mut entry in entries {
            if entry.id.is_none() {
                entry.id = Some(self.assign_id(&entry.name));
            }
            self.entries.push(entry);
        }
    }

    /// Entries matching every given filter
    pub fn list(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Vec<FlatEntry> {
        self.entries
            .iter()
            .filter(|e| rtype.is_none_or(|t| e.rtype.eq_ignore_ascii_case(t)))
            .filter(|e| name.is_none_or(|n| same_name(&e.name, n)))
            .filter(|e| content.is_none_or(|c| e.content == c))
            .cloned()
            .collect()
    }

    /// Create an entry; an identical (type, name, content) entry is a rejection
    pub fn create(
        &mut self,
        rtype: &str,
        name: &str,
        content: &str,
        ttl: u32,
    ) -> Result<String, Error> {
        if self.position(None, rtype, name, Some(content)).is_some() {
            return Err(Error::rejected(format!(
                "{} {} \"{}\" already exists",
                rtype, name, content
            )));
        }

        let id = self.assign_id(name);
        self.entries
            .push(FlatEntry::new(rtype, name, ttl, content).with_id(id.clone()));
        Ok(id)
    }

    /// Replace the content of one entry
    ///
    /// With an identifier the entry must carry it; without one the first
    /// entry of that type and name is taken.
    pub fn update(
        &mut self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
        ttl: u32,
    ) -> Result<(), Error> {
        let index = self
            .position(identifier, rtype, name, None)
            .ok_or_else(|| not_found(identifier, rtype, name))?;

        let entry = &mut self.entries[index];
        entry.content = content.to_string();
        entry.ttl = ttl;
        Ok(())
    }

    /// Delete one entry
    ///
    /// With an identifier the entry carrying it and the same content is
    /// preferred, else the first entry carrying it; without one, the entry
    /// is found by type, name and content.
    pub fn delete(
        &mut self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<(), Error> {
        let exact = self.position(identifier, rtype, name, Some(content));
        let index = match identifier {
            Some(_) => exact.or_else(|| self.position(identifier, rtype, name, None)),
            None => exact,
        }
        .ok_or_else(|| not_found(identifier, rtype, name))?;

        self.entries.remove(index);
        Ok(())
    }

    fn position(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: Option<&str>,
    ) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.rtype.eq_ignore_ascii_case(rtype)
                && same_name(&e.name, name)
                && content.is_none_or(|c| e.content == c)
                && identifier.is_none_or(|id| e.id.as_deref() == Some(id))
        })
    }

    fn assign_id(&mut self, name: &str) -> String {
        if self.shared_ids {
            return name.trim_end_matches('.').to_ascii_lowercase();
        }
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id.to_string()
    }
}

fn not_found(identifier: Option<&str>, rtype: &str, name: &str) -> Error {
    match identifier {
        Some(id) => Error::rejected(format!("no {} entry {} with id {}", rtype, name, id)),
        None => Error::rejected(format!("no matching {} entry {}", rtype, name)),
    }
}

/// Entry names compare without trailing dot and ASCII case
fn same_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
