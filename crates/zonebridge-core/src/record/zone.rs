use super::{GroupedRecord, RecordType};
use crate::error::{Error, Result};
use crate::qualify;

/// A zone and the grouped records it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    records: Vec<GroupedRecord>,
}

impl Zone {
    /// Create an empty zone; the name is normalized to end with a dot
    pub fn new(name: &str) -> Self {
        Self {
            name: qualify::absolute_zone(name),
            records: Vec::new(),
        }
    }

    /// Zone name with trailing dot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records in insertion order
    pub fn records(&self) -> &[GroupedRecord] {
        &self.records
    }

    /// Find a record by relative name and type
    pub fn get(&self, name: &str, rtype: RecordType) -> Option<&GroupedRecord> {
        self.records
            .iter()
            .find(|r| r.name() == name && r.rtype() == rtype)
    }

    /// Add a record
    ///
    /// A record with the same name and type already present is an error,
    /// unless `lenient` is set, in which case it is replaced.
    pub fn add_record(&mut self, record: GroupedRecord, lenient: bool) -> Result<()> {
        if record.zone() != self.name {
            return Err(Error::invalid_input(format!(
                "record {} does not belong to zone {}",
                record.key(),
                self.name
            )));
        }

        let existing = self
            .records
            .iter()
            .position(|r| r.name() == record.name() && r.rtype() == record.rtype());

        match existing {
            Some(index) if lenient => {
                self.records[index] = record;
                Ok(())
            }
            Some(_) => Err(Error::DuplicateRecord {
                name: record.name().to_string(),
                rtype: record.rtype().to_string(),
            }),
            None => {
                self.records.push(record);
                Ok(())
            }
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the zone holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One high-level change against a grouped record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOp {
    /// Record does not exist yet
    Create(GroupedRecord),
    /// Record exists and its value set or TTL changes
    Update {
        /// Record as populated from the backend
        existing: GroupedRecord,
        /// Desired record
        new: GroupedRecord,
    },
    /// Record must go away
    Delete(GroupedRecord),
}

impl ChangeOp {
    /// The record whose type and TTL drive the change (the new one for updates)
    pub fn record(&self) -> &GroupedRecord {
        match self {
            ChangeOp::Create(record) | ChangeOp::Delete(record) => record,
            ChangeOp::Update { new, .. } => new,
        }
    }

    /// Short verb for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOp::Create(_) => "create",
            ChangeOp::Update { .. } => "update",
            ChangeOp::Delete(_) => "delete",
        }
    }
}

/// A set of changes against one zone, computed by the zone-management side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    zone: String,
    changes: Vec<ChangeOp>,
}

impl Plan {
    /// Create a plan
    pub fn new(zone: &str, changes: Vec<ChangeOp>) -> Self {
        Self {
            zone: qualify::absolute_zone(zone),
            changes,
        }
    }

    /// Target zone name with trailing dot
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Changes in plan order
    pub fn changes(&self) -> &[ChangeOp] {
        &self.changes
    }

    /// Number of changes
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the plan has no changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
