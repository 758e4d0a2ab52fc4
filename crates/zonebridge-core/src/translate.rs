//! Conversion between backend entries and grouped records
//!
//! - **Aggregate** (read path): group flat entries by (relative name, type),
//!   decode and qualify each content, and remember every entry's identifier.
//! - **Decompose** (write path): one flat entry per value, with a fully
//!   qualified name and encoded content. Identifiers are left unset.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::format;
use crate::identity::IdentityTracker;
use crate::qualify;
use crate::record::{FlatEntry, GroupedRecord, RecordType, RecordValue};

/// Entries of a type that was not aggregated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhandledGroup {
    /// Relative name of the group
    pub name: String,
    /// Record type as reported by the backend
    pub rtype: String,
    /// Number of entries skipped
    pub entries: usize,
}

/// Result of aggregating one listing
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    /// One grouped record per (name, type), sorted by name then type
    pub records: Vec<GroupedRecord>,
    /// Groups skipped because their type is unknown or not supported
    pub unhandled: Vec<UnhandledGroup>,
}

/// Group backend entries into records of `zone`
///
/// Only types in `supports` are aggregated. Every aggregated entry that
/// carries an identifier is fed to `identities`; the record key's previous
/// identities are replaced, not merged.
///
/// # Returns
///
/// - `Err(Error::InvalidContent)`: an entry of a supported type has content
///   that does not decode
pub fn aggregate(
    zone: &str,
    entries: &[FlatEntry],
    supports: &BTreeSet<RecordType>,
    identities: &mut IdentityTracker,
) -> Result<Aggregated> {
    let zone = qualify::absolute_zone(zone);

    let mut groups: BTreeMap<(String, RecordType), Vec<&FlatEntry>> = BTreeMap::new();
    let mut unhandled: BTreeMap<(String, String), usize> = BTreeMap::new();

    for entry in entries {
        let name = qualify::relative_name(&entry.name, &zone);

        match entry.rtype.parse::<RecordType>() {
            Ok(rtype) if supports.contains(&rtype) => {
                groups.entry((name, rtype)).or_default().push(entry);
            }
            _ => *unhandled.entry((name, entry.rtype.clone())).or_default() += 1,
        }
    }

    let mut records = Vec::with_capacity(groups.len());

    for ((name, rtype), members) in groups {
        let ttl = members.first().map(|e| e.ttl).unwrap_or_default();

        let decoded = members
            .iter()
            .map(|entry| decode_entry(rtype, entry, &zone))
            .collect::<Result<Vec<_>>>()?;

        let record = GroupedRecord::new(
            &zone,
            name,
            rtype,
            ttl,
            decoded.iter().map(|(value, _)| value.clone()),
        )?;

        let key = record.key();
        identities.forget(&key);
        for (value, id) in &decoded {
            if let Some(id) = id {
                identities.remember(&key, value, id.clone());
            }
        }

        debug!(
            "aggregated {} from {} entries: {} values",
            key,
            members.len(),
            record.values().len()
        );
        records.push(record);
    }

    let unhandled = unhandled
        .into_iter()
        .map(|((name, rtype), entries)| UnhandledGroup {
            name,
            rtype,
            entries,
        })
        .collect();

    Ok(Aggregated { records, unhandled })
}

fn decode_entry(
    rtype: RecordType,
    entry: &FlatEntry,
    zone: &str,
) -> Result<(RecordValue, Option<String>)> {
    let value = format::decode(rtype, &entry.content)?;
    Ok((qualify::qualify_value(value, zone), entry.id.clone()))
}

/// One flat entry per value of `record`, in value order
pub fn decompose(record: &GroupedRecord) -> Vec<FlatEntry> {
    record
        .values()
        .iter()
        .map(|value| decompose_value(record, value))
        .collect()
}

/// The flat entry for a single value of `record`
pub fn decompose_value(record: &GroupedRecord, value: &RecordValue) -> FlatEntry {
    FlatEntry::new(
        record.rtype().as_str(),
        record.fqdn(),
        record.ttl(),
        format::encode(value),
    )
}
