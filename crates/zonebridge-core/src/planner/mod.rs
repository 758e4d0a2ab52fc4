//! Change planning and application
//!
//! Turns one grouped-record [`ChangeOp`] into the flat-entry backend calls
//! that realize it, then issues them one at a time.
//!
//! ## Update pairing
//!
//! For an update, only values that differ are touched:
//!
//! - `removed = existing - new` and `added = new - existing`, each sorted
//!   ascending by its content string
//! - if the existing record is id-addressable and something was removed,
//!   the two lists are zipped: each pair becomes one update-by-id, surplus
//!   `added` become creates, surplus `removed` become deletes
//! - otherwise every `added` value is created and every `removed` value is
//!   deleted, without identifiers
//!
//! A shared identifier cannot address one specific value at the backend,
//! so an update never sends it. Deletes always pass the remembered
//! identifier, shared or not, and the backend narrows by content.
//!
//! ## Failure
//!
//! A backend [`Error::Rejected`] becomes [`Error::RecordCreate`],
//! [`Error::RecordUpdate`] or [`Error::RecordDelete`] for the entry in
//! question. The first failure stops the op; calls already made stay made.

use std::fmt;

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::format;
use crate::identity::IdentityTracker;
use crate::record::{ChangeOp, FlatEntry, GroupedRecord, RecordValue};
use crate::traits::Backend;
use crate::translate;

/// One flat-entry call against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// Create an entry
    Create(FlatEntry),
    /// Replace the content of the entry with `id`
    Update {
        /// Remembered identifier of the old value
        id: String,
        /// Entry carrying the new content
        entry: FlatEntry,
    },
    /// Delete an entry
    Delete {
        /// Remembered identifier of the value, if any
        id: Option<String>,
        /// Entry to delete
        entry: FlatEntry,
    },
}

impl BackendCall {
    /// The entry this call writes or removes
    pub fn entry(&self) -> &FlatEntry {
        match self {
            BackendCall::Create(entry)
            | BackendCall::Update { entry, .. }
            | BackendCall::Delete { entry, .. } => entry,
        }
    }

    /// Identifier sent with the call
    pub fn id(&self) -> Option<&str> {
        match self {
            BackendCall::Create(_) => None,
            BackendCall::Update { id, .. } => Some(id),
            BackendCall::Delete { id, .. } => id.as_deref(),
        }
    }

    /// Issue the call, mapping a rejection to the typed record error
    pub async fn issue(&self, backend: &dyn Backend) -> Result<()> {
        info!("{}", self);

        let entry = self.entry();
        let result = match self {
            BackendCall::Create(entry) => {
                backend
                    .create_record(&entry.rtype, &entry.name, &entry.content)
                    .await
            }
            BackendCall::Update { id, entry } => {
                backend
                    .update_record(Some(id), &entry.rtype, &entry.name, &entry.content)
                    .await
            }
            BackendCall::Delete { id, entry } => {
                backend
                    .delete_record(id.as_deref(), &entry.rtype, &entry.name, &entry.content)
                    .await
            }
        };

        result.map_err(|err| match err {
            Error::Rejected(reason) => {
                let entry = entry.entry_ref();
                let typed = match self {
                    BackendCall::Create(_) => Error::RecordCreate { entry },
                    BackendCall::Update { .. } => Error::RecordUpdate { entry },
                    BackendCall::Delete { .. } => Error::RecordDelete { entry },
                };
                error!("{} ({})", typed, reason);
                typed
            }
            other => other,
        })
    }
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            BackendCall::Create(_) => "create",
            BackendCall::Update { .. } => "update",
            BackendCall::Delete { .. } => "delete",
        };
        write!(f, "{} {}", verb, self.entry().entry_ref())?;
        if let Some(id) = self.id() {
            write!(f, " id={}", id)?;
        }
        Ok(())
    }
}

/// The backend calls realizing `op`, in issue order
pub fn plan_change(op: &ChangeOp, identities: &IdentityTracker) -> Vec<BackendCall> {
    match op {
        ChangeOp::Create(record) => translate::decompose(record)
            .into_iter()
            .map(BackendCall::Create)
            .collect(),
        ChangeOp::Delete(record) => record
            .values()
            .iter()
            .map(|value| BackendCall::Delete {
                id: identities.get(record, value).map(str::to_string),
                entry: translate::decompose_value(record, value),
            })
            .collect(),
        ChangeOp::Update { existing, new } => plan_update(existing, new, identities),
    }
}

fn plan_update(
    existing: &GroupedRecord,
    new: &GroupedRecord,
    identities: &IdentityTracker,
) -> Vec<BackendCall> {
    let removed = sorted_by_content(existing.values().difference(new.values()));
    let added = sorted_by_content(new.values().difference(existing.values()));

    let mut calls = Vec::with_capacity(removed.len() + added.len());

    if !identities.is_id_addressable(existing) || removed.is_empty() {
        calls.extend(
            added
                .iter()
                .map(|value| BackendCall::Create(translate::decompose_value(new, value))),
        );
        calls.extend(removed.iter().map(|value| BackendCall::Delete {
            id: None,
            entry: translate::decompose_value(existing, value),
        }));
        return calls;
    }

    let paired = removed.len().min(added.len());

    for (old, value) in removed.iter().zip(added.iter()) {
        let entry = translate::decompose_value(new, value);
        match identities.get(existing, old) {
            Some(id) => calls.push(BackendCall::Update {
                id: id.to_string(),
                entry,
            }),
            None => {
                calls.push(BackendCall::Create(entry));
                calls.push(BackendCall::Delete {
                    id: None,
                    entry: translate::decompose_value(existing, old),
                });
            }
        }
    }

    calls.extend(
        added[paired..]
            .iter()
            .map(|value| BackendCall::Create(translate::decompose_value(new, value))),
    );
    calls.extend(removed[paired..].iter().map(|old| BackendCall::Delete {
        id: identities.get(existing, old).map(str::to_string),
        entry: translate::decompose_value(existing, old),
    }));

    calls
}

fn sorted_by_content<'a>(values: impl Iterator<Item = &'a RecordValue>) -> Vec<&'a RecordValue> {
    let mut keyed: Vec<(String, &RecordValue)> =
        values.map(|value| (format::encode(value), value)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, value)| value).collect()
}

/// Applies change operations against one backend
pub struct ChangePlanner<'a> {
    backend: &'a dyn Backend,
    identities: &'a IdentityTracker,
}

impl<'a> ChangePlanner<'a> {
    /// Create a planner over `backend`, using identities from the last populate
    pub fn new(backend: &'a dyn Backend, identities: &'a IdentityTracker) -> Self {
        Self {
            backend,
            identities,
        }
    }

    /// The calls `op` would issue, without issuing them
    pub fn plan(&self, op: &ChangeOp) -> Vec<BackendCall> {
        plan_change(op, self.identities)
    }

    /// Issue every call of `op` in order
    ///
    /// # Returns
    ///
    /// The number of backend calls made. On the first failure the remaining
    /// calls of `op` are not attempted.
    pub async fn apply(&self, op: &ChangeOp) -> Result<usize> {
        let calls = self.plan(op);

        for call in &calls {
            call.issue(self.backend).await?;
        }

        Ok(calls.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::record::RecordType;

    const ZONE: &str = "blodapels.in.";

    fn a_record(values: &[&str]) -> GroupedRecord {
        GroupedRecord::new(
            ZONE,
            "test-many",
            RecordType::A,
            1337,
            values.iter().map(|v| RecordValue::text(*v)),
        )
        .unwrap()
    }

    fn existing_with_ids(ids: &[(&str, &str)]) -> (GroupedRecord, IdentityTracker) {
        let record = a_record(&ids.iter().map(|(v, _)| *v).collect::<Vec<_>>());
        let mut identities = IdentityTracker::new();
        for (value, id) in ids {
            identities.remember(&record.key(), &RecordValue::text(*value), *id);
        }
        (record, identities)
    }

    fn desired() -> GroupedRecord {
        a_record(&[
            "192.168.1.1",
            "192.168.1.2",
            "192.168.1.3",
            "192.168.1.4",
            "192.168.1.5",
            "192.168.7.7",
        ])
    }

    fn summary(calls: &[BackendCall]) -> Vec<String> {
        calls.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_update_pairs_by_id() {
        let (existing, identities) = existing_with_ids(&[
            ("192.168.1.1", "1"),
            ("192.168.1.2", "2"),
            ("192.168.1.5", "5"),
            ("192.168.2.4", "A"),
            ("192.168.2.3", "B"),
        ]);
        let op = ChangeOp::Update {
            existing,
            new: desired(),
        };

        let calls = plan_change(&op, &identities);

        assert_eq!(
            summary(&calls),
            vec![
                "update A test-many.blodapels.in. \"192.168.1.3\" id=B",
                "update A test-many.blodapels.in. \"192.168.1.4\" id=A",
                "create A test-many.blodapels.in. \"192.168.7.7\"",
            ]
        );
    }

    #[test]
    fn test_update_shared_id_falls_back() {
        let (existing, identities) = existing_with_ids(&[
            ("192.168.1.1", "test-many"),
            ("192.168.1.2", "test-many"),
            ("192.168.1.5", "test-many"),
            ("192.168.2.4", "test-many"),
            ("192.168.2.3", "test-many"),
        ]);
        let op = ChangeOp::Update {
            existing,
            new: desired(),
        };

        let calls = plan_change(&op, &identities);

        assert_eq!(
            summary(&calls),
            vec![
                "create A test-many.blodapels.in. \"192.168.1.3\"",
                "create A test-many.blodapels.in. \"192.168.1.4\"",
                "create A test-many.blodapels.in. \"192.168.7.7\"",
                "delete A test-many.blodapels.in. \"192.168.2.3\"",
                "delete A test-many.blodapels.in. \"192.168.2.4\"",
            ]
        );
        assert!(calls.iter().all(|call| call.id().is_none()));
    }

    #[test]
    fn test_update_surplus_removed_deleted_with_id() {
        let (existing, identities) =
            existing_with_ids(&[("10.0.0.1", "1"), ("10.0.0.2", "2"), ("10.0.0.3", "3")]);
        let op = ChangeOp::Update {
            existing,
            new: a_record(&["10.0.0.9"]),
        };

        let calls = plan_change(&op, &identities);

        assert_eq!(
            summary(&calls),
            vec![
                "update A test-many.blodapels.in. \"10.0.0.9\" id=1",
                "delete A test-many.blodapels.in. \"10.0.0.2\" id=2",
                "delete A test-many.blodapels.in. \"10.0.0.3\" id=3",
            ]
        );
    }

    #[test]
    fn test_update_pair_without_id_becomes_create_delete() {
        let existing = a_record(&["10.0.0.1"]);
        let identities = IdentityTracker::new();
        let op = ChangeOp::Update {
            existing,
            new: a_record(&["10.0.0.2"]),
        };

        let calls = plan_change(&op, &identities);

        assert_eq!(
            summary(&calls),
            vec![
                "create A test-many.blodapels.in. \"10.0.0.2\"",
                "delete A test-many.blodapels.in. \"10.0.0.1\"",
            ]
        );
    }

    #[test]
    fn test_update_same_values_is_noop() {
        let existing = a_record(&["10.0.0.1"]);
        let new = GroupedRecord::new(
            ZONE,
            "test-many",
            RecordType::A,
            60,
            [RecordValue::text("10.0.0.1")],
        )
        .unwrap();

        let calls = plan_change(&ChangeOp::Update { existing, new }, &IdentityTracker::new());
        assert!(calls.is_empty());
    }

    #[test]
    fn test_delete_sends_remembered_ids() {
        let (record, identities) = existing_with_ids(&[("10.0.0.1", "1"), ("10.0.0.2", "2")]);
        let calls = plan_change(&ChangeOp::Delete(record), &identities);
        assert_eq!(
            calls.iter().map(BackendCall::id).collect::<Vec<_>>(),
            vec![Some("1"), Some("2")]
        );

        // Shared ids are still sent on delete
        let (record, identities) = existing_with_ids(&[("10.0.0.1", "x"), ("10.0.0.2", "x")]);
        let calls = plan_change(&ChangeOp::Delete(record), &identities);
        assert_eq!(
            calls.iter().map(BackendCall::id).collect::<Vec<_>>(),
            vec![Some("x"), Some("x")]
        );

        let calls = plan_change(
            &ChangeOp::Delete(a_record(&["10.0.0.3"])),
            &IdentityTracker::new(),
        );
        assert_eq!(calls[0].id(), None);
    }

    #[tokio::test]
    async fn test_apply_maps_rejection_to_typed_error() {
        let backend = MemoryBackend::new();
        let identities = IdentityTracker::new();
        let planner = ChangePlanner::new(&backend, &identities);

        let result = planner
            .apply(&ChangeOp::Delete(a_record(&["10.0.0.1"])))
            .await;

        match result {
            Err(Error::RecordDelete { entry }) => {
                assert_eq!(entry.rtype, "A");
                assert_eq!(entry.name, "test-many.blodapels.in.");
                assert_eq!(entry.content, "10.0.0.1");
            }
            other => panic!("expected RecordDelete, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_create_then_duplicate_fails() {
        let backend = MemoryBackend::new();
        let identities = IdentityTracker::new();
        let planner = ChangePlanner::new(&backend, &identities);
        let op = ChangeOp::Create(a_record(&["10.0.0.1", "10.0.0.2"]));

        assert_eq!(planner.apply(&op).await.unwrap(), 2);
        assert_eq!(backend.entries().await.len(), 2);

        let again = planner.apply(&op).await;
        assert!(matches!(again, Err(Error::RecordCreate { .. })));
    }
}
