// # zonebridge-core
//
// Core library bridging grouped DNS records and flat per-value backend entries.
//
// ## Architecture Overview
//
// A zone-management framework thinks in grouped records: one record per
// (name, type) with a set of values. DNS APIs think in flat entries: one
// entry per value, each with an identifier the API assigned. This library
// translates between the two:
//
// - **format**: per-type content encoding and decoding (MX, SRV, CAA, TXT)
// - **qualify**: relative names, apex handling, hostname qualification
// - **IdentityTracker**: backend identifiers per (record, value)
// - **translate**: aggregate entries into records, decompose records into entries
// - **ChangePlanner**: minimal create/update/delete calls for one change
// - **Provider**: `populate` and `apply`, the framework-facing operations
// - **BackendRegistry**: plugin-based registry of backend factories
//
// ## Design Principles
//
// 1. **Backend as collaborator**: transport and authentication live behind the `Backend` trait
// 2. **Sequential**: backend calls are awaited one at a time, in plan order
// 3. **Plugin-Based**: backends are registered dynamically, no hard-coded if-else
// 4. **Rebuilt identities**: nothing from a previous populate survives the next one

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod identity;
pub mod planner;
pub mod provider;
pub mod qualify;
pub mod record;
pub mod registry;
pub mod traits;
pub mod translate;

// Re-export core types for convenience
pub use backend::MemoryBackend;
pub use config::{BackendConfig, ProviderConfig};
pub use error::{Error, Result};
pub use identity::IdentityTracker;
pub use planner::{BackendCall, ChangePlanner};
pub use provider::Provider;
pub use record::{
    ChangeOp, EntryRef, FlatEntry, GroupedRecord, Plan, RecordKey, RecordType, RecordValue, Zone,
};
pub use registry::BackendRegistry;
pub use traits::{Backend, BackendFactory};
