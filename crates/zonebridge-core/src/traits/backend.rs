// # Backend Trait
//
// Defines the interface of the flat-entry DNS backend that zonebridge drives.
//
// ## Implementations
//
// - In-memory: `zonebridge_core::backend::MemoryBackend`
// - JSON file: `zonebridge-backend-file` crate
// - Anything wrapping a multi-provider DNS API client
//
// ## Usage
//
// ```rust,ignore
// use zonebridge_core::Backend;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let backend = /* Backend implementation */;
//
//     backend.authenticate().await?;
//     for entry in backend.list_records(None, None, None).await? {
//         println!("{} {} {}", entry.rtype, entry.name, entry.content);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::BackendConfig;
use crate::record::FlatEntry;

/// Trait for flat-entry DNS backends
///
/// A backend stores one entry per record value and assigns each entry an
/// identifier. Identifiers are opaque and may be shared between entries of
/// the same name (some APIs derive them from the name).
///
/// # Failure reporting
///
/// A mutation the backend refuses (target missing, API answered "no") is
/// reported as [`crate::Error::Rejected`]. The change planner turns that into
/// the matching typed record error. Any other error (transport,
/// authentication, I/O) is propagated to the caller unchanged.
///
/// # Concurrency
///
/// Callers issue one call at a time and await it before the next one.
/// Implementations must not retry, spawn tasks, or reorder calls.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Establish a session with the backend
    async fn authenticate(&self) -> Result<(), crate::Error>;

    /// List entries, optionally filtered
    ///
    /// # Parameters
    ///
    /// - `rtype`: only entries of this type
    /// - `name`: only entries with this name
    /// - `content`: only entries with this content
    ///
    /// `None` for all three lists everything.
    async fn list_records(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Vec<FlatEntry>, crate::Error>;

    /// Create one entry
    async fn create_record(&self, rtype: &str, name: &str, content: &str)
    -> Result<(), crate::Error>;

    /// Replace the content of the entry addressed by `identifier`
    ///
    /// Without an identifier the backend picks the entry by type and name.
    async fn update_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Delete one entry
    ///
    /// Without an identifier the entry is found by type, name and content.
    async fn delete_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// TTL to use for entries written by the following calls
    ///
    /// The create/update primitives carry no TTL, so the caller sets it
    /// before each change. Backends without TTL support ignore it.
    fn set_ttl(&self, _ttl: u32) {}

    /// Get the backend name (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}

/// Helper trait for constructing backends from configuration
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Create a Backend instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Backend configuration
    ///
    /// # Returns
    ///
    /// A boxed Backend trait object
    async fn create(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, crate::Error>;
}
