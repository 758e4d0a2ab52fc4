// # Memory Backend
//
// In-memory implementation of Backend.
//
// ## Purpose
//
// Provides a simple, fast backend that doesn't persist across restarts.
// Useful for testing, for dry runs of a plan, and for embedding zonebridge
// where the "remote" side is another in-process component.
//
// ## Behavior
//
// - Entries live in a shared `EntrySet`; clones of the backend share it
// - Mutations the set refuses surface as `Error::Rejected`
// - The TTL set before a change is applied to entries created or updated

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

use super::store::EntrySet;
use crate::Error;
use crate::config::BackendConfig;
use crate::record::FlatEntry;
use crate::traits::{Backend, BackendFactory};

/// Default TTL for entries written before any `set_ttl`
const DEFAULT_TTL: u32 = 3600;

/// In-memory backend implementation
///
/// # Example
///
/// ```rust,no_run
/// use zonebridge_core::backend::MemoryBackend;
/// use zonebridge_core::traits::Backend;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = MemoryBackend::new();
///
///     backend.create_record("A", "www.example.com.", "1.2.3.4").await?;
///
///     let entries = backend.list_records(Some("A"), None, None).await?;
///     assert_eq!(entries.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    inner: Arc<RwLock<EntrySet>>,
    ttl: Arc<AtomicU32>,
}

impl MemoryBackend {
    /// Create an empty backend with sequential ids
    pub fn new() -> Self {
        Self::from_set(EntrySet::new())
    }

    /// Create an empty backend whose ids are derived from entry names
    pub fn with_shared_ids() -> Self {
        Self::from_set(EntrySet::with_shared_ids())
    }

    fn from_set(set: EntrySet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
            ttl: Arc::new(AtomicU32::new(DEFAULT_TTL)),
        }
    }

    /// Preload entries; entries without an id get one
    pub async fn seed(&self, entries: impl IntoIterator<Item = FlatEntry>) {
        self.inner.write().await.seed(entries);
    }

    /// Snapshot of every stored entry
    pub async fn entries(&self) -> Vec<FlatEntry> {
        self.inner.read().await.entries().to_vec()
    }

    /// TTL currently applied to writes
    pub fn ttl(&self) -> u32 {
        self.ttl.load(Ordering::SeqCst)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn authenticate(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn list_records(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Vec<FlatEntry>, Error> {
        Ok(self.inner.read().await.list(rtype, name, content))
    }

    async fn create_record(&self, rtype: &str, name: &str, content: &str) -> Result<(), Error> {
        let ttl = self.ttl();
        self.inner
            .write()
            .await
            .create(rtype, name, content, ttl)
            .map(|_| ())
    }

    async fn update_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<(), Error> {
        let ttl = self.ttl();
        self.inner
            .write()
            .await
            .update(identifier, rtype, name, content, ttl)
    }

    async fn delete_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<(), Error> {
        self.inner
            .write()
            .await
            .delete(identifier, rtype, name, content)
    }

    fn set_ttl(&self, ttl: u32) {
        self.ttl.store(ttl, Ordering::SeqCst);
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for creating memory backends
pub struct MemoryBackendFactory;

#[async_trait]
impl BackendFactory for MemoryBackendFactory {
    async fn create(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, Error> {
        match config {
            BackendConfig::Memory => Ok(Box::new(MemoryBackend::new())),
            _ => Err(Error::config("Invalid config for memory backend")),
        }
    }
}
