//! Plugin-based backend registry
//!
//! The registry allows backends to be registered dynamically at runtime,
//! so a provider can be built from configuration alone.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonebridge_core::registry::BackendRegistry;
//! use zonebridge_core::config::BackendConfig;
//!
//! // Registry with the in-memory backend already present
//! let registry = BackendRegistry::with_builtin();
//!
//! // Register more backends
//! zonebridge_backend_file::register(&registry);
//!
//! // Create a backend from config
//! let config = BackendConfig::File { path: "entries.json".into() };
//! let backend = registry.create_backend(&config).await?;
//! ```
//!
//! ## Registration
//!
//! Backend crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &BackendRegistry) {
//!     registry.register_backend("file", Box::new(FileBackendFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::backend::MemoryBackendFactory;
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::traits::{Backend, BackendFactory};

/// Backend registry for plugin-based backend creation
///
/// Maps backend type names (as returned by [`BackendConfig::type_name`]) to
/// factories.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. The lock is never held across an await.
#[derive(Default)]
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Arc<dyn BackendFactory>>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the backends bundled in this crate
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_backend("memory", Box::new(MemoryBackendFactory));
        registry
    }

    /// Register a backend factory
    ///
    /// # Parameters
    ///
    /// - `name`: Backend type name (e.g., "memory", "file")
    /// - `factory`: Factory object for creating backend instances
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register_backend(&self, name: impl Into<String>, factory: Box<dyn BackendFactory>) {
        let mut backends = self
            .backends
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        backends.insert(name.into(), Arc::from(factory));
    }

    /// Create a backend from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Backend>)`: Created backend instance
    /// - `Err(Error::Config)`: If the backend type is not registered
    /// - Any error the factory returns
    pub async fn create_backend(&self, config: &BackendConfig) -> Result<Box<dyn Backend>> {
        let backend_type = config.type_name();

        let factory = {
            let backends = self
                .backends
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            backends
                .get(backend_type)
                .cloned()
                .ok_or_else(|| Error::config(format!("Unknown backend type: {}", backend_type)))?
        };

        factory.create(config).await
    }

    /// List all registered backend types, sorted
    pub fn list_backends(&self) -> Vec<String> {
        let backends = self
            .backends
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = backends.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a backend type is registered
    pub fn has_backend(&self, name: &str) -> bool {
        let backends = self
            .backends
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        backends.contains_key(name)
    }
}
