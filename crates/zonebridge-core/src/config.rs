//! Configuration types for zonebridge
//!
//! This module defines all configuration structures used throughout the crate.
//!
//! ```json
//! {
//!   "id": "gandi",
//!   "supports": ["A", "AAAA", "MX"],
//!   "raise_on_unhandled": false,
//!   "backend": { "type": "file", "path": "/var/lib/zonebridge/entries.json" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::record::RecordType;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider instance id (used in logs)
    pub id: String,

    /// Record types to aggregate and apply; `None` means every implemented type
    #[serde(default)]
    pub supports: Option<BTreeSet<RecordType>>,

    /// Fail populate on record types that are not handled instead of skipping them
    #[serde(default)]
    pub raise_on_unhandled: bool,

    /// TTL handed to the backend before any change sets one
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Backend selection
    pub backend: BackendConfig,
}

impl ProviderConfig {
    /// Create a new configuration with defaults
    pub fn new(id: impl Into<String>, backend: BackendConfig) -> Self {
        Self {
            id: id.into(),
            supports: None,
            raise_on_unhandled: false,
            default_ttl: default_ttl(),
            backend,
        }
    }

    /// Restrict the supported record types
    pub fn with_supports(mut self, supports: impl IntoIterator<Item = RecordType>) -> Self {
        self.supports = Some(supports.into_iter().collect());
        self
    }

    /// Fail populate on unhandled record types
    pub fn with_raise_on_unhandled(mut self, raise: bool) -> Self {
        self.raise_on_unhandled = raise;
        self
    }

    /// Set the default TTL
    pub fn with_default_ttl(mut self, ttl: u32) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Effective supported record types
    pub fn supported_types(&self) -> BTreeSet<RecordType> {
        self.supports.clone().unwrap_or_else(RecordType::all)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.id.trim().is_empty() {
            return Err(crate::Error::config("Provider id cannot be empty"));
        }

        if let Some(supports) = &self.supports
            && supports.is_empty()
        {
            return Err(crate::Error::config(
                "supports must name at least one record type",
            ));
        }

        self.backend.validate()?;

        Ok(())
    }
}

/// Backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// In-memory backend (not persistent)
    #[default]
    Memory,

    /// JSON file backend
    File {
        /// Path to the entries file
        path: String,
    },

    /// Custom backend
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl BackendConfig {
    /// Validate the backend configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            BackendConfig::Memory => Ok(()),
            BackendConfig::File { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("File backend path cannot be empty"));
                }
                Ok(())
            }
            BackendConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom backend factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom backend config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the backend type name used for registry lookup
    pub fn type_name(&self) -> &str {
        match self {
            BackendConfig::Memory => "memory",
            BackendConfig::File { .. } => "file",
            BackendConfig::Custom { factory, .. } => factory,
        }
    }
}

fn default_ttl() -> u32 {
    3600
}
