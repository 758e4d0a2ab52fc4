//! Zone provider
//!
//! The [`Provider`] is what a zone-management framework talks to. It owns
//! one backend and the identities remembered from the last populate, and
//! exposes the two operations the framework needs:
//!
//! - [`Provider::populate`]: read the backend into grouped records
//! - [`Provider::apply`]: realize a plan of grouped-record changes
//!
//! Both take `&mut self`; a provider is driven by one caller at a time.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::identity::IdentityTracker;
use crate::planner::ChangePlanner;
use crate::record::{Plan, RecordType, Zone};
use crate::registry::BackendRegistry;
use crate::traits::Backend;
use crate::translate;

/// Bridges grouped records and one flat-entry backend
pub struct Provider {
    id: String,
    backend: Box<dyn Backend>,
    identities: IdentityTracker,
    supports: BTreeSet<RecordType>,
    raise_on_unhandled: bool,
    default_ttl: u32,
}

impl Provider {
    /// Create a provider over an already built backend
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: the configuration does not validate
    pub fn new(config: ProviderConfig, backend: Box<dyn Backend>) -> Result<Self> {
        config.validate()?;

        let supports = config.supported_types();
        backend.set_ttl(config.default_ttl);

        info!(
            "Provider {} using {} backend, {} record types",
            config.id,
            backend.backend_name(),
            supports.len()
        );

        Ok(Self {
            id: config.id,
            backend,
            identities: IdentityTracker::new(),
            supports,
            raise_on_unhandled: config.raise_on_unhandled,
            default_ttl: config.default_ttl,
        })
    }

    /// Create a provider, building its backend through `registry`
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: invalid configuration or unknown backend type
    /// - Any error the backend factory returns
    pub async fn from_registry(config: ProviderConfig, registry: &BackendRegistry) -> Result<Self> {
        config.validate()?;
        let backend = registry.create_backend(&config.backend).await?;
        Self::new(config, backend)
    }

    /// Provider instance id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Effective supported record types
    pub fn supports(&self) -> &BTreeSet<RecordType> {
        &self.supports
    }

    /// TTL given to the backend before any change sets one
    pub fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    /// Identities remembered by the last populate
    pub fn identities(&self) -> &IdentityTracker {
        &self.identities
    }

    /// Load the backend's entries into `zone`
    ///
    /// Identities from earlier populates are dropped first and the new ones
    /// are kept only if the populate succeeds. Entries of
    /// unhandled types are skipped with a warning, or abort the populate
    /// when the provider was configured to raise on them.
    ///
    /// # Returns
    ///
    /// Whether the backend listed at least one entry.
    pub async fn populate(&mut self, zone: &mut Zone, lenient: bool) -> Result<bool> {
        debug!("Provider {} populating {}", self.id, zone.name());
        self.identities.clear();

        self.backend.authenticate().await?;
        let entries = self.backend.list_records(None, None, None).await?;

        for entry in &entries {
            debug!(
                "listed {} {} \"{}\" id={:?}",
                entry.rtype, entry.name, entry.content, entry.id
            );
        }

        let mut identities = IdentityTracker::new();
        let aggregated =
            translate::aggregate(zone.name(), &entries, &self.supports, &mut identities)?;

        for group in &aggregated.unhandled {
            if self.raise_on_unhandled {
                return Err(Error::UnhandledType(group.rtype.clone()));
            }
            warn!(
                "Provider {} skipping {} unhandled {} entries for \"{}\"",
                self.id, group.entries, group.rtype, group.name
            );
        }

        let found = aggregated.records.len();
        for record in aggregated.records {
            zone.add_record(record, lenient)?;
        }
        self.identities = identities;

        let exists = !entries.is_empty();
        info!(
            "Provider {} populated {}: found {} records, exists={}",
            self.id,
            zone.name(),
            found,
            exists
        );

        Ok(exists)
    }

    /// Apply every change of `plan`, in order
    ///
    /// # Returns
    ///
    /// The number of changes applied. The first failing change aborts the
    /// rest of the plan; earlier changes are not rolled back.
    pub async fn apply(&mut self, plan: &Plan) -> Result<usize> {
        info!(
            "Provider {} applying {} changes to {}",
            self.id,
            plan.len(),
            plan.zone()
        );

        self.backend.authenticate().await?;

        let planner = ChangePlanner::new(self.backend.as_ref(), &self.identities);

        for change in plan.changes() {
            let record = change.record();
            if !self.supports.contains(&record.rtype()) {
                return Err(Error::UnsupportedType(record.rtype().to_string()));
            }

            self.backend.set_ttl(record.ttl());
            let calls = planner.apply(change).await?;
            debug!("{} {}: {} backend calls", change.kind(), record.key(), calls);
        }

        Ok(plan.len())
    }
}
