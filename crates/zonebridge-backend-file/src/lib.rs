// # File Backend
//
// JSON-file implementation of Backend with crash recovery.
//
// ## Purpose
//
// A local stand-in for a remote DNS API: entries survive restarts, so a
// zone can be populated, planned against and applied to without touching
// a real provider. Also handy as a fixture store for tests and demos.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: JSON validation on load
// - Automatic backup: Keeps .backup of the previous document
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "updated_at": "2025-01-09T12:00:00Z",
//   "next_id": 3,
//   "shared_ids": false,
//   "entries": [
//     { "type": "A", "name": "@.example.com.", "ttl": 3600, "content": "1.2.3.4", "id": "1" },
//     { "type": "MX", "name": "@.example.com.", "ttl": 3600, "content": "10 mail.example.com.", "id": "2" }
//   ]
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use zonebridge_core::backend::EntrySet;
use zonebridge_core::config::BackendConfig;
use zonebridge_core::registry::BackendRegistry;
use zonebridge_core::traits::{Backend, BackendFactory};
use zonebridge_core::{Error, FlatEntry, Result};

/// Entries file format version
const FILE_VERSION: &str = "1.0";

/// TTL for entries written before any `set_ttl`
const DEFAULT_TTL: u32 = 3600;

/// Serializable entries file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntriesFile {
    version: String,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    set: EntrySet,
}

/// File-backed DNS backend
///
/// Every successful mutation is written to disk before the call returns.
/// A mutation the entry set refuses leaves both memory and disk untouched.
///
/// # Example
///
/// ```rust,no_run
/// use zonebridge_backend_file::FileBackend;
/// use zonebridge_core::traits::Backend;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = FileBackend::open("/var/lib/zonebridge/entries.json").await?;
///
///     backend.create_record("A", "www.example.com.", "1.2.3.4").await?;
///
///     let entries = backend.list_records(None, None, None).await?;
///     assert_eq!(entries.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    set: Arc<RwLock<EntrySet>>,
    ttl: Arc<AtomicU32>,
}

impl FileBackend {
    /// Open or create an entries file
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing file
    /// 3. If it is corrupted, load the backup instead
    /// 4. If both fail, start empty
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let set = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            set: Arc::new(RwLock::new(set)),
            ttl: Arc::new(AtomicU32::new(DEFAULT_TTL)),
        })
    }

    /// Path of the entries file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Preload entries and write them to disk
    pub async fn seed(&self, entries: impl IntoIterator<Item = FlatEntry>) -> Result<()> {
        self.mutate(|set| {
            set.seed(entries);
            Ok(())
        })
        .await
    }

    /// Snapshot of every stored entry
    pub async fn entries(&self) -> Vec<FlatEntry> {
        self.set.read().await.entries().to_vec()
    }

    async fn load_with_recovery(path: &Path) -> Result<EntrySet> {
        match Self::load(path).await {
            Ok(set) => {
                tracing::debug!("Loaded {} entries from {}", set.len(), path.display());
                Ok(set)
            }
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Entries file {} appears corrupted: {}. Attempting recovery from backup.",
                    path.display(),
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with no entries.");
                    return Ok(EntrySet::new());
                }

                match Self::load(&backup_path).await {
                    Ok(set) => {
                        tracing::info!("Recovered {} entries from backup", set.len());
                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore entries file from backup: {}",
                                restore_err
                            );
                        }
                        Ok(set)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also unreadable: {}. Starting with no entries.",
                            backup_err
                        );
                        Ok(EntrySet::new())
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn load(path: &Path) -> Result<EntrySet> {
        if !path.exists() {
            tracing::debug!("Entries file does not exist: {}", path.display());
            return Ok(EntrySet::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::backend(
                "file",
                format!("Failed to read {}: {}", path.display(), e),
            )
        })?;

        let file: EntriesFile = serde_json::from_str(&content)?;

        if file.version != FILE_VERSION {
            tracing::warn!(
                "Entries file version mismatch: expected {}, got {}. Attempting to load anyway.",
                FILE_VERSION,
                file.version
            );
        }

        Ok(file.set)
    }

    /// Apply `op` to a copy of the entries, persist it, then commit it
    async fn mutate<T>(&self, op: impl FnOnce(&mut EntrySet) -> Result<T>) -> Result<T> {
        let mut guard = self.set.write().await;

        let mut next = guard.clone();
        let output = op(&mut next)?;

        self.write(&next).await?;
        *guard = next;

        Ok(output)
    }

    async fn write(&self, set: &EntrySet) -> Result<()> {
        let file = EntriesFile {
            version: FILE_VERSION.to_string(),
            updated_at: Utc::now(),
            set: set.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::backend(
                    "file",
                    format!("Failed to create temp file {}: {}", temp_path.display(), e),
                )
            })?;
            temp.write_all(json.as_bytes()).await?;
            temp.flush().await?;
        }

        if self.path.exists()
            && let Err(e) = fs::copy(&self.path, Self::backup_path(&self.path)).await
        {
            tracing::warn!("Failed to create backup: {}", e);
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::backend(
                "file",
                format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    self.path.display(),
                    e
                ),
            )
        })?;

        tracing::trace!("Entries written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    async fn list_records(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Vec<FlatEntry>> {
        Ok(self.set.read().await.list(rtype, name, content))
    }

    async fn create_record(&self, rtype: &str, name: &str, content: &str) -> Result<()> {
        let ttl = self.ttl.load(Ordering::SeqCst);
        self.mutate(|set| set.create(rtype, name, content, ttl).map(|_| ()))
            .await
    }

    async fn update_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<()> {
        let ttl = self.ttl.load(Ordering::SeqCst);
        self.mutate(|set| set.update(identifier, rtype, name, content, ttl))
            .await
    }

    async fn delete_record(
        &self,
        identifier: Option<&str>,
        rtype: &str,
        name: &str,
        content: &str,
    ) -> Result<()> {
        self.mutate(|set| set.delete(identifier, rtype, name, content))
            .await
    }

    fn set_ttl(&self, ttl: u32) {
        self.ttl.store(ttl, Ordering::SeqCst);
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Factory for creating file backends
pub struct FileBackendFactory;

#[async_trait]
impl BackendFactory for FileBackendFactory {
    async fn create(&self, config: &BackendConfig) -> Result<Box<dyn Backend>> {
        match config {
            BackendConfig::File { path } => Ok(Box::new(FileBackend::open(path).await?)),
            _ => Err(Error::config("Invalid config for file backend")),
        }
    }
}

/// Register the file backend with a registry
pub fn register(registry: &BackendRegistry) {
    registry.register_backend("file", Box::new(FileBackendFactory));
}
