// src/core/store.rs

use color_eyre::eyre::{eyre, Result, WrapErr};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Read-only lookup capability handed to the transform engine.
///
/// Entries are created by the probing phase before normalization runs;
/// the engine only ever reads and finally releases the store. Lookup
/// misses and backend failures both come back as `None` - an unresolved
/// input is a normal branch, never an error.
pub trait ResolvedInputs {
    /// Returns the previously resolved URL for a raw input token, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Releases any underlying resources. Closing is exactly-once: later
    /// calls are no-ops, and a store that never spilled to disk has
    /// nothing to release.
    fn close(&mut self) -> Result<()>;
}

/// Entries kept in memory before the store spills to its disk tier.
const DEFAULT_HOT_CAPACITY: usize = 4096;

// Distinguishes disk tiers opened by the same process.
static DISK_TIER_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Hybrid in-memory/on-disk map from raw input tokens to resolved URLs.
///
/// Lookups hit a bounded in-memory tier first; once that tier is full,
/// further entries land in a SQLite table created lazily under the system
/// temp directory, so large target lists do not grow memory without bound.
/// `close` drops the connection and removes the backing file.
pub struct HybridStore {
    hot: HashMap<String, String>,
    hot_capacity: usize,
    disk: Option<DiskTier>,
}

struct DiskTier {
    connection: Connection,
    path: PathBuf,
}

impl HybridStore {
    pub fn new() -> Self {
        Self::with_hot_capacity(DEFAULT_HOT_CAPACITY)
    }

    pub fn with_hot_capacity(hot_capacity: usize) -> Self {
        Self {
            hot: HashMap::new(),
            hot_capacity,
            disk: None,
        }
    }

    /// Loads a `{"raw input": "resolved URL"}` JSON document written by a
    /// prior probing run.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read resolved inputs from {}", path.display()))?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).wrap_err("Resolved-inputs file is not a JSON string map")?;

        let mut store = Self::new();
        for (key, value) in entries {
            store.insert(&key, &value)?;
        }
        debug!(entries = %store.len(), path = %path.display(), "Loaded resolved inputs.");
        Ok(store)
    }

    /// Records the resolved URL for a raw input token. Population belongs
    /// to the probing phase; the transform engine never writes.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<()> {
        if self.hot.len() < self.hot_capacity || self.hot.contains_key(key) {
            self.hot.insert(key.to_string(), value.to_string());
            return Ok(());
        }
        self.disk_tier()?
            .connection
            .execute(
                "INSERT OR REPLACE INTO resolved_inputs (key, value) VALUES (?1, ?2)",
                (key, value),
            )
            .wrap_err("Failed to write resolved input to the disk tier")?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        let spilled = self
            .disk
            .as_ref()
            .map_or(0, |disk| disk.count().unwrap_or(0));
        self.hot.len() + spilled
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn disk_tier(&mut self) -> Result<&mut DiskTier> {
        if self.disk.is_none() {
            self.disk = Some(DiskTier::open()?);
        }
        self.disk
            .as_mut()
            .ok_or_else(|| eyre!("disk tier unavailable"))
    }
}

impl Default for HybridStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolvedInputs for HybridStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.hot.get(key) {
            return Some(value.clone());
        }
        let disk = self.disk.as_ref()?;
        match disk.get(key) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Disk tier lookup failed, treating input as unresolved.");
                None
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.hot.clear();
        let Some(disk) = self.disk.take() else {
            return Ok(());
        };
        let path = disk.path;
        disk.connection
            .close()
            .map_err(|(_, e)| e)
            .wrap_err("Failed to close the resolved-inputs disk tier")?;
        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Could not remove the disk tier file.");
        }
        Ok(())
    }
}

impl DiskTier {
    fn open() -> Result<Self> {
        let seq = DISK_TIER_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "resolved-inputs-{}-{}.db",
            std::process::id(),
            seq
        ));
        let connection = Connection::open(&path)
            .wrap_err_with(|| format!("Failed to open disk tier at {}", path.display()))?;
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS resolved_inputs (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
                [],
            )
            .wrap_err("Failed to initialize the disk tier schema")?;
        debug!(path = %path.display(), "Opened disk tier for resolved inputs.");
        Ok(Self { connection, path })
    }

    fn get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM resolved_inputs WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
    }

    fn count(&self) -> rusqlite::Result<usize> {
        self.connection
            .query_row("SELECT COUNT(*) FROM resolved_inputs", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_store_misses_every_key() {
        let store = HybridStore::new();
        assert_eq!(store.get("example.com"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn hot_tier_round_trips_entries() {
        let mut store = HybridStore::new();
        store.insert("example.com", "https://example.com").unwrap();
        assert_eq!(
            store.get("example.com").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(store.get("other.com"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reinserting_a_hot_key_updates_in_place() {
        let mut store = HybridStore::with_hot_capacity(1);
        store.insert("a", "https://a").unwrap();
        store.insert("a", "https://a:8443").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("https://a:8443"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overflow_spills_to_disk_and_close_removes_the_file() {
        let mut store = HybridStore::with_hot_capacity(2);
        for i in 0..5 {
            store
                .insert(&format!("host{i}.sh"), &format!("https://host{i}.sh"))
                .unwrap();
        }
        assert_eq!(store.len(), 5);
        for i in 0..5 {
            assert_eq!(
                store.get(&format!("host{i}.sh")),
                Some(format!("https://host{i}.sh")),
                "entry {i} should survive the spill"
            );
        }

        let disk_path = store.disk.as_ref().map(|d| d.path.clone()).unwrap();
        assert!(disk_path.exists());
        store.close().unwrap();
        assert!(!disk_path.exists());
    }

    #[test]
    fn close_is_a_noop_without_a_disk_tier() {
        let mut store = HybridStore::new();
        store.close().unwrap();
        store.close().unwrap();
    }

    #[test]
    fn loads_resolved_inputs_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"scanme.sh": "https://scanme.sh", "ftp://old.sh": "http://old.sh"}}"#
        )
        .unwrap();

        let store = HybridStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("scanme.sh").as_deref(), Some("https://scanme.sh"));
        assert_eq!(store.get("ftp://old.sh").as_deref(), Some("http://old.sh"));
    }

    #[test]
    fn rejects_a_malformed_resolved_inputs_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(HybridStore::from_json_file(file.path()).is_err());
    }
}
