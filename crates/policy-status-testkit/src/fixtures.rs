//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use policy_status_core::StatusKind;
use policy_status_store::{SqliteStatusStore, StatusStore, StoreConfig};
use tempfile::TempDir;

/// File name used for fixture stores.
pub const STORE_FILE: &str = "policy.db";

/// An on-disk store living in its own temporary directory.
///
/// The directory is deleted when the fixture is dropped. Derefs to the
/// underlying [`SqliteStatusStore`].
pub struct TempStore {
    store: SqliteStatusStore,
    path: PathBuf,
    // Dropped last so the store releases the file first.
    dir: TempDir,
}

impl TempStore {
    /// Create a fresh store with the default config.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a fresh store with a specific config.
    pub fn with_config(config: StoreConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(STORE_FILE);
        let store = SqliteStatusStore::open_with_config(&path, config).expect("open store");
        Self { store, path, dir }
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the store file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Close the store and open the same file again.
    pub fn reopen(self) -> Self {
        let Self { store, path, dir } = self;
        store.close().expect("close store");
        tracing::debug!(path = %path.display(), "reopening fixture store");
        let store = SqliteStatusStore::open(&path).expect("reopen store");
        Self { store, path, dir }
    }

    /// Write every `(policy, status, message)` triple.
    pub fn seed(&self, records: &[(&str, StatusKind, &str)]) {
        for (policy, status, message) in records {
            self.store
                .put_status(policy, *status, message)
                .expect("seed record");
        }
    }

    /// Give up the fixture, keeping the directory alive alongside the store.
    pub fn into_parts(self) -> (SqliteStatusStore, TempDir) {
        (self.store, self.dir)
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TempStore {
    type Target = SqliteStatusStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Three distinct installed policies: `my-policy-1` to `my-policy-3`.
pub fn sample_records() -> Vec<(&'static str, StatusKind, &'static str)> {
    vec![
        ("my-policy-1", StatusKind::Installed, "all is good"),
        ("my-policy-2", StatusKind::Installed, "all is good"),
        ("my-policy-3", StatusKind::Installed, "all is good"),
    ]
}
