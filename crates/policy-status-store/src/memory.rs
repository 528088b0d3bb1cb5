//! In-memory implementation of the status store.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use policy_status_core::{validate_policy_name, StatusKind, StatusRecord};

use crate::error::{Result, StoreError};
use crate::traits::{StatusReader, StatusStore};

/// Policy records, or `None` once closed.
type SharedMap = Arc<RwLock<Option<BTreeMap<String, StatusRecord>>>>;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStatusStore {
    inner: SharedMap,
}

/// Read-only projection of a [`MemoryStatusStore`].
#[derive(Clone)]
pub struct MemoryReadOnlyStore {
    inner: SharedMap,
}

impl MemoryStatusStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(BTreeMap::new()))),
        }
    }
}

impl Default for MemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read(inner: &SharedMap) -> Result<RwLockReadGuard<'_, Option<BTreeMap<String, StatusRecord>>>> {
    inner.read().map_err(|_| StoreError::LockPoisoned)
}

fn get_status_in(inner: &SharedMap, policy: &str) -> Result<StatusRecord> {
    read(inner)?
        .as_ref()
        .ok_or(StoreError::Closed)?
        .get(policy)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(policy.to_string()))
}

fn list_in(inner: &SharedMap) -> Result<Vec<String>> {
    Ok(read(inner)?
        .as_ref()
        .ok_or(StoreError::Closed)?
        .keys()
        .cloned()
        .collect())
}

fn is_closed_in(inner: &SharedMap) -> bool {
    read(inner).map(|guard| guard.is_none()).unwrap_or(true)
}

impl StatusReader for MemoryStatusStore {
    fn get_status(&self, policy: &str) -> Result<StatusRecord> {
        get_status_in(&self.inner, policy)
    }

    fn list(&self) -> Result<Vec<String>> {
        list_in(&self.inner)
    }

    fn is_closed(&self) -> bool {
        is_closed_in(&self.inner)
    }
}

impl StatusStore for MemoryStatusStore {
    type ReadOnly = MemoryReadOnlyStore;

    fn put_status(&self, policy: &str, status: StatusKind, message: &str) -> Result<()> {
        validate_policy_name(policy)?;

        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let records = inner.as_mut().ok_or(StoreError::Closed)?;
        records.insert(
            policy.to_string(),
            StatusRecord::new(status, message, crate::now_millis()),
        );

        tracing::debug!(policy, %status, "stored policy status");
        Ok(())
    }

    fn remove(&self, policy: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let removed = inner
            .as_mut()
            .ok_or(StoreError::Closed)?
            .remove(policy)
            .is_some();

        tracing::debug!(policy, removed, "removed policy status");
        Ok(())
    }

    fn read_only(&self) -> MemoryReadOnlyStore {
        MemoryReadOnlyStore {
            inner: self.inner.clone(),
        }
    }

    fn close(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        inner.take().map(|_| ()).ok_or(StoreError::Closed)
    }
}

impl StatusReader for MemoryReadOnlyStore {
    fn get_status(&self, policy: &str) -> Result<StatusRecord> {
        get_status_in(&self.inner, policy)
    }

    fn list(&self) -> Result<Vec<String>> {
        list_in(&self.inner)
    }

    fn is_closed(&self) -> bool {
        is_closed_in(&self.inner)
    }
}
