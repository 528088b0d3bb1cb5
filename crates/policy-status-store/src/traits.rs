//! Capability traits: the abstract interface for policy status persistence.
//!
//! Reading and writing are separate traits so that a read-only view is a
//! different type, not a flag. A [`StatusStore`] can always hand out its
//! [`StatusStore::ReadOnly`] projection; nothing goes the other way.

use policy_status_core::{StatusKind, StatusRecord};

use crate::error::{Result, StoreError};

/// Non-mutating access to policy statuses.
///
/// All methods run synchronously on the caller's thread and may block on
/// disk I/O. Callers that must not block should offload to a worker
/// (e.g. `tokio::task::spawn_blocking`).
pub trait StatusReader: Send + Sync {
    /// Get the record last written for `policy`.
    ///
    /// # Errors
    /// - `NotFound` if the policy was never written or has been removed.
    /// - `Closed` if the store has been closed.
    fn get_status(&self, policy: &str) -> Result<StatusRecord>;

    /// List every policy that currently has a record.
    ///
    /// Order is unspecified. Returns an empty vector when the store is empty.
    fn list(&self) -> Result<Vec<String>>;

    /// Whether the underlying store has been closed.
    fn is_closed(&self) -> bool;
}

/// Full read/write access to policy statuses.
///
/// # Design Notes
///
/// - **Single-record atomicity**: each `put_status`/`remove` is its own
///   atomic unit. There are no multi-record transactions.
/// - **Internal locking**: implementations serialise writers themselves;
///   callers never lock.
/// - **Single owner**: exactly one open handle per backing file. Opening
///   the same file twice, in this process or another, is not supported.
pub trait StatusStore: StatusReader {
    /// The read-only projection handed out by [`StatusStore::read_only`].
    type ReadOnly: StatusReader + Clone;

    /// Create or overwrite the record for `policy`.
    ///
    /// Durable before returning `Ok`. On error the previous record, if any,
    /// is left intact.
    ///
    /// # Errors
    /// - `InvalidArgument` if `policy` is empty.
    /// - `Database` on I/O failure.
    fn put_status(&self, policy: &str, status: StatusKind, message: &str) -> Result<()>;

    /// Delete the record for `policy`. Absence is not an error.
    fn remove(&self, policy: &str) -> Result<()>;

    /// A handle that can only read, observing the same data as `self`.
    fn read_only(&self) -> Self::ReadOnly;

    /// Release the underlying resources.
    ///
    /// Every later call on this handle, or on any read-only handle derived
    /// from it, fails with `Closed`.
    fn close(&self) -> Result<()>;
}

/// Extension trait for common read patterns.
pub trait StatusReaderExt: StatusReader {
    /// Whether `policy` currently has a record.
    fn contains(&self, policy: &str) -> Result<bool> {
        match self.get_status(policy) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Every policy together with its record.
    ///
    /// Each record is read individually, so the result is not a
    /// point-in-time snapshot across policies. Policies removed between the
    /// listing and the read are skipped.
    fn statuses(&self) -> Result<Vec<(String, StatusRecord)>> {
        let mut out = Vec::new();
        for policy in self.list()? {
            match self.get_status(&policy) {
                Ok(record) => out.push((policy, record)),
                Err(StoreError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}

impl<R: StatusReader + ?Sized> StatusReaderExt for R {}
