//! # Policy Status Store
//!
//! Durable, atomic mapping from policy name to `(status, message)`, plus a
//! read-only projection of the same data.
//!
//! ## Overview
//!
//! Access is split across two traits: [`StatusReader`] for reads and
//! [`StatusStore`] for writes. The primary implementation is
//! [`SqliteStatusStore`], with [`MemoryStatusStore`] for testing. Each hands
//! out a read-only handle that implements [`StatusReader`] only.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use policy_status_store::{SqliteStatusStore, StatusReader, StatusStore};
//! use policy_status_core::StatusKind;
//!
//! fn example() -> policy_status_store::Result<()> {
//!     let store = SqliteStatusStore::open("/var/lib/policyd/policy.db")?;
//!     store.put_status("my-policy", StatusKind::Installed, "all is good")?;
//!
//!     let reader = store.read_only();
//!     let record = reader.get_status("my-policy")?;
//!     assert_eq!(record.status, StatusKind::Installed);
//!
//!     store.close()
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Single-record atomicity**: every write or removal commits on its own
//! - **Durable writes**: `put_status` returns after the commit is synced
//! - **Single owner**: the SQLite file is locked exclusively while open;
//!   sharing a path between processes is unsupported and refused
//! - **Closed status set**: only [`StatusKind`] values can be stored
//!
//! [`StatusKind`]: policy_status_core::StatusKind

pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use config::{Durability, StoreConfig};
pub use error::{ErrorKind, Result, StoreError};
pub use memory::{MemoryReadOnlyStore, MemoryStatusStore};
pub use sqlite::{SqliteReadOnlyStore, SqliteStatusStore};
pub use traits::{StatusReader, StatusReaderExt, StatusStore};

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
