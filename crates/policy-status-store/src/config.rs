//! Configuration for opening a store.

use std::time::Duration;

/// How hard SQLite works to make a commit survive power loss.
///
/// Only modes that sync on every commit are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Durability {
    /// `PRAGMA synchronous = FULL`.
    #[default]
    Full,
    /// `PRAGMA synchronous = EXTRA`: also syncs the directory after the
    /// rollback journal is deleted.
    Extra,
}

impl Durability {
    pub(crate) fn synchronous_level(self) -> i64 {
        match self {
            Durability::Full => 2,
            Durability::Extra => 3,
        }
    }
}

/// Configuration for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long to wait on a locked file before failing.
    pub busy_timeout: Duration,
    /// Commit durability level.
    pub durability: Durability,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::ZERO,
            durability: Durability::Full,
        }
    }
}
