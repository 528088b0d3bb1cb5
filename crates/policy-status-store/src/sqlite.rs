//! SQLite implementation of the status store.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite. The single connection sits behind a mutex shared with every
//! read-only handle derived from the store, so closing the store closes
//! them all.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use policy_status_core::{validate_policy_name, StatusKind, StatusRecord};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{StatusReader, StatusStore};

/// The connection slot. `None` once the store has been closed.
type SharedConn = Arc<Mutex<Option<Connection>>>;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. The file is opened in exclusive locking
/// mode and the lock is taken at open time, so a second opener of the same
/// path fails with `StorageUnavailable` instead of sharing the file.
pub struct SqliteStatusStore {
    conn: SharedConn,
    path: PathBuf,
}

/// Read-only projection of a [`SqliteStatusStore`].
///
/// Only obtainable through [`StatusStore::read_only`].
#[derive(Clone)]
pub struct SqliteReadOnlyStore {
    conn: SharedConn,
}

impl SqliteStatusStore {
    /// Open a SQLite store at the given path with the default config.
    ///
    /// Creates the file and runs migrations if it doesn't exist. The parent
    /// directory must already exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open a SQLite store at the given path.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        // No SQLITE_OPEN_URI: a name like `file:x?mode=memory` is a plain filename.
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let mut conn = Connection::open_with_flags(path, flags)
            .map_err(StoreError::from)
            .and_then(|mut conn| {
                configure(&mut conn, &config)?;
                Ok(conn)
            })
            .map_err(|e| e.unavailable_at(path))?;
        migration::migrate(&mut conn).map_err(|e| e.unavailable_at(path))?;

        tracing::info!(path = %path.display(), "opened policy status store");
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory SQLite store.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        configure(&mut conn, &StoreConfig::default())?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            path: PathBuf::from(":memory:"),
        })
    }

    /// The path this store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Apply connection settings and take the exclusive file lock.
fn configure(conn: &mut Connection, config: &StoreConfig) -> Result<()> {
    conn.busy_timeout(config.busy_timeout)?;
    conn.pragma_update_and_check(None, "locking_mode", "EXCLUSIVE", |row| {
        row.get::<_, String>(0)
    })?;
    conn.pragma_update(None, "synchronous", config.durability.synchronous_level())?;
    // In exclusive mode the lock is kept after commit.
    conn.execute_batch("BEGIN EXCLUSIVE; COMMIT;")?;
    Ok(())
}

/// Run `f` against the live connection, or fail with `Closed`.
fn with_conn<F, T>(conn: &SharedConn, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
    match guard.as_ref() {
        Some(conn) => f(conn),
        None => Err(StoreError::Closed),
    }
}

fn is_closed(conn: &SharedConn) -> bool {
    conn.lock().map(|guard| guard.is_none()).unwrap_or(true)
}

// Helper to convert a row to StatusRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatusRecord> {
    let status: String = row.get("status")?;
    let status = status
        .parse::<StatusKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(StatusRecord {
        status,
        message: row.get("message")?,
        updated_at: row.get("updated_at")?,
    })
}

fn get_status_on(conn: &Connection, policy: &str) -> Result<StatusRecord> {
    conn.query_row(
        "SELECT status, message, updated_at FROM policy_status WHERE policy = ?1",
        params![policy],
        row_to_record,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(policy.to_string()))
}

fn list_on(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached("SELECT policy FROM policy_status ORDER BY policy")?;
    let policies = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(policies)
}

impl StatusReader for SqliteStatusStore {
    fn get_status(&self, policy: &str) -> Result<StatusRecord> {
        with_conn(&self.conn, |conn| get_status_on(conn, policy))
    }

    fn list(&self) -> Result<Vec<String>> {
        with_conn(&self.conn, list_on)
    }

    fn is_closed(&self) -> bool {
        is_closed(&self.conn)
    }
}

impl StatusStore for SqliteStatusStore {
    type ReadOnly = SqliteReadOnlyStore;

    fn put_status(&self, policy: &str, status: StatusKind, message: &str) -> Result<()> {
        validate_policy_name(policy)?;

        with_conn(&self.conn, |conn| {
            // Stamped under the lock so commit order and updated_at agree.
            let now = crate::now_millis();
            conn.execute(
                "INSERT INTO policy_status (policy, status, message, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(policy) DO UPDATE SET
                    status = excluded.status,
                    message = excluded.message,
                    updated_at = excluded.updated_at",
                params![policy, status.as_str(), message, now],
            )?;
            Ok(())
        })?;

        tracing::debug!(policy, %status, "stored policy status");
        Ok(())
    }

    fn remove(&self, policy: &str) -> Result<()> {
        let removed = with_conn(&self.conn, |conn| {
            Ok(conn.execute(
                "DELETE FROM policy_status WHERE policy = ?1",
                params![policy],
            )?)
        })?;

        tracing::debug!(policy, removed = removed > 0, "removed policy status");
        Ok(())
    }

    fn read_only(&self) -> SqliteReadOnlyStore {
        SqliteReadOnlyStore {
            conn: self.conn.clone(),
        }
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let conn = guard.take().ok_or(StoreError::Closed)?;

        match conn.close() {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "closed policy status store");
                Ok(())
            }
            Err((conn, e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to close store");
                *guard = Some(conn);
                Err(e.into())
            }
        }
    }
}

impl StatusReader for SqliteReadOnlyStore {
    fn get_status(&self, policy: &str) -> Result<StatusRecord> {
        with_conn(&self.conn, |conn| get_status_on(conn, policy))
    }

    fn list(&self) -> Result<Vec<String>> {
        with_conn(&self.conn, list_on)
    }

    fn is_closed(&self) -> bool {
        is_closed(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn temp_store() -> (tempfile::TempDir, PathBuf, SqliteStatusStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.db");
        let store = SqliteStatusStore::open(&path).unwrap();
        (dir, path, store)
    }

    #[test]
    fn test_put_and_get_status() {
        let store = SqliteStatusStore::open_memory().unwrap();

        store
            .put_status("my-policy", StatusKind::Installed, "all is good")
            .unwrap();

        let record = store.get_status("my-policy").unwrap();
        assert_eq!(record.status, StatusKind::Installed);
        assert_eq!(record.message, "all is good");
        assert!(record.updated_at > 0);
    }

    #[test]
    fn test_overwrite_replaces_record() {
        let store = SqliteStatusStore::open_memory().unwrap();

        store.put_status("p", StatusKind::Pending, "queued").unwrap();
        store.put_status("p", StatusKind::Failed, "").unwrap();

        let record = store.get_status("p").unwrap();
        assert_eq!(record.into_parts(), (StatusKind::Failed, String::new()));
        assert_eq!(store.list().unwrap(), vec!["p".to_string()]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = SqliteStatusStore::open_memory().unwrap();
        let err = store.get_status("never-written").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref p) if p == "never-written"));
    }

    #[test]
    fn test_empty_policy_rejected() {
        let store = SqliteStatusStore::open_memory().unwrap();
        let err = store.put_status("", StatusKind::Installed, "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_exact_match() {
        let store = SqliteStatusStore::open_memory().unwrap();
        store.put_status("Policy", StatusKind::Installed, "").unwrap();
        store.put_status(" policy", StatusKind::Failed, "").unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
        assert!(matches!(
            store.get_status("policy"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SqliteStatusStore::open_memory().unwrap();
        store.put_status("keep", StatusKind::Installed, "").unwrap();

        store.remove("absent").unwrap();
        store.remove("absent").unwrap();
        assert_eq!(store.list().unwrap(), vec!["keep".to_string()]);

        store.remove("keep").unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.get_status("keep"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_read_only_sees_later_writes() {
        let store = SqliteStatusStore::open_memory().unwrap();
        let ro = store.read_only();

        assert!(ro.list().unwrap().is_empty());
        store
            .put_status("my-policy", StatusKind::Installed, "all is good")
            .unwrap();

        let record = ro.get_status("my-policy").unwrap();
        assert_eq!(record.status, StatusKind::Installed);
        assert_eq!(record.message, "all is good");
        assert_eq!(ro.list().unwrap(), vec!["my-policy".to_string()]);
    }

    #[test]
    fn test_close_invalidates_all_handles() {
        let store = SqliteStatusStore::open_memory().unwrap();
        let ro = store.read_only();
        store.put_status("p", StatusKind::Installed, "").unwrap();

        store.close().unwrap();
        assert!(store.is_closed());
        assert!(ro.is_closed());

        assert_eq!(store.get_status("p").unwrap_err().kind(), ErrorKind::Closed);
        assert_eq!(store.list().unwrap_err().kind(), ErrorKind::Closed);
        assert_eq!(
            store
                .put_status("p", StatusKind::Failed, "")
                .unwrap_err()
                .kind(),
            ErrorKind::Closed
        );
        assert_eq!(store.remove("p").unwrap_err().kind(), ErrorKind::Closed);
        assert_eq!(ro.get_status("p").unwrap_err().kind(), ErrorKind::Closed);
        assert_eq!(ro.list().unwrap_err().kind(), ErrorKind::Closed);
        assert_eq!(store.close().unwrap_err().kind(), ErrorKind::Closed);
    }

    #[test]
    fn test_open_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("policy.db");

        let err = SqliteStatusStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
        assert!(!path.exists());
    }

    #[test]
    fn test_open_creates_file() {
        let (_dir, path, store) = temp_store();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_reopen_keeps_records() {
        let (_dir, path, store) = temp_store();
        store.put_status("a", StatusKind::Installed, "ok").unwrap();
        store.put_status("b", StatusKind::Failed, "boom").unwrap();
        store.remove("a").unwrap();
        store.close().unwrap();

        let store = SqliteStatusStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap(), vec!["b".to_string()]);
        let record = store.get_status("b").unwrap();
        assert_eq!(record.into_parts(), (StatusKind::Failed, "boom".to_string()));
    }

    #[test]
    fn test_second_open_is_refused() {
        let (_dir, path, store) = temp_store();

        let err = SqliteStatusStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);

        // The first handle is unaffected.
        store.put_status("p", StatusKind::Pending, "").unwrap();

        store.close().unwrap();
        let reopened = SqliteStatusStore::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap(), vec!["p".to_string()]);
    }

    #[test]
    fn test_open_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.db");
        std::fs::write(&path, vec![0x5a; 4096]).unwrap();

        let err = SqliteStatusStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    }

    #[test]
    fn test_drop_releases_file() {
        let (_dir, path, store) = temp_store();
        store.put_status("p", StatusKind::Installed, "").unwrap();
        drop(store);

        let store = SqliteStatusStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap(), vec!["p".to_string()]);
    }
}
