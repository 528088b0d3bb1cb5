//! File names that look like SQLite URIs are still plain files.
//!
//! Kept in its own test binary: it changes the process working directory.

use std::env;

use policy_status_core::StatusKind;
use policy_status_store::{SqliteStatusStore, StatusReader, StatusStore};

#[test]
fn uri_like_relative_name_is_a_durable_file() {
    let dir = tempfile::tempdir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    let name = "file:policy.db?mode=memory";
    let store = SqliteStatusStore::open(name).unwrap();
    store.put_status("p", StatusKind::Installed, "x").unwrap();
    assert!(dir.path().join(name).is_file());
    store.close().unwrap();

    let store = SqliteStatusStore::open(name).unwrap();
    let (status, message) = store.get_status("p").unwrap().into_parts();
    assert_eq!(status, StatusKind::Installed);
    assert_eq!(message, "x");
    store.close().unwrap();
}
