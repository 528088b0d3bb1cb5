//! # Policy Status Testkit
//!
//! Testing utilities for the policy status store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an on-disk store in a throwaway directory, with reopen
//! - **Generators**: Proptest strategies for property-based testing
//! - **Tracing**: a test-friendly subscriber, installed at most once
//!
//! ## Test Fixtures
//!
//! ```rust
//! use policy_status_core::StatusKind;
//! use policy_status_store::{StatusReader, StatusStore};
//! use policy_status_testkit::TempStore;
//!
//! let fixture = TempStore::new();
//! fixture.put_status("my-policy", StatusKind::Installed, "all is good").unwrap();
//!
//! let fixture = fixture.reopen();
//! assert_eq!(fixture.list().unwrap(), vec!["my-policy".to_string()]);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use policy_status_testkit::generators::StatusOp;
//!
//! proptest! {
//!     #[test]
//!     fn ops_never_fail(ops in prop::collection::vec(any::<StatusOp>(), 0..32)) {
//!         let store = policy_status_store::MemoryStatusStore::new();
//!         for op in &ops {
//!             op.apply(&store).unwrap();
//!         }
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_records, TempStore};
pub use generators::StatusOp;

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honours `RUST_LOG`. Safe to call from every test; only the first call
/// installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
