//! # Policy Status Core
//!
//! Pure primitives for the policy status store: status kinds, records, and
//! policy-name validation.
//!
//! This crate contains no I/O, no storage. Everything that touches disk lives
//! in `policy-status-store`.
//!
//! ## Key Types
//!
//! - [`StatusKind`] - Closed enumeration of policy states
//! - [`StatusRecord`] - The `(status, message)` pair stored per policy
//! - [`ValidationError`] - Rejection of malformed caller input
//!
//! ## Usage
//!
//! ```rust
//! use policy_status_core::{validate_policy_name, StatusKind};
//!
//! let status: StatusKind = "installed".parse().unwrap();
//! assert_eq!(status, StatusKind::Installed);
//! assert!("Installed".parse::<StatusKind>().is_err());
//! assert!(validate_policy_name("my-policy").is_ok());
//! ```

pub mod error;
pub mod status;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use status::StatusKind;
pub use types::StatusRecord;
pub use validation::validate_policy_name;
