//! Error types for the policy status core.

use thiserror::Error;

/// Validation errors for caller-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("policy name must not be empty")]
    EmptyPolicyName,

    #[error("unknown status kind: {0:?}")]
    UnknownStatus(String),
}
