//! Input validation for the write boundary.

use crate::error::ValidationError;

/// Validate a policy name before it is written.
///
/// Names are opaque, exact-match keys. The only rule is that they are not
/// empty; whitespace, case and punctuation are all preserved as given.
pub fn validate_policy_name(policy: &str) -> Result<(), ValidationError> {
    if policy.is_empty() {
        return Err(ValidationError::EmptyPolicyName);
    }
    Ok(())
}
