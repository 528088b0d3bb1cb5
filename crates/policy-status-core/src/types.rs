//! The record stored for each policy.

use serde::{Deserialize, Serialize};

use crate::status::StatusKind;

/// The status and diagnostic message last written for a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Current state of the policy.
    pub status: StatusKind,
    /// Human-readable detail. May be empty.
    pub message: String,
    /// When the record was last written (Unix ms). Set by the store.
    pub updated_at: i64,
}

impl StatusRecord {
    pub fn new(status: StatusKind, message: impl Into<String>, updated_at: i64) -> Self {
        Self {
            status,
            message: message.into(),
            updated_at,
        }
    }

    /// Split into the `(status, message)` pair, dropping the timestamp.
    pub fn into_parts(self) -> (StatusKind, String) {
        (self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts() {
        let record = StatusRecord::new(StatusKind::Failed, "module conflict", 42);
        assert_eq!(
            record.into_parts(),
            (StatusKind::Failed, "module conflict".to_string())
        );
    }

    #[test]
    fn test_json_shape() {
        let record = StatusRecord::new(StatusKind::Installed, "all is good", 1000);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "installed");
        assert_eq!(json["message"], "all is good");
        assert_eq!(json["updated_at"], 1000);
    }
}
