//! Status kinds: the closed set of states a policy can be in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The state of a policy on the host.
///
/// The set is closed. Anything that is not one of these kinds is rejected at
/// the write boundary, so readers can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// State could not be determined.
    Unknown,
    /// Queued for installation, not yet attempted.
    Pending,
    /// Installed successfully.
    Installed,
    /// Installation was attempted and failed.
    Failed,
}

impl StatusKind {
    /// Every status kind, in declaration order.
    pub const ALL: [StatusKind; 4] = [
        StatusKind::Unknown,
        StatusKind::Pending,
        StatusKind::Installed,
        StatusKind::Failed,
    ];

    /// The stable lowercase text form, also used on disk.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Installed => "installed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = ValidationError;

    /// Parse the exact lowercase form. No case folding or trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "pending" => Ok(Self::Pending),
            "installed" => Ok(Self::Installed),
            "failed" => Ok(Self::Failed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}
