//! Proptest generators for property-based testing.

use proptest::prelude::*;

use policy_status_core::StatusKind;
use policy_status_store::StatusStore;

/// Generate a StatusKind.
pub fn status_kind() -> impl Strategy<Value = StatusKind> {
    prop::sample::select(StatusKind::ALL.to_vec())
}

/// Generate a policy name.
///
/// Mostly drawn from a small alphabet so that sequences of operations hit
/// the same keys; occasionally arbitrary non-empty text.
pub fn policy_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-d]{1,2}",
        1 => "\\PC{1,24}",
    ]
}

/// Generate a diagnostic message, including the empty one.
pub fn message() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "\\PC{0,128}",
        "[ -~\n\t]{0,64}",
    ]
}

/// A single mutation against a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOp {
    Put {
        policy: String,
        status: StatusKind,
        message: String,
    },
    Remove {
        policy: String,
    },
}

impl StatusOp {
    /// Apply this operation to `store`.
    pub fn apply<S: StatusStore + ?Sized>(&self, store: &S) -> policy_status_store::Result<()> {
        match self {
            StatusOp::Put {
                policy,
                status,
                message,
            } => store.put_status(policy, *status, message),
            StatusOp::Remove { policy } => store.remove(policy),
        }
    }

    /// The policy this operation touches.
    pub fn policy(&self) -> &str {
        match self {
            StatusOp::Put { policy, .. } | StatusOp::Remove { policy } => policy,
        }
    }
}

impl Arbitrary for StatusOp {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            3 => (policy_name(), status_kind(), message()).prop_map(|(policy, status, message)| {
                StatusOp::Put {
                    policy,
                    status,
                    message,
                }
            }),
            1 => policy_name().prop_map(|policy| StatusOp::Remove { policy }),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_status_core::validate_policy_name;

    proptest! {
        #[test]
        fn generated_names_are_valid(name in policy_name()) {
            prop_assert!(validate_policy_name(&name).is_ok());
        }

        #[test]
        fn generated_ops_apply_cleanly(ops in prop::collection::vec(any::<StatusOp>(), 0..16)) {
            let store = policy_status_store::MemoryStatusStore::new();
            for op in &ops {
                prop_assert!(op.apply(&store).is_ok(), "{:?}", op);
            }
        }
    }
}
