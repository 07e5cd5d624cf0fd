//! Validation and contract error types.

use thiserror::Error;

/// How a field failure should be read by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The value broke a declared constraint.
    Violation,

    /// The declaration itself is broken (bad bounds, wrong value type for
    /// the rule). Reported like a violation, but it is a development-time
    /// bug rather than bad input.
    Misconfiguration,
}

/// The single error returned by a failed validation.
///
/// Displays as `"<label>:<reason>"`. The reason wording comes from the
/// rule; the engine only attaches the field path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{label}:{reason}")]
pub struct FieldError {
    pub label: String,
    pub reason: String,
    pub kind: FailureKind,
    /// Location of the failing field inside the validated value,
    /// e.g. `orders[2].item_num`.
    pub path: String,
}

impl FieldError {
    pub fn is_misconfiguration(&self) -> bool {
        self.kind == FailureKind::Misconfiguration
    }
}

/// Broken declarations. These are never validation outcomes: the engine
/// panics with the message when it meets one during traversal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("rule '{rule}' declared on field '{field}' is not registered")]
    UnknownRule { rule: String, field: String },

    #[error("declared field '{field}' of record '{record}' has no storage")]
    MissingStorage { record: String, field: String },

    #[error("rule '{rule}' rewrote field '{field}' from {expected} to {found}")]
    RewriteKindChanged {
        rule: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected {expected} node, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("rewritten value {value} does not fit in {target}")]
    OutOfRange { value: i64, target: &'static str },
}
