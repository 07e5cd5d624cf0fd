//! The rule contract shared by the dispatcher and every rule.

use crate::core::{FieldMetadata, Scalar};
use crate::engine::FailureKind;

/// What the dispatcher hands a rule besides the value: the field's
/// identifier and its read-only metadata.
#[derive(Clone, Copy, Debug)]
pub struct FieldContext<'a> {
    pub field: &'a str,
    pub metadata: &'a FieldMetadata,
}

impl<'a> FieldContext<'a> {
    pub fn new(field: &'a str, metadata: &'a FieldMetadata) -> Self {
        Self { field, metadata }
    }

    /// Metadata `name`, falling back to the field identifier.
    pub fn label(&self) -> &'a str {
        self.metadata.label(self.field)
    }

    pub fn param(&self, key: &str) -> Option<&'a str> {
        self.metadata.get(key)
    }
}

/// Why a rule rejected a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleFailure {
    pub reason: String,
    pub kind: FailureKind,
}

impl RuleFailure {
    pub fn violation(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            kind: FailureKind::Violation,
        }
    }

    pub fn misconfigured(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            kind: FailureKind::Misconfiguration,
        }
    }
}

/// Whether the rule wants the field value replaced.
#[derive(Clone, Debug, PartialEq)]
pub enum Rewrite {
    Unchanged,
    Replaced(Scalar),
}

/// Pass or fail.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(RuleFailure),
}

/// Uniform result of a rule invocation.
///
/// A rewrite and a verdict are independent: a rule may clean a value and
/// still reject it. The engine commits `Replaced` values before it looks at
/// the verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleOutcome {
    pub rewrite: Rewrite,
    pub verdict: Verdict,
}

impl RuleOutcome {
    pub fn pass() -> Self {
        Self {
            rewrite: Rewrite::Unchanged,
            verdict: Verdict::Pass,
        }
    }

    pub fn violation(reason: impl Into<String>) -> Self {
        Self::failed(RuleFailure::violation(reason))
    }

    pub fn misconfigured(reason: impl Into<String>) -> Self {
        Self::failed(RuleFailure::misconfigured(reason))
    }

    pub fn failed(failure: RuleFailure) -> Self {
        Self {
            rewrite: Rewrite::Unchanged,
            verdict: Verdict::Fail(failure),
        }
    }

    /// Attach a replacement value.
    pub fn rewriting(mut self, value: impl Into<Scalar>) -> Self {
        self.rewrite = Rewrite::Replaced(value.into());
        self
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    pub fn failure(&self) -> Option<&RuleFailure> {
        match &self.verdict {
            Verdict::Fail(failure) => Some(failure),
            Verdict::Pass => None,
        }
    }
}

/// Check-only rules: no rewrite.
impl From<Result<(), RuleFailure>> for RuleOutcome {
    fn from(result: Result<(), RuleFailure>) -> Self {
        match result {
            Ok(()) => Self::pass(),
            Err(failure) => Self::failed(failure),
        }
    }
}

/// Clean-and-check rules: always rewrite to the returned value.
impl From<(Scalar, Result<(), RuleFailure>)> for RuleOutcome {
    fn from((value, result): (Scalar, Result<(), RuleFailure>)) -> Self {
        Self::from(result).rewriting(value)
    }
}

/// A named validation rule.
///
/// Rules are stateless with respect to traversal: they see one scalar and
/// its field context, never sibling fields.
///
/// # Example
///
/// ```rust
/// use fieldguard::core::Scalar;
/// use fieldguard::rules::{FieldContext, Rule, RuleOutcome};
///
/// struct Even;
///
/// impl Rule for Even {
///     fn apply(&self, value: &Scalar, _field: &FieldContext<'_>) -> RuleOutcome {
///         match value.as_int() {
///             Some(v) if v % 2 == 0 => RuleOutcome::pass(),
///             Some(_) => RuleOutcome::violation("must be even"),
///             None => RuleOutcome::misconfigured("type must be int"),
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    fn apply(&self, value: &Scalar, field: &FieldContext<'_>) -> RuleOutcome;
}

/// Adapter turning a closure into a [`Rule`].
pub(crate) struct FnRule<F>(pub(crate) F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&Scalar, &FieldContext<'_>) -> RuleOutcome + Send + Sync,
{
    fn apply(&self, value: &Scalar, field: &FieldContext<'_>) -> RuleOutcome {
        (self.0)(value, field)
    }
}
