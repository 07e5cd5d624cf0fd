//! Built-in rules.
//!
//! Each rule reads its own metadata keys (`len` for [`Str`], `range` for
//! [`IntVal`]); the engine does not interpret them.

use super::rule::{FieldContext, Rule, RuleOutcome};
use crate::core::{BoundSide, Bounds, BoundsError, Scalar};
use std::sync::Arc;

pub const POS_NO: &str = "PosNO";
pub const STR: &str = "Str";
pub const INT_VAL: &str = "IntVal";
pub const CARD_TYPE: &str = "CardType";
pub const CARD_STATE: &str = "CardState";
pub const USER_TYPE: &str = "UserType";
pub const USER_STATE: &str = "UserState";
pub const ADD_OR_SUB: &str = "AddOrSub";

/// Metadata key for [`Str`] length bounds.
pub const LEN_KEY: &str = "len";

/// Metadata key for [`IntVal`] value bounds.
pub const RANGE_KEY: &str = "range";

/// Characters [`Str`] removes anywhere in the input.
const STRIPPED: [char; 4] = ['\'', ' ', '\\', '"'];

pub(crate) fn rules() -> Vec<(&'static str, Arc<dyn Rule>)> {
    vec![
        entry(POS_NO, PosNo),
        entry(STR, Str),
        entry(INT_VAL, IntVal),
        entry(
            CARD_TYPE,
            ClosedRange {
                min: 0,
                max: 8,
                reason: "invalid card type",
            },
        ),
        entry(
            CARD_STATE,
            ClosedRange {
                min: 0,
                max: 3,
                reason: "invalid card state",
            },
        ),
        entry(
            USER_TYPE,
            ClosedRange {
                min: 0,
                max: 3,
                reason: "invalid user type",
            },
        ),
        entry(
            USER_STATE,
            ClosedRange {
                min: 0,
                max: 2,
                reason: "invalid user state",
            },
        ),
        entry(
            ADD_OR_SUB,
            OneOf {
                allowed: &[-1, 1],
                type_reason: "add/sub must be int",
                reason: "value must be 1/-1",
            },
        ),
    ]
}

fn entry(name: &'static str, rule: impl Rule + 'static) -> (&'static str, Arc<dyn Rule>) {
    (name, Arc::new(rule))
}

/// Requires a strictly positive integer.
pub struct PosNo;

impl Rule for PosNo {
    fn apply(&self, value: &Scalar, _field: &FieldContext<'_>) -> RuleOutcome {
        match value.as_int() {
            Some(v) if v > 0 => RuleOutcome::pass(),
            Some(_) => RuleOutcome::violation("cannot be negative!"),
            None => RuleOutcome::misconfigured("type must be int"),
        }
    }
}

/// Cleans a string and enforces the `len` bounds on the cleaned text.
///
/// The cleaned text is written back even when the length check fails.
/// Broken `len` parameters leave the field untouched.
pub struct Str;

impl Str {
    pub fn clean(raw: &str) -> String {
        raw.chars().filter(|c| !STRIPPED.contains(c)).collect()
    }
}

impl Rule for Str {
    fn apply(&self, value: &Scalar, field: &FieldContext<'_>) -> RuleOutcome {
        let Some(raw) = value.as_str() else {
            return RuleOutcome::misconfigured("type must be string");
        };

        let bounds = match Bounds::parse(field.param(LEN_KEY).unwrap_or("")) {
            Ok(bounds) => bounds,
            Err(BoundsError::Unparsable {
                side: BoundSide::Min,
                ..
            }) => return RuleOutcome::misconfigured("invalid minimum length parameter!"),
            Err(BoundsError::Unparsable {
                side: BoundSide::Max,
                ..
            }) => return RuleOutcome::misconfigured("invalid maximum length parameter!"),
            Err(BoundsError::Inverted { .. }) => {
                return RuleOutcome::misconfigured("minimum and maximum length conflict!")
            }
        };

        let cleaned = Str::clean(raw);
        let len = i64::try_from(cleaned.chars().count()).unwrap_or(i64::MAX);

        let outcome = if bounds.min.is_some_and(|min| len < min) {
            RuleOutcome::violation("string too short!")
        } else if bounds.max.is_some_and(|max| len > max) {
            RuleOutcome::violation("string too long!")
        } else {
            RuleOutcome::pass()
        };

        if cleaned == raw {
            outcome
        } else {
            outcome.rewriting(cleaned)
        }
    }
}

/// Enforces inclusive `range` bounds. Fields without `range` always pass.
pub struct IntVal;

impl Rule for IntVal {
    fn apply(&self, value: &Scalar, field: &FieldContext<'_>) -> RuleOutcome {
        let Some(raw) = field.param(RANGE_KEY).filter(|r| !r.is_empty()) else {
            return RuleOutcome::pass();
        };
        let Some(v) = value.as_int() else {
            return RuleOutcome::misconfigured("must be int");
        };

        match Bounds::parse(raw) {
            Ok(bounds) if bounds.contains(v) => RuleOutcome::pass(),
            Ok(_) => RuleOutcome::violation("value out of range!"),
            Err(BoundsError::Unparsable {
                side: BoundSide::Min,
                ..
            }) => RuleOutcome::misconfigured("failed to parse minimum!"),
            Err(BoundsError::Unparsable {
                side: BoundSide::Max,
                ..
            }) => RuleOutcome::misconfigured("failed to parse maximum!"),
            Err(BoundsError::Inverted { .. }) => {
                RuleOutcome::misconfigured("minimum and maximum conflict!")
            }
        }
    }
}

/// Fixed inclusive integer range with a rule-specific reason.
pub struct ClosedRange {
    pub min: i64,
    pub max: i64,
    pub reason: &'static str,
}

impl Rule for ClosedRange {
    fn apply(&self, value: &Scalar, _field: &FieldContext<'_>) -> RuleOutcome {
        match value.as_int() {
            Some(v) if (self.min..=self.max).contains(&v) => RuleOutcome::pass(),
            Some(_) => RuleOutcome::violation(self.reason),
            None => RuleOutcome::misconfigured("type must be int"),
        }
    }
}

/// Fixed set of allowed integers.
pub struct OneOf {
    pub allowed: &'static [i64],
    pub type_reason: &'static str,
    pub reason: &'static str,
}

impl Rule for OneOf {
    fn apply(&self, value: &Scalar, _field: &FieldContext<'_>) -> RuleOutcome {
        match value.as_int() {
            Some(v) if self.allowed.contains(&v) => RuleOutcome::pass(),
            Some(_) => RuleOutcome::violation(self.reason),
            None => RuleOutcome::misconfigured(self.type_reason),
        }
    }
}
