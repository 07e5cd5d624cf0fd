//! Property-based tests for the built-in rules and the traversal engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use fieldguard::core::{FieldMetadata, Record, RecordDecl, ValueNode};
use fieldguard::engine::Validator;
use fieldguard::rules::RuleOutcome;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn single_field(field: &str, metadata: FieldMetadata, value: impl Into<ValueNode>) -> ValueNode {
    let decl = Arc::new(RecordDecl::new("Single").field_with(field, metadata));
    ValueNode::Record(Record::new(decl).set(field, value))
}

fn cleaned_len(s: &str) -> usize {
    s.chars()
        .filter(|c| !matches!(c, '\'' | ' ' | '\\' | '"'))
        .count()
}

prop_compose! {
    fn arbitrary_bounds()(a in -50i64..50, b in -50i64..50) -> (i64, i64) {
        (a.min(b), a.max(b))
    }
}

prop_compose! {
    fn noisy_string()(parts in prop::collection::vec(prop_oneof![
        Just("a".to_string()),
        Just("z".to_string()),
        Just(" ".to_string()),
        Just("'".to_string()),
        Just("\"".to_string()),
        Just("\\".to_string()),
        Just("é".to_string()),
        Just("\u{3000}".to_string()),
    ], 0..12)) -> String {
        parts.concat()
    }
}

proptest! {
    #[test]
    fn pos_no_accepts_exactly_positive_values(value in any::<i64>()) {
        let meta = FieldMetadata::new().with("valid", "PosNO").with("name", "items");
        let mut node = single_field("item_num", meta, value);

        let result = Validator::standard().validate(&mut node);
        if value > 0 {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert!(err.to_string().starts_with("items:"));
        }
    }

    #[test]
    fn int_val_bounds_are_inclusive((min, max) in arbitrary_bounds(), value in -60i64..60) {
        let meta = FieldMetadata::new()
            .with("valid", "IntVal")
            .with("range", format!("{min},{max}"));
        let mut node = single_field("n", meta, value);

        let result = Validator::standard().validate(&mut node);
        prop_assert_eq!(result.is_ok(), (min..=max).contains(&value));
    }

    #[test]
    fn inverted_length_bounds_always_fail((min, max) in arbitrary_bounds(), input in noisy_string()) {
        prop_assume!(min < max);
        let meta = FieldMetadata::new()
            .with("valid", "Str")
            .with("len", format!("{max},{min}"));
        let mut node = single_field("s", meta, input.as_str());

        let err = Validator::standard().validate(&mut node).unwrap_err();
        prop_assert!(err.is_misconfiguration());
        // Misconfigured rules never rewrite.
        let stored = node.as_record().and_then(|r| r.get("s")).cloned();
        prop_assert_eq!(stored, Some(ValueNode::from(input.as_str())));
    }

    #[test]
    fn str_length_is_measured_after_cleaning(
        input in noisy_string(),
        min in 0i64..6,
        span in 0i64..6,
    ) {
        let max = min + span;
        let meta = FieldMetadata::new()
            .with("valid", "Str")
            .with("len", format!("{min},{max}"));
        let mut node = single_field("s", meta, input.as_str());

        let len = cleaned_len(&input) as i64;
        let result = Validator::standard().validate(&mut node);
        prop_assert_eq!(result.is_ok(), (min..=max).contains(&len));
    }

    #[test]
    fn sequence_evaluation_stops_at_first_failure(
        len in 1usize..20,
        fail_at in 0usize..20,
    ) {
        prop_assume!(fail_at < len);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let validator = Validator::builder()
            .with_builtin_rules()
            .rule_fn("Count", move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                RuleOutcome::pass()
            })
            .build()
            .unwrap();

        let decl = Arc::new(RecordDecl::new("Line").field_with(
            "qty",
            FieldMetadata::new().with("valid", "Count,PosNO"),
        ));
        let lines: Vec<ValueNode> = (0..len)
            .map(|i| {
                let qty = if i == fail_at { -1i64 } else { 1 };
                ValueNode::Record(Record::new(Arc::clone(&decl)).set("qty", qty))
            })
            .collect();
        let mut node = ValueNode::Sequence(lines);

        let err = validator.validate(&mut node).unwrap_err();
        prop_assert_eq!(err.path, format!("[{fail_at}].qty"));
        prop_assert_eq!(calls.load(Ordering::SeqCst), fail_at + 1);
    }

    #[test]
    fn validation_is_deterministic(value in any::<i64>()) {
        let meta = FieldMetadata::new().with("valid", "CardType");
        let mut first = single_field("card", meta.clone(), value);
        let mut second = single_field("card", meta, value);

        let validator = Validator::standard();
        prop_assert_eq!(validator.validate(&mut first), validator.validate(&mut second));
    }
}
