//! End-to-end validation of declared records through the public API.

use fieldguard::core::{FieldMetadata, Record, RecordDecl, ValueNode};
use fieldguard::engine::{FailureKind, Validator};
use fieldguard::rules::RuleOutcome;
use fieldguard::validated_record;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stillwater::validation::Validation;

validated_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        #[check(valid = "PosNO", name = "items")]
        item_num: i64,
        #[check(valid = "PosNO")]
        is_count: i64,
    }
}

validated_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Customer {
        #[check(valid = "Str", name = "customer name", len = "3,5")]
        name: String,
        #[check(valid = "UserType", name = "user type")]
        user_type: u8,
        orders: Vec<Order>,
        referrer: Option<Box<Customer>>,
    }
}

fn customer(name: &str, orders: Vec<Order>) -> Customer {
    Customer {
        name: name.to_string(),
        user_type: 1,
        orders,
        referrer: None,
    }
}

#[test]
fn negative_item_count_reports_labelled_error() {
    let mut order = Order {
        item_num: -1,
        is_count: 1,
    };

    let err = Validator::shared().validate_data(&mut order).unwrap_err();
    assert_eq!(err.to_string(), "items:cannot be negative!");
    assert_eq!(err.kind, FailureKind::Violation);
}

#[test]
fn valid_order_passes() {
    let mut order = Order {
        item_num: 1,
        is_count: 1,
    };
    assert!(Validator::shared().validate_data(&mut order).is_ok());
}

#[test]
fn later_fields_are_not_evaluated_after_a_failure() {
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

    let decl = Arc::new(
        RecordDecl::new("Order")
            .field_with(
                "item_num",
                FieldMetadata::new()
                    .with("valid", "PosNO")
                    .with("name", "items"),
            )
            .field_with("is_count", FieldMetadata::new().with("valid", "Count")),
    );
    let mut node = ValueNode::Record(
        Record::new(decl)
            .set("item_num", -1i64)
            .set("is_count", 1i64),
    );

    let err = validator.validate(&mut node).unwrap_err();
    assert_eq!(err.to_string(), "items:cannot be negative!");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn short_string_fails_after_cleaning() {
    let mut c = customer("  ab\\", vec![]);
    let err = Validator::shared().validate_data(&mut c).unwrap_err();
    assert_eq!(err.to_string(), "customer name:string too short!");
    // The cleaned text is committed even though the length check failed.
    assert_eq!(c.name, "ab");

    let mut ok = customer("abc", vec![]);
    assert!(Validator::shared().validate_data(&mut ok).is_ok());
    assert_eq!(ok.name, "abc");
}

#[test]
fn nested_sequence_errors_carry_their_path() {
    let mut c = customer(
        "alice",
        vec![
            Order {
                item_num: 1,
                is_count: 1,
            },
            Order {
                item_num: 2,
                is_count: 0,
            },
        ],
    );

    let err = Validator::shared().validate_data(&mut c).unwrap_err();
    assert_eq!(err.to_string(), "is_count:cannot be negative!");
    assert_eq!(err.path, "orders[1].is_count");
}

#[test]
fn null_referrer_is_not_visited() {
    let mut c = customer("alice", vec![]);
    assert!(c.referrer.is_none());
    assert!(Validator::shared().validate_data(&mut c).is_ok());
}

#[test]
fn present_referrer_is_validated_and_rewritten() {
    let mut c = customer("alice", vec![]);
    c.referrer = Some(Box::new(customer("'bob'", vec![])));
    Validator::shared().validate_data(&mut c).unwrap();
    assert_eq!(c.referrer.as_ref().map(|r| r.name.as_str()), Some("bob"));

    c.referrer = Some(Box::new(Customer {
        user_type: 9,
        ..customer("carol", vec![])
    }));
    let err = Validator::shared().validate_data(&mut c).unwrap_err();
    assert_eq!(err.to_string(), "user type:invalid user type");
    assert_eq!(err.path, "referrer.user_type");
}

#[test]
fn top_level_sequence_of_records() {
    let mut orders = vec![
        Order {
            item_num: 1,
            is_count: 1,
        },
        Order {
            item_num: 0,
            is_count: 1,
        },
    ];
    let err = Validator::shared().validate_data(&mut orders).unwrap_err();
    assert_eq!(err.path, "[1].item_num");
}

#[test]
fn misconfigured_range_is_reported_as_field_error() {
    let decl = Arc::new(RecordDecl::new("Limits").field_with(
        "level",
        FieldMetadata::new()
            .with("valid", "IntVal")
            .with("name", "level")
            .with("range", "10,1"),
    ));
    let mut node = ValueNode::Record(Record::new(decl).set("level", 5i64));

    let err = Validator::standard().validate(&mut node).unwrap_err();
    assert_eq!(err.to_string(), "level:minimum and maximum conflict!");
    assert!(err.is_misconfiguration());
}

#[test]
fn declarations_loaded_from_json_drive_validation() {
    let decl = RecordDecl::from_json(
        r#"{
            "name": "Card",
            "fields": [
                { "name": "card_type", "metadata": { "valid": "CardType", "name": "card type" } },
                { "name": "delta", "metadata": { "valid": "AddOrSub", "name": "delta" } }
            ]
        }"#,
    )
    .unwrap();
    let decl = Arc::new(decl);

    let mut good = ValueNode::Record(
        Record::new(Arc::clone(&decl))
            .set("card_type", 8i64)
            .set("delta", -1i64),
    );
    assert!(Validator::standard().validate(&mut good).is_ok());

    let mut bad = ValueNode::Record(
        Record::new(decl)
            .set("card_type", 3i64)
            .set("delta", 2i64),
    );
    let err = Validator::standard().validate(&mut bad).unwrap_err();
    assert_eq!(err.to_string(), "delta:value must be 1/-1");
}

#[test]
fn validate_all_reports_each_failing_field() {
    let mut node = ValueNode::Sequence(vec![
        Order {
            item_num: 0,
            is_count: 0,
        },
        Order {
            item_num: 5,
            is_count: 5,
        },
    ]
    .iter()
    .map(fieldguard::Validatable::to_node)
    .collect());

    match Validator::standard().validate_all(&mut node) {
        Validation::Failure(errors) => {
            let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
            assert_eq!(paths, vec!["[0].item_num", "[0].is_count"]);

            let messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
            assert_eq!(
                messages,
                vec!["items:cannot be negative!", "is_count:cannot be negative!"]
            );
        }
        Validation::Success(_) => panic!("Expected failures, got success"),
    }
}

#[test]
fn value_trees_loaded_from_json_are_validated() {
    let mut node = ValueNode::from_json(
        r#"{ "sequence": [
            { "record": {
                "decl": { "name": "Line", "fields": [
                    { "name": "qty", "metadata": { "valid": "PosNO", "name": "quantity" } }
                ] },
                "values": { "qty": { "scalar": 0 } }
            } }
        ] }"#,
    )
    .unwrap();

    let err = Validator::standard().validate(&mut node).unwrap_err();
    assert_eq!(err.to_string(), "quantity:cannot be negative!");
    assert_eq!(err.path, "[0].qty");
}
