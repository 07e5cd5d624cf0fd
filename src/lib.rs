//! Fieldguard: declarative per-field validation
//!
//! Fieldguard walks arbitrary nested values (records, sequences, nullable
//! indirections) and runs the rules each field declares in its metadata.
//! The first failing rule ends the walk with a single `"<label>:<reason>"`
//! error. Rules may also rewrite the value they check, and the rewrite is
//! committed back into the caller's value.
//!
//! # Core Concepts
//!
//! - **Value nodes**: a closed tree of scalars, sequences, indirections and records
//! - **Field metadata**: string annotations such as `valid`, `name`, `len`, `range`
//! - **Rules**: named checks looked up in an explicit registry
//! - **Validator**: the traversal engine holding the immutable registry
//!
//! # Example
//!
//! ```rust
//! use fieldguard::engine::Validator;
//! use fieldguard::validated_record;
//!
//! validated_record! {
//!     #[derive(Debug)]
//!     struct Account {
//!         #[check(valid = "Str", name = "login", len = "3,12")]
//!         login: String,
//!         #[check(valid = "IntVal", name = "age", range = "18,130")]
//!         age: i32,
//!     }
//! }
//!
//! let validator = Validator::standard();
//!
//! let mut account = Account { login: " 'root' ".to_string(), age: 30 };
//! validator.validate_data(&mut account).unwrap();
//! assert_eq!(account.login, "root");
//!
//! account.age = 12;
//! let err = validator.validate_data(&mut account).unwrap_err();
//! assert_eq!(err.to_string(), "age:value out of range!");
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod rules;

// Re-export commonly used types
pub use builder::{BuildError, ValidatorBuilder};
pub use self::core::{FieldMetadata, Record, RecordDecl, Scalar, Validatable, ValueNode};
pub use engine::{ContractError, FailureKind, FieldError, Validator};
pub use rules::{FieldContext, Rule, RuleOutcome, RuleRegistry};
