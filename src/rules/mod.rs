//! Rule contract, registry and built-in rule set.
//!
//! A rule is looked up by name in an explicit [`RuleRegistry`] that is
//! populated once at start-up. Every rule answers with the same
//! [`RuleOutcome`] shape: an optional replacement value plus a verdict.
//!
//! # Example
//!
//! ```rust
//! use fieldguard::core::{FieldMetadata, Scalar};
//! use fieldguard::rules::{FieldContext, RuleRegistry};
//!
//! let registry = RuleRegistry::standard();
//! let meta = FieldMetadata::new().with("len", "3,5");
//! let field = FieldContext::new("nick", &meta);
//!
//! let outcome = registry.invoke("Str", &Scalar::from("  ab\\"), &field);
//! assert_eq!(outcome.failure().unwrap().reason, "string too short!");
//! ```

pub mod builtin;
mod registry;
mod rule;

pub use registry::{RegistryBuilder, RuleRegistry};
pub use rule::{FieldContext, Rewrite, Rule, RuleFailure, RuleOutcome, Verdict};
