//! The traversal engine.
//!
//! [`Validator`] walks sequences, indirections and records depth-first,
//! visiting record fields in declaration order and sequence elements in
//! index order. Every scalar it reaches is handed to the rules named in
//! its field's metadata.
//!
//! Failures come in two classes:
//! - [`FieldError`]: a rule rejected a value (or its parameters). Returned.
//! - [`ContractError`]: the declaration itself is broken. The engine panics.

mod error;
mod validator;

pub use error::{ContractError, FailureKind, FieldError};
pub use validator::Validator;
