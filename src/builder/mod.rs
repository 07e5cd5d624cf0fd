//! Builder API for validator construction and record declaration.
//!
//! This module provides the fluent validator builder, its error type, and
//! the `validated_record!` macro that declares a struct together with the
//! metadata of its fields.

pub mod error;
pub mod macros;
pub mod validator;

pub use error::BuildError;
pub use validator::ValidatorBuilder;
