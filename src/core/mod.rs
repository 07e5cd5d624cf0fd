//! Core value model for declarative validation.
//!
//! This module contains the data the validator walks:
//! - Scalars, sequences, indirections and records via `ValueNode`
//! - Record declarations carrying per-field metadata
//! - The `Validatable` bridge from ordinary Rust values
//!
//! Nothing in this module performs validation itself.

mod metadata;
mod shape;
mod value;

pub use metadata::{BoundSide, Bounds, BoundsError, FieldMetadata, LABEL_KEY, RULES_KEY};
pub use shape::Validatable;
pub use value::{FieldDecl, Record, RecordDecl, Scalar, ValueNode};
