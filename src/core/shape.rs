//! Bridge between ordinary Rust values and [`ValueNode`] trees.
//!
//! Validation runs on a node tree; [`Validatable::absorb`] then commits any
//! rewritten scalars back into the typed value.

use super::value::{Scalar, ValueNode};
use crate::engine::ContractError;

/// A Rust value that can be validated.
///
/// Implemented for the common scalar types, `Vec<T>`, `Option<T>` and
/// `Box<T>`. Record structs get an implementation from
/// [`validated_record!`](crate::validated_record).
pub trait Validatable {
    /// Snapshot the value as a node tree.
    fn to_node(&self) -> ValueNode;

    /// Write a (possibly rewritten) node tree back into the value.
    ///
    /// The node must have the shape produced by [`Validatable::to_node`].
    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError>;
}

fn mismatch(expected: &'static str, found: &ValueNode) -> ContractError {
    ContractError::ShapeMismatch {
        expected,
        found: found.shape(),
    }
}

macro_rules! int_validatable {
    ($($ty:ty),*) => {
        $(
            impl Validatable for $ty {
                fn to_node(&self) -> ValueNode {
                    ValueNode::Scalar(Scalar::Int(i64::from(*self)))
                }

                fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
                    match node {
                        ValueNode::Scalar(Scalar::Int(v)) => {
                            *self = <$ty>::try_from(v).map_err(|_| ContractError::OutOfRange {
                                value: v,
                                target: stringify!($ty),
                            })?;
                            Ok(())
                        }
                        other => Err(mismatch("int", &other)),
                    }
                }
            }
        )*
    };
}

int_validatable!(i8, i16, i32, i64, u8, u16, u32);

impl Validatable for f64 {
    fn to_node(&self) -> ValueNode {
        ValueNode::Scalar(Scalar::Float(*self))
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match node {
            ValueNode::Scalar(Scalar::Float(v)) => {
                *self = v;
                Ok(())
            }
            other => Err(mismatch("float", &other)),
        }
    }
}

impl Validatable for bool {
    fn to_node(&self) -> ValueNode {
        ValueNode::Scalar(Scalar::Bool(*self))
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match node {
            ValueNode::Scalar(Scalar::Bool(v)) => {
                *self = v;
                Ok(())
            }
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl Validatable for String {
    fn to_node(&self) -> ValueNode {
        ValueNode::Scalar(Scalar::Str(self.clone()))
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match node {
            ValueNode::Scalar(Scalar::Str(v)) => {
                *self = v;
                Ok(())
            }
            other => Err(mismatch("string", &other)),
        }
    }
}

impl<T: Validatable> Validatable for Vec<T> {
    fn to_node(&self) -> ValueNode {
        ValueNode::Sequence(self.iter().map(Validatable::to_node).collect())
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match node {
            ValueNode::Sequence(items) if items.len() == self.len() => self
                .iter_mut()
                .zip(items)
                .try_for_each(|(slot, item)| slot.absorb(item)),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

impl<T: Validatable> Validatable for Option<T> {
    fn to_node(&self) -> ValueNode {
        ValueNode::Indirection(self.as_ref().map(|v| Box::new(v.to_node())))
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match (self.as_mut(), node) {
            (None, ValueNode::Indirection(None)) => Ok(()),
            (Some(inner), ValueNode::Indirection(Some(target))) => inner.absorb(*target),
            (_, other) => Err(mismatch("indirection", &other)),
        }
    }
}

impl<T: Validatable> Validatable for Box<T> {
    fn to_node(&self) -> ValueNode {
        ValueNode::Indirection(Some(Box::new(self.as_ref().to_node())))
    }

    fn absorb(&mut self, node: ValueNode) -> Result<(), ContractError> {
        match node {
            ValueNode::Indirection(Some(target)) => self.as_mut().absorb(*target),
            other => Err(mismatch("indirection", &other)),
        }
    }
}
