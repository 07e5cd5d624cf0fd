//! Build errors for rule registries and validators.

use crate::engine::ContractError;
use thiserror::Error;

/// Errors that can occur when building registries and validators.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Rule name is empty. Register rules under a non-empty name")]
    EmptyRuleName,

    #[error("Rule name '{0}' contains ',' or whitespace and can never be referenced")]
    InvalidRuleName(String),

    #[error("Rule '{0}' is registered more than once")]
    DuplicateRule(String),

    #[error("Declaration check failed: {0}")]
    Declaration(#[from] ContractError),
}
