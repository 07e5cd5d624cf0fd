//! Builder for configuring a validator.

use crate::builder::error::BuildError;
use crate::core::{RecordDecl, Scalar};
use crate::engine::Validator;
use crate::rules::{FieldContext, RegistryBuilder, Rule, RuleOutcome};
use std::sync::Arc;

/// Builder for [`Validator`] with a fluent API.
///
/// Declarations passed to [`ValidatorBuilder::declare`] are checked against
/// the finished registry, so a field naming an unregistered rule fails the
/// build instead of panicking at the first validation.
///
/// # Example
///
/// ```rust
/// use fieldguard::builder::{BuildError, ValidatorBuilder};
/// use fieldguard::core::{FieldMetadata, RecordDecl};
///
/// let decl = RecordDecl::new("Card")
///     .field_with("kind", FieldMetadata::new().with("valid", "CardType,Luhn"));
///
/// let result = ValidatorBuilder::new()
///     .with_builtin_rules()
///     .declare(decl)
///     .build();
///
/// assert!(matches!(result, Err(BuildError::Declaration(_))));
/// ```
pub struct ValidatorBuilder {
    registry: RegistryBuilder,
    declarations: Vec<Arc<RecordDecl>>,
}

impl ValidatorBuilder {
    /// Create a new builder with an empty rule set.
    pub fn new() -> Self {
        Self {
            registry: RegistryBuilder::new(),
            declarations: Vec::new(),
        }
    }

    /// Register the built-in rules.
    pub fn with_builtin_rules(mut self) -> Self {
        self.registry = self.registry.with_builtin_rules();
        self
    }

    /// Register a rule implementation.
    pub fn rule<R>(mut self, name: impl Into<String>, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.registry = self.registry.rule(name, rule);
        self
    }

    /// Register a closure as a rule.
    pub fn rule_fn<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scalar, &FieldContext<'_>) -> RuleOutcome + Send + Sync + 'static,
    {
        self.registry = self.registry.rule_fn(name, rule);
        self
    }

    /// Check this declaration's rule names when building.
    pub fn declare(mut self, decl: impl Into<Arc<RecordDecl>>) -> Self {
        self.declarations.push(decl.into());
        self
    }

    /// Build the validator.
    /// Returns an error if the registry is invalid or a declaration names
    /// an unregistered rule.
    pub fn build(self) -> Result<Validator, BuildError> {
        let validator = Validator::new(self.registry.build()?);

        for decl in &self.declarations {
            validator.check_declaration(decl)?;
        }

        Ok(validator)
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
