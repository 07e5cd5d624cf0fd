//! Name-to-rule registry and its builder.

use super::builtin;
use super::rule::{FieldContext, FnRule, Rule, RuleOutcome};
use crate::builder::BuildError;
use crate::core::Scalar;
use crate::engine::ContractError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable mapping from rule name to implementation.
///
/// Built once with [`RegistryBuilder`] and only read afterwards, so it can
/// be shared freely between threads.
///
/// # Example
///
/// ```rust
/// use fieldguard::rules::{RuleOutcome, RuleRegistry};
///
/// let registry = RuleRegistry::builder()
///     .with_builtin_rules()
///     .rule_fn("NonZero", |value, _field| match value.as_int() {
///         Some(0) => RuleOutcome::violation("must not be zero"),
///         _ => RuleOutcome::pass(),
///     })
///     .build()
///     .unwrap();
///
/// assert!(registry.contains("PosNO"));
/// assert!(registry.contains("NonZero"));
/// ```
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding only the built-in rules.
    pub fn standard() -> Self {
        let mut rules: HashMap<String, Arc<dyn Rule>> = HashMap::new();
        for (name, rule) in builtin::rules() {
            rules.insert(name.to_string(), rule);
        }
        Self { rules }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a rule declared on `field`.
    pub fn resolve(&self, name: &str, field: &str) -> Result<&dyn Rule, ContractError> {
        self.rules
            .get(name)
            .map(|rule| rule.as_ref())
            .ok_or_else(|| ContractError::UnknownRule {
                rule: name.to_string(),
                field: field.to_string(),
            })
    }

    /// Invoke a rule by name.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not registered. A field that declares a rule
    /// nobody registered is a broken declaration, never a valid field.
    pub fn invoke(&self, name: &str, value: &Scalar, field: &FieldContext<'_>) -> RuleOutcome {
        match self.resolve(name, field.field) {
            Ok(rule) => rule.apply(value, field),
            Err(err) => {
                tracing::error!(rule = name, field = field.field, "unregistered rule");
                panic!("{err}");
            }
        }
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

/// Builder for [`RuleRegistry`].
pub struct RegistryBuilder {
    rules: Vec<(String, Arc<dyn Rule>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register every built-in rule (`PosNO`, `Str`, `IntVal`, ...).
    pub fn with_builtin_rules(mut self) -> Self {
        for (name, rule) in builtin::rules() {
            self.rules.push((name.to_string(), rule));
        }
        self
    }

    /// Register a rule implementation under `name`.
    pub fn rule<R>(mut self, name: impl Into<String>, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.rules.push((name.into(), Arc::new(rule)));
        self
    }

    /// Register a closure under `name`.
    pub fn rule_fn<F>(self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scalar, &FieldContext<'_>) -> RuleOutcome + Send + Sync + 'static,
    {
        self.rule(name, FnRule(rule))
    }

    /// Build the registry.
    /// Returns an error for empty, unreachable or duplicate names.
    pub fn build(self) -> Result<RuleRegistry, BuildError> {
        let mut rules: HashMap<String, Arc<dyn Rule>> = HashMap::with_capacity(self.rules.len());

        for (name, rule) in self.rules {
            if name.is_empty() {
                return Err(BuildError::EmptyRuleName);
            }
            if name.contains(',') || name.chars().any(char::is_whitespace) {
                return Err(BuildError::InvalidRuleName(name));
            }
            if rules.contains_key(&name) {
                return Err(BuildError::DuplicateRule(name));
            }
            rules.insert(name, rule);
        }

        tracing::debug!(rules = rules.len(), "rule registry built");
        Ok(RuleRegistry { rules })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldMetadata;

    #[test]
    fn standard_registry_has_builtin_rules() {
        let registry = RuleRegistry::standard();
        for name in [
            "PosNO",
            "Str",
            "IntVal",
            "CardType",
            "CardState",
            "UserType",
            "UserState",
            "AddOrSub",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn builder_rejects_duplicates() {
        let result = RuleRegistry::builder()
            .with_builtin_rules()
            .rule_fn("PosNO", |_, _| RuleOutcome::pass())
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateRule(name)) if name == "PosNO"));
    }

    #[test]
    fn builder_rejects_unreachable_names() {
        let empty = RuleRegistry::builder()
            .rule_fn("", |_, _| RuleOutcome::pass())
            .build();
        assert!(matches!(empty, Err(BuildError::EmptyRuleName)));

        let comma = RuleRegistry::builder()
            .rule_fn("A,B", |_, _| RuleOutcome::pass())
            .build();
        assert!(matches!(comma, Err(BuildError::InvalidRuleName(_))));
    }

    #[test]
    fn resolve_reports_unknown_rules() {
        let registry = RuleRegistry::standard();
        let err = registry.resolve("Nope", "age").err().unwrap();
        assert_eq!(
            err,
            ContractError::UnknownRule {
                rule: "Nope".to_string(),
                field: "age".to_string()
            }
        );
    }

    #[test]
    fn invoke_dispatches_by_name() {
        let registry = RuleRegistry::standard();
        let meta = FieldMetadata::new().with("name", "items");
        let field = FieldContext::new("item_num", &meta);

        assert!(registry.invoke("PosNO", &Scalar::Int(1), &field).is_pass());
        assert!(!registry.invoke("PosNO", &Scalar::Int(0), &field).is_pass());
    }

    #[test]
    #[should_panic(expected = "rule 'Missing' declared on field 'item_num' is not registered")]
    fn invoke_panics_on_unknown_rule() {
        let registry = RuleRegistry::standard();
        let meta = FieldMetadata::new();
        let field = FieldContext::new("item_num", &meta);
        registry.invoke("Missing", &Scalar::Int(1), &field);
    }

    #[test]
    fn names_are_sorted() {
        let registry = RuleRegistry::builder()
            .rule_fn("b", |_, _| RuleOutcome::pass())
            .rule_fn("a", |_, _| RuleOutcome::pass())
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
