//! The traversal engine.

use super::error::{ContractError, FailureKind, FieldError};
use crate::builder::ValidatorBuilder;
use crate::core::{FieldMetadata, RecordDecl, Scalar, Validatable, ValueNode};
use crate::rules::{FieldContext, Rewrite, RuleRegistry, Verdict};
use std::ops::ControlFlow;
use std::sync::OnceLock;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Receives each field failure and decides whether the walk goes on.
type FailureSink<'s> = dyn FnMut(FieldError) -> ControlFlow<()> + 's;

/// Walks value trees and applies the rules declared on their fields.
///
/// The validator holds only the immutable rule registry, so one instance
/// can serve any number of threads. Each call mutates nothing but the
/// value it was handed.
///
/// # Example
///
/// ```rust
/// use fieldguard::core::{FieldMetadata, Record, RecordDecl, ValueNode};
/// use fieldguard::engine::Validator;
/// use std::sync::Arc;
///
/// let decl = Arc::new(
///     RecordDecl::new("Order")
///         .field_with("item_num", FieldMetadata::new().with("valid", "PosNO").with("name", "items"))
///         .field_with("is_count", FieldMetadata::new().with("valid", "PosNO")),
/// );
///
/// let mut order = ValueNode::Record(Record::new(decl).set("item_num", -1i64).set("is_count", 1i64));
///
/// let err = Validator::standard().validate(&mut order).unwrap_err();
/// assert_eq!(err.to_string(), "items:cannot be negative!");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: RuleRegistry,
}

impl Validator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Validator over the built-in rules.
    pub fn standard() -> Self {
        Self::new(RuleRegistry::standard())
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Process-wide validator over the built-in rules, built on first use.
    ///
    /// Prefer constructing a [`Validator`] and passing it around; this is
    /// for call sites that have no way to receive one.
    pub fn shared() -> &'static Validator {
        static SHARED: OnceLock<Validator> = OnceLock::new();
        SHARED.get_or_init(Validator::standard)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate a typed value, committing rule rewrites back into it.
    ///
    /// Rewrites made before a failure stay applied, exactly as if the rules
    /// had written into the value directly.
    ///
    /// # Panics
    ///
    /// Panics on broken declarations: an unregistered rule name, a declared
    /// field with no storage, or a rewrite that changes a field's kind.
    pub fn validate_data<T: Validatable>(&self, value: &mut T) -> Result<(), FieldError> {
        let mut node = value.to_node();
        let result = self.validate(&mut node);
        if let Err(err) = value.absorb(node) {
            tracing::error!(error = %err, "rewritten value does not fit its field");
            panic!("{err}");
        }
        result
    }

    /// Validate a node tree in place. The first failing field wins.
    ///
    /// A top-level scalar carries no metadata and is accepted as is.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Validator::validate_data`].
    pub fn validate(&self, node: &mut ValueNode) -> Result<(), FieldError> {
        let mut first = None;
        self.walk_root(node, &mut |err| {
            first = Some(err);
            ControlFlow::Break(())
        });
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validate a node tree, collecting the first failure of every field.
    ///
    /// Within a field, rules still stop at the first failure; across fields
    /// the walk continues. Failures come back in traversal order.
    pub fn validate_all(&self, node: &mut ValueNode) -> Validation<(), NonEmptyVec<FieldError>> {
        let mut errors = Vec::new();
        self.walk_root(node, &mut |err| {
            errors.push(err);
            ControlFlow::Continue(())
        });

        let checks: Vec<Validation<(), NonEmptyVec<FieldError>>> =
            errors.into_iter().map(|err| Validation::fail(err)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Resolve every rule name a declaration uses without validating data.
    pub fn check_declaration(&self, decl: &RecordDecl) -> Result<(), ContractError> {
        for field in &decl.fields {
            for rule in field.metadata.rules() {
                self.registry.resolve(rule, &field.name)?;
            }
        }
        Ok(())
    }

    fn walk_root(&self, node: &mut ValueNode, sink: &mut FailureSink<'_>) {
        if let ValueNode::Scalar(_) = node {
            tracing::trace!("top-level scalar has no declared rules");
            return;
        }
        let root = FieldMetadata::new();
        let mut path = FieldPath::default();
        let _ = self.walk(node, FieldContext::new("", &root), &mut path, sink);
    }

    fn walk(
        &self,
        node: &mut ValueNode,
        field: FieldContext<'_>,
        path: &mut FieldPath,
        sink: &mut FailureSink<'_>,
    ) -> ControlFlow<()> {
        match node {
            ValueNode::Sequence(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    path.push_index(index);
                    let flow = self.walk(item, field, path, sink);
                    path.pop();
                    if flow.is_break() {
                        return flow;
                    }
                }
                ControlFlow::Continue(())
            }
            ValueNode::Indirection(None) => ControlFlow::Continue(()),
            ValueNode::Indirection(Some(target)) => self.walk(target, field, path, sink),
            ValueNode::Record(record) => {
                let (decl, storage) = record.parts_mut();
                tracing::trace!(record = %decl.name, path = %path, "entering record");

                for declared in &decl.fields {
                    let Some(value) = storage.get_mut(&declared.name) else {
                        let err = ContractError::MissingStorage {
                            record: decl.name.clone(),
                            field: declared.name.clone(),
                        };
                        tracing::error!(error = %err, "declaration does not match storage");
                        panic!("{err}");
                    };

                    path.push_field(&declared.name);
                    let context = FieldContext::new(&declared.name, &declared.metadata);
                    let flow = self.walk(value, context, path, sink);
                    path.pop();
                    if flow.is_break() {
                        return flow;
                    }
                }
                ControlFlow::Continue(())
            }
            ValueNode::Scalar(scalar) => self.apply_rules(scalar, field, path, sink),
        }
    }

    fn apply_rules(
        &self,
        scalar: &mut Scalar,
        field: FieldContext<'_>,
        path: &FieldPath,
        sink: &mut FailureSink<'_>,
    ) -> ControlFlow<()> {
        for rule in field.metadata.rules() {
            tracing::debug!(rule, field = field.field, path = %path, "applying rule");
            let outcome = self.registry.invoke(rule, scalar, &field);

            if let Rewrite::Replaced(value) = outcome.rewrite {
                if !value.same_kind(scalar) {
                    let err = ContractError::RewriteKindChanged {
                        rule: rule.to_string(),
                        field: field.field.to_string(),
                        expected: scalar.kind(),
                        found: value.kind(),
                    };
                    tracing::error!(error = %err, "rule changed the kind of a field");
                    panic!("{err}");
                }
                tracing::debug!(rule, field = field.field, from = %scalar, to = %value, "rewriting field");
                *scalar = value;
            }

            if let Verdict::Fail(failure) = outcome.verdict {
                if failure.kind == FailureKind::Misconfiguration {
                    tracing::warn!(
                        rule,
                        field = field.field,
                        reason = %failure.reason,
                        "field declaration is misconfigured"
                    );
                }
                return sink(FieldError {
                    label: field.label().to_string(),
                    reason: failure.reason,
                    kind: failure.kind,
                    path: path.to_string(),
                });
            }
        }
        ControlFlow::Continue(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Dotted/indexed location of the field being visited, e.g. `orders[2].item_num`.
#[derive(Default)]
struct FieldPath {
    buf: String,
    marks: Vec<usize>,
}

impl FieldPath {
    fn push_field(&mut self, name: &str) {
        self.marks.push(self.buf.len());
        if !self.buf.is_empty() {
            self.buf.push('.');
        }
        self.buf.push_str(name);
    }

    fn push_index(&mut self, index: usize) {
        self.marks.push(self.buf.len());
        self.buf.push('[');
        self.buf.push_str(&index.to_string());
        self.buf.push(']');
    }

    fn pop(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.buf.truncate(mark);
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buf)
    }
}
