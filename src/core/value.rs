//! The value model walked by the validator.
//!
//! A validated value is a tree of [`ValueNode`]s. Records pair their
//! storage with a shared [`RecordDecl`] so the walker only ever enters
//! fields that were declared.

use super::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A terminal field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Scalar {
    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn same_kind(&self, other: &Scalar) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A declared field: its identifier and metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(default)]
    pub metadata: FieldMetadata,
}

/// The declaration of a record type, in field declaration order.
///
/// Declarations can be written by hand, generated by
/// [`validated_record!`](crate::validated_record), or loaded from JSON:
///
/// ```rust
/// use fieldguard::core::RecordDecl;
///
/// let decl = RecordDecl::from_json(r#"{
///     "name": "Order",
///     "fields": [
///         { "name": "item_num", "metadata": { "valid": "PosNO", "name": "items" } },
///         { "name": "note" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(decl.fields.len(), 2);
/// assert_eq!(decl.field("item_num").unwrap().metadata.get("name"), Some("items"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl RecordDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field declaration.
    pub fn field_with(mut self, name: impl Into<String>, metadata: FieldMetadata) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            metadata,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Record storage bound to its declaration.
///
/// Serialized records carry their declaration inline; a deserialized
/// record owns a fresh copy of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    decl: Arc<RecordDecl>,
    values: BTreeMap<String, ValueNode>,
}

impl Record {
    pub fn new(decl: Arc<RecordDecl>) -> Self {
        Self {
            decl,
            values: BTreeMap::new(),
        }
    }

    /// Store a field value. Storage is not checked against the
    /// declaration; undeclared entries are simply never visited.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<ValueNode>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn decl(&self) -> &Arc<RecordDecl> {
        &self.decl
    }

    pub fn get(&self, field: &str) -> Option<&ValueNode> {
        self.values.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut ValueNode> {
        self.values.get_mut(field)
    }

    pub fn take(&mut self, field: &str) -> Option<ValueNode> {
        self.values.remove(field)
    }

    /// Split into the declaration and mutable storage so the walker can
    /// read metadata while writing into field values.
    pub(crate) fn parts_mut(&mut self) -> (&RecordDecl, &mut BTreeMap<String, ValueNode>) {
        (self.decl.as_ref(), &mut self.values)
    }
}

/// One node of a value tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueNode {
    Scalar(Scalar),
    Sequence(Vec<ValueNode>),
    /// A single-level nullable reference.
    Indirection(Option<Box<ValueNode>>),
    Record(Record),
}

impl ValueNode {
    pub fn null() -> Self {
        Self::Indirection(None)
    }

    pub fn to(node: impl Into<ValueNode>) -> Self {
        Self::Indirection(Some(Box::new(node.into())))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Indirection(_) => "indirection",
            Self::Record(_) => "record",
        }
    }
}

impl From<Scalar> for ValueNode {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

macro_rules! scalar_node_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ValueNode {
                fn from(v: $ty) -> Self {
                    Self::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_node_from!(i64, f64, bool, &str, String);

impl From<Record> for ValueNode {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

impl From<Vec<ValueNode>> for ValueNode {
    fn from(items: Vec<ValueNode>) -> Self {
        Self::Sequence(items)
    }
}
