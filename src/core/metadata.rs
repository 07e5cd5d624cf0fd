//! Field metadata attached to declared record fields.
//!
//! Metadata is an ordered string-to-string map. The engine only reads the
//! `valid` key (the rule list); every other key belongs to whichever rule
//! chooses to read it.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Metadata key holding the comma-separated rule list.
pub const RULES_KEY: &str = "valid";

/// Metadata key holding the human-readable field label.
pub const LABEL_KEY: &str = "name";

/// Ordered, immutable-once-declared metadata of a single field.
///
/// # Example
///
/// ```rust
/// use fieldguard::core::FieldMetadata;
///
/// let meta = FieldMetadata::new()
///     .with("valid", "Str,IntVal")
///     .with("name", "nickname")
///     .with("len", "3,5");
///
/// assert_eq!(meta.get("name"), Some("nickname"));
/// assert_eq!(meta.rules().collect::<Vec<_>>(), vec!["Str", "IntVal"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMetadata {
    entries: Vec<(String, String)>,
}

impl FieldMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an entry, keeping the original position on replace.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rule names from the `valid` key, in declaration order.
    ///
    /// Empty entries are skipped; a missing key yields no rules.
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.get(RULES_KEY)
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Display label: the `name` entry, or `fallback` when absent.
    pub fn label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.get(LABEL_KEY).unwrap_or(fallback)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FieldMetadata::new(), |meta, (k, v)| meta.with(k, v))
    }
}

impl Serialize for FieldMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = FieldMetadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut meta = FieldMetadata::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    meta = meta.with(key, value);
                }
                Ok(meta)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// Which side of a bounds parameter failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Min,
    Max,
}

/// Errors from parsing a `"<min>,<max>"` parameter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoundsError {
    #[error("cannot parse {side:?} bound '{raw}'")]
    Unparsable { side: BoundSide, raw: String },

    #[error("minimum {min} exceeds maximum {max}")]
    Inverted { min: i64, max: i64 },
}

/// Inclusive numeric bounds; `None` on a side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    /// Parse `"<min>,<max>"`. Either side may be empty. A lone `"<min>"`
    /// leaves the maximum open.
    pub fn parse(raw: &str) -> Result<Self, BoundsError> {
        let mut parts = raw.splitn(2, ',');
        let min = parse_side(parts.next().unwrap_or(""), BoundSide::Min)?;
        let max = parse_side(parts.next().unwrap_or(""), BoundSide::Max)?;

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(BoundsError::Inverted { min, max });
            }
        }

        Ok(Bounds { min, max })
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

fn parse_side(raw: &str, side: BoundSide) -> Result<Option<i64>, BoundsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| BoundsError::Unparsable {
            side,
            raw: raw.to_string(),
        })
}
