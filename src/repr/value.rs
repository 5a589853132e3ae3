//! Scalar values flowing in and out of a tree.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::FieldId;

// =============================================================================
// Output values
// =============================================================================

/// Output stored on a node: a class label or a regression value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for OutputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OutputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OutputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// =============================================================================
// Input values
// =============================================================================

/// A single input value. [`FieldValue::Missing`] is the explicit "absent" marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl FieldValue {
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric view of the value.
    ///
    /// Text that parses as a float is accepted so that `"3.5"` compares like `3.5`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Missing => None,
        }
    }

    /// Textual view of the value, used by categorical and text predicates.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Missing => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

// =============================================================================
// InputRecord
// =============================================================================

/// Field values for one prediction, keyed by [`FieldId`] (or by field name
/// before translation through [`super::FieldCatalog::translate_by_name`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputRecord {
    values: HashMap<FieldId, FieldValue>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Present value for `key`. Keys mapped to [`FieldValue::Missing`] read as absent.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key).filter(|v| !v.is_missing())
    }

    /// Raw entry for `key`, including explicit [`FieldValue::Missing`] markers.
    pub fn entry(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for InputRecord {
    type Item = (FieldId, FieldValue);
    type IntoIter = std::collections::hash_map::IntoIter<FieldId, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
