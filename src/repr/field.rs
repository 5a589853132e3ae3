//! Field metadata and the per-model field catalog.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{FieldId, InputRecord};

// =============================================================================
// Optype
// =============================================================================

/// Semantic type of a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optype {
    Numeric,
    Categorical,
    Text,
    Datetime,
}

impl Optype {
    /// Whether values of this type are ordered (`<`, `<=`, `>=`, `>` apply).
    #[inline]
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::Numeric | Self::Datetime)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Text => "text",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for Optype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an optype string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown optype: {0}")]
pub struct UnknownOptype(pub String);

impl FromStr for Optype {
    type Err = UnknownOptype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(Self::Numeric),
            "categorical" => Ok(Self::Categorical),
            "text" => Ok(Self::Text),
            "datetime" => Ok(Self::Datetime),
            other => Err(UnknownOptype(other.to_owned())),
        }
    }
}

// =============================================================================
// Field
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub optype: Optype,
}

impl Field {
    pub fn new(id: impl Into<FieldId>, name: impl Into<String>, optype: Optype) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            optype,
        }
    }
}

// =============================================================================
// FieldCatalog
// =============================================================================

/// Immutable mapping from [`FieldId`] to [`Field`], with a reverse name index.
///
/// When two fields share a name, the name resolves to the smallest id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    fields: BTreeMap<FieldId, Field>,
    by_name: HashMap<String, FieldId>,
}

impl FieldCatalog {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        let fields: BTreeMap<FieldId, Field> =
            fields.into_iter().map(|f| (f.id.clone(), f)).collect();

        let mut by_name = HashMap::with_capacity(fields.len());
        for field in fields.values() {
            by_name
                .entry(field.name.clone())
                .or_insert_with(|| field.id.clone());
        }

        Self { fields, by_name }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Field id registered under `name`.
    pub fn id_for_name(&self, name: &str) -> Option<&FieldId> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Re-key a by-name record by field id.
    ///
    /// Keys that are already known ids pass through unchanged. Names the
    /// catalog does not know are dropped. When a record carries both a field's
    /// name and its id, the value under the id wins.
    pub fn translate_by_name(&self, input: InputRecord) -> InputRecord {
        let mut out = InputRecord::with_capacity(input.len());
        let mut by_id = Vec::new();
        for (key, value) in input {
            if let Some(id) = self.by_name.get(&key) {
                out.insert(id.clone(), value);
            } else if self.fields.contains_key(&key) {
                by_id.push((key, value));
            } else {
                tracing::debug!(name = %key, "dropping input not present in field catalog");
            }
        }
        for (id, value) in by_id {
            out.insert(id, value);
        }
        out
    }

    /// Re-key an id-keyed record by field name. Unknown ids are dropped.
    ///
    /// Fields sharing a name keep the value of the smallest id, mirroring
    /// [`FieldCatalog::id_for_name`].
    pub fn to_named(&self, input: &InputRecord) -> InputRecord {
        let mut out = InputRecord::with_capacity(input.len());
        for field in self.fields.values() {
            if let Some(value) = input.entry(&field.id) {
                if !out.contains_key(&field.name) {
                    out.insert(field.name.clone(), value.clone());
                }
            }
        }
        out
    }
}

impl FromIterator<Field> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::FieldValue;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new([
            Field::new("000000", "sepal length", Optype::Numeric),
            Field::new("000001", "color", Optype::Categorical),
            Field::new("000004", "species", Optype::Categorical),
        ])
    }

    #[test]
    fn optype_parses_and_displays() {
        assert_eq!("numeric".parse::<Optype>(), Ok(Optype::Numeric));
        assert_eq!("datetime".parse::<Optype>(), Ok(Optype::Datetime));
        assert!("items".parse::<Optype>().is_err());
        assert_eq!(Optype::Categorical.to_string(), "categorical");
        assert!(Optype::Datetime.is_ordered());
        assert!(!Optype::Text.is_ordered());
    }

    #[test]
    fn translate_drops_unknown_names() {
        let by_name = InputRecord::new()
            .with("sepal length", 5.1)
            .with("color", "red")
            .with("petal width", 0.2);

        let by_id = catalog().translate_by_name(by_name);

        assert_eq!(by_id.len(), 2);
        assert_eq!(by_id.get("000000"), Some(&FieldValue::Number(5.1)));
        assert_eq!(by_id.get("000001"), Some(&FieldValue::from("red")));
    }

    #[test]
    fn translate_passes_through_ids() {
        let input = InputRecord::new().with("000000", 5.1).with("000001", "red");
        let translated = catalog().translate_by_name(input.clone());
        assert_eq!(translated, input);
    }

    #[test]
    fn to_named_reverses_translation() {
        let catalog = catalog();
        let by_name = InputRecord::new().with("sepal length", 4.9).with("color", "blue");
        let by_id = catalog.translate_by_name(by_name.clone());
        assert_eq!(catalog.to_named(&by_id), by_name);
    }

    #[test]
    fn duplicate_names_resolve_to_smallest_id() {
        let catalog = FieldCatalog::new([
            Field::new("000002", "x", Optype::Numeric),
            Field::new("000001", "x", Optype::Numeric),
        ]);
        assert_eq!(catalog.id_for_name("x").map(String::as_str), Some("000001"));

        let by_id = InputRecord::new().with("000002", 2).with("000001", 1);
        let named = catalog.to_named(&by_id);
        assert_eq!(named.len(), 1);
        assert_eq!(named.get("x"), Some(&FieldValue::Number(1.0)));
    }

    #[test]
    fn explicit_id_wins_over_name() {
        let catalog = catalog();
        for _ in 0..64 {
            let mixed = InputRecord::new()
                .with("color", "red")
                .with("000001", "blue")
                .with("sepal length", 5.1);
            let by_id = catalog.translate_by_name(mixed);
            assert_eq!(by_id.len(), 2);
            assert_eq!(by_id.get("000001"), Some(&FieldValue::from("blue")));
            assert_eq!(by_id.get("000000"), Some(&FieldValue::Number(5.1)));
        }
    }
}
