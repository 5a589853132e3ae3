//! Exported model document format.
//!
//! These are "foreign" types mirroring the document as the training service
//! emits it. They are only used for parsing; see `convert.rs` for the
//! conversion into the validated [`crate::repr`] types.
//!
//! Two shapes are accepted:
//! - flat: `{"fields": ..., "objective_field": ..., "root": ...}`
//! - resource: `{"objective_fields": [...], "model": {"fields": ..., "root": ...}}`
//!
//! Any piece missing at the top level is looked up in the nested `model`.
//!
//! Documents may nest at most [`MAX_DOCUMENT_NESTING`] arrays/objects deep,
//! which allows trees of roughly 250 levels. Deeper documents are rejected
//! before deserialization with [`ConfigurationError::DocumentTooDeep`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{OneOrMany, serde_as};

use crate::error::{ConfigurationError, ParseError, PredictError};
use crate::repr::OutputValue;

// =============================================================================
// Document
// =============================================================================

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_field: Option<String>,

    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objective_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, FieldDef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Box<ModelDocument>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Falls back to the field id when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub optype: String,
}

/// Maximum array/object nesting accepted in a model document.
///
/// Each tree level costs two levels of nesting (the node and its `children`).
pub const MAX_DOCUMENT_NESTING: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    /// Absent only on the root, which is implicitly `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PredicateDef>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
    pub output: OutputValue,
    pub confidence: f64,
}

/// Either the `true` sentinel or a field test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateDef {
    Sentinel(bool),
    Test {
        field: String,
        operator: String,
        /// `null` (or absent) encodes a test for a missing value.
        #[serde(default)]
        value: Value,
    },
}

/// Borrowed view of the three pieces every model needs.
#[derive(Debug, Clone, Copy)]
pub struct DocumentParts<'a> {
    pub objective_field: &'a str,
    pub fields: &'a BTreeMap<String, FieldDef>,
    pub root: &'a NodeDef,
}

impl ModelDocument {
    pub fn from_value(value: &Value) -> Result<Self, PredictError> {
        if value_nesting_exceeds(value, MAX_DOCUMENT_NESTING) {
            return Err(too_deep());
        }
        Ok(Self::deserialize(value).map_err(ParseError::Json)?)
    }

    /// Parse a JSON document.
    ///
    /// serde_json's own recursion limit is lifted in favor of
    /// [`MAX_DOCUMENT_NESTING`], which is checked on the raw text first.
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        if text_nesting_exceeds(json, MAX_DOCUMENT_NESTING) {
            return Err(too_deep());
        }
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let document = Self::deserialize(&mut de).map_err(ParseError::Json)?;
        de.end().map_err(ParseError::Json)?;
        Ok(document)
    }

    fn objective(&self) -> Option<&str> {
        self.objective_field
            .as_deref()
            .or_else(|| self.objective_fields.first().map(String::as_str))
            .or_else(|| self.model.as_ref().and_then(|m| m.objective()))
    }

    fn field_map(&self) -> Option<&BTreeMap<String, FieldDef>> {
        self.fields
            .as_ref()
            .or_else(|| self.model.as_ref().and_then(|m| m.field_map()))
    }

    fn root_node(&self) -> Option<&NodeDef> {
        self.root
            .as_ref()
            .or_else(|| self.model.as_ref().and_then(|m| m.root_node()))
    }

    /// Resolve root, fields and objective field, failing on the first one missing.
    pub fn parts(&self) -> Result<DocumentParts<'_>, ParseError> {
        let root = self.root_node().ok_or(ParseError::MissingField("root"))?;
        let fields = self.field_map().ok_or(ParseError::MissingField("fields"))?;
        let objective_field = self
            .objective()
            .ok_or(ParseError::MissingField("objective_field"))?;
        Ok(DocumentParts {
            objective_field,
            fields,
            root,
        })
    }
}

fn too_deep() -> PredictError {
    ConfigurationError::DocumentTooDeep {
        max_nesting: MAX_DOCUMENT_NESTING,
    }
    .into()
}

/// Whether arrays/objects in `json` nest deeper than `limit`.
///
/// Brackets inside string literals are skipped; anything else malformed is
/// left for the parser to report.
fn text_nesting_exceeds(json: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn value_nesting_exceeds(value: &Value, limit: usize) -> bool {
    let mut stack = vec![(value, 0usize)];
    while let Some((value, depth)) = stack.pop() {
        let depth = depth + 1;
        match value {
            Value::Array(items) => {
                if depth > limit {
                    return true;
                }
                stack.extend(items.iter().map(|item| (item, depth)));
            }
            Value::Object(map) => {
                if depth > limit {
                    return true;
                }
                stack.extend(map.values().map(|item| (item, depth)));
            }
            _ => {}
        }
    }
    false
}
