//! Conversion from the exported document types to native [`crate::repr`] types.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ConfigurationError, ParseError, PredictError};
use crate::repr::{
    Field, FieldCatalog, FieldValue, Guard, InputRecord, Node, Operand, Operator, Optype,
    Predicate, Summary,
};

use super::json::{FieldDef, NodeDef, PredicateDef};

/// Build the field catalog from the document's `fields` map.
pub fn build_catalog(
    fields: &BTreeMap<String, FieldDef>,
) -> Result<FieldCatalog, ConfigurationError> {
    fields
        .iter()
        .map(|(id, def)| {
            let optype: Optype =
                def.optype
                    .parse()
                    .map_err(|_| ConfigurationError::UnknownOptype {
                        field: id.clone(),
                        optype: def.optype.clone(),
                    })?;
            let name = def.name.clone().unwrap_or_else(|| id.clone());
            Ok(Field::new(id.clone(), name, optype))
        })
        .collect()
}

/// Convert the root node and its subtree.
///
/// Every predicate is resolved against `catalog`, so unknown fields and
/// operator/optype mismatches surface here rather than during prediction.
/// Only the root may omit its predicate.
pub fn convert_tree(root: &NodeDef, catalog: &FieldCatalog) -> Result<Node, PredictError> {
    convert_node(root, catalog, "root", true)
}

fn convert_node(
    def: &NodeDef,
    catalog: &FieldCatalog,
    path: &str,
    is_root: bool,
) -> Result<Node, PredictError> {
    let guard = match &def.predicate {
        Some(predicate) => convert_predicate(predicate, catalog, path)?,
        None if is_root => Guard::Always,
        None => {
            return Err(ParseError::InvalidNode {
                path: path.to_owned(),
                reason: "missing predicate".to_owned(),
            }
            .into());
        }
    };
    let summary = Summary::new(def.output.clone(), def.confidence, path)?;

    let children = def
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| convert_node(child, catalog, &format!("{path}.children[{i}]"), false))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Node::with_children(guard, summary, children))
}

fn convert_predicate(
    def: &PredicateDef,
    catalog: &FieldCatalog,
    path: &str,
) -> Result<Guard, PredictError> {
    match def {
        PredicateDef::Sentinel(true) => Ok(Guard::Always),
        PredicateDef::Sentinel(false) => Err(ParseError::InvalidNode {
            path: path.to_owned(),
            reason: "predicate `false` can never be satisfied".to_owned(),
        }
        .into()),
        PredicateDef::Test {
            field,
            operator,
            value,
        } => {
            let field = catalog
                .get(field)
                .ok_or_else(|| ConfigurationError::UnknownField(field.clone()))?;
            let (operator, or_missing) = Operator::parse(operator)?;
            let operand = match value {
                Value::Null => None,
                Value::Number(n) => n.as_f64().map(Operand::Number),
                Value::String(s) => Some(Operand::Text(s.clone())),
                Value::Bool(b) => Some(Operand::Text(b.to_string())),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ParseError::InvalidNode {
                        path: path.to_owned(),
                        reason: format!("predicate operand must be a scalar, got {value}"),
                    }
                    .into());
                }
            };
            Ok(Guard::When(Predicate::new(field, operator, operand, or_missing)?))
        }
    }
}

// =============================================================================
// Arguments
// =============================================================================

/// Parse a textual arguments payload such as `{"000001": 1, "000002": "red"}`.
///
/// `null` becomes [`FieldValue::Missing`]; booleans are kept as their text.
pub fn parse_arguments(payload: &str) -> Result<InputRecord, ParseError> {
    let value: Value = serde_json::from_str(payload).map_err(ParseError::InvalidArguments)?;
    record_from_value(&value)
}

/// Build a record from an already-parsed JSON object.
pub fn record_from_value(value: &Value) -> Result<InputRecord, ParseError> {
    let Value::Object(map) = value else {
        return Err(ParseError::ArgumentsNotObject);
    };

    let mut record = InputRecord::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::Null => FieldValue::Missing,
            Value::Number(n) => n.as_f64().map_or(FieldValue::Missing, FieldValue::Number),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(ParseError::InvalidArgumentValue { key: key.clone() });
            }
        };
        record.insert(key.clone(), value);
    }
    Ok(record)
}
