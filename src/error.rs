//! Error types for model loading and prediction.
//!
//! Two concerns are kept apart:
//! - [`ParseError`]: the model document or the argument payload is malformed.
//! - [`ConfigurationError`]: the document parses but describes something the
//!   evaluator cannot honour (unknown field, operator that does not fit the
//!   field's optype, confidence outside `[0, 1]`, ...).
//!
//! A missing input value is *not* an error: the tree walk simply stops at the
//! current node and returns its summary.

use crate::repr::Optype;

/// Malformed model document or argument payload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("model document is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("model document is missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid node at {path}: {reason}")]
    InvalidNode { path: String, reason: String },

    #[error("arguments payload is not valid JSON: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error("arguments payload must be a JSON object")]
    ArgumentsNotObject,

    #[error("argument {key:?} must be a scalar value")]
    InvalidArgumentValue { key: String },
}

/// A well-formed document that the evaluator cannot evaluate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("reference to unknown field {0:?}")]
    UnknownField(String),

    #[error("unknown optype {optype:?} for field {field:?}")]
    UnknownOptype { field: String, optype: String },

    #[error("unknown predicate operator {0:?}")]
    UnknownOperator(String),

    #[error("operator {operator} is not valid for {optype} field {field:?}")]
    OperatorOptypeMismatch {
        field: String,
        operator: String,
        optype: Optype,
    },

    #[error("invalid operand {operand} for {optype} field {field:?}")]
    InvalidOperand {
        field: String,
        operand: String,
        optype: Optype,
    },

    #[error("confidence {confidence} at {path} is outside [0, 1]")]
    InvalidConfidence { path: String, confidence: f64 },

    #[error("tree depth {depth} exceeds configured maximum {max_depth}")]
    TreeTooDeep { depth: usize, max_depth: usize },

    #[error("model document nests deeper than the supported {max_nesting} levels")]
    DocumentTooDeep { max_nesting: usize },
}

/// Any failure surfaced by [`crate::LocalModel`] or [`crate::predict`].
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
