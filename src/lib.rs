//! treeval: on-device evaluation of exported decision-tree models.
//!
//! A model document (fields, objective field and a tree of predicate-guarded
//! nodes) is parsed once into an immutable [`LocalModel`]; predictions then
//! walk the tree for a record of field values and return the reached node's
//! output with its confidence. When the input lacks a tested field, the walk
//! stops early and the current node's own summary is returned.
//!
//! # Key Types
//!
//! - [`LocalModel`] - Built model with `predict` / `predict_args`
//! - [`EvaluatorConfig`] - Evaluation options (missing-value branches, depth limit)
//! - [`InputRecord`] / [`Prediction`] - Per-call input and output
//! - [`FieldCatalog`] - Field metadata and name ↔ id translation
//!
//! # Example
//!
//! ```
//! use treeval::{InputRecord, LocalModel};
//! use treeval::testing::binary_split_document;
//!
//! let model = LocalModel::from_value(&binary_split_document()).unwrap();
//! let p = model.predict(&InputRecord::new().with("000001", 5));
//! assert_eq!(p.confidence, 0.9);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod compat;
pub mod error;
pub mod inference;
pub mod model;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::{ConfigurationError, ParseError, PredictError};
pub use inference::Prediction;
pub use model::{ConfigError, EvaluatorConfig, LocalModel, predict};
pub use repr::{
    Field, FieldCatalog, FieldId, FieldValue, InputRecord, MissingBranches, Node, Optype,
    OutputValue, Predicate,
};
pub use utils::Parallelism;
