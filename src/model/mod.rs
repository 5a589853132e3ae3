//! High-level model API.
//!
//! - [`LocalModel`]: build once from a model document, predict many times
//! - [`EvaluatorConfig`]: evaluation options
//! - [`predict`]: one-shot evaluation straight from a document

mod config;
mod local;

pub use config::{ConfigError, EvaluatorConfig};
pub use local::LocalModel;

use serde_json::Value;
use tracing::instrument;

use crate::error::PredictError;
use crate::inference::Prediction;

/// Evaluate `model_document` against a textual arguments payload.
///
/// When `args_by_name` is set, payload keys are field names and are
/// translated to field ids first; unknown names are ignored.
///
/// Pure: builds the model, predicts and discards it. Callers predicting more
/// than once should build a [`LocalModel`] and reuse it.
///
/// ```
/// use treeval::testing::binary_split_document;
///
/// let p = treeval::predict(&binary_split_document(), r#"{"000001": 2}"#, false).unwrap();
/// assert_eq!(p.confidence, 0.8);
/// ```
#[instrument(level = "debug", skip(model_document, args_payload))]
pub fn predict(
    model_document: &Value,
    args_payload: &str,
    args_by_name: bool,
) -> Result<Prediction, PredictError> {
    LocalModel::from_value(model_document)?.predict_args(args_payload, args_by_name)
}
