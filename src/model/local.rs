//! Locally evaluated decision-tree model.

use serde_json::Value;
use tracing::instrument;

use crate::compat::bigml::{self, ModelDocument};
use crate::error::{ConfigurationError, PredictError};
use crate::inference::{self, Prediction};
use crate::repr::{Field, FieldCatalog, InputRecord, Node, Predicate};

use super::EvaluatorConfig;

/// A decision-tree model built from an exported model document.
///
/// Owns its field catalog and tree; both are immutable after construction,
/// so a `LocalModel` can be shared across threads and queried concurrently.
///
/// # Example
///
/// ```
/// use treeval::{LocalModel, OutputValue};
/// use treeval::testing::binary_split_document;
///
/// let model = LocalModel::from_value(&binary_split_document()).unwrap();
/// let prediction = model.predict_args(r#"{"age": 5}"#, true).unwrap();
/// assert_eq!(prediction.value, OutputValue::from("yes"));
/// assert_eq!(prediction.confidence, 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct LocalModel {
    catalog: FieldCatalog,
    root: Node,
    objective: Field,
    config: EvaluatorConfig,
}

impl LocalModel {
    /// Build from a parsed model document with the default configuration.
    pub fn from_value(document: &Value) -> Result<Self, PredictError> {
        Self::from_value_with_config(document, EvaluatorConfig::default())
    }

    pub fn from_value_with_config(
        document: &Value,
        config: EvaluatorConfig,
    ) -> Result<Self, PredictError> {
        Self::from_document(&ModelDocument::from_value(document)?, config)
    }

    /// Build from a JSON string with the default configuration.
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        Self::from_json_with_config(json, EvaluatorConfig::default())
    }

    pub fn from_json_with_config(json: &str, config: EvaluatorConfig) -> Result<Self, PredictError> {
        Self::from_document(&ModelDocument::from_json(json)?, config)
    }

    /// Build from an already deserialized document.
    #[instrument(level = "debug", skip_all)]
    pub fn from_document(
        document: &ModelDocument,
        config: EvaluatorConfig,
    ) -> Result<Self, PredictError> {
        let parts = document.parts()?;
        let catalog = bigml::build_catalog(parts.fields)?;

        let objective = catalog
            .get(parts.objective_field)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownField(parts.objective_field.to_owned()))?;

        let root = bigml::convert_tree(parts.root, &catalog)?;

        let depth = root.depth();
        if let Some(max_depth) = config.max_depth {
            if depth > max_depth {
                return Err(ConfigurationError::TreeTooDeep { depth, max_depth }.into());
            }
        }

        tracing::debug!(
            fields = catalog.len(),
            nodes = root.n_nodes(),
            depth,
            objective = parts.objective_field,
            "built local model"
        );

        Ok(Self {
            catalog,
            root,
            objective,
            config,
        })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict for an id-keyed record.
    #[inline]
    pub fn predict(&self, record: &InputRecord) -> Prediction {
        inference::predict_tree(&self.root, record, self.config.missing_branches)
    }

    /// Predict for a record keyed by field name (or a mix of names and ids).
    pub fn predict_by_name(&self, record: InputRecord) -> Prediction {
        self.predict(&self.catalog.translate_by_name(record))
    }

    /// Parse a textual arguments payload and predict.
    #[instrument(level = "debug", skip(self, payload))]
    pub fn predict_args(&self, payload: &str, by_name: bool) -> Result<Prediction, PredictError> {
        let record = self.normalize(bigml::parse_arguments(payload)?, by_name);
        Ok(self.predict(&record))
    }

    /// Predict for many id-keyed records, honoring the configured parallelism.
    pub fn predict_batch(&self, records: &[InputRecord]) -> Vec<Prediction> {
        self.config
            .parallelism
            .maybe_par_map(records, |record| self.predict(record))
    }

    /// Predicates satisfied on the way to the prediction, root first.
    pub fn decision_path(&self, record: &InputRecord) -> Vec<&Predicate> {
        inference::decision_path(&self.root, record, self.config.missing_branches)
    }

    /// Bring `record` into the id-keyed form the tree is evaluated on.
    pub fn normalize(&self, record: InputRecord, by_name: bool) -> InputRecord {
        if by_name {
            self.catalog.translate_by_name(record)
        } else {
            record
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn fields(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// The field the model predicts.
    pub fn objective_field(&self) -> &Field {
        &self.objective
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }
}
