//! Evaluator configuration with builder pattern.
//!
//! ```
//! use treeval::model::EvaluatorConfig;
//! use treeval::repr::MissingBranches;
//!
//! // All defaults
//! let config = EvaluatorConfig::builder().build().unwrap();
//!
//! // Never follow missing-value branches, reject trees deeper than 64
//! let config = EvaluatorConfig::builder()
//!     .missing_branches(MissingBranches::Ignore)
//!     .max_depth(64)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::repr::MissingBranches;
use crate::utils::Parallelism;

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,
}

/// Configuration for [`crate::LocalModel`].
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct EvaluatorConfig {
    /// Treatment of predicates that explicitly accept missing values.
    /// Default: [`MissingBranches::Follow`].
    #[builder(default)]
    pub missing_branches: MissingBranches,

    /// Reject trees deeper than this when building the model. Default: unbounded.
    pub max_depth: Option<usize>,

    /// Batch prediction mode. Default: [`Parallelism::Parallel`].
    #[builder(default)]
    pub parallelism: Parallelism,
}

impl<S: evaluator_config_builder::IsComplete> EvaluatorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxDepth`] for `max_depth == 0`.
    pub fn build(self) -> Result<EvaluatorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl EvaluatorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            missing_branches: MissingBranches::default(),
            max_depth: None,
            parallelism: Parallelism::default(),
        }
    }
}
