//! Prediction result type.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::repr::{OutputValue, Summary};

/// Output of a single prediction.
///
/// Serializes as `{"value": ..., "confidence": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub value: OutputValue,
    /// Always within `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(value: impl Into<OutputValue>, confidence: f64) -> Self {
        Self {
            value: value.into(),
            confidence,
        }
    }
}

impl From<&Summary> for Prediction {
    fn from(summary: &Summary) -> Self {
        Self {
            value: summary.output().clone(),
            confidence: summary.confidence(),
        }
    }
}

/// Values must match exactly (numeric outputs within `epsilon`); confidence within `epsilon`.
impl AbsDiffEq for Prediction {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let values_eq = match (&self.value, &other.value) {
            (OutputValue::Number(a), OutputValue::Number(b)) => a.abs_diff_eq(b, epsilon),
            (a, b) => a == b,
        };
        values_eq && self.confidence.abs_diff_eq(&other.confidence, epsilon)
    }
}
