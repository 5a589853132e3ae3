//! Testing utilities for treeval.
//!
//! Assertion helpers and small model documents shared by unit tests and
//! integration tests.
//!
//! ```ignore
//! use treeval::assert_prediction_eq;
//! use treeval::testing::binary_split_document;
//! ```

use serde_json::{Value, json};

/// Default tolerance for confidence comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Assert that a [`Prediction`](crate::Prediction) has the given value and
/// confidence (within [`DEFAULT_TOLERANCE`](crate::testing::DEFAULT_TOLERANCE)).
///
/// # Examples
///
/// ```
/// # use treeval::{assert_prediction_eq, Prediction};
/// assert_prediction_eq!(Prediction::new("yes", 0.9), "yes", 0.9);
/// ```
#[macro_export]
macro_rules! assert_prediction_eq {
    ($prediction:expr, $value:expr, $confidence:expr) => {{
        let prediction: $crate::Prediction = $prediction;
        let expected = $crate::Prediction::new($value, $confidence);
        if !$crate::approx::abs_diff_eq!(
            prediction,
            expected,
            epsilon = $crate::testing::DEFAULT_TOLERANCE
        ) {
            panic!(
                "assertion failed: `(prediction ≈ expected)`\n  prediction: `{:?}`\n    expected: `{:?}`",
                prediction, expected
            );
        }
    }};
}

/// One numeric split on `000001` at 3.
///
/// - `000001 > 3` → `{"yes", 0.9}`
/// - `000001 <= 3` → `{"no", 0.8}`
/// - root summary → `{"no", 0.55}`
pub fn binary_split_document() -> Value {
    json!({
        "objective_field": "000003",
        "fields": {
            "000001": {"name": "age", "optype": "numeric"},
            "000002": {"name": "color", "optype": "categorical"},
            "000003": {"name": "answer", "optype": "categorical"}
        },
        "root": {
            "predicate": true,
            "output": "no",
            "confidence": 0.55,
            "children": [
                {
                    "predicate": {"field": "000001", "operator": ">", "value": 3},
                    "output": "yes",
                    "confidence": 0.9,
                    "children": []
                },
                {
                    "predicate": {"field": "000001", "operator": "<=", "value": 3},
                    "output": "no",
                    "confidence": 0.8
                }
            ]
        }
    })
}

/// Two-level tree over a numeric and a categorical field.
///
/// - `000001 > 3`, then `000002 != "red"` → `{"yes", 0.95}`
/// - `000001 > 3`, then `000002 = "red"` → `{"maybe", 0.6}`
/// - `000001 > 3` with `000002` absent → `{"yes", 0.7}`
/// - `000001 <= 3` → `{"no", 0.8}`
/// - root summary → `{"no", 0.55}`
pub fn two_level_document() -> Value {
    json!({
        "objective_field": "000003",
        "fields": {
            "000001": {"name": "age", "optype": "numeric"},
            "000002": {"name": "color", "optype": "categorical"},
            "000003": {"name": "answer", "optype": "categorical"}
        },
        "root": {
            "predicate": true,
            "output": "no",
            "confidence": 0.55,
            "children": [
                {
                    "predicate": {"field": "000001", "operator": ">", "value": 3},
                    "output": "yes",
                    "confidence": 0.7,
                    "children": [
                        {
                            "predicate": {"field": "000002", "operator": "!=", "value": "red"},
                            "output": "yes",
                            "confidence": 0.95
                        },
                        {
                            "predicate": {"field": "000002", "operator": "=", "value": "red"},
                            "output": "maybe",
                            "confidence": 0.6
                        }
                    ]
                },
                {
                    "predicate": {"field": "000001", "operator": "<=", "value": 3},
                    "output": "no",
                    "confidence": 0.8
                }
            ]
        }
    })
}
