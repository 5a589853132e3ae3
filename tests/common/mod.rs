//! Test case loading utilities for integration tests.
//!
//! Helpers for loading model documents and prediction cases from JSON files.
//! For assertion helpers, use `treeval::testing`.

#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use treeval::Prediction;

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Test Case Loading
// =============================================================================

/// Base directory for test cases.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Directory for exported model documents.
pub fn bigml_test_cases_dir() -> PathBuf {
    test_cases_dir().join("bigml")
}

/// Load a JSON file and deserialize it.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> T {
    let file =
        File::open(path).unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    serde_json::from_reader(file)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

/// Load `{name}.model.json` and `{name}.cases.json`.
pub fn load_model_and_cases(name: &str) -> (Value, TestCases) {
    let dir = bigml_test_cases_dir();
    let model: Value = load_json(&dir.join(format!("{name}.model.json")));
    let cases: TestCases = load_json(&dir.join(format!("{name}.cases.json")));
    (model, cases)
}

// =============================================================================
// Common Test Data Structures
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TestCases {
    pub cases: Vec<TestCase>,
}

/// One prediction: the arguments payload and the expected result.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub args: Value,
    #[serde(default)]
    pub by_name: bool,
    pub expected: Prediction,
}

impl TestCase {
    /// Arguments as the textual payload the evaluator consumes.
    pub fn payload(&self) -> String {
        self.args.to_string()
    }
}
