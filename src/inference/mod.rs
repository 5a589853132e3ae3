//! Prediction over a built tree.
//!
//! - [`traversal`]: the tree walk and decision-path extraction
//! - [`prediction`]: the [`Prediction`] result type

pub mod prediction;
pub mod traversal;

pub use prediction::Prediction;
pub use traversal::{decision_path, predict_tree, traverse};
