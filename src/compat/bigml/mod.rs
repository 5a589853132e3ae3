//! Exported decision-tree model documents.
//!
//! This module provides parsing of the model document produced by the hosted
//! training service and conversion to native treeval types.

mod convert;
mod json;

pub use convert::{build_catalog, convert_tree, parse_arguments, record_from_value};
pub use json::*;
