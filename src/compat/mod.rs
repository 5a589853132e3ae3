//! External model format compatibility.
//!
//! Parses model documents exported by the hosted training service and
//! converts them to the native [`crate::repr`] types.

pub mod bigml;

pub use bigml::ModelDocument;
