//! Canonical in-memory representation of a decision tree model.
//!
//! Everything here is validated on construction and immutable afterwards,
//! so a built tree can be shared across threads and evaluated without
//! error paths.

/// Opaque field identifier, unique within a model (e.g. `"000001"`).
pub type FieldId = String;

pub mod field;
pub mod node;
pub mod predicate;
pub mod value;

pub use field::{Field, FieldCatalog, Optype, UnknownOptype};
pub use node::{Node, NodeKind, Summary};
pub use predicate::{Condition, Guard, MissingBranches, Operand, Operator, Predicate};
pub use value::{FieldValue, InputRecord, OutputValue};
