//! Tree walk.
//!
//! At each internal node the children are scanned in declaration order and
//! the walk descends into the first one whose guard holds. When none holds
//! (typically because the tested field is absent), the walk stops and the
//! current node's own summary is the answer. No backtracking; the number of
//! steps is bounded by the tree depth.

use crate::repr::{InputRecord, MissingBranches, Node, Predicate};

use super::Prediction;

/// Walk from `root` and return the node where the walk stops.
///
/// This is either a leaf or an internal node none of whose children matched.
#[inline]
pub fn traverse<'a>(root: &'a Node, record: &InputRecord, missing: MissingBranches) -> &'a Node {
    let mut node = root;
    let mut depth = 0usize;

    while !node.is_leaf() {
        match node
            .children()
            .iter()
            .find(|child| child.guard().matches(record, missing))
        {
            Some(child) => {
                depth += 1;
                tracing::trace!(depth, predicate = ?child.predicate().map(ToString::to_string), "descend");
                node = child;
            }
            None => {
                tracing::debug!(depth, "no child predicate matched, using node summary");
                break;
            }
        }
    }

    node
}

/// Predict from the tree rooted at `root`.
#[inline]
pub fn predict_tree(root: &Node, record: &InputRecord, missing: MissingBranches) -> Prediction {
    Prediction::from(traverse(root, record, missing).summary())
}

/// Predicates satisfied along the walk, root first.
pub fn decision_path<'a>(
    root: &'a Node,
    record: &InputRecord,
    missing: MissingBranches,
) -> Vec<&'a Predicate> {
    let mut path = Vec::new();
    let mut node = root;

    while let Some(child) = node
        .children()
        .iter()
        .find(|child| child.guard().matches(record, missing))
    {
        path.extend(child.predicate());
        node = child;
    }

    path
}
