//! Tree nodes.
//!
//! A [`Node`] owns its children directly; the tree is strict (no sharing, no
//! cycles), so a plain owned structure is enough. Every node, internal or
//! leaf, carries a [`Summary`] that serves as the answer when the walk stops
//! there.

use crate::error::ConfigurationError;

use super::{Guard, OutputValue, Predicate};

/// Best output at a node and the confidence attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    output: OutputValue,
    confidence: f64,
}

impl Summary {
    /// Create a summary. `path` only labels the error.
    pub fn new(
        output: OutputValue,
        confidence: f64,
        path: &str,
    ) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConfigurationError::InvalidConfidence {
                path: path.to_owned(),
                confidence,
            });
        }
        Ok(Self { output, confidence })
    }

    pub fn output(&self) -> &OutputValue {
        &self.output
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Payload distinguishing leaves from split nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf,
    /// Children in declaration order; never empty.
    Internal { children: Box<[Node]> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    guard: Guard,
    summary: Summary,
    kind: NodeKind,
}

impl Node {
    pub fn leaf(guard: Guard, summary: Summary) -> Self {
        Self {
            guard,
            summary,
            kind: NodeKind::Leaf,
        }
    }

    /// Create a node with `children`. An empty list yields a leaf.
    pub fn with_children(guard: Guard, summary: Summary, children: Vec<Node>) -> Self {
        let kind = if children.is_empty() {
            NodeKind::Leaf
        } else {
            NodeKind::Internal {
                children: children.into_boxed_slice(),
            }
        };
        Self {
            guard,
            summary,
            kind,
        }
    }

    #[inline]
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Predicate on the edge into this node, `None` for the root.
    pub fn predicate(&self) -> Option<&Predicate> {
        self.guard.predicate()
    }

    #[inline]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Internal { children } => children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn n_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children().iter().map(|c| (c, depth + 1)));
        }
        max_depth
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(label: &str, confidence: f64) -> Summary {
        Summary::new(label.into(), confidence, "test").unwrap()
    }

    #[test]
    fn confidence_outside_unit_interval_is_rejected() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let err = Summary::new("x".into(), bad, "root").unwrap_err();
            assert!(matches!(err, ConfigurationError::InvalidConfidence { .. }));
        }
        assert!(Summary::new("x".into(), 0.0, "root").is_ok());
        assert!(Summary::new("x".into(), 1.0, "root").is_ok());
    }

    #[test]
    fn empty_children_make_a_leaf() {
        let node = Node::with_children(Guard::Always, summary("a", 0.5), vec![]);
        assert!(node.is_leaf());
        assert!(node.children().is_empty());
        assert_eq!(node.depth(), 0);
        assert_eq!(node.n_nodes(), 1);
    }

    #[test]
    fn shape_metrics() {
        let deep = Node::with_children(
            Guard::Always,
            summary("b", 0.6),
            vec![Node::leaf(Guard::Always, summary("c", 0.7))],
        );
        let root = Node::with_children(
            Guard::Always,
            summary("a", 0.5),
            vec![Node::leaf(Guard::Always, summary("d", 0.8)), deep],
        );

        assert_eq!(root.n_nodes(), 4);
        assert_eq!(root.depth(), 2);

        let order: Vec<String> = root
            .iter()
            .map(|n| n.summary().output().to_string())
            .collect();
        assert_eq!(order, ["a", "d", "b", "c"]);
    }
}
