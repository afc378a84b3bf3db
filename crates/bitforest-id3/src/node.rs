use std::fmt;

use crate::dataset::LabelCounts;

/// Zero-based feature column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label entropy in bits.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Entropy(f64);

impl Entropy {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw entropy in bits.
    #[must_use]
    pub fn bits(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node in a decision tree arena.
///
/// Each child index is referenced by exactly one parent, so ownership stays
/// tree-shaped even though nodes live in a flat `Vec<Node>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior node splitting on one binary feature.
    Split {
        /// Feature whose value selects the branch.
        feature: FeatureIndex,
        /// Child for examples with feature value 0.
        zero: NodeIndex,
        /// Child for examples with feature value 1.
        one: NodeIndex,
        /// Number of training examples that reached this node.
        n_samples: usize,
        /// Label entropy at this node before splitting.
        entropy: Entropy,
        /// Information gain of the chosen split, in bits.
        gain: f64,
    },
    /// A terminal node carrying a class label.
    Leaf {
        /// Predicted label, 0 or 1.
        label: u8,
        /// Number of training examples that reached this leaf.
        n_samples: usize,
        /// Label counts of those examples.
        counts: LabelCounts,
    },
}

impl Node {
    /// Return the number of training examples that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the leaf label, or `None` for a split node.
    #[must_use]
    pub fn label(&self) -> Option<u8> {
        match self {
            Node::Leaf { label, .. } => Some(*label),
            Node::Split { .. } => None,
        }
    }

    /// Return the split feature, or `None` for a leaf.
    #[must_use]
    pub fn feature(&self) -> Option<FeatureIndex> {
        match self {
            Node::Split { feature, .. } => Some(*feature),
            Node::Leaf { .. } => None,
        }
    }
}
