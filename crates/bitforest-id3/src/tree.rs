use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::{
    Id3Error,
    classifier::{Classifier, check_sample},
    dataset::{TrainingSet, majority_label},
    node::{FeatureIndex, Node, NodeIndex},
    split::{entropy, find_best_split},
};

/// Configuration for a single ID3 decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter  | Default              |
/// |------------|----------------------|
/// | `features` | `None` (all features) |
/// | `examples` | `None` (all examples) |
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeConfig {
    pub(crate) features: Option<Vec<usize>>,
    pub(crate) examples: Option<Vec<usize>>,
}

impl DecisionTreeConfig {
    /// Create a new config that trains on every feature and example.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the features eligible for splitting.
    ///
    /// `None` makes every feature eligible. An empty list is allowed and
    /// produces a single majority-label leaf.
    #[must_use]
    pub fn with_features(mut self, features: Option<Vec<usize>>) -> Self {
        self.features = features;
        self
    }

    /// Restrict the examples the tree is trained on.
    ///
    /// `None` uses every example. An empty list is allowed and produces a
    /// single leaf labelled 0.
    #[must_use]
    pub fn with_examples(mut self, examples: Option<Vec<usize>>) -> Self {
        self.examples = examples;
        self
    }

    // --- Getters ---

    /// Return the eligible feature subset, if restricted.
    #[must_use]
    pub fn features(&self) -> Option<&[usize]> {
        self.features.as_deref()
    }

    /// Return the example subset, if restricted.
    #[must_use]
    pub fn examples(&self) -> Option<&[usize]> {
        self.examples.as_deref()
    }

    /// Train a decision tree on the given training set.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::FeatureOutOfRange`] | a feature index is `>= n_features` |
    /// | [`Id3Error::DuplicateFeature`]  | a feature index is listed twice |
    /// | [`Id3Error::ExampleOutOfRange`] | an example index is `>= n_examples` |
    #[instrument(skip_all, fields(n_examples = set.n_examples(), n_features = set.n_features()))]
    pub fn fit(&self, set: &TrainingSet) -> Result<DecisionTree, Id3Error> {
        let eligible = match &self.features {
            Some(features) => resolve_features(features, set.n_features())?,
            None => (0..set.n_features()).map(FeatureIndex::new).collect(),
        };

        let examples: Vec<usize> = match &self.examples {
            Some(examples) => {
                if let Some(&bad) = examples.iter().find(|&&ex| ex >= set.n_examples()) {
                    return Err(Id3Error::ExampleOutOfRange {
                        example: bad,
                        n_examples: set.n_examples(),
                    });
                }
                examples.clone()
            }
            None => (0..set.n_examples()).collect(),
        };

        Ok(grow(set, eligible, &examples))
    }
}

/// Validate a feature list and turn it into an ordered eligible set.
fn resolve_features(
    features: &[usize],
    n_features: usize,
) -> Result<BTreeSet<FeatureIndex>, Id3Error> {
    let mut eligible = BTreeSet::new();
    for &feature in features {
        if feature >= n_features {
            return Err(Id3Error::FeatureOutOfRange {
                feature,
                n_features,
            });
        }
        if !eligible.insert(FeatureIndex::new(feature)) {
            return Err(Id3Error::DuplicateFeature { feature });
        }
    }
    Ok(eligible)
}

/// Build a tree from pre-validated feature and example subsets.
pub(crate) fn grow(
    set: &TrainingSet,
    mut eligible: BTreeSet<FeatureIndex>,
    examples: &[usize],
) -> DecisionTree {
    let mut arena: Vec<Node> = Vec::new();
    let n_eligible = eligible.len();
    build_node(set, &mut eligible, examples, &mut arena);

    let tree = DecisionTree {
        nodes: arena,
        n_features: set.n_features(),
    };
    debug!(
        n_eligible,
        n_examples = examples.len(),
        n_nodes = tree.n_nodes(),
        depth = tree.depth(),
        "decision tree built"
    );
    tree
}

/// Recursively build the subtree for `examples` and return its arena index.
///
/// `eligible` is shared down the recursion: the chosen feature is removed
/// while its children are built and re-inserted before returning, so no
/// path from root to leaf splits on the same feature twice.
fn build_node(
    set: &TrainingSet,
    eligible: &mut BTreeSet<FeatureIndex>,
    examples: &[usize],
    arena: &mut Vec<Node>,
) -> NodeIndex {
    // Placeholder label; the parent overwrites it with its own majority.
    if examples.is_empty() {
        return push(
            arena,
            Node::Leaf {
                label: 0,
                n_samples: 0,
                counts: [0, 0],
            },
        );
    }

    let n_samples = examples.len();
    let counts = set.label_counts(examples);
    let majority = majority_label(counts);
    let leaf = Node::Leaf {
        label: majority,
        n_samples,
        counts,
    };

    if counts[usize::from(majority)] == n_samples || eligible.is_empty() {
        return push(arena, leaf);
    }

    let Some(split) = find_best_split(set, eligible, examples) else {
        return push(arena, leaf);
    };

    // Reserve the slot so the split node precedes its children.
    let node_idx = push(arena, leaf);

    eligible.remove(&split.feature);
    let zero = build_node(set, eligible, &split.zero_indices, arena);
    let one = build_node(set, eligible, &split.one_indices, arena);
    eligible.insert(split.feature);

    // Guard only: a split with positive gain never leaves a side empty.
    if split.zero_indices.is_empty() {
        relabel(arena, zero, majority);
    }
    if split.one_indices.is_empty() {
        relabel(arena, one, majority);
    }

    arena[node_idx.index()] = Node::Split {
        feature: split.feature,
        zero,
        one,
        n_samples,
        entropy: entropy(counts),
        gain: split.gain,
    };
    node_idx
}

fn push(arena: &mut Vec<Node>, node: Node) -> NodeIndex {
    arena.push(node);
    NodeIndex::new(arena.len() - 1)
}

fn relabel(arena: &mut [Node], idx: NodeIndex, new_label: u8) {
    if let Node::Leaf { label, .. } = &mut arena[idx.index()] {
        *label = new_label;
    }
}

/// A fitted ID3 decision tree over binary features.
///
/// Stored as an arena-based `Vec<Node>` with the root at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
}

impl DecisionTree {
    /// Predict the label for a single feature vector.
    ///
    /// Walks from the root, taking the zero branch when the split feature is
    /// 0 and the one branch otherwise.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::PredictionFeatureMismatch`] | `sample.len() != n_features` |
    /// | [`Id3Error::NonBinaryPredictionValue`] | a value is not 0 or 1 |
    pub fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error> {
        check_sample(sample, self.n_features)?;
        Ok(self.predict_unchecked(sample))
    }

    /// Predict without validating the sample. Callers must have checked it.
    pub(crate) fn predict_unchecked(&self, sample: &[u8]) -> u8 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { label, .. } => return *label,
                Node::Split {
                    feature, zero, one, ..
                } => {
                    idx = if sample[feature.index()] == 0 {
                        zero.index()
                    } else {
                        one.index()
                    };
                }
            }
        }
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Return the node stored at `idx`.
    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.index()]
    }

    /// Return every node in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the number of features the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Compute gain-based feature importances.
    ///
    /// Each split contributes `n_samples * gain` to its feature, then the
    /// totals are normalized to sum to 1.0. All zeros for a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                gain,
                n_samples,
                ..
            } = node
            {
                totals[feature.index()] += *n_samples as f64 * gain;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree. A lone root leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { zero, one, .. } => {
                    queue.push_back((zero.index(), d + 1));
                    queue.push_back((one.index(), d + 1));
                }
            }
        }

        max_depth
    }
}

impl Classifier for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error> {
        DecisionTree::predict(self, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feature 0 copies the label, feature 1 is noise.
    fn separable() -> TrainingSet {
        TrainingSet::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn splits_on_separating_feature_at_root() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let Node::Split {
            feature, zero, one, ..
        } = tree.root()
        else {
            panic!("root should split");
        };
        assert_eq!(feature.index(), 0);
        assert_eq!(tree.node(*zero).label(), Some(0));
        assert_eq!(tree.node(*one).label(), Some(1));
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.predict(&[1, 0]).unwrap(), 1);
        assert_eq!(tree.predict(&[0, 1]).unwrap(), 0);
    }

    #[test]
    fn pure_subset_is_single_leaf() {
        let set = TrainingSet::new(vec![vec![0, 1], vec![1, 0], vec![1, 1]], vec![1, 1, 1]).unwrap();
        let tree = DecisionTreeConfig::new().fit(&set).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.root().label(), Some(1));
        assert_eq!(tree.predict(&[0, 0]).unwrap(), 1);
    }

    #[test]
    fn no_features_gives_majority_leaf() {
        let set = separable();
        let tree = DecisionTreeConfig::new()
            .with_features(Some(vec![]))
            .with_examples(Some(vec![0, 2, 3]))
            .fit(&set)
            .unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.root().label(), Some(1));
    }

    #[test]
    fn no_features_tie_gives_zero() {
        let tree = DecisionTreeConfig::new()
            .with_features(Some(vec![]))
            .fit(&separable())
            .unwrap();
        assert_eq!(tree.root().label(), Some(0));
    }

    #[test]
    fn empty_examples_gives_zero_leaf() {
        let tree = DecisionTreeConfig::new()
            .with_examples(Some(vec![]))
            .fit(&separable())
            .unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.root().label(), Some(0));
    }

    #[test]
    fn zero_gain_stops_with_majority() {
        // XOR: no single feature has positive gain, and the labels tie.
        let set = TrainingSet::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 1, 1, 0],
        )
        .unwrap();
        let tree = DecisionTreeConfig::new().fit(&set).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.root().label(), Some(0));
    }

    #[test]
    fn restricted_to_noise_feature() {
        let tree = DecisionTreeConfig::new()
            .with_features(Some(vec![1]))
            .fit(&separable())
            .unwrap();
        // Feature 1 carries no information about the label.
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn relabel_overwrites_placeholder_leaf() {
        let mut arena = vec![Node::Leaf {
            label: 0,
            n_samples: 0,
            counts: [0, 0],
        }];
        relabel(&mut arena, NodeIndex::new(0), 1);
        assert_eq!(arena[0].label(), Some(1));
    }

    #[test]
    fn relabel_ignores_split_nodes() {
        let split = Node::Split {
            feature: FeatureIndex::new(0),
            zero: NodeIndex::new(1),
            one: NodeIndex::new(2),
            n_samples: 2,
            entropy: entropy([1, 1]),
            gain: 1.0,
        };
        let mut arena = vec![split.clone()];
        relabel(&mut arena, NodeIndex::new(0), 1);
        assert_eq!(arena[0], split);
    }

    #[test]
    fn feature_never_reused_on_path() {
        // Feature 3 duplicates feature 0; label is a AND (b OR c).
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for a in 0..2u8 {
            for b in 0..2u8 {
                for c in 0..2u8 {
                    rows.push(vec![a, b, c, a]);
                    labels.push(a & (b | c));
                }
            }
        }
        let set = TrainingSet::new(rows.clone(), labels.clone()).unwrap();
        let tree = DecisionTreeConfig::new().fit(&set).unwrap();

        fn walk(tree: &DecisionTree, idx: NodeIndex, seen: &mut Vec<usize>) {
            if let Node::Split {
                feature, zero, one, ..
            } = tree.node(idx)
            {
                assert!(!seen.contains(&feature.index()), "feature reused on path");
                seen.push(feature.index());
                walk(tree, *zero, seen);
                walk(tree, *one, seen);
                seen.pop();
            }
        }
        walk(&tree, NodeIndex::new(0), &mut Vec::new());

        for (row, &label) in rows.iter().zip(&labels) {
            assert_eq!(tree.predict(row).unwrap(), label);
        }
    }

    #[test]
    fn sibling_subtrees_both_split_on_same_feature() {
        // Label is b when a = 1 and NOT b when a = 0. The a = 1 rows are
        // doubled so b carries gain at the root and a carries none.
        let rows = vec![
            vec![1, 0],
            vec![1, 0],
            vec![1, 1],
            vec![1, 1],
            vec![0, 0],
            vec![0, 1],
        ];
        let labels = vec![0, 0, 1, 1, 1, 0];
        let set = TrainingSet::new(rows.clone(), labels.clone()).unwrap();
        let tree = DecisionTreeConfig::new().fit(&set).unwrap();

        let Node::Split {
            feature, zero, one, ..
        } = tree.root()
        else {
            panic!("root should split");
        };
        assert_eq!(feature.index(), 1);
        assert_eq!(tree.node(*zero).feature().map(|f| f.index()), Some(0));
        assert_eq!(tree.node(*one).feature().map(|f| f.index()), Some(0));

        for (row, &label) in rows.iter().zip(&labels) {
            assert_eq!(tree.predict(row).unwrap(), label);
        }
    }

    #[test]
    fn rebuild_is_identical() {
        let set = separable();
        let config = DecisionTreeConfig::new();
        let a = config.fit(&set).unwrap();
        let b = config.fit(&set).unwrap();
        assert_eq!(a, b);
        for row in set.rows() {
            assert_eq!(a.predict(row).unwrap(), b.predict(row).unwrap());
        }
    }

    #[test]
    fn feature_out_of_range_error() {
        let err = DecisionTreeConfig::new()
            .with_features(Some(vec![0, 2]))
            .fit(&separable())
            .unwrap_err();
        assert_eq!(
            err,
            Id3Error::FeatureOutOfRange {
                feature: 2,
                n_features: 2
            }
        );
    }

    #[test]
    fn duplicate_feature_error() {
        let err = DecisionTreeConfig::new()
            .with_features(Some(vec![1, 1]))
            .fit(&separable())
            .unwrap_err();
        assert_eq!(err, Id3Error::DuplicateFeature { feature: 1 });
    }

    #[test]
    fn example_out_of_range_error() {
        let err = DecisionTreeConfig::new()
            .with_examples(Some(vec![0, 9]))
            .fit(&separable())
            .unwrap_err();
        assert_eq!(
            err,
            Id3Error::ExampleOutOfRange {
                example: 9,
                n_examples: 4
            }
        );
    }

    #[test]
    fn prediction_feature_mismatch() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let err = tree.predict(&[1]).unwrap_err();
        assert_eq!(
            err,
            Id3Error::PredictionFeatureMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn prediction_non_binary_value() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let err = tree.predict(&[0, 5]).unwrap_err();
        assert_eq!(
            err,
            Id3Error::NonBinaryPredictionValue {
                feature_index: 1,
                value: 5
            }
        );
    }

    #[test]
    fn importances_favor_split_feature() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let importances = tree.feature_importances();
        assert!((importances[0] - 1.0).abs() < 1e-12);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn single_leaf_importances_are_zero() {
        let tree = DecisionTreeConfig::new()
            .with_features(Some(vec![]))
            .fit(&separable())
            .unwrap();
        assert_eq!(tree.feature_importances(), vec![0.0, 0.0]);
        assert_eq!(tree.depth(), 0);
    }
}
