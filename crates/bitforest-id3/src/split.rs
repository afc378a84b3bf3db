use std::collections::BTreeSet;

use crate::dataset::{LabelCounts, TrainingSet};
use crate::node::{Entropy, FeatureIndex};

/// Gains at or below this many bits are treated as zero.
pub(crate) const GAIN_TOLERANCE: f64 = 1e-12;

/// Binary label entropy in bits: `-Σ p·log2(p)`.
///
/// Returns zero for an empty or pure count pair.
#[must_use]
pub fn entropy(counts: LabelCounts) -> Entropy {
    let total = counts[0] + counts[1];
    if total == 0 {
        return Entropy::new(0.0);
    }
    let n = total as f64;
    let value = -counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.log2()
        })
        .sum::<f64>();
    Entropy::new(value)
}

/// Information gain of a binary split.
///
/// `partition[value][label]` counts examples with the given feature value
/// and label. Gain is the parent entropy minus the size-weighted entropy of
/// the two value partitions.
#[must_use]
pub fn information_gain(partition: [LabelCounts; 2]) -> f64 {
    let parent = [
        partition[0][0] + partition[1][0],
        partition[0][1] + partition[1][1],
    ];
    let n = (parent[0] + parent[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let children: f64 = partition
        .iter()
        .map(|counts| {
            let size = (counts[0] + counts[1]) as f64;
            (size / n) * entropy(*counts).bits()
        })
        .sum();
    entropy(parent).bits() - children
}

/// Result of choosing the best feature for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Information gain of this split, in bits.
    pub(crate) gain: f64,
    /// Example indices with feature value 0.
    pub(crate) zero_indices: Vec<usize>,
    /// Example indices with feature value 1.
    pub(crate) one_indices: Vec<usize>,
}

/// Tally `[value][label]` counts of one feature over the examples.
fn partition_counts(set: &TrainingSet, feature: usize, examples: &[usize]) -> [LabelCounts; 2] {
    let mut counts = [[0usize; 2]; 2];
    for &ex in examples {
        let value = usize::from(set.value(ex, feature));
        counts[value][usize::from(set.label(ex))] += 1;
    }
    counts
}

/// Find the eligible feature with the highest information gain.
///
/// Features are scored in ascending index order and only a strictly greater
/// gain replaces the current best, so ties go to the lowest index.
///
/// Returns `None` when no feature has a gain above [`GAIN_TOLERANCE`],
/// including when `eligible` or `examples` is empty.
pub(crate) fn find_best_split(
    set: &TrainingSet,
    eligible: &BTreeSet<FeatureIndex>,
    examples: &[usize],
) -> Option<SplitResult> {
    if examples.is_empty() {
        return None;
    }

    let mut best: Option<(FeatureIndex, f64)> = None;
    for &feature in eligible {
        let gain = information_gain(partition_counts(set, feature.index(), examples));
        if best.is_none_or(|(_, best_gain)| gain > best_gain) {
            best = Some((feature, gain));
        }
    }

    let (feature, gain) = best?;
    if gain <= GAIN_TOLERANCE {
        return None;
    }

    let (one_indices, zero_indices): (Vec<usize>, Vec<usize>) = examples
        .iter()
        .partition(|&&ex| set.value(ex, feature.index()) == 1);

    Some(SplitResult {
        feature,
        gain,
        zero_indices,
        one_indices,
    })
}
