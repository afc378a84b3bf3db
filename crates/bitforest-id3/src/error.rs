/// Errors from tree induction, forest construction, prediction, and evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Id3Error {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when the training set has zero examples.
    #[error("training set has zero examples")]
    EmptyDataset,

    /// Returned when the training set has zero feature columns.
    #[error("training set has zero feature columns")]
    ZeroFeatures,

    /// Returned when an example has a different number of features than the first row.
    #[error("example {example_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the example.
        got: usize,
        /// The zero-based index of the offending example.
        example_index: usize,
    },

    /// Returned when the number of labels differs from the number of examples.
    #[error("got {n_labels} labels for {n_examples} examples")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_examples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a training feature value is neither 0 nor 1.
    #[error("non-binary value {value} at example {example_index}, feature {feature_index}")]
    NonBinaryValue {
        /// The zero-based index of the offending example.
        example_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
        /// The value found.
        value: u8,
    },

    /// Returned when a training label is neither 0 nor 1.
    #[error("non-binary label {label} at example {example_index}")]
    NonBinaryLabel {
        /// The zero-based index of the offending example.
        example_index: usize,
        /// The label found.
        label: u8,
    },

    /// Returned when a requested feature index does not exist in the training set.
    #[error("feature {feature} is out of range for {n_features} features")]
    FeatureOutOfRange {
        /// The requested feature index.
        feature: usize,
        /// The number of features in the training set.
        n_features: usize,
    },

    /// Returned when a feature subset lists the same feature twice.
    #[error("feature {feature} appears more than once in the feature subset")]
    DuplicateFeature {
        /// The repeated feature index.
        feature: usize,
    },

    /// Returned when a requested example index does not exist in the training set.
    #[error("example {example} is out of range for {n_examples} examples")]
    ExampleOutOfRange {
        /// The requested example index.
        example: usize,
        /// The number of examples in the training set.
        n_examples: usize,
    },

    /// Returned when a forest is requested on fewer than two features.
    ///
    /// Each tree draws between 1 and `n_features - 1` features, so at least
    /// two features are required.
    #[error("forest training needs at least 2 features, got {n_features}")]
    TooFewFeatures {
        /// The number of features in the training set.
        n_features: usize,
    },

    /// Returned when a prediction input has the wrong number of features.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a prediction input holds a value other than 0 or 1.
    #[error("prediction input has non-binary value {value} at feature {feature_index}")]
    NonBinaryPredictionValue {
        /// The zero-based index of the offending feature.
        feature_index: usize,
        /// The value found.
        value: u8,
    },

    /// Returned when a hold-out fraction is outside [0.0, 1.0).
    #[error("holdout fraction must be in [0.0, 1.0), got {fraction}")]
    InvalidHoldoutFraction {
        /// The invalid fraction provided.
        fraction: f64,
    },
}
