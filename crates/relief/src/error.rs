//! Error types for the rba-relief crate.

/// Error type for all fallible operations in the rba-relief crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReliefError {
    /// Returned when a distance mode selector is neither `paired` nor `indexed`.
    #[error("unknown distance mode {mode:?}, expected \"paired\" or \"indexed\"")]
    InvalidMode {
        /// The rejected selector.
        mode: String,
    },

    /// Returned when a sampled example has no example of a different class.
    #[error("example {sample} has no neighbors of a different class")]
    InsufficientNeighbors {
        /// Index of the example whose neighbors could not be determined.
        sample: usize,
    },

    /// Returned when the clipped weight vector is all zeros and cannot be normalised.
    #[error("weight vector is zero after clipping and cannot be normalised")]
    DegenerateWeights,

    /// Returned when the data slice is empty.
    #[error("no examples provided")]
    EmptyData,

    /// Returned when the data length is not divisible by n_features (or n_features is zero).
    #[error("data length {len} is not divisible by n_features {n_features}")]
    DataShapeMismatch {
        /// Length of the data slice.
        len: usize,
        /// Declared number of features.
        n_features: usize,
    },

    /// Returned when the target length does not match the number of examples.
    #[error("target length {target} does not match {n_examples} examples")]
    TargetLengthMismatch {
        /// Length of the target slice.
        target: usize,
        /// Number of rows in the data matrix.
        n_examples: usize,
    },

    /// Returned when a required input contains NaN or infinity.
    #[error("non-finite value in {input}")]
    NonFiniteInput {
        /// Name of the input containing the non-finite value.
        input: &'static str,
    },

    /// Returned when the sample count is zero or exceeds the number of examples.
    #[error("sample count must be in 1..={n_examples}, got {m}")]
    InvalidSampleCount {
        /// The invalid sample count.
        m: usize,
        /// Number of examples available for sampling.
        n_examples: usize,
    },

    /// Returned when the neighbor count k is zero.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when the kernel width is non-finite or non-positive.
    #[error("kernel width must be finite and positive, got {width}")]
    InvalidKernelWidth {
        /// The invalid width.
        width: f64,
    },

    /// Returned when the convergence threshold is non-finite or negative.
    #[error("convergence threshold must be finite and non-negative, got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: f64,
    },

    /// Returned when the initial weight divisor is non-finite or non-positive.
    #[error("initial weight divisor must be finite and positive, got {divisor}")]
    InvalidDivisor {
        /// The invalid divisor.
        divisor: f64,
    },

    /// Returned when the iteration budget is zero.
    #[error("max_iter must be >= 1, got {max_iter}")]
    InvalidMaxIter {
        /// The invalid iteration budget.
        max_iter: usize,
    },

    /// Returned when a projection matrix does not have `n_features × n_components` entries.
    #[error(
        "projection length {len} does not match {n_features} features × {n_components} components"
    )]
    ProjectionShapeMismatch {
        /// Length of the projection slice.
        len: usize,
        /// Number of input features.
        n_features: usize,
        /// Requested number of output components.
        n_components: usize,
    },

    /// Returned when a learned metric's vectors do not have one component per
    /// feature, so weighted distances cannot be applied in it.
    #[error(
        "learned metric has {n_components} components, expected one per feature ({n_features})"
    )]
    LearnedDimensionMismatch {
        /// Dimension of the learned space.
        n_components: usize,
        /// Number of features, and of weights.
        n_features: usize,
    },

    /// Returned when the feature covariance matrix cannot be inverted.
    #[error("feature covariance matrix is singular (pivot {pivot} at feature {feature})")]
    SingularCovariance {
        /// Feature at which the Cholesky factorisation broke down.
        feature: usize,
        /// The non-positive (or negligible) pivot.
        pivot: f64,
    },

    /// Returned when a selected column index is out of range.
    #[error("column {index} is out of range for {n_features} features")]
    ColumnOutOfRange {
        /// The offending column index.
        index: usize,
        /// Number of features in the matrix.
        n_features: usize,
    },
}
