//! Validated, read-only view of a labelled example matrix.

use crate::error::ReliefError;

/// A row-major example matrix `[n_examples × n_features]` paired with class labels.
///
/// Labels are accepted as `f64` (integer or float encoded) and mapped once to
/// dense class ids `0..n_classes` in order of first appearance. The data itself
/// is borrowed and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset<'a> {
    data: &'a [f64],
    n_features: usize,
    classes: Vec<usize>,
    n_classes: usize,
}

impl<'a> Dataset<'a> {
    /// Validates `data` and `target` and builds the class id table.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError`] if the data is empty, its length is not a
    /// multiple of `n_features`, the target length differs from the number of
    /// rows, or either input contains a non-finite value.
    pub fn new(data: &'a [f64], n_features: usize, target: &[f64]) -> Result<Self, ReliefError> {
        let n_examples = validate_shape(data, n_features)?;

        if target.len() != n_examples {
            return Err(ReliefError::TargetLengthMismatch {
                target: target.len(),
                n_examples,
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ReliefError::NonFiniteInput { input: "data" });
        }
        if target.iter().any(|v| !v.is_finite()) {
            return Err(ReliefError::NonFiniteInput { input: "target" });
        }

        let mut labels: Vec<f64> = Vec::new();
        let classes = target
            .iter()
            .map(|&label| match labels.iter().position(|&l| l == label) {
                Some(id) => id,
                None => {
                    labels.push(label);
                    labels.len() - 1
                }
            })
            .collect();

        Ok(Self {
            data,
            n_features,
            classes,
            n_classes: labels.len(),
        })
    }

    /// Returns the number of examples (rows).
    pub fn n_examples(&self) -> usize {
        self.classes.len()
    }

    /// Returns the number of features (columns).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Returns the number of distinct classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Returns the flat row-major data.
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Returns row `i`.
    pub fn row(&self, i: usize) -> &'a [f64] {
        &self.data[i * self.n_features..(i + 1) * self.n_features]
    }

    /// Returns the dense class id of every example.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Returns the number of examples in each class, indexed by class id.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }

    /// Returns the relative frequency of each class, indexed by class id.
    pub fn class_priors(&self) -> Vec<f64> {
        let n = self.n_examples() as f64;
        self.class_counts().iter().map(|&c| c as f64 / n).collect()
    }

    /// Returns the per-feature range `max − min` over all examples.
    pub fn ranges(&self) -> Vec<f64> {
        rba_stats::feature_ranges(self.data, self.n_features)
    }
}

/// Checks that `data` is a non-empty `[n × n_features]` matrix and returns `n`.
pub(crate) fn validate_shape(data: &[f64], n_features: usize) -> Result<usize, ReliefError> {
    if n_features == 0 {
        return Err(ReliefError::DataShapeMismatch {
            len: data.len(),
            n_features,
        });
    }
    if data.is_empty() {
        return Err(ReliefError::EmptyData);
    }
    if !data.len().is_multiple_of(n_features) {
        return Err(ReliefError::DataShapeMismatch {
            len: data.len(),
            n_features,
        });
    }
    Ok(data.len() / n_features)
}
