//! Output type for feature weighting runs.

use crate::rank::rank_descending;

/// Feature weights together with their ordinal ranking.
///
/// Rank 1 is the feature with the largest weight; ties are broken by feature
/// position so the ranks are always a permutation of `1..=n_features`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRanking {
    /// Rank of each feature (1-based).
    ranks: Vec<usize>,
    /// Final weight of each feature.
    weights: Vec<f64>,
}

impl FeatureRanking {
    /// Ranks `weights` and wraps both.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self {
            ranks: rank_descending(&weights),
            weights,
        }
    }

    /// Returns the rank of each feature.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Returns the weight of each feature.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Consumes the ranking, returning `(ranks, weights)`.
    pub fn into_parts(self) -> (Vec<usize>, Vec<f64>) {
        (self.ranks, self.weights)
    }

    /// Indices of the `n` best-ranked features, in feature order.
    pub fn top(&self, n: usize) -> Vec<usize> {
        self.ranks
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r <= n)
            .map(|(t, _)| t)
            .collect()
    }

    /// Indices of the features whose weight is at least `threshold`, in feature order.
    pub fn above(&self, threshold: f64) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w >= threshold)
            .map(|(t, _)| t)
            .collect()
    }
}
