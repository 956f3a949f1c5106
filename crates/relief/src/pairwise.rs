//! Pairwise distance matrices.

use rayon::prelude::*;

use crate::dataset::validate_shape;
use crate::error::ReliefError;
use crate::metric::{Distance, LearnedMetric, PairedFn};

/// Symmetric `n × n` distance matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Returns the number of examples.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the distance between examples `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Returns the distances from example `i` to every example.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Returns the row-major values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// A precomputed matrix serves as a fixed learned metric: lookups by index
/// with the base distance ignored. This is how index-based dissimilarities
/// reach the algorithms; under I-Relief the distances then stay fixed while
/// the weights are refined.
impl LearnedMetric for DistanceMatrix {
    fn distance(&self, _base: &PairedFn<'_>, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
}

/// Computes the full pairwise distance matrix of the row-major `data`.
///
/// Only the strict upper triangle is evaluated (one call per unordered pair);
/// it is mirrored into the lower triangle and the diagonal is zero. Rows are
/// independent and evaluated in parallel, so paired and indexed distances
/// give identical matrices whenever they agree pair by pair.
///
/// # Errors
///
/// Returns [`ReliefError`] if `data` is empty or not a multiple of `n_features`.
pub fn pairwise_distances(
    data: &[f64],
    n_features: usize,
    distance: &Distance<'_>,
) -> Result<DistanceMatrix, ReliefError> {
    validate_shape(data, n_features)?;
    Ok(pairwise_distances_unchecked(data, n_features, distance))
}

/// Internal implementation that assumes the shape is validated.
pub(crate) fn pairwise_distances_unchecked(
    data: &[f64],
    n_features: usize,
    distance: &Distance<'_>,
) -> DistanceMatrix {
    let n = data.len() / n_features;
    let mut values = vec![0.0; n * n];

    values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        for (j, out) in row.iter_mut().enumerate().skip(i + 1) {
            *out = distance.between(data, n_features, i, j);
        }
    });

    for i in 1..n {
        for j in 0..i {
            values[i * n + j] = values[j * n + i];
        }
    }

    DistanceMatrix { n, values }
}

/// Writes the distances from example `sample` to every example into `out`.
///
/// The self-distance is evaluated like any other entry; neighbor selection
/// excludes it.
pub(crate) fn distances_from(
    data: &[f64],
    n_features: usize,
    distance: &Distance<'_>,
    sample: usize,
    out: &mut Vec<f64>,
) {
    let n = data.len() / n_features;
    out.clear();
    out.extend((0..n).map(|j| distance.between(data, n_features, sample, j)));
}
