//! Feature weight update rules.
//!
//! | Rule | Used by | Formula |
//! |------|---------|---------|
//! | Single neighbor | Relief | `w −= diff(e,h)/M, w += diff(e,m)/M` |
//! | k neighbors | ReliefF | hits and prior-weighted misses, averaged over k |
//! | Probability weighted | I-Relief | `ν = (1/N) Σᵢ γᵢ (m̄ᵢ − h̄ᵢ)`, clipped and normalised |
//!
//! `diff` is the absolute difference scaled by the feature range plus
//! [`RANGE_EPSILON`], so constant features contribute zero instead of NaN.

use rayon::prelude::*;

use crate::config::Kernel;
use crate::dataset::Dataset;
use crate::error::ReliefError;
use crate::pairwise::DistanceMatrix;

/// Added to every feature range before dividing by it.
pub const RANGE_EPSILON: f64 = 1e-10;

/// Adds `scale · |a[t] − b[t]| / (range[t] + ε)` to every weight.
#[inline]
pub(crate) fn add_scaled_diff(
    weights: &mut [f64],
    a: &[f64],
    b: &[f64],
    ranges: &[f64],
    scale: f64,
) {
    debug_assert_eq!(weights.len(), a.len());
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), ranges.len());
    for t in 0..weights.len() {
        weights[t] += scale * (a[t] - b[t]).abs() / (ranges[t] + RANGE_EPSILON);
    }
}

/// Single-neighbor Relief update for one sampled example.
///
/// A missing hit (the example is alone in its class) contributes nothing.
pub(crate) fn relief_update(
    weights: &mut [f64],
    example: &[f64],
    hit: Option<&[f64]>,
    miss: &[f64],
    ranges: &[f64],
    m: usize,
) {
    let scale = 1.0 / m as f64;
    if let Some(hit) = hit {
        add_scaled_diff(weights, example, hit, ranges, -scale);
    }
    add_scaled_diff(weights, example, miss, ranges, scale);
}

/// Per-example mean absolute differences, each `[n_examples × n_features]`.
///
/// Returns `(margin, within)`: `margin` averages over examples of other
/// classes, `within` over other examples of the same class. `within` is zero
/// for an example that is alone in its class.
///
/// # Errors
///
/// Returns [`ReliefError::InsufficientNeighbors`] if every example shares a
/// single class.
pub(crate) fn mean_differences(dataset: &Dataset<'_>) -> Result<(Vec<f64>, Vec<f64>), ReliefError> {
    let n = dataset.n_examples();
    let p = dataset.n_features();
    let classes = dataset.classes();
    let counts = dataset.class_counts();
    if counts.iter().any(|&c| c == n) {
        return Err(ReliefError::InsufficientNeighbors { sample: 0 });
    }

    let mut margin = vec![0.0; n * p];
    let mut within = vec![0.0; n * p];
    margin
        .par_chunks_mut(p)
        .zip(within.par_chunks_mut(p))
        .enumerate()
        .for_each(|(i, (m_row, h_row))| {
            let e = dataset.row(i);
            let class = classes[i];
            for j in (0..n).filter(|&j| j != i) {
                let acc = if classes[j] == class {
                    &mut *h_row
                } else {
                    &mut *m_row
                };
                for (a, (x, y)) in acc.iter_mut().zip(e.iter().zip(dataset.row(j))) {
                    *a += (x - y).abs();
                }
            }

            let n_miss = (n - counts[class]) as f64;
            m_row.iter_mut().for_each(|v| *v /= n_miss);
            let n_hit = counts[class] - 1;
            if n_hit > 0 {
                h_row.iter_mut().for_each(|v| *v /= n_hit as f64);
            }
        });

    Ok((margin, within))
}

/// Probability that each example is an inlier, `γᵢ = 1 − P(outlier)`.
///
/// `P(outlier)` is the kernel mass of the example's different-class neighbors
/// relative to all its neighbors. Kernel values are shifted by the row
/// maximum before summing, so tiny widths cannot underflow into `0 / 0`.
pub(crate) fn inlier_probabilities(
    dist: &DistanceMatrix,
    classes: &[usize],
    kernel: Kernel,
) -> Vec<f64> {
    let n = dist.n();
    debug_assert_eq!(classes.len(), n);
    (0..n)
        .map(|i| {
            let row = dist.row(i);
            let others = || row.iter().enumerate().filter(move |&(j, _)| j != i);
            let g_min = others()
                .map(|(_, &d)| kernel.exponent(d))
                .fold(f64::INFINITY, f64::min);

            let mut across = 0.0;
            let mut total = 0.0;
            for (j, &d) in others() {
                let k = if g_min.is_finite() {
                    (g_min - kernel.exponent(d)).exp()
                } else {
                    1.0
                };
                total += k;
                if classes[j] != classes[i] {
                    across += k;
                }
            }
            if total > 0.0 { 1.0 - across / total } else { 1.0 }
        })
        .collect()
}

/// Aggregates `ν[t] = (1/N) Σᵢ γᵢ (margin[i,t] − within[i,t])`.
pub(crate) fn nu(gamma: &[f64], margin: &[f64], within: &[f64], n_features: usize) -> Vec<f64> {
    let n = gamma.len();
    let mut out = vec![0.0; n_features];
    for (i, &g) in gamma.iter().enumerate() {
        let m_row = &margin[i * n_features..(i + 1) * n_features];
        let h_row = &within[i * n_features..(i + 1) * n_features];
        for t in 0..n_features {
            out[t] += g * (m_row[t] - h_row[t]);
        }
    }
    out.iter_mut().for_each(|v| *v /= n as f64);
    out
}

/// Clips negative components to zero and, if `normalize`, scales to unit L2 norm.
///
/// # Errors
///
/// Returns [`ReliefError::DegenerateWeights`] if normalisation is requested
/// and the clipped vector is all zeros.
pub(crate) fn clip_and_normalize(nu: &[f64], normalize: bool) -> Result<Vec<f64>, ReliefError> {
    let clipped: Vec<f64> = nu.iter().map(|&v| v.max(0.0)).collect();
    if !normalize {
        return Ok(clipped);
    }
    let norm = rba_stats::l2_norm(&clipped);
    if norm == 0.0 || !norm.is_finite() {
        return Err(ReliefError::DegenerateWeights);
    }
    Ok(clipped.into_iter().map(|v| v / norm).collect())
}
