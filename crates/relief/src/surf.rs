//! Threshold-neighborhood members of the family: SURF, SURF*, MultiSURF and MultiSURF*.
//!
//! Instead of a fixed number of neighbors, every example within a distance
//! threshold counts:
//!
//! | Rule | Near | Far |
//! |------|------|-----|
//! | SURF | `d < T` | none |
//! | SURF* | `d < T` | `d > T` |
//! | MultiSURF | `d < Tᵢ − σᵢ/2` | none |
//! | MultiSURF* | `d < Tᵢ − σᵢ/2` | `d > Tᵢ + σᵢ/2` |
//!
//! Near neighbors update the weights like ReliefF: hits subtract, misses of
//! class `c` add with weight `P(c) / (1 − P(class(e)))`, and every group is
//! averaged over its size. Far neighbors contribute with the opposite sign.

use tracing::debug;

use crate::config::{Neighborhood, SurfConfig};
use crate::dataset::Dataset;
use crate::error::ReliefError;
use crate::metric::{Distance, PairedFn};
use crate::pairwise::{DistanceMatrix, pairwise_distances_unchecked};
use crate::result::FeatureRanking;
use crate::select::members_where;
use crate::update::add_scaled_diff;

/// Near and far distance thresholds of one example.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    near: f64,
    far: Option<f64>,
}

/// SURF family: weights from every neighbor within a distance threshold.
///
/// Every example is visited once, so the result is deterministic. An example
/// with an empty neighborhood contributes nothing.
///
/// # Errors
///
/// Returns [`ReliefError`] on invalid input, and
/// [`ReliefError::InsufficientNeighbors`] if there is only one class.
///
/// # Example
///
/// ```
/// use rba_relief::{Neighborhood, SurfConfig, euclidean, surf};
///
/// let data = [0.0, 0.3, 0.1, 0.9, 0.2, 0.5, 1.0, 0.2, 0.9, 0.8, 1.1, 0.6];
/// let target = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
/// let cfg = SurfConfig::new(Neighborhood::Surf);
/// let ranking = surf(&data, 2, &target, &euclidean, &cfg).unwrap();
/// assert_eq!(ranking.ranks(), &[1, 2]);
/// ```
#[tracing::instrument(
    skip(data, target, distance, config),
    fields(neighborhood = config.neighborhood().name())
)]
pub fn surf(
    data: &[f64],
    n_features: usize,
    target: &[f64],
    distance: &PairedFn<'_>,
    config: &SurfConfig,
) -> Result<FeatureRanking, ReliefError> {
    let dataset = Dataset::new(data, n_features, target)?;
    let n = dataset.n_examples();
    let ranges = dataset.ranges();
    let priors = dataset.class_priors();
    let distance = Distance::compose(distance, config.learned_metric());
    let dist = pairwise_distances_unchecked(data, n_features, &distance);
    let neighborhood = config.neighborhood();
    let global = mean_pairwise(&dist);
    debug!(n, global, "surf start");

    let classes = dataset.classes();
    let mut weights = vec![0.0; n_features];
    let mut others = Vec::with_capacity(n);
    let mut group = Vec::with_capacity(n);
    for sample in 0..n {
        let class = classes[sample];
        if priors[class] >= 1.0 {
            return Err(ReliefError::InsufficientNeighbors { sample });
        }
        let row = dist.row(sample);
        let th = thresholds(neighborhood, global, row, sample, &mut others);
        let e = dataset.row(sample);

        for c in 0..dataset.n_classes() {
            let sign = if c == class {
                -1.0
            } else {
                priors[c] / (1.0 - priors[class])
            };

            members_where(classes, c, sample, row, |d| d < th.near, &mut group);
            if !group.is_empty() {
                let scale = sign / (n * group.len()) as f64;
                for &j in &group {
                    add_scaled_diff(&mut weights, e, dataset.row(j), &ranges, scale);
                }
            }

            if let Some(far) = th.far {
                members_where(classes, c, sample, row, |d| d > far, &mut group);
                if !group.is_empty() {
                    let scale = -sign / (n * group.len()) as f64;
                    for &j in &group {
                        add_scaled_diff(&mut weights, e, dataset.row(j), &ranges, scale);
                    }
                }
            }
        }
    }

    Ok(FeatureRanking::from_weights(weights))
}

/// Mean over all unordered pairs of distinct examples; zero for a single example.
fn mean_pairwise(dist: &DistanceMatrix) -> f64 {
    let n = dist.n();
    if n < 2 {
        return 0.0;
    }
    let sum: f64 = (0..n).map(|i| dist.row(i)[i + 1..].iter().sum::<f64>()).sum();
    sum / (n * (n - 1) / 2) as f64
}

/// Thresholds for `sample` given its distance `row`; `others` is scratch space.
fn thresholds(
    neighborhood: Neighborhood,
    global: f64,
    row: &[f64],
    sample: usize,
    others: &mut Vec<f64>,
) -> Thresholds {
    if !neighborhood.is_adaptive() {
        return Thresholds {
            near: global,
            far: neighborhood.uses_far().then_some(global),
        };
    }
    others.clear();
    others.extend(
        row.iter()
            .enumerate()
            .filter(|&(j, _)| j != sample)
            .map(|(_, &d)| d),
    );
    let mean = rba_stats::mean(others);
    let half = rba_stats::sd(others) / 2.0;
    Thresholds {
        near: mean - half,
        far: neighborhood.uses_far().then_some(mean + half),
    }
}
