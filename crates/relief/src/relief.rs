//! Sampling members of the family: Relief, ReliefF and the random baseline.

use rand::Rng;
use tracing::debug;

use crate::config::{ReliefConfig, ReliefFConfig, resolve_n_samples};
use crate::dataset::Dataset;
use crate::error::ReliefError;
use crate::metric::{Distance, PairedFn};
use crate::pairwise::distances_from;
use crate::result::FeatureRanking;
use crate::select::{k_nearest_in_class, nearest_hit_miss};
use crate::update::{add_scaled_diff, relief_update};

/// Scratch buffers reused across the sampled examples of one run.
#[derive(Debug, Default)]
struct Scratch {
    /// Distances from the current sample to every example.
    dists: Vec<f64>,
    /// (distance, index) pairs for sorting.
    pairs: Vec<(f64, usize)>,
    /// Neighbor indices of the current group.
    neighbors: Vec<usize>,
}

impl Scratch {
    fn new(n_examples: usize) -> Self {
        Self {
            dists: Vec::with_capacity(n_examples),
            pairs: Vec::with_capacity(n_examples),
            neighbors: Vec::with_capacity(n_examples),
        }
    }
}

/// Relief: weights from the nearest hit and nearest miss of `M` sampled examples.
///
/// Weights start at zero. Each sampled example `e` moves every weight by
/// `(diff(e, miss) − diff(e, hit)) / M`, where `diff` is the range-normalised
/// absolute difference. An example alone in its class has no hit and only
/// the miss term applies.
///
/// # Arguments
///
/// * `data`: flat row-major matrix `[n_examples × n_features]`
/// * `n_features`: number of features per example
/// * `target`: class label of each example
/// * `distance`: paired distance, or the base distance of the learned metric
/// * `config`: sample count and optional learned metric
/// * `rng`: source of the sampled examples
///
/// # Errors
///
/// Returns [`ReliefError`] on invalid input or configuration, and
/// [`ReliefError::InsufficientNeighbors`] if a sampled example has no
/// example of another class.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rba_relief::{ReliefConfig, euclidean, relief};
///
/// let data = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
/// let target = [0.0, 0.0, 1.0, 1.0];
/// let mut rng = StdRng::seed_from_u64(7);
/// let ranking = relief(&data, 2, &target, &euclidean, &ReliefConfig::new(), &mut rng).unwrap();
/// assert_eq!(ranking.ranks(), &[1, 2]);
/// ```
#[tracing::instrument(
    skip(data, target, distance, config, rng),
    fields(n_samples = ?config.n_samples())
)]
pub fn relief(
    data: &[f64],
    n_features: usize,
    target: &[f64],
    distance: &PairedFn<'_>,
    config: &ReliefConfig,
    rng: &mut impl Rng,
) -> Result<FeatureRanking, ReliefError> {
    config.validate()?;
    let dataset = Dataset::new(data, n_features, target)?;
    let n = dataset.n_examples();
    let m = resolve_n_samples(config.n_samples(), n)?;
    let ranges = dataset.ranges();
    let distance = Distance::compose(distance, config.learned_metric());
    debug!(n, m, mode = %distance.mode(), "relief start");

    let mut weights = vec![0.0; n_features];
    let mut scratch = Scratch::new(n);
    for sample in rand::seq::index::sample(rng, n, m) {
        distances_from(data, n_features, &distance, sample, &mut scratch.dists);
        let nb = nearest_hit_miss(dataset.classes(), sample, &scratch.dists)?;
        relief_update(
            &mut weights,
            dataset.row(sample),
            nb.hit.map(|h| dataset.row(h)),
            dataset.row(nb.miss),
            &ranges,
            m,
        );
    }

    Ok(FeatureRanking::from_weights(weights))
}

/// ReliefF: Relief with the `k` nearest hits and `k` nearest misses of every other class.
///
/// Miss contributions of class `c` are weighted by `P(c) / (1 − P(class(e)))`
/// with priors taken from the class frequencies. Each group is averaged over
/// the neighbors actually available, so a class smaller than `k` still
/// contributes a full share and an empty group contributes nothing.
///
/// # Errors
///
/// Same as [`relief`], plus [`ReliefError::InvalidK`].
#[tracing::instrument(skip(data, target, distance, config, rng), fields(k = config.k()))]
pub fn relieff(
    data: &[f64],
    n_features: usize,
    target: &[f64],
    distance: &PairedFn<'_>,
    config: &ReliefFConfig,
    rng: &mut impl Rng,
) -> Result<FeatureRanking, ReliefError> {
    config.validate()?;
    let dataset = Dataset::new(data, n_features, target)?;
    let n = dataset.n_examples();
    let m = resolve_n_samples(config.n_samples(), n)?;
    let ranges = dataset.ranges();
    let priors = dataset.class_priors();
    let distance = Distance::compose(distance, config.learned_metric());
    debug!(n, m, n_classes = dataset.n_classes(), "relieff start");

    let classes = dataset.classes();
    let mut weights = vec![0.0; n_features];
    let mut scratch = Scratch::new(n);
    for sample in rand::seq::index::sample(rng, n, m) {
        let class = classes[sample];
        if priors[class] >= 1.0 {
            return Err(ReliefError::InsufficientNeighbors { sample });
        }
        let e = dataset.row(sample);
        distances_from(data, n_features, &distance, sample, &mut scratch.dists);

        for c in 0..dataset.n_classes() {
            k_nearest_in_class(
                classes,
                c,
                sample,
                config.k(),
                &scratch.dists,
                &mut scratch.pairs,
                &mut scratch.neighbors,
            );
            if scratch.neighbors.is_empty() {
                continue;
            }
            let share = 1.0 / (m * scratch.neighbors.len()) as f64;
            let scale = if c == class {
                -share
            } else {
                share * priors[c] / (1.0 - priors[class])
            };
            for &j in &scratch.neighbors {
                add_scaled_diff(&mut weights, e, dataset.row(j), &ranges, scale);
            }
        }
    }

    Ok(FeatureRanking::from_weights(weights))
}

/// Uniform random weights in `[0, 1)`, ranked like any other result.
///
/// A baseline to compare learned rankings against.
pub fn random_weights(n_features: usize, rng: &mut impl Rng) -> FeatureRanking {
    let weights = (0..n_features).map(|_| rng.random::<f64>()).collect();
    FeatureRanking::from_weights(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{ProjectedSpace, euclidean, manhattan};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    /// Four corners of the unit square, class given by feature 0.
    fn square() -> (Vec<f64>, Vec<f64>) {
        (
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        )
    }

    #[test]
    fn test_relief_square_hand_computed() {
        // Every example: hit differs only in feature 1, miss only in feature 0.
        let (data, target) = square();
        let mut rng = StdRng::seed_from_u64(1);
        let r = relief(&data, 2, &target, &euclidean, &ReliefConfig::new(), &mut rng).unwrap();
        assert_abs_diff_eq!(r.weights()[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(r.weights()[1], -1.0, epsilon = 1e-8);
        assert_eq!(r.ranks(), &[1, 2]);
    }

    #[test]
    fn test_relief_full_sample_ignores_seed() {
        let (data, target) = square();
        let a = relief(
            &data,
            2,
            &target,
            &manhattan,
            &ReliefConfig::new(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        let b = relief(
            &data,
            2,
            &target,
            &manhattan,
            &ReliefConfig::new(),
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        for (x, y) in a.weights().iter().zip(b.weights()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_relief_sample_count_bounds() {
        let (data, target) = square();
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = ReliefConfig::new().with_n_samples(5);
        let err = relief(&data, 2, &target, &euclidean, &cfg, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ReliefError::InvalidSampleCount {
                m: 5,
                n_examples: 4
            }
        ));
    }

    #[test]
    fn test_relief_with_learned_metric() {
        // Projection onto feature 0 only: hits are at distance 0, misses at 1.
        let (data, target) = square();
        let space = ProjectedSpace::new(&data, 2, &[1.0, 0.0], 1).unwrap();
        let cfg = ReliefConfig::new().with_learned_metric(Arc::new(space));
        let mut rng = StdRng::seed_from_u64(3);
        let r = relief(&data, 2, &target, &euclidean, &cfg, &mut rng).unwrap();
        assert!(r.weights()[0] > r.weights()[1]);
    }

    #[test]
    fn test_relieff_k1_matches_relief_on_two_classes() {
        let data = [0.0, 0.1, 0.2, 0.9, 1.0, 0.4, 1.1, 0.8, 2.0, 0.0];
        let target = [0.0, 0.0, 1.0, 1.0, 1.0];
        let a = relief(
            &data,
            2,
            &target,
            &euclidean,
            &ReliefConfig::new(),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        let b = relieff(
            &data,
            2,
            &target,
            &euclidean,
            &ReliefFConfig::new(1),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        for (x, y) in a.weights().iter().zip(b.weights()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_relieff_prior_weighting() {
        // Three singleton classes at 0, 2, 3: no hits, and each miss class
        // carries P(c) / (1 − P(e)) = (1/3) / (2/3) = 1/2.
        let data = [0.0, 2.0, 3.0];
        let target = [0.0, 1.0, 2.0];
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = ReliefFConfig::new(5);
        let r = relieff(&data, 1, &target, &manhattan, &cfg, &mut rng).unwrap();
        // M = 3, range = 3
        let expected = ((2.0 + 3.0) / 2.0 + (2.0 + 1.0) / 2.0 + (3.0 + 1.0) / 2.0) / 3.0 / 3.0;
        assert_abs_diff_eq!(r.weights()[0], expected, epsilon = 1e-8);
    }

    #[test]
    fn test_relieff_single_class() {
        let data = [0.0, 1.0, 2.0];
        let target = [4.0, 4.0, 4.0];
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = ReliefFConfig::default();
        let err = relieff(&data, 1, &target, &euclidean, &cfg, &mut rng).unwrap_err();
        assert!(matches!(err, ReliefError::InsufficientNeighbors { .. }));
    }

    #[test]
    fn test_relieff_rejects_zero_k() {
        let (data, target) = square();
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = ReliefFConfig::new(0);
        let err = relieff(&data, 2, &target, &euclidean, &cfg, &mut rng).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidK { k: 0 }));
    }

    #[test]
    fn test_random_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        let r = random_weights(6, &mut rng);
        assert_eq!(r.weights().len(), 6);
        assert!(r.weights().iter().all(|&w| (0.0..1.0).contains(&w)));
        let mut ranks = r.ranks().to_vec();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);

        let again = random_weights(6, &mut StdRng::seed_from_u64(11));
        assert_eq!(r, again);
    }
}
