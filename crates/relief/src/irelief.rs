//! Iterative, probability-weighted member of the family (I-Relief).

use tracing::debug;

use crate::config::IReliefConfig;
use crate::dataset::Dataset;
use crate::error::ReliefError;
use crate::metric::{Distance, WeightedFn};
use crate::pairwise::pairwise_distances_unchecked;
use crate::result::FeatureRanking;
use crate::update::{clip_and_normalize, inlier_probabilities, mean_differences, nu};

/// Lifecycle of an iterative run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Initialized,
    Iterating,
    /// The last update moved the weights by less than the threshold.
    Converged,
    MaxIterReached,
}

/// State of an iterative run. `weights` always holds the latest update.
#[derive(Debug, Clone)]
pub(crate) struct Run {
    pub(crate) state: RunState,
    /// Updates that did not converge.
    pub(crate) iterations: usize,
    pub(crate) weights: Vec<f64>,
}

/// I-Relief: re-weights features until the weight vector stops moving.
///
/// Starting from uniform weights `1 / divisor`, every round
///
/// 1. computes all pairwise distances with `distance` curried with the
///    current weights (inside the learned metric, if one is configured),
/// 2. turns them into per-example inlier probabilities with the kernel,
/// 3. sets the weights to the clipped (and by default unit-norm) vector
///    `ν = (1/N) Σᵢ γᵢ (m̄ᵢ − h̄ᵢ)`.
///
/// Iteration stops once the L1 change of an update falls below the threshold,
/// or after `max_iter` updates that did not. The returned weights are those of
/// the final update in either case; running out of iterations is not an error.
///
/// # Errors
///
/// Returns [`ReliefError`] on invalid input or configuration,
/// [`ReliefError::InsufficientNeighbors`] if there is only one class, and
/// [`ReliefError::DegenerateWeights`] if an update clips to all zeros while
/// normalisation is on, and [`ReliefError::LearnedDimensionMismatch`] if the
/// learned metric's dimension differs from the number of features.
///
/// # Example
///
/// ```
/// use rba_relief::{IReliefConfig, irelief, weighted_euclidean};
///
/// let data = [0.0, 0.3, 0.1, 0.9, 1.0, 0.2, 0.9, 0.8];
/// let target = [0.0, 0.0, 1.0, 1.0];
/// let ranking = irelief(&data, 2, &target, &weighted_euclidean, &IReliefConfig::new()).unwrap();
/// let norm: f64 = ranking.weights().iter().map(|w| w * w).sum::<f64>().sqrt();
/// assert!((norm - 1.0).abs() < 1e-9);
/// ```
#[tracing::instrument(skip(data, target, distance, config), fields(max_iter = config.max_iter()))]
pub fn irelief(
    data: &[f64],
    n_features: usize,
    target: &[f64],
    distance: &WeightedFn<'_>,
    config: &IReliefConfig,
) -> Result<FeatureRanking, ReliefError> {
    let run = run(data, n_features, target, distance, config)?;
    Ok(FeatureRanking::from_weights(run.weights))
}

pub(crate) fn run(
    data: &[f64],
    n_features: usize,
    target: &[f64],
    distance: &WeightedFn<'_>,
    config: &IReliefConfig,
) -> Result<Run, ReliefError> {
    config.validate()?;
    let dataset = Dataset::new(data, n_features, target)?;
    if let Some(n_components) = config.learned_metric().and_then(|m| m.dimension()) {
        if n_components != n_features {
            return Err(ReliefError::LearnedDimensionMismatch {
                n_components,
                n_features,
            });
        }
    }
    let (margin, within) = mean_differences(&dataset)?;
    let divisor = config
        .initial_weight_divisor()
        .unwrap_or(n_features as f64);

    let mut run = Run {
        state: RunState::Initialized,
        iterations: 0,
        weights: vec![1.0 / divisor; n_features],
    };
    run.state = RunState::Iterating;

    while run.state == RunState::Iterating {
        let current: &[f64] = &run.weights;
        let base = |a: &[f64], b: &[f64]| distance(current, a, b);
        let composed = Distance::compose(&base, config.learned_metric());
        let dist = pairwise_distances_unchecked(data, n_features, &composed);

        let gamma = inlier_probabilities(&dist, dataset.classes(), config.kernel());
        let next = clip_and_normalize(
            &nu(&gamma, &margin, &within, n_features),
            config.normalize(),
        )?;
        let delta = rba_stats::l1_distance(&next, &run.weights);
        run.weights = next;

        if delta < config.threshold() {
            run.state = RunState::Converged;
        } else {
            run.iterations += 1;
            if run.iterations >= config.max_iter() {
                run.state = RunState::MaxIterReached;
            }
        }
        debug!(iteration = run.iterations, delta, "irelief update");
    }

    debug!(state = ?run.state, iterations = run.iterations, "irelief done");
    Ok(run)
}
