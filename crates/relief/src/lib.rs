//! Relief-family feature weighting for classification data.
//!
//! Every member scores each feature by how well it separates an example from
//! its nearest neighbors of other classes compared with its nearest neighbors
//! of the same class:
//!
//! | Algorithm | Entry point | Neighbors | Weights |
//! |-----------|-------------|-----------|---------|
//! | Relief | [`relief`] | nearest hit and miss of `M` sampled examples | signed sums |
//! | ReliefF | [`relieff`] | `k` hits, `k` misses per other class | prior-weighted sums |
//! | I-Relief | [`irelief`] | every example, kernel-weighted | non-negative, unit norm |
//! | SURF family | [`surf`] | every example within a distance threshold | prior-weighted means |
//! | Baseline | [`random_weights`] | none | uniform `[0, 1)` |
//!
//! Distances are caller-supplied closures. Relief, ReliefF and the SURF
//! family take a [`PairedFn`]; I-Relief takes a [`WeightedFn`] that receives
//! the current feature weights. Any of them can be evaluated inside a
//! [`LearnedMetric`] set on the configuration: a [`ProjectedSpace`] (fitted
//! elsewhere, or [`ProjectedSpace::mahalanobis`]) or a precomputed
//! [`DistanceMatrix`].
//!
//! # Quick start
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rba_relief::{ReliefConfig, euclidean, relief};
//!
//! // Feature 0 decides the class, feature 1 does not.
//! let data = vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
//! let target = [0.0, 0.0, 1.0, 1.0];
//! let config = ReliefConfig::new().with_n_samples(4);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let ranking = relief(&data, 2, &target, &euclidean, &config, &mut rng).unwrap();
//! assert_eq!(ranking.ranks(), &[1, 2]);
//! assert!(ranking.weights()[0] > ranking.weights()[1]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! relief() / relieff()                 irelief()
//!   ├─ Dataset::new()  (dataset.rs)      ├─ Dataset::new()
//!   ├─ Distance::compose() (metric.rs)   ├─ mean_differences()      (update.rs)
//!   └─ for M sampled examples            └─ until converged / max_iter
//!       ├─ distances_from() (pairwise.rs)    ├─ pairwise_distances() (pairwise.rs)
//!       ├─ nearest_hit_miss() (select.rs)    ├─ inlier_probabilities()
//!       └─ relief_update()  (update.rs)      └─ nu() → clip_and_normalize()
//! ```
//!
//! [`surf`] follows the same path as [`relieff`] on a full distance matrix,
//! with neighbors chosen by threshold (`members_where()` in select.rs).
//!
//! All members end with [`rank_descending`] and return a [`FeatureRanking`].

pub mod config;
pub mod dataset;
pub mod error;
pub mod irelief;
pub mod metric;
pub mod pairwise;
pub mod rank;
pub mod relief;
pub mod result;
pub mod select;
pub mod surf;

mod covariance;
pub(crate) mod update;

pub use config::{
    IReliefConfig, Kernel, Neighborhood, ReliefConfig, ReliefFConfig, SharedMetric, SurfConfig,
};
pub use dataset::Dataset;
pub use error::ReliefError;
pub use irelief::irelief;
pub use metric::{
    Distance, IndexedFn, LearnedMetric, MetricKind, Mode, PairedFn, ProjectedSpace, WeightedFn,
    euclidean, manhattan, minkowski, weighted_euclidean, weighted_manhattan,
};
pub use pairwise::{DistanceMatrix, pairwise_distances};
pub use rank::{rank_descending, select_columns};
pub use relief::{random_weights, relief, relieff};
pub use result::FeatureRanking;
pub use select::{HitMiss, nearest_hit_miss};
pub use surf::surf;
pub use update::RANGE_EPSILON;
