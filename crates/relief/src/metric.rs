//! Distance functions and the learned-metric capability.
//!
//! A distance is one of a closed set of shapes:
//!
//! | Variant | Callable | Mode |
//! |---------|----------|------|
//! | [`Distance::Paired`] | `f(a, b)` on two feature vectors | paired |
//! | [`Distance::Indexed`] | `f(i, j)` on two example indices | indexed |
//! | [`Distance::Learned`] | a [`LearnedMetric`] composed with a paired base | indexed |
//!
//! Weighted members of the family take a [`WeightedFn`] instead, with the
//! current feature weights as the leading argument.

use std::fmt;
use std::str::FromStr;

use crate::dataset::validate_shape;
use crate::error::ReliefError;

/// Distance between two feature vectors.
pub type PairedFn<'a> = dyn Fn(&[f64], &[f64]) -> f64 + Sync + 'a;

/// Distance between two examples identified by their row indices.
pub type IndexedFn<'a> = dyn Fn(usize, usize) -> f64 + Sync + 'a;

/// Weighted distance `f(weights, a, b)` between two feature vectors.
pub type WeightedFn<'a> = dyn Fn(&[f64], &[f64], &[f64]) -> f64 + Sync + 'a;

/// Calling convention of a distance function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Called with two feature vectors.
    Paired,
    /// Called with two example indices.
    Indexed,
}

impl FromStr for Mode {
    type Err = ReliefError;

    /// Parses `"paired"` / `"indexed"`; `"example"` and `"index"` are accepted aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paired" | "example" => Ok(Self::Paired),
            "indexed" | "index" => Ok(Self::Indexed),
            _ => Err(ReliefError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paired => f.write_str("paired"),
            Self::Indexed => f.write_str("indexed"),
        }
    }
}

/// A distance in a metric space learned outside this crate.
///
/// Implementations map example indices into their own space and measure the
/// result with the `base` distance supplied by the algorithm, which may be a
/// weighted distance curried with the current feature weights.
///
/// A raw index-based dissimilarity can be supplied the same way: precompute
/// it into a [`DistanceMatrix`](crate::DistanceMatrix), which implements this
/// trait and ignores `base`.
pub trait LearnedMetric: Send + Sync {
    /// Distance between examples `i` and `j` in the learned space.
    fn distance(&self, base: &PairedFn<'_>, i: usize, j: usize) -> f64;

    /// Length of the vectors handed to `base`, if the space has one.
    ///
    /// Weighted distances index the feature weights by component, so I-Relief
    /// requires this to equal the number of features when it is known.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// A distance function in one of the supported calling conventions.
#[derive(Clone, Copy)]
pub enum Distance<'a> {
    /// Distance computed directly from feature values.
    Paired(&'a PairedFn<'a>),
    /// Distance looked up by example indices.
    ///
    /// The algorithms take a paired or weighted distance; to run them on an
    /// index-based one, pass its [`pairwise_distances`](crate::pairwise_distances)
    /// matrix as the learned metric.
    Indexed(&'a IndexedFn<'a>),
    /// A learned metric measured with a paired base distance.
    Learned {
        /// The learned space.
        metric: &'a dyn LearnedMetric,
        /// Distance applied inside the learned space.
        base: &'a PairedFn<'a>,
    },
}

impl<'a> Distance<'a> {
    /// Wraps `base` in `learned` when a learned metric is configured.
    pub fn compose(base: &'a PairedFn<'a>, learned: Option<&'a dyn LearnedMetric>) -> Self {
        match learned {
            Some(metric) => Self::Learned { metric, base },
            None => Self::Paired(base),
        }
    }

    /// Returns the calling convention of this distance.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Paired(_) => Mode::Paired,
            Self::Indexed(_) | Self::Learned { .. } => Mode::Indexed,
        }
    }

    /// Distance between rows `i` and `j` of the row-major `data`.
    #[inline]
    pub fn between(&self, data: &[f64], n_features: usize, i: usize, j: usize) -> f64 {
        match self {
            Self::Paired(f) => f(
                &data[i * n_features..(i + 1) * n_features],
                &data[j * n_features..(j + 1) * n_features],
            ),
            Self::Indexed(f) => f(i, j),
            Self::Learned { metric, base } => metric.distance(*base, i, j),
        }
    }
}

impl fmt::Debug for Distance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance::{}", self.mode())
    }
}

/// Euclidean distance.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Manhattan (L1) distance.
pub fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    rba_stats::l1_distance(a, b)
}

/// Minkowski distance of order `p`.
pub fn minkowski(a: &[f64], b: &[f64], p: f64) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Euclidean distance of the weighted difference `w · (a − b)`.
///
/// Components beyond the shorter of `w` and `a` are ignored.
pub fn weighted_euclidean(w: &[f64], a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    w.iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(w, (x, y))| {
            let d = w * (x - y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Manhattan distance of the weighted difference `w · (a − b)`.
///
/// Components beyond the shorter of `w` and `a` are ignored.
pub fn weighted_manhattan(w: &[f64], a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    w.iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(w, (x, y))| (w * (x - y)).abs())
        .sum()
}

/// Built-in metric families, each available in plain and weighted form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricKind {
    /// L2 distance.
    #[default]
    Euclidean,
    /// L1 distance.
    Manhattan,
}

impl MetricKind {
    /// Returns the unweighted distance function.
    pub fn paired(self) -> fn(&[f64], &[f64]) -> f64 {
        match self {
            Self::Euclidean => euclidean,
            Self::Manhattan => manhattan,
        }
    }

    /// Returns the weighted distance function.
    pub fn weighted(self) -> fn(&[f64], &[f64], &[f64]) -> f64 {
        match self {
            Self::Euclidean => weighted_euclidean,
            Self::Manhattan => weighted_manhattan,
        }
    }
}

/// A learned metric given by a linear projection `Z = X · L`.
///
/// The projection (for example fitted by LDA or NCA elsewhere) is applied
/// once at construction; distances are then measured between projected rows.
/// Weighted bases index the weights by component, so I-Relief rejects a
/// projection unless `n_components == n_features`.
#[derive(Debug, Clone)]
pub struct ProjectedSpace {
    n_components: usize,
    projected: Vec<f64>,
}

impl ProjectedSpace {
    /// Projects the row-major `data` with the row-major `projection`
    /// matrix `[n_features × n_components]`.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::ProjectionShapeMismatch`] if the projection has
    /// the wrong number of entries or `n_components` is zero, and the data
    /// shape errors of [`Dataset::new`](crate::Dataset::new).
    pub fn new(
        data: &[f64],
        n_features: usize,
        projection: &[f64],
        n_components: usize,
    ) -> Result<Self, ReliefError> {
        let n_examples = validate_shape(data, n_features)?;
        if n_components == 0 || projection.len() != n_features * n_components {
            return Err(ReliefError::ProjectionShapeMismatch {
                len: projection.len(),
                n_features,
                n_components,
            });
        }
        if projection.iter().any(|v| !v.is_finite()) {
            return Err(ReliefError::NonFiniteInput {
                input: "projection",
            });
        }

        let mut projected = vec![0.0; n_examples * n_components];
        for (row, out) in data
            .chunks_exact(n_features)
            .zip(projected.chunks_exact_mut(n_components))
        {
            for (t, &x) in row.iter().enumerate() {
                let weights = &projection[t * n_components..(t + 1) * n_components];
                for (o, &l) in out.iter_mut().zip(weights.iter()) {
                    *o += x * l;
                }
            }
        }

        Ok(Self {
            n_components,
            projected,
        })
    }

    /// Returns the dimension of the projected space.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Returns projected row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.projected[i * self.n_components..(i + 1) * self.n_components]
    }
}

impl LearnedMetric for ProjectedSpace {
    fn distance(&self, base: &PairedFn<'_>, i: usize, j: usize) -> f64 {
        base(self.row(i), self.row(j))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.n_components)
    }
}
