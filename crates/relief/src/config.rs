//! Configuration for the Relief family of feature weighting algorithms.

use std::fmt;
use std::sync::Arc;

use crate::error::ReliefError;
use crate::metric::LearnedMetric;

/// Distance-to-probability kernel used by I-Relief.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `exp(-d / width)`.
    Exponential {
        /// Kernel width.
        width: f64,
    },
    /// `exp(-d² / (2 · width²))`.
    Gaussian {
        /// Kernel width.
        width: f64,
    },
}

impl Kernel {
    /// Returns the kernel width.
    pub fn width(&self) -> f64 {
        match *self {
            Self::Exponential { width } | Self::Gaussian { width } => width,
        }
    }

    /// Returns `g(d)` such that the kernel value is `exp(-g(d))`.
    pub(crate) fn exponent(&self, d: f64) -> f64 {
        match *self {
            Self::Exponential { width } => d / width,
            Self::Gaussian { width } => d * d / (2.0 * width * width),
        }
    }

    /// Evaluates the kernel at distance `d`.
    pub fn eval(&self, d: f64) -> f64 {
        (-self.exponent(d)).exp()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::Exponential { width: 2.0 }
    }
}

/// Shared handle to a caller-supplied learned metric.
pub type SharedMetric = Arc<dyn LearnedMetric>;

fn fmt_metric(metric: &Option<SharedMetric>) -> &'static str {
    if metric.is_some() { "Some(..)" } else { "None" }
}

/// Configuration for sampling-based Relief.
///
/// # Example
///
/// ```
/// use rba_relief::ReliefConfig;
///
/// let config = ReliefConfig::new().with_n_samples(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct ReliefConfig {
    /// Number of examples to sample. `None` samples every example.
    n_samples: Option<usize>,
    /// Optional learned metric the distance is evaluated in.
    learned_metric: Option<SharedMetric>,
}

impl ReliefConfig {
    /// Creates a configuration that samples every example in the input space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of examples to sample without replacement.
    pub fn with_n_samples(mut self, m: usize) -> Self {
        self.n_samples = Some(m);
        self
    }

    /// Evaluates distances in a learned metric space.
    pub fn with_learned_metric(mut self, metric: SharedMetric) -> Self {
        self.learned_metric = Some(metric);
        self
    }

    /// Returns the configured sample count, if any.
    pub fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    /// Returns the learned metric, if any.
    pub fn learned_metric(&self) -> Option<&dyn LearnedMetric> {
        self.learned_metric.as_deref()
    }

    /// Validates this configuration.
    ///
    /// Returns an error if an explicit sample count is zero. The upper bound
    /// depends on the data and is checked when the algorithm runs.
    pub fn validate(&self) -> Result<(), ReliefError> {
        validate_n_samples(self.n_samples)
    }
}

impl fmt::Debug for ReliefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReliefConfig")
            .field("n_samples", &self.n_samples)
            .field("learned_metric", &fmt_metric(&self.learned_metric))
            .finish()
    }
}

/// Configuration for ReliefF (k nearest hits and misses per class).
///
/// Defaults: every example sampled, `k = 5`.
#[derive(Clone)]
pub struct ReliefFConfig {
    n_samples: Option<usize>,
    k: usize,
    learned_metric: Option<SharedMetric>,
}

impl ReliefFConfig {
    /// Creates a configuration with the given neighbor count.
    pub fn new(k: usize) -> Self {
        Self {
            n_samples: None,
            k,
            learned_metric: None,
        }
    }

    /// Sets the number of examples to sample without replacement.
    pub fn with_n_samples(mut self, m: usize) -> Self {
        self.n_samples = Some(m);
        self
    }

    /// Evaluates distances in a learned metric space.
    pub fn with_learned_metric(mut self, metric: SharedMetric) -> Self {
        self.learned_metric = Some(metric);
        self
    }

    /// Returns the configured sample count, if any.
    pub fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    /// Returns the number of neighbors per class.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the learned metric, if any.
    pub fn learned_metric(&self) -> Option<&dyn LearnedMetric> {
        self.learned_metric.as_deref()
    }

    /// Validates this configuration.
    ///
    /// Returns an error if k < 1 or an explicit sample count is zero.
    pub fn validate(&self) -> Result<(), ReliefError> {
        if self.k < 1 {
            return Err(ReliefError::InvalidK { k: self.k });
        }
        validate_n_samples(self.n_samples)
    }
}

impl Default for ReliefFConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

impl fmt::Debug for ReliefFConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReliefFConfig")
            .field("n_samples", &self.n_samples)
            .field("k", &self.k)
            .field("learned_metric", &fmt_metric(&self.learned_metric))
            .finish()
    }
}

/// Configuration for I-Relief.
///
/// Defaults: `max_iter = 100`, exponential kernel of width 2,
/// `threshold = 1e-6`, initial weights `1 / n_features`, unit-norm weights.
///
/// # Example
///
/// ```
/// use rba_relief::{IReliefConfig, Kernel};
///
/// let config = IReliefConfig::new()
///     .with_max_iter(20)
///     .with_kernel(Kernel::Gaussian { width: 1.5 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct IReliefConfig {
    /// Iteration budget.
    max_iter: usize,
    /// Kernel turning distances into outlier probabilities.
    kernel: Kernel,
    /// L1 change between successive weight vectors below which iteration stops.
    threshold: f64,
    /// Initial weights are `1 / divisor`. `None` uses the number of features.
    initial_weight_divisor: Option<f64>,
    /// Whether clipped weights are scaled to unit L2 norm.
    normalize: bool,
    learned_metric: Option<SharedMetric>,
}

impl IReliefConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self {
            max_iter: 100,
            kernel: Kernel::default(),
            threshold: 1e-6,
            initial_weight_divisor: None,
            normalize: true,
            learned_metric: None,
        }
    }

    /// Sets the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the convergence threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the divisor of the initial uniform weights.
    pub fn with_initial_weight_divisor(mut self, divisor: f64) -> Self {
        self.initial_weight_divisor = Some(divisor);
        self
    }

    /// Enables or disables unit-norm scaling of the clipped weights.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Evaluates distances in a learned metric space.
    pub fn with_learned_metric(mut self, metric: SharedMetric) -> Self {
        self.learned_metric = Some(metric);
        self
    }

    /// Returns the iteration budget.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns the kernel.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Returns the convergence threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the explicit initial weight divisor, if any.
    pub fn initial_weight_divisor(&self) -> Option<f64> {
        self.initial_weight_divisor
    }

    /// Returns whether weights are scaled to unit norm.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Returns the learned metric, if any.
    pub fn learned_metric(&self) -> Option<&dyn LearnedMetric> {
        self.learned_metric.as_deref()
    }

    /// Validates this configuration.
    ///
    /// Checked in order: `max_iter`, kernel width, threshold, divisor.
    pub fn validate(&self) -> Result<(), ReliefError> {
        if self.max_iter < 1 {
            return Err(ReliefError::InvalidMaxIter {
                max_iter: self.max_iter,
            });
        }
        let width = self.kernel.width();
        if !width.is_finite() || width <= 0.0 {
            return Err(ReliefError::InvalidKernelWidth { width });
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ReliefError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        if let Some(divisor) = self.initial_weight_divisor {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(ReliefError::InvalidDivisor { divisor });
            }
        }
        Ok(())
    }
}

impl Default for IReliefConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IReliefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IReliefConfig")
            .field("max_iter", &self.max_iter)
            .field("kernel", &self.kernel)
            .field("threshold", &self.threshold)
            .field("initial_weight_divisor", &self.initial_weight_divisor)
            .field("normalize", &self.normalize)
            .field("learned_metric", &fmt_metric(&self.learned_metric))
            .finish()
    }
}

/// Neighbor rule of the threshold-based members.
///
/// `T` is the mean of all pairwise distances; `Tᵢ` and `σᵢ` are the mean and
/// standard deviation of example `i`'s distances to the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Neighborhood {
    /// SURF: neighbors closer than `T`.
    Surf,
    /// SURF*: SURF, plus examples farther than `T` with the opposite sign.
    SurfStar,
    /// MultiSURF: neighbors closer than `Tᵢ − σᵢ/2`.
    #[default]
    MultiSurf,
    /// MultiSURF*: MultiSURF, plus examples farther than `Tᵢ + σᵢ/2` with the
    /// opposite sign.
    MultiSurfStar,
}

impl Neighborhood {
    /// Name used in logs and output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Surf => "surf",
            Self::SurfStar => "surfstar",
            Self::MultiSurf => "multisurf",
            Self::MultiSurfStar => "multisurfstar",
        }
    }

    /// Whether far examples contribute too.
    pub fn uses_far(self) -> bool {
        matches!(self, Self::SurfStar | Self::MultiSurfStar)
    }

    /// Whether thresholds are computed per example.
    pub fn is_adaptive(self) -> bool {
        matches!(self, Self::MultiSurf | Self::MultiSurfStar)
    }
}

/// Configuration for the SURF family. Every example is visited, so there is
/// no sample count and no randomness.
///
/// # Example
///
/// ```
/// use rba_relief::{Neighborhood, SurfConfig};
///
/// let config = SurfConfig::new(Neighborhood::SurfStar);
/// assert!(config.neighborhood().uses_far());
/// ```
#[derive(Clone, Default)]
pub struct SurfConfig {
    neighborhood: Neighborhood,
    learned_metric: Option<SharedMetric>,
}

impl SurfConfig {
    /// Creates a configuration with the given neighbor rule.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self {
            neighborhood,
            learned_metric: None,
        }
    }

    /// Evaluates distances in a learned metric space.
    pub fn with_learned_metric(mut self, metric: SharedMetric) -> Self {
        self.learned_metric = Some(metric);
        self
    }

    /// Returns the neighbor rule.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Returns the learned metric, if any.
    pub fn learned_metric(&self) -> Option<&dyn LearnedMetric> {
        self.learned_metric.as_deref()
    }
}

impl fmt::Debug for SurfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfConfig")
            .field("neighborhood", &self.neighborhood)
            .field("learned_metric", &fmt_metric(&self.learned_metric))
            .finish()
    }
}

fn validate_n_samples(n_samples: Option<usize>) -> Result<(), ReliefError> {
    match n_samples {
        Some(0) => Err(ReliefError::InvalidSampleCount {
            m: 0,
            n_examples: 0,
        }),
        _ => Ok(()),
    }
}

/// Resolves the sample count against the number of examples.
pub(crate) fn resolve_n_samples(
    n_samples: Option<usize>,
    n_examples: usize,
) -> Result<usize, ReliefError> {
    let m = n_samples.unwrap_or(n_examples);
    if m == 0 || m > n_examples {
        return Err(ReliefError::InvalidSampleCount { m, n_examples });
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::ProjectedSpace;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_eval() {
        let k = Kernel::Exponential { width: 2.0 };
        assert_abs_diff_eq!(k.eval(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k.eval(2.0), (-1.0_f64).exp(), epsilon = 1e-12);

        let k = Kernel::Gaussian { width: 1.0 };
        assert_abs_diff_eq!(k.eval(2.0), (-2.0_f64).exp(), epsilon = 1e-12);
        assert_eq!(k.width(), 1.0);
    }

    #[test]
    fn test_kernel_default() {
        assert_eq!(Kernel::default(), Kernel::Exponential { width: 2.0 });
    }

    #[test]
    fn test_relief_defaults() {
        let cfg = ReliefConfig::new();
        assert_eq!(cfg.n_samples(), None);
        assert!(cfg.learned_metric().is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_relief_zero_samples() {
        let err = ReliefConfig::new().with_n_samples(0).validate().unwrap_err();
        assert!(matches!(err, ReliefError::InvalidSampleCount { m: 0, .. }));
    }

    #[test]
    fn test_relief_learned_metric_debug() {
        let space = ProjectedSpace::new(&[1.0, 2.0], 1, &[1.0], 1).unwrap();
        let cfg = ReliefConfig::new().with_learned_metric(Arc::new(space));
        assert!(cfg.learned_metric().is_some());
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("learned_metric: \"Some(..)\""), "{dbg}");
    }

    #[test]
    fn test_relieff_defaults_and_validation() {
        let cfg = ReliefFConfig::default();
        assert_eq!(cfg.k(), 5);
        assert_eq!(cfg.n_samples(), None);
        assert!(cfg.validate().is_ok());

        let err = ReliefFConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, ReliefError::InvalidK { k: 0 }));

        let err = ReliefFConfig::new(3).with_n_samples(0).validate().unwrap_err();
        assert!(matches!(err, ReliefError::InvalidSampleCount { .. }));
    }

    #[test]
    fn test_irelief_defaults() {
        let cfg = IReliefConfig::default();
        assert_eq!(cfg.max_iter(), 100);
        assert_eq!(cfg.kernel(), Kernel::Exponential { width: 2.0 });
        assert_abs_diff_eq!(cfg.threshold(), 1e-6, epsilon = f64::EPSILON);
        assert_eq!(cfg.initial_weight_divisor(), None);
        assert!(cfg.normalize());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_irelief_builder_chaining() {
        let cfg = IReliefConfig::new()
            .with_max_iter(7)
            .with_kernel(Kernel::Gaussian { width: 0.5 })
            .with_threshold(0.0)
            .with_initial_weight_divisor(3.0)
            .with_normalize(false);
        assert_eq!(cfg.max_iter(), 7);
        assert_eq!(cfg.kernel(), Kernel::Gaussian { width: 0.5 });
        assert_eq!(cfg.threshold(), 0.0);
        assert_eq!(cfg.initial_weight_divisor(), Some(3.0));
        assert!(!cfg.normalize());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_irelief_validation() {
        let err = IReliefConfig::new().with_max_iter(0).validate().unwrap_err();
        assert!(matches!(err, ReliefError::InvalidMaxIter { max_iter: 0 }));

        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = IReliefConfig::new()
                .with_kernel(Kernel::Exponential { width })
                .validate()
                .unwrap_err();
            assert!(matches!(err, ReliefError::InvalidKernelWidth { .. }));
        }

        let err = IReliefConfig::new().with_threshold(-0.1).validate().unwrap_err();
        assert!(matches!(err, ReliefError::InvalidThreshold { .. }));

        let err = IReliefConfig::new()
            .with_initial_weight_divisor(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ReliefError::InvalidDivisor { .. }));
    }

    #[test]
    fn test_irelief_validation_priority() {
        // Both max_iter and width invalid -- max_iter is checked first.
        let err = IReliefConfig::new()
            .with_max_iter(0)
            .with_kernel(Kernel::Gaussian { width: -1.0 })
            .validate()
            .unwrap_err();
        assert!(matches!(err, ReliefError::InvalidMaxIter { max_iter: 0 }));
    }

    #[test]
    fn test_surf_defaults() {
        let cfg = SurfConfig::default();
        assert_eq!(cfg.neighborhood(), Neighborhood::MultiSurf);
        assert!(cfg.learned_metric().is_none());
        assert!(format!("{cfg:?}").contains("MultiSurf"));
    }

    #[test]
    fn test_neighborhood_flags() {
        assert!(!Neighborhood::Surf.uses_far());
        assert!(!Neighborhood::Surf.is_adaptive());
        assert!(Neighborhood::SurfStar.uses_far());
        assert!(Neighborhood::MultiSurf.is_adaptive());
        assert!(Neighborhood::MultiSurfStar.uses_far());
        assert!(Neighborhood::MultiSurfStar.is_adaptive());
        assert_eq!(Neighborhood::MultiSurfStar.name(), "multisurfstar");
    }

    #[test]
    fn test_resolve_n_samples() {
        assert_eq!(resolve_n_samples(None, 4).unwrap(), 4);
        assert_eq!(resolve_n_samples(Some(2), 4).unwrap(), 2);
        assert!(matches!(
            resolve_n_samples(Some(5), 4),
            Err(ReliefError::InvalidSampleCount {
                m: 5,
                n_examples: 4
            })
        ));
    }
}
