//! Covariance (Mahalanobis) metric space.
//!
//! The Mahalanobis distance `√((a − b)ᵀ S⁻¹ (a − b))` under the feature
//! covariance `S` equals the Euclidean distance after whitening with a
//! Cholesky factor `S = C Cᵀ`: rows are projected with `L = C⁻ᵀ`. The result
//! is an ordinary [`ProjectedSpace`] with one component per feature, so it
//! composes with weighted distances as well.

use crate::dataset::validate_shape;
use crate::error::ReliefError;
use crate::metric::ProjectedSpace;

/// Pivots at or below this fraction of the largest variance count as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

impl ProjectedSpace {
    /// Whitened space of `data` under its sample covariance.
    ///
    /// Euclidean distances between the projected rows are the Mahalanobis
    /// distances between the input rows.
    ///
    /// # Errors
    ///
    /// Returns the shape errors of [`Dataset::new`](crate::Dataset::new),
    /// [`ReliefError::NonFiniteInput`] for NaN or infinite data, and
    /// [`ReliefError::SingularCovariance`] when the covariance matrix is not
    /// positive definite (fewer than two examples, a constant feature, or
    /// collinear features).
    ///
    /// # Example
    ///
    /// ```
    /// use rba_relief::{ProjectedSpace, euclidean};
    ///
    /// // Independent features with variances 4/3 and 16/3.
    /// let data = [0.0, 0.0, 2.0, 0.0, 0.0, 4.0, 2.0, 4.0];
    /// let space = ProjectedSpace::mahalanobis(&data, 2).unwrap();
    /// let d = euclidean(space.row(0), space.row(1));
    /// assert!((d - 3.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn mahalanobis(data: &[f64], n_features: usize) -> Result<Self, ReliefError> {
        let n_examples = validate_shape(data, n_features)?;
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ReliefError::NonFiniteInput { input: "data" });
        }
        if n_examples < 2 {
            return Err(ReliefError::SingularCovariance {
                feature: 0,
                pivot: 0.0,
            });
        }

        let cov = rba_stats::covariance(data, n_features);
        let factor = cholesky(&cov, n_features)?;
        let inverse = invert_lower(&factor, n_features);

        // L = (C⁻¹)ᵀ, row-major [n_features × n_features]
        let n = n_features;
        let mut projection = vec![0.0; n * n];
        for t in 0..n {
            for o in 0..n {
                projection[t * n + o] = inverse[o * n + t];
            }
        }
        Self::new(data, n_features, &projection, n_features)
    }
}

/// Lower-triangular Cholesky factor `C` of the symmetric `n × n` matrix `a = C Cᵀ`.
fn cholesky(a: &[f64], n: usize) -> Result<Vec<f64>, ReliefError> {
    let scale = (0..n).map(|i| a[i * n + i]).fold(0.0, f64::max);
    let tolerance = SINGULAR_TOLERANCE * scale;

    let mut c = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= c[i * n + k] * c[j * n + k];
            }
            if i == j {
                if sum.is_nan() || sum <= tolerance {
                    return Err(ReliefError::SingularCovariance {
                        feature: i,
                        pivot: sum,
                    });
                }
                c[i * n + i] = sum.sqrt();
            } else {
                c[i * n + j] = sum / c[j * n + j];
            }
        }
    }
    Ok(c)
}

/// Inverse of a lower-triangular matrix with a nonzero diagonal, by forward substitution.
fn invert_lower(c: &[f64], n: usize) -> Vec<f64> {
    let mut x = vec![0.0; n * n];
    for j in 0..n {
        x[j * n + j] = 1.0 / c[j * n + j];
        for i in j + 1..n {
            let sum: f64 = (j..i).map(|k| c[i * n + k] * x[k * n + j]).sum();
            x[i * n + j] = -sum / c[i * n + i];
        }
    }
    x
}
