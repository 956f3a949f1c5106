//! Column statistics and vector norms shared by the feature weighting crates.
//!
//! Matrices are flat row-major slices `[n_rows × n_cols]`.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Population variance (N denominator, matching scikit-learn's `StandardScaler`).
/// Returns 0.0 if empty.
pub fn variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation. Returns 0.0 if empty.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Extracts column `col` of a row-major matrix.
pub fn column(data: &[f64], n_cols: usize, col: usize) -> Vec<f64> {
    debug_assert!(col < n_cols);
    data.chunks_exact(n_cols).map(|row| row[col]).collect()
}

/// Per-column minimum and maximum.
///
/// Returns `(mins, maxs)`, each of length `n_cols`. Both are empty when the
/// matrix has no rows.
pub fn column_min_max(data: &[f64], n_cols: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rows = data.chunks_exact(n_cols);
    let Some(first) = rows.next() else {
        return (Vec::new(), Vec::new());
    };
    let mut mins = first.to_vec();
    let mut maxs = first.to_vec();
    for row in rows {
        for (j, &v) in row.iter().enumerate() {
            if v < mins[j] {
                mins[j] = v;
            }
            if v > maxs[j] {
                maxs[j] = v;
            }
        }
    }
    (mins, maxs)
}

/// Per-column range `max − min`.
pub fn feature_ranges(data: &[f64], n_cols: usize) -> Vec<f64> {
    let (mins, maxs) = column_min_max(data, n_cols);
    maxs.iter().zip(mins.iter()).map(|(hi, lo)| hi - lo).collect()
}

/// Scales every column to zero mean and unit variance, in place.
///
/// Constant columns are only centered.
pub fn standardize_columns(data: &mut [f64], n_cols: usize) {
    for col in 0..n_cols {
        let values = column(data, n_cols, col);
        let m = mean(&values);
        let s = sd(&values);
        for row in data.chunks_exact_mut(n_cols) {
            row[col] -= m;
            if s > 0.0 {
                row[col] /= s;
            }
        }
    }
}

/// Sample covariance matrix (N − 1 denominator) of the columns, `[n_cols × n_cols]`.
///
/// Returns zeros when there are fewer than two rows.
pub fn covariance(data: &[f64], n_cols: usize) -> Vec<f64> {
    let n_rows = data.len() / n_cols;
    let mut cov = vec![0.0; n_cols * n_cols];
    if n_rows < 2 {
        return cov;
    }
    let means: Vec<f64> = (0..n_cols).map(|c| mean(&column(data, n_cols, c))).collect();
    for row in data.chunks_exact(n_cols) {
        for a in 0..n_cols {
            let da = row[a] - means[a];
            for b in a..n_cols {
                cov[a * n_cols + b] += da * (row[b] - means[b]);
            }
        }
    }
    let denom = (n_rows - 1) as f64;
    for a in 0..n_cols {
        for b in a..n_cols {
            let v = cov[a * n_cols + b] / denom;
            cov[a * n_cols + b] = v;
            cov[b * n_cols + a] = v;
        }
    }
    cov
}

/// Sum of absolute element-wise differences.
pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Euclidean norm.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_variance_population() {
        // mean=5, squared deviations sum to 32 over 8 values
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(variance(&data), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sd(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_variance_single() {
        assert_eq!(variance(&[5.0]), 0.0);
    }

    #[test]
    fn test_column() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(column(&data, 3, 1), vec![2.0, 5.0]);
    }

    #[test]
    fn test_column_min_max() {
        let data = [1.0, 9.0, -3.0, 4.0, 2.0, 4.0];
        let (mins, maxs) = column_min_max(&data, 2);
        assert_eq!(mins, vec![-3.0, 4.0]);
        assert_eq!(maxs, vec![2.0, 9.0]);
    }

    #[test]
    fn test_column_min_max_empty() {
        let (mins, maxs) = column_min_max(&[], 3);
        assert!(mins.is_empty());
        assert!(maxs.is_empty());
    }

    #[test]
    fn test_feature_ranges_constant_column() {
        let data = [1.0, 7.0, 3.0, 7.0, 2.0, 7.0];
        let ranges = feature_ranges(&data, 2);
        assert_relative_eq!(ranges[0], 2.0, epsilon = 1e-12);
        assert_eq!(ranges[1], 0.0);
    }

    #[test]
    fn test_standardize_columns() {
        let mut data = [1.0, 5.0, 3.0, 5.0];
        standardize_columns(&mut data, 2);
        // column 0: mean 2, sd 1; column 1 constant -> centered only
        assert_relative_eq!(data[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(data[2], 1.0, epsilon = 1e-12);
        assert_eq!(data[1], 0.0);
        assert_eq!(data[3], 0.0);
    }

    #[test]
    fn test_covariance() {
        // x = [1, 2, 3], y = 2x + [0, 1, -1]
        let data = [1.0, 2.0, 2.0, 5.0, 3.0, 5.0];
        let cov = covariance(&data, 2);
        assert_relative_eq!(cov[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(cov[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(cov[2], 1.5, epsilon = 1e-12);
        assert_relative_eq!(cov[3], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_single_row() {
        assert_eq!(covariance(&[1.0, 2.0], 2), vec![0.0; 4]);
    }

    #[test]
    fn test_l1_distance() {
        assert_relative_eq!(
            l1_distance(&[1.0, -2.0, 3.0], &[0.0, 2.0, 3.5]),
            5.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_l2_norm() {
        assert_relative_eq!(l2_norm(&[3.0, 4.0]), 5.0, epsilon = 1e-12);
        assert_eq!(l2_norm(&[]), 0.0);
    }
}
