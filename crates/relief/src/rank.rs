//! Ordinal ranking and column selection.

use std::cmp::Ordering;

use crate::dataset::validate_shape;
use crate::error::ReliefError;

/// Ranks weights in descending order, 1-based.
///
/// Equal weights are ranked by position (the first occurrence gets the lower
/// rank), so the result is always a permutation of `1..=weights.len()`. NaN
/// sorts after every number.
pub fn rank_descending(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    // Stable sort: ties keep their input order.
    order.sort_by(|&a, &b| descending(weights[a], weights[b]));

    let mut ranks = vec![0; weights.len()];
    for (r, &t) in order.iter().enumerate() {
        ranks[t] = r + 1;
    }
    ranks
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

/// Copies the given columns of a row-major matrix into a new matrix.
///
/// Columns appear in the order given, which makes this the projection step
/// after [`FeatureRanking::top`](crate::FeatureRanking::top) or
/// [`FeatureRanking::above`](crate::FeatureRanking::above).
///
/// # Errors
///
/// Returns [`ReliefError`] if the data shape is invalid or a column index is
/// out of range.
pub fn select_columns(
    data: &[f64],
    n_features: usize,
    columns: &[usize],
) -> Result<Vec<f64>, ReliefError> {
    let n_examples = validate_shape(data, n_features)?;
    if let Some(&index) = columns.iter().find(|&&c| c >= n_features) {
        return Err(ReliefError::ColumnOutOfRange { index, n_features });
    }

    let mut out = Vec::with_capacity(n_examples * columns.len());
    for row in data.chunks_exact(n_features) {
        out.extend(columns.iter().map(|&c| row[c]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_distinct() {
        assert_eq!(rank_descending(&[0.2, 0.9, -1.0, 0.5]), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_rank_ties_by_position() {
        assert_eq!(rank_descending(&[0.5, 0.5, 1.0, 0.5]), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_rank_all_equal() {
        assert_eq!(rank_descending(&[0.0; 4]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_nan_last() {
        assert_eq!(rank_descending(&[f64::NAN, 1.0, 2.0]), vec![3, 2, 1]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_descending(&[]).is_empty());
    }

    #[test]
    fn test_select_columns() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(select_columns(&data, 3, &[2, 0]).unwrap(), vec![3.0, 1.0, 6.0, 4.0]);
        assert!(select_columns(&data, 3, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_select_columns_out_of_range() {
        let err = select_columns(&[1.0, 2.0], 2, &[0, 2]).unwrap_err();
        assert!(matches!(
            err,
            ReliefError::ColumnOutOfRange {
                index: 2,
                n_features: 2
            }
        ));
    }
}
