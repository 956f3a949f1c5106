//! Nearest hit / nearest miss selection.

use std::cmp::Ordering;

use crate::error::ReliefError;

/// Nearest same-class and different-class neighbors of a sampled example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitMiss {
    /// Nearest other example of the same class. `None` when the sample is
    /// the only member of its class.
    pub hit: Option<usize>,
    /// Nearest example of a different class.
    pub miss: usize,
}

/// Finds the nearest hit and nearest miss of `sample`.
///
/// `dists[j]` is the distance from `sample` to example `j`. The sample's own
/// entry counts as `+∞` and is never selected as its own hit. Ties go to the
/// first index in scan order; NaN distances rank after every other value.
///
/// # Errors
///
/// Returns [`ReliefError::InsufficientNeighbors`] if no example has a class
/// different from the sample's.
pub fn nearest_hit_miss(
    classes: &[usize],
    sample: usize,
    dists: &[f64],
) -> Result<HitMiss, ReliefError> {
    debug_assert_eq!(classes.len(), dists.len());
    let class = classes[sample];

    let mut hit: Option<(usize, f64)> = None;
    let mut miss: Option<(usize, f64)> = None;
    for (j, (&c, &d)) in classes.iter().zip(dists.iter()).enumerate() {
        if j == sample {
            continue;
        }
        let best = if c == class { &mut hit } else { &mut miss };
        let closer = match *best {
            Some((_, best_d)) => nan_last(d, best_d) == Ordering::Less,
            None => true,
        };
        if closer {
            *best = Some((j, d));
        }
    }

    let (miss, _) = miss.ok_or(ReliefError::InsufficientNeighbors { sample })?;
    Ok(HitMiss {
        hit: hit.map(|(j, _)| j),
        miss,
    })
}

/// Total order on distances with NaN after everything else.
#[inline]
fn nan_last(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Selects up to `k` nearest members of `class`, excluding `sample` itself.
///
/// Writes their indices into `out`, sorted by ascending distance with ties
/// in index order and NaN last. Fewer than `k` indices are written when the class is
/// smaller; `pairs` is scratch space.
pub(crate) fn k_nearest_in_class(
    classes: &[usize],
    class: usize,
    sample: usize,
    k: usize,
    dists: &[f64],
    pairs: &mut Vec<(f64, usize)>,
    out: &mut Vec<usize>,
) {
    pairs.clear();
    pairs.extend(
        classes
            .iter()
            .zip(dists.iter())
            .enumerate()
            .filter(|&(j, (&c, _))| c == class && j != sample)
            .map(|(j, (_, &d))| (d, j)),
    );

    // Stable sort keeps scan order among equal distances.
    pairs.sort_by(|a, b| nan_last(a.0, b.0));
    pairs.truncate(k);

    out.clear();
    out.extend(pairs.iter().map(|&(_, j)| j));
}

/// Collects the members of `class` other than `sample` whose distance
/// satisfies `keep`, in index order.
pub(crate) fn members_where(
    classes: &[usize],
    class: usize,
    sample: usize,
    dists: &[f64],
    keep: impl Fn(f64) -> bool,
    out: &mut Vec<usize>,
) {
    out.clear();
    out.extend(
        classes
            .iter()
            .zip(dists.iter())
            .enumerate()
            .filter(|&(j, (&c, &d))| c == class && j != sample && keep(d))
            .map(|(j, _)| j),
    );
}
