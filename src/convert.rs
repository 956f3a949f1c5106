//! Pure conversion functions: TOML config structs -> crate API config types.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::config::*;

use rba_relief::{
    IReliefConfig, Kernel, MetricKind, Neighborhood, ProjectedSpace, ReliefConfig, ReliefFConfig,
    SharedMetric, SurfConfig,
};

/// Algorithm selected by `[algorithm].name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Relief,
    ReliefF,
    IRelief,
    Surf(Neighborhood),
    Random,
}

impl Algorithm {
    /// Name used in output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Relief => "relief",
            Self::ReliefF => "relieff",
            Self::IRelief => "irelief",
            Self::Surf(neighborhood) => neighborhood.name(),
            Self::Random => "random",
        }
    }
}

/// Parses an algorithm name string into the corresponding enum variant.
pub fn parse_algorithm(s: &str) -> Result<Algorithm> {
    match s.to_lowercase().replace(['-', '_'], "").as_str() {
        "relief" => Ok(Algorithm::Relief),
        "relieff" => Ok(Algorithm::ReliefF),
        "irelief" => Ok(Algorithm::IRelief),
        "surf" => Ok(Algorithm::Surf(Neighborhood::Surf)),
        "surfstar" | "surf*" => Ok(Algorithm::Surf(Neighborhood::SurfStar)),
        "multisurf" => Ok(Algorithm::Surf(Neighborhood::MultiSurf)),
        "multisurfstar" | "multisurf*" => Ok(Algorithm::Surf(Neighborhood::MultiSurfStar)),
        "random" => Ok(Algorithm::Random),
        other => bail!("unknown algorithm: {other:?}"),
    }
}

/// Parses a metric name string into the corresponding enum variant.
pub fn parse_metric_kind(s: &str) -> Result<MetricKind> {
    match s.to_lowercase().as_str() {
        "euclidean" | "l2" => Ok(MetricKind::Euclidean),
        "manhattan" | "l1" | "cityblock" => Ok(MetricKind::Manhattan),
        other => bail!("unknown metric: {other:?}"),
    }
}

/// Parses a kernel name and width into a [`Kernel`].
pub fn parse_kernel(s: &str, width: f64) -> Result<Kernel> {
    match s.to_lowercase().as_str() {
        "exponential" | "exp" => Ok(Kernel::Exponential { width }),
        "gaussian" => Ok(Kernel::Gaussian { width }),
        other => bail!("unknown kernel: {other:?}"),
    }
}

/// Flattens equal-length rows into a row-major matrix, returning `(values, n_cols)`.
pub fn flatten_rows(rows: &[Vec<f64>], what: &str) -> Result<(Vec<f64>, usize)> {
    let Some(first) = rows.first() else {
        bail!("{what} has no rows");
    };
    let n_cols = first.len();
    if n_cols == 0 {
        bail!("{what} rows are empty");
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        bail!(
            "{what} row {i} has {} values, expected {n_cols}",
            row.len()
        );
    }
    Ok((rows.concat(), n_cols))
}

/// Builds the row-major example matrix, standardized if requested.
///
/// Returns `(data, n_features)`.
pub fn build_data(dataset: &DatasetToml) -> Result<(Vec<f64>, usize)> {
    let (mut data, n_features) = flatten_rows(&dataset.rows, "dataset")?;
    if let Some(ref names) = dataset.feature_names {
        if names.len() != n_features {
            bail!(
                "{} feature names given for {n_features} features",
                names.len()
            );
        }
    }
    if dataset.standardize {
        rba_stats::standardize_columns(&mut data, n_features);
    }
    Ok((data, n_features))
}

/// Builds the learned metric from `[metric]`, if one is configured.
///
/// `projection` gives an explicit linear map; `covariance` whitens `data`
/// so distances become Mahalanobis distances. At most one may be set.
pub fn build_learned_metric(
    metric: &MetricToml,
    data: &[f64],
    n_features: usize,
) -> Result<Option<SharedMetric>> {
    if metric.covariance {
        if metric.projection.is_some() {
            bail!("set either [metric].projection or [metric].covariance, not both");
        }
        let space =
            ProjectedSpace::mahalanobis(data, n_features).context("invalid covariance metric")?;
        return Ok(Some(Arc::new(space)));
    }
    let Some(ref rows) = metric.projection else {
        return Ok(None);
    };
    let (projection, n_components) = flatten_rows(rows, "projection")?;
    if rows.len() != n_features {
        bail!(
            "projection has {} rows, expected one per feature ({n_features})",
            rows.len()
        );
    }
    let space = ProjectedSpace::new(data, n_features, &projection, n_components)
        .context("invalid projection")?;
    Ok(Some(Arc::new(space)))
}

/// Builds a [`ReliefConfig`] from the TOML algorithm section.
pub fn build_relief_config(
    alg: &AlgorithmToml,
    learned: Option<SharedMetric>,
) -> Result<ReliefConfig> {
    let mut cfg = ReliefConfig::new();
    if let Some(m) = alg.n_samples {
        cfg = cfg.with_n_samples(m);
    }
    if let Some(metric) = learned {
        cfg = cfg.with_learned_metric(metric);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`ReliefFConfig`] from the TOML algorithm section.
pub fn build_relieff_config(
    alg: &AlgorithmToml,
    learned: Option<SharedMetric>,
) -> Result<ReliefFConfig> {
    let mut cfg = ReliefFConfig::new(alg.k);
    if let Some(m) = alg.n_samples {
        cfg = cfg.with_n_samples(m);
    }
    if let Some(metric) = learned {
        cfg = cfg.with_learned_metric(metric);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds an [`IReliefConfig`] from the TOML algorithm section.
pub fn build_irelief_config(
    alg: &AlgorithmToml,
    learned: Option<SharedMetric>,
) -> Result<IReliefConfig> {
    let kernel = parse_kernel(&alg.kernel, alg.kernel_width)?;
    let mut cfg = IReliefConfig::new()
        .with_max_iter(alg.max_iter)
        .with_kernel(kernel)
        .with_threshold(alg.threshold)
        .with_normalize(alg.normalize);
    if let Some(d) = alg.initial_weight_divisor {
        cfg = cfg.with_initial_weight_divisor(d);
    }
    if let Some(metric) = learned {
        cfg = cfg.with_learned_metric(metric);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`SurfConfig`] for `neighborhood`.
pub fn build_surf_config(neighborhood: Neighborhood, learned: Option<SharedMetric>) -> SurfConfig {
    let cfg = SurfConfig::new(neighborhood);
    match learned {
        Some(metric) => cfg.with_learned_metric(metric),
        None => cfg,
    }
}
