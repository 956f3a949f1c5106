use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level run configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RbaConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Examples and labels.
    pub dataset: DatasetToml,

    /// Distance settings.
    #[serde(default)]
    pub metric: MetricToml,

    /// Algorithm and its parameters.
    #[serde(default)]
    pub algorithm: AlgorithmToml,
}

impl RbaConfig {
    /// Reads and parses a TOML run file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

/// Inline dataset: one row of feature values per example.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetToml {
    pub rows: Vec<Vec<f64>>,
    pub target: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Scale every column to zero mean and unit variance first.
    #[serde(default)]
    pub standardize: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricToml {
    #[serde(default = "default_metric_kind")]
    pub kind: String,
    /// Rows of the `[n_features × n_components]` matrix of a learned projection.
    #[serde(default)]
    pub projection: Option<Vec<Vec<f64>>>,
    /// Measure distances in the Mahalanobis space of the feature covariance.
    #[serde(default)]
    pub covariance: bool,
}

impl Default for MetricToml {
    fn default() -> Self {
        Self {
            kind: default_metric_kind(),
            projection: None,
            covariance: false,
        }
    }
}

fn default_metric_kind() -> String {
    "euclidean".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlgorithmToml {
    #[serde(default = "default_algorithm_name")]
    pub name: String,
    /// Sampled examples for relief / relieff; all when unset.
    #[serde(default)]
    pub n_samples: Option<usize>,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_kernel")]
    pub kernel: String,
    #[serde(default = "default_kernel_width")]
    pub kernel_width: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub initial_weight_divisor: Option<f64>,
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl Default for AlgorithmToml {
    fn default() -> Self {
        Self {
            name: default_algorithm_name(),
            n_samples: None,
            k: default_k(),
            max_iter: default_max_iter(),
            kernel: default_kernel(),
            kernel_width: default_kernel_width(),
            threshold: default_threshold(),
            initial_weight_divisor: None,
            normalize: true,
        }
    }
}

fn default_algorithm_name() -> String {
    "relief".to_string()
}
fn default_k() -> usize {
    5
}
fn default_max_iter() -> usize {
    100
}
fn default_kernel() -> String {
    "exponential".to_string()
}
fn default_kernel_width() -> f64 {
    2.0
}
fn default_threshold() -> f64 {
    1e-6
}
fn default_true() -> bool {
    true
}
