//! JSON output structures for ranking and selection results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use rba_relief::FeatureRanking;

/// Result of the `rank` command.
#[derive(Debug, Serialize)]
pub struct RankingOutput {
    pub algorithm: String,
    /// Seed the run was drawn with; absent when seeded from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub n_examples: usize,
    pub n_features: usize,
    /// One entry per feature, in feature order.
    pub features: Vec<FeatureScore>,
}

/// Weight and rank of a single feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureScore {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rank: usize,
    pub weight: f64,
}

/// Rule used by the `select` command.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Top(usize),
    Threshold(f64),
}

/// Result of the `select` command.
#[derive(Debug, Serialize)]
pub struct SelectionOutput {
    pub algorithm: String,
    pub criterion: Criterion,
    /// Selected features, in feature order.
    pub selected: Vec<FeatureScore>,
}

/// Pairs every feature of `ranking` with its optional name.
pub fn feature_scores(ranking: &FeatureRanking, names: Option<&[String]>) -> Vec<FeatureScore> {
    ranking
        .ranks()
        .iter()
        .zip(ranking.weights())
        .enumerate()
        .map(|(index, (&rank, &weight))| FeatureScore {
            index,
            name: names.and_then(|n| n.get(index)).cloned(),
            rank,
            weight,
        })
        .collect()
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json(value: &impl Serialize, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
