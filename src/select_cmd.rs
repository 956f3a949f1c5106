//! Select command: rank the features, then keep the best ones.

use anyhow::{Result, bail};
use tracing::{info, info_span};

use crate::cli::SelectArgs;
use crate::config::RbaConfig;
use crate::output::{Criterion, FeatureScore, SelectionOutput, feature_scores, write_json};
use crate::rank_cmd::{Ranked, compute};

/// Run the select command.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let criterion = match (args.top, args.threshold) {
        (Some(n), None) => Criterion::Top(n),
        (None, Some(t)) => Criterion::Threshold(t),
        _ => bail!("exactly one of --top or --threshold is required"),
    };

    let config = RbaConfig::load(&args.config)?;
    let ranked = compute(&config, args.seed)?;
    let selected = select(&ranked, criterion, config.dataset.feature_names.as_deref());
    info!(n_selected = selected.len(), "features selected");

    let output = SelectionOutput {
        algorithm: ranked.algorithm.name().to_string(),
        criterion,
        selected,
    };
    write_json(&output, args.output.as_deref())
}

/// Applies `criterion` to a finished run, keeping feature order.
pub fn select(
    ranked: &Ranked,
    criterion: Criterion,
    names: Option<&[String]>,
) -> Vec<FeatureScore> {
    let keep = match criterion {
        Criterion::Top(n) => ranked.ranking.top(n),
        Criterion::Threshold(t) => ranked.ranking.above(t),
    };
    let scores = feature_scores(&ranked.ranking, names);
    keep.into_iter().map(|t| scores[t].clone()).collect()
}
