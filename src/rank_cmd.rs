//! Rank command: weight every feature of the configured dataset.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use rba_relief::{Dataset, FeatureRanking, irelief, random_weights, relief, relieff, surf};

use crate::cli::RankArgs;
use crate::config::RbaConfig;
use crate::convert::{self, Algorithm};
use crate::output::{RankingOutput, feature_scores, write_json};

/// A finished weighting run.
#[derive(Debug)]
pub struct Ranked {
    pub algorithm: Algorithm,
    pub seed: Option<u64>,
    pub n_examples: usize,
    pub n_features: usize,
    pub ranking: FeatureRanking,
}

/// Run the rank command.
pub fn run(args: RankArgs) -> Result<()> {
    let _cmd = info_span!("rank").entered();
    let config = RbaConfig::load(&args.config)?;
    let ranked = compute(&config, args.seed)?;

    let output = RankingOutput {
        algorithm: ranked.algorithm.name().to_string(),
        seed: ranked.seed,
        n_examples: ranked.n_examples,
        n_features: ranked.n_features,
        features: feature_scores(&ranked.ranking, config.dataset.feature_names.as_deref()),
    };
    write_json(&output, args.output.as_deref())
}

/// Builds the dataset and configs from `config` and runs the selected algorithm.
///
/// `seed` overrides the seed from the config file.
pub fn compute(config: &RbaConfig, seed: Option<u64>) -> Result<Ranked> {
    // Step 1: Build data and library configs
    let algorithm = convert::parse_algorithm(&config.algorithm.name)?;
    let kind = convert::parse_metric_kind(&config.metric.kind)?;
    let (data, n_features) = convert::build_data(&config.dataset)?;
    let target = &config.dataset.target;

    let dataset = Dataset::new(&data, n_features, target).context("invalid dataset")?;
    let n_examples = dataset.n_examples();
    info!(
        algorithm = algorithm.name(),
        n_examples,
        n_features,
        n_classes = dataset.n_classes(),
        "dataset loaded"
    );

    let learned = convert::build_learned_metric(&config.metric, &data, n_features)?;

    // Step 2: Create seeded RNG
    let seed = seed.or(config.seed);
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    // Step 3: Run
    let ranking = match algorithm {
        Algorithm::Relief => {
            let cfg = convert::build_relief_config(&config.algorithm, learned)?;
            let distance = kind.paired();
            relief(&data, n_features, target, &distance, &cfg, &mut rng).context("relief failed")?
        }
        Algorithm::ReliefF => {
            let cfg = convert::build_relieff_config(&config.algorithm, learned)?;
            let distance = kind.paired();
            relieff(&data, n_features, target, &distance, &cfg, &mut rng)
                .context("relieff failed")?
        }
        Algorithm::IRelief => {
            let cfg = convert::build_irelief_config(&config.algorithm, learned)?;
            let distance = kind.weighted();
            irelief(&data, n_features, target, &distance, &cfg).context("irelief failed")?
        }
        Algorithm::Surf(neighborhood) => {
            let cfg = convert::build_surf_config(neighborhood, learned);
            let distance = kind.paired();
            surf(&data, n_features, target, &distance, &cfg)
                .with_context(|| format!("{} failed", neighborhood.name()))?
        }
        Algorithm::Random => random_weights(n_features, &mut rng),
    };
    info!(top = ?ranking.top(1), "ranking complete");

    Ok(Ranked {
        algorithm,
        seed,
        n_examples,
        n_features,
        ranking,
    })
}
