//! Reviewer assignment: pick `n` distinct reviewers, favoring heavier weights.
//!
//! Usage:
//!
//! ```text
//! cargo run --example reviewer_assignment --features serde -- [roster.json] [changes]
//! ```
//!
//! The roster looks like:
//!
//! ```json
//! {
//!   "reviewers_per_change": 2,
//!   "sampler": { "zero_weights": "trailing" },
//!   "reviewers": [{ "weight": 100, "value": "ana" }, { "weight": 20, "value": "bo" }]
//! }
//! ```
//!
//! Without a roster a built-in one is used. Set `RUST_LOG=fukubiki=trace` to see draws.

use anyhow::Context as _;
use fukubiki::{SampleError, SamplerConfig, WeightedItem, WeightedSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Roster {
    #[serde(default = "default_reviewers_per_change")]
    reviewers_per_change: i64,
    #[serde(default)]
    sampler: SamplerConfig,
    reviewers: Vec<WeightedItem<String>>,
}

fn default_reviewers_per_change() -> i64 {
    2
}

fn builtin_roster() -> Roster {
    let reviewers = [("ana", 100), ("bo", 20), ("cy", 20), ("dee", 45), ("eli", 0)]
        .into_iter()
        .map(|(name, weight)| WeightedItem::new(weight, name.to_string()))
        .collect();
    Roster {
        reviewers_per_change: 2,
        sampler: SamplerConfig::default(),
        reviewers,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let roster = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<Roster>(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => builtin_roster(),
    };
    let changes: u32 = match args.next() {
        Some(arg) => arg.parse().context("changes must be a positive integer")?,
        None => 5,
    };

    let sampler = WeightedSampler::with_config(roster.reviewers, roster.sampler)?;
    tracing::info!(
        reviewers = sampler.len(),
        drawable = sampler.remaining(),
        total_weight = sampler.remaining_weight(),
        "loaded roster"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for change in 1..=changes {
        // Each change starts from the full roster.
        let mut pool = sampler.clone();
        let picked = pool
            .sample_without_replacement_with_rng(roster.reviewers_per_change, &mut rng)?
            .map(|name| name.map(String::as_str))
            .collect::<Result<Vec<_>, SampleError>>()?;

        if (picked.len() as i64) < roster.reviewers_per_change {
            tracing::warn!(
                change,
                wanted = roster.reviewers_per_change,
                got = picked.len(),
                "not enough reviewers"
            );
        }
        println!("change #{change}: {}", picked.join(", "));
    }

    Ok(())
}
