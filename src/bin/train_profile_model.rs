//! Retrain the investor profile model and overwrite its artifact
//!
//! Usage: train_profile_model [--config <path>]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use retirement_planner::config::PlannerConfig;
use retirement_planner::profile::{ProfileClassifier, FEATURE_NAMES};

#[derive(Parser, Debug)]
#[command(name = "train_profile_model")]
#[command(about = "Synthesise training data, fit the profile model and save it")]
struct Args {
    /// JSON config file (defaults apply for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PlannerConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    }
    .with_env_overrides();
    let settings = &config.classifier;

    println!(
        "Training profile model: {} samples, {} trees, depth {}, seed {}",
        settings.samples, settings.trees, settings.max_depth, settings.seed
    );
    let start = Instant::now();
    let classifier = ProfileClassifier::rebuild(settings)
        .with_context(|| format!("rebuilding {}", settings.model_path.display()))?;
    println!("Trained in {:.2?}", start.elapsed());

    let importances = classifier.artifact().forest.feature_importances();
    let mut ranked: Vec<(&str, f64)> = FEATURE_NAMES.iter().copied().zip(importances.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("\nFeature Importances:");
    for (name, value) in ranked {
        println!("  {:<22} {:>6.3}", name, value);
    }

    println!("\nModel written to: {}", settings.model_path.display());
    Ok(())
}
