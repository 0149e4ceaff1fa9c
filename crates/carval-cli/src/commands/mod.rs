//! CLI Command Implementations
//!
//! This module contains the implementations for all CLI subcommands:
//!
//! - [`predict`]: One-shot price estimation from flags
//! - [`interactive`]: Form-style prompting on stdin
//! - [`choices`]: Vocabulary listing
//! - [`check`]: Artifact validation and summary
//! - [`demo`]: Demo-artifact generation

mod check;
mod choices;
mod demo;
mod interactive;
mod predict;

pub use check::CheckCommand;
pub use choices::ChoicesCommand;
pub use demo::DemoCommand;
pub use interactive::InteractiveCommand;
pub use predict::PredictCommand;

use anyhow::{Context, Result};
use carval_serving::artifacts::ArtifactPaths;
use carval_serving::engine::{PriceEngine, PriceQuote};
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Where to find the fitted artifacts. Shared by every loading command.
#[derive(Args, Debug, Clone)]
pub struct ArtifactArgs {
    /// Directory holding the fitted artifacts
    #[arg(long, env = "CARVAL_ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Override the model artifact path
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Override the scaler artifact path
    #[arg(long)]
    pub scaler_path: Option<PathBuf>,

    /// Override the label-encoder artifact path
    #[arg(long)]
    pub encoders_path: Option<PathBuf>,
}

impl ArtifactArgs {
    /// Resolves the artifact locations, applying any overrides.
    pub fn paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths::from_dir(&self.artifact_dir);
        if let Some(path) = &self.model_path {
            paths.model = path.clone();
        }
        if let Some(path) = &self.scaler_path {
            paths.scaler = path.clone();
        }
        if let Some(path) = &self.encoders_path {
            paths.encoders = path.clone();
        }
        paths
    }

    /// Loads the engine from the resolved locations.
    pub fn load_engine(&self) -> Result<PriceEngine> {
        PriceEngine::load(&self.paths()).context("failed to load pricing artifacts")
    }
}

/// Prints a quote to stdout, plain or as JSON.
pub(crate) fn print_quote(quote: &PriceQuote, json: bool) -> Result<()> {
    if quote.had_unseen() {
        let names: Vec<_> = quote.unseen_fields.iter().map(|f| f.name()).collect();
        warn!(
            "Estimate used the unseen-category fallback for: {}",
            names.join(", ")
        );
    }
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(quote).context("failed to serialize quote")?
        );
    } else {
        println!("Estimated Resale Value: {}", quote.formatted_price());
    }
    Ok(())
}
