//! Carval CLI Library
//!
//! This crate provides the command-line interface for Carval, including:
//!
//! - **Predict**: One-shot price estimation from flags
//! - **Interactive**: Form-style prompting on stdin
//! - **Choices**: List the known vocabulary per categorical field
//! - **Check**: Load and validate the artifact directory
//! - **Demo**: Write a small self-consistent artifact set
//!
//! # Example
//!
//! ```bash
//! # Generate demo artifacts and estimate a price
//! carval demo --output-dir artifacts
//! carval predict --artifact-dir artifacts \
//!     --make Toyota --car-model Corolla --year 2020 --mileage 20000 \
//!     --ext-col Blue --int-col Black --horsepower 200 --engine-size 2.5
//!
//! # Inspect what the artifacts know
//! carval choices --artifact-dir artifacts --field make
//! carval check --artifact-dir artifacts
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{
    ArtifactArgs, CheckCommand, ChoicesCommand, DemoCommand, InteractiveCommand, PredictCommand,
};

/// Carval - used-car resale price estimation from fitted artifacts
///
/// Loads a pre-trained scaler, label encoders, and regression model from
/// an artifact directory and turns car attributes into a price quote.
#[derive(Parser, Debug)]
#[command(name = "carval")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate a resale price from flags
    Predict(PredictCommand),

    /// Prompt for each attribute, then estimate
    Interactive(InteractiveCommand),

    /// List the known values of the categorical fields
    Choices(ChoicesCommand),

    /// Load all artifacts and report a summary
    Check(CheckCommand),

    /// Write a small demo artifact set
    Demo(DemoCommand),
}
