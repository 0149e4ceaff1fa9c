//! Carval CLI - used-car resale price estimation from fitted artifacts.
//!
//! This binary wires the price engine to a set of subcommands for one-shot
//! prediction, interactive prompting, vocabulary listing, artifact
//! validation, and demo-artifact generation.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use carval_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries quotes and JSON only.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("carval_cli=info".parse()?)
                .add_directive("carval_serving=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict(cmd) => cmd.run(),
        Commands::Interactive(cmd) => cmd.run(),
        Commands::Choices(cmd) => cmd.run(),
        Commands::Check(cmd) => cmd.run(),
        Commands::Demo(cmd) => cmd.run(),
    }
}
