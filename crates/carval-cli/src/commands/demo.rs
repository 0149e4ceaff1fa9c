//! Demo Command Implementation
//!
//! Writes the small self-consistent artifact set from
//! `carval_serving::demo` so the rest of the CLI can be exercised
//! without the real fitted artifacts.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use carval_core::schema::CategoricalField;
use carval_serving::artifacts::{choices_file_name, ENCODERS_FILE, MODEL_FILE, SCALER_FILE};
use carval_serving::demo::write_demo_artifacts;

/// Write a small demo artifact set
///
/// # Example
///
/// ```bash
/// carval demo --output-dir artifacts
/// carval check --artifact-dir artifacts
/// ```
#[derive(Args, Debug, Clone)]
pub struct DemoCommand {
    /// Directory to write the demo artifacts into
    #[arg(long, short = 'o', default_value = "artifacts")]
    pub output_dir: PathBuf,

    /// Overwrite artifact files that already exist
    #[arg(long)]
    pub force: bool,
}

impl DemoCommand {
    /// Every file name the demo set writes.
    fn artifact_names() -> Vec<&'static str> {
        let mut names = vec![MODEL_FILE, SCALER_FILE, ENCODERS_FILE];
        for field in CategoricalField::ALL {
            if let Some(name) = choices_file_name(field) {
                names.push(name);
            }
        }
        names
    }

    /// Execute the demo command
    pub fn run(&self) -> Result<()> {
        if !self.force {
            for name in Self::artifact_names() {
                let path = self.output_dir.join(name);
                if path.exists() {
                    anyhow::bail!("{:?} already exists. Use --force to overwrite.", path);
                }
            }
        }

        let written = write_demo_artifacts(&self.output_dir)
            .with_context(|| format!("failed to write demo artifacts to {:?}", self.output_dir))?;
        for path in &written {
            info!("Wrote {:?}", path);
        }

        println!(
            "Wrote {} demo artifact files to {:?}. Try:",
            written.len(),
            self.output_dir
        );
        println!(
            "  carval predict --artifact-dir {} --make Toyota --car-model Corolla \
             --ext-col Blue --int-col Black",
            self.output_dir.display()
        );
        Ok(())
    }
}
