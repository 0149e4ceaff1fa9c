//! Check Command Implementation
//!
//! Loads every artifact through the normal startup path and prints a
//! summary of what was found. A failure exits non-zero with the loader's
//! error naming the offending artifact, which makes this the fast way to
//! vet an artifact directory before deploying it.

use anyhow::Result;
use clap::Args;

use carval_core::schema::CategoricalField;
use carval_serving::engine::PriceEngine;

use super::ArtifactArgs;

/// Load all artifacts and report a summary
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl CheckCommand {
    /// Execute the check command
    pub fn run(&self) -> Result<()> {
        let engine = self.artifacts.load_engine()?;
        print!("{}", summarize(&engine));
        Ok(())
    }
}

/// Human-readable summary of a loaded engine.
fn summarize(engine: &PriceEngine) -> String {
    let mut out = String::new();
    out.push_str("artifacts OK\n");
    out.push_str(&format!(
        "  model: {} over {} features\n",
        engine.model().family(),
        engine.model().expected_features()
    ));
    out.push_str(&format!(
        "  scaler: {} features\n",
        engine.scaler().expected_features()
    ));

    out.push_str("  encoders:");
    for field in CategoricalField::ALL {
        let classes = engine
            .encoders()
            .encoder(field)
            .map(|e| e.len())
            .unwrap_or(0);
        out.push_str(&format!(" {field} ({classes})"));
    }
    out.push('\n');

    out.push_str("  vocabularies:");
    for field in CategoricalField::ALL {
        let values = engine.registry().choices(field).len();
        out.push_str(&format!(" {field} ({values})"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use carval_serving::artifacts::ArtifactPaths;
    use carval_serving::demo::write_demo_artifacts;
    use tempfile::tempdir;

    #[test]
    fn test_summary_of_demo_artifacts() {
        let dir = tempdir().unwrap();
        write_demo_artifacts(dir.path()).unwrap();
        let engine = PriceEngine::load(&ArtifactPaths::from_dir(dir.path())).unwrap();

        let summary = summarize(&engine);
        assert!(summary.starts_with("artifacts OK\n"));
        assert!(summary.contains("model: gbdt over 10 features"));
        assert!(summary.contains("scaler: 4 features"));
        assert!(summary.contains("make (10)"));
        assert!(summary.contains("transmission_type (2)"));
    }
}
