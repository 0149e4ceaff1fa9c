//! Choices Command Implementation
//!
//! Lists what the loaded vocabularies know, per categorical field. This
//! is the CLI rendition of the original form's dropdown contents.

use anyhow::{bail, Result};
use clap::Args;

use carval_core::schema::CategoricalField;
use carval_core::vocab::CategoryRegistry;

use super::ArtifactArgs;

/// List the known values of the categorical fields
#[derive(Args, Debug, Clone)]
pub struct ChoicesCommand {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Limit output to one field (make, car_model, ext_col, int_col,
    /// accident, transmission_type)
    #[arg(long)]
    pub field: Option<String>,
}

impl ChoicesCommand {
    /// Execute the choices command
    pub fn run(&self) -> Result<()> {
        let field = match &self.field {
            Some(name) => match CategoricalField::from_name(&name.to_lowercase()) {
                Some(field) => Some(field),
                None => {
                    let known: Vec<_> =
                        CategoricalField::ALL.iter().map(|f| f.name()).collect();
                    bail!("unknown field {name:?}; expected one of {}", known.join(", "));
                }
            },
            None => None,
        };

        let engine = self.artifacts.load_engine()?;
        print!("{}", render_choices(engine.registry(), field));
        Ok(())
    }
}

/// One field per block, values indented underneath.
fn render_choices(registry: &CategoryRegistry, only: Option<CategoricalField>) -> String {
    let mut out = String::new();
    for field in CategoricalField::ALL {
        if matches!(only, Some(f) if f != field) {
            continue;
        }
        let choices = registry.choices(field);
        out.push_str(&format!("{} ({} values):\n", field, choices.len()));
        for value in choices {
            out.push_str(&format!("  {value}\n"));
        }
    }
    out
}
