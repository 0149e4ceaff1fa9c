//! Interactive Command Implementation
//!
//! Walks through the attributes one prompt at a time, the way the
//! original form did: each categorical field shows its known values,
//! each numeric field shows its default, and pressing enter accepts the
//! default. Invalid numeric input re-prompts; end of input accepts the
//! default and moves on.

use anyhow::Result;
use clap::Args;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use carval_core::schema::{
    Accident, CategoricalField, PriceRequest, Transmission, DEFAULT_ENGINE_SIZE,
    DEFAULT_HORSEPOWER, DEFAULT_MILEAGE, DEFAULT_MODEL_YEAR, ENGINE_SIZE_MAX, HORSEPOWER_MAX,
    MILEAGE_MAX, MODEL_YEAR_MAX, MODEL_YEAR_MIN,
};
use carval_core::vocab::CategoryRegistry;

use super::{print_quote, ArtifactArgs};

/// How many known values a categorical prompt shows before truncating.
const CHOICE_PREVIEW: usize = 12;

/// Prompt for each attribute, then estimate
#[derive(Args, Debug, Clone)]
pub struct InteractiveCommand {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

impl InteractiveCommand {
    /// Execute the interactive command
    pub fn run(&self) -> Result<()> {
        let engine = self.artifacts.load_engine()?;

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
        let request = collect_request(&mut prompter, engine.registry())?;
        drop(prompter);

        let quote = engine.predict(&request)?;
        print_quote(&quote, self.json)
    }
}

/// Prompts for every attribute and assembles the request.
fn collect_request<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    registry: &CategoryRegistry,
) -> Result<PriceRequest> {
    let make = prompter.category(registry, CategoricalField::Make)?;
    let car_model = prompter.category(registry, CategoricalField::CarModel)?;
    let model_year = prompter.number_in_range(
        "Model year",
        DEFAULT_MODEL_YEAR,
        MODEL_YEAR_MIN,
        MODEL_YEAR_MAX,
    )?;
    let mileage = prompter.number_in_range("Mileage (miles)", DEFAULT_MILEAGE, 0.0, MILEAGE_MAX)?;
    let transmission = prompter.parsed_choice(
        "Transmission (Automatic/Manual)",
        Transmission::Automatic,
        Transmission::parse,
    )?;
    let ext_col = prompter.category(registry, CategoricalField::ExtCol)?;
    let int_col = prompter.category(registry, CategoricalField::IntCol)?;
    let accident = prompter.parsed_choice(
        "Any reported accident? (No/Yes)",
        Accident::No,
        Accident::parse,
    )?;
    let horsepower =
        prompter.number_in_range("Horsepower", DEFAULT_HORSEPOWER, 0.0, HORSEPOWER_MAX)?;
    let engine_size = prompter.number_in_range(
        "Engine size (liters)",
        DEFAULT_ENGINE_SIZE,
        0.0,
        ENGINE_SIZE_MAX,
    )?;

    Ok(PriceRequest {
        make,
        car_model,
        model_year,
        mileage,
        transmission,
        ext_col,
        int_col,
        accident,
        horsepower,
        engine_size,
    })
}

/// Line-oriented prompting over any reader/writer pair.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// One prompt; empty input or end of input accepts the default.
    fn line(&mut self, label: &str, default: &str) -> Result<String> {
        write!(self.output, "{label} [{default}]: ")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            writeln!(self.output)?;
            return Ok(default.to_string());
        }
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// Free-text categorical prompt showing the known values first.
    ///
    /// The default is the first known value, like the original form's
    /// dropdowns. Values outside the list are accepted; they ride the
    /// unseen sentinel downstream.
    fn category(
        &mut self,
        registry: &CategoryRegistry,
        field: CategoricalField,
    ) -> Result<String> {
        let choices = registry.choices(field);
        writeln!(
            self.output,
            "Known {} values: {}",
            field,
            preview(choices, CHOICE_PREVIEW)
        )?;
        let default = choices.first().map(String::as_str).unwrap_or("");
        self.line(field.name(), default)
    }

    /// Numeric prompt that re-asks until the value parses and is in range.
    fn number_in_range<T>(&mut self, label: &str, default: T, min: T, max: T) -> Result<T>
    where
        T: FromStr + PartialOrd + Display + Copy,
        T::Err: Display,
    {
        loop {
            let raw = self.line(label, &default.to_string())?;
            match raw.parse::<T>() {
                Ok(value) if value >= min && value <= max => return Ok(value),
                Ok(value) => {
                    writeln!(
                        self.output,
                        "  {value} is outside {min} to {max}, try again"
                    )?;
                }
                Err(err) => writeln!(self.output, "  not a number ({err}), try again")?,
            }
        }
    }

    /// Fixed-choice prompt that re-asks until the value parses.
    fn parsed_choice<T, E, F>(&mut self, label: &str, default: T, parse: F) -> Result<T>
    where
        T: Display + Copy,
        E: Display,
        F: Fn(&str) -> std::result::Result<T, E>,
    {
        loop {
            let raw = self.line(label, &default.to_string())?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(self.output, "  {err}, try again")?,
            }
        }
    }
}

/// First `limit` values joined for display, with a count of the rest.
fn preview(choices: &[String], limit: usize) -> String {
    if choices.is_empty() {
        return "(none)".to_string();
    }
    let shown: Vec<_> = choices.iter().take(limit).map(String::as_str).collect();
    if choices.len() > limit {
        format!("{} … and {} more", shown.join(", "), choices.len() - limit)
    } else {
        shown.join(", ")
    }
}
