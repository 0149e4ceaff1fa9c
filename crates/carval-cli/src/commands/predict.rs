//! Predict Command Implementation
//!
//! One-shot price estimation: every car attribute arrives as a flag,
//! mirroring the original entry form field for field, including its
//! defaults for the numeric attributes.

use anyhow::Result;
use clap::Args;
use tracing::info;

use carval_core::schema::{
    Accident, PriceRequest, Transmission, DEFAULT_ENGINE_SIZE, DEFAULT_HORSEPOWER,
    DEFAULT_MILEAGE, DEFAULT_MODEL_YEAR,
};

use super::{print_quote, ArtifactArgs};

/// Estimate a resale price from flags
///
/// # Example
///
/// ```bash
/// carval predict --artifact-dir artifacts \
///     --make Toyota --car-model Corolla \
///     --year 2020 --mileage 20000 \
///     --ext-col Blue --int-col Black \
///     --horsepower 200 --engine-size 2.5
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Manufacturer, e.g. "Toyota"
    #[arg(long)]
    pub make: String,

    /// Model line, e.g. "Corolla"
    #[arg(long)]
    pub car_model: String,

    /// Model year
    #[arg(long, default_value_t = DEFAULT_MODEL_YEAR)]
    pub year: i32,

    /// Odometer reading in miles
    #[arg(long, default_value_t = DEFAULT_MILEAGE)]
    pub mileage: f64,

    /// Transmission type ("automatic" or "manual")
    #[arg(long, default_value = "automatic")]
    pub transmission: Transmission,

    /// Exterior color
    #[arg(long)]
    pub ext_col: String,

    /// Interior color
    #[arg(long)]
    pub int_col: String,

    /// Accident history ("no" or "yes")
    #[arg(long, default_value = "no")]
    pub accident: Accident,

    /// Engine power in horsepower
    #[arg(long, default_value_t = DEFAULT_HORSEPOWER)]
    pub horsepower: f64,

    /// Engine displacement in liters
    #[arg(long, default_value_t = DEFAULT_ENGINE_SIZE)]
    pub engine_size: f64,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictCommand {
    /// The request assembled from the flags.
    pub fn to_request(&self) -> PriceRequest {
        PriceRequest {
            make: self.make.clone(),
            car_model: self.car_model.clone(),
            model_year: self.year,
            mileage: self.mileage,
            transmission: self.transmission,
            ext_col: self.ext_col.clone(),
            int_col: self.int_col.clone(),
            accident: self.accident,
            horsepower: self.horsepower,
            engine_size: self.engine_size,
        }
    }

    /// Execute the predict command
    pub fn run(&self) -> Result<()> {
        let request = self.to_request();
        request.validate()?;

        let engine = self.artifacts.load_engine()?;
        info!(
            "Estimating: {} {} ({}), {} miles",
            request.make, request.car_model, request.model_year, request.mileage
        );

        let quote = engine.predict(&request)?;
        print_quote(&quote, self.json)
    }
}
