//! The end-to-end price engine.
//!
//! [`PriceEngine`] owns the four loaded artifacts and runs the whole
//! pipeline for one request: scale the numeric block, encode the
//! categorical block, assemble the fitted-order feature vector, score
//! the model, and undo the training-time `log1p` with `expm1`. The
//! engine is immutable after construction and shares by plain
//! reference; per-request state never escapes [`PriceEngine::predict`].
//!
//! Any stage failure aborts the request with a [`PredictError`] whose
//! message names the stage. There is no retry and no partial quote.
//!
//! # Example
//!
//! ```no_run
//! use carval_serving::artifacts::ArtifactPaths;
//! use carval_serving::engine::PriceEngine;
//! use carval_core::schema::{Accident, PriceRequest, Transmission};
//!
//! let engine = PriceEngine::load(&ArtifactPaths::from_dir("artifacts"))?;
//! let quote = engine.predict(&PriceRequest {
//!     make: "Toyota".into(),
//!     car_model: "Camry".into(),
//!     model_year: 2021,
//!     mileage: 30_000.0,
//!     transmission: Transmission::Automatic,
//!     ext_col: "White".into(),
//!     int_col: "Black".into(),
//!     accident: Accident::No,
//!     horsepower: 203.0,
//!     engine_size: 2.5,
//! })?;
//! println!("{}", quote.formatted_price());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::artifacts::{load_bundle, ArtifactBundle, ArtifactError, ArtifactPaths};
use crate::model::{PredictionError, RegressionModel};
use carval_core::encode::{EncoderSet, EncodingError, UNSEEN_CODE};
use carval_core::scale::{ScalingError, StandardScaler};
use carval_core::schema::{CategoricalField, PriceRequest, COLUMN_COUNT};
use carval_core::vocab::CategoryRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Per-request pipeline errors, tagged with the stage that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The scaling stage rejected the numeric block.
    #[error("scaling stage failed: {0}")]
    Scaling(#[from] ScalingError),

    /// The encoding stage had no fitted table for a field.
    #[error("encoding stage failed: {0}")]
    Encoding(#[from] EncodingError),

    /// The prediction stage rejected the feature vector or its score.
    #[error("prediction stage failed: {0}")]
    Prediction(#[from] PredictionError),
}

impl PredictError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PredictError::Scaling(_) => "scaling",
            PredictError::Encoding(_) => "encoding",
            PredictError::Prediction(_) => "prediction",
        }
    }
}

/// A completed price estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Estimated resale price in dollars, never negative.
    pub price: f64,
    /// The model's raw prediction, in `log1p` space.
    pub log_price: f64,
    /// Fields whose value was outside the fitted vocabulary and rode
    /// the unseen sentinel. Informational; the estimate still stands.
    pub unseen_fields: Vec<CategoricalField>,
}

impl PriceQuote {
    /// Whether any field fell back to the unseen sentinel.
    pub fn had_unseen(&self) -> bool {
        !self.unseen_fields.is_empty()
    }

    /// The price as `$1,234.56`.
    pub fn formatted_price(&self) -> String {
        format_usd(self.price)
    }
}

/// Formats a dollar amount with comma grouping and two decimals.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents_value = (amount.abs() * 100.0).round();
    if cents_value >= u128::MAX as f64 {
        return format!("{sign}${:.2}", amount.abs());
    }
    let total_cents = cents_value as u128;
    let dollars = (total_cents / 100).to_string();
    let cents = total_cents % 100;
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents:02}")
}

/// The loaded pipeline: scaler, encoders, model, and vocabularies.
///
/// Construction is plain; each stage re-checks its own inputs per
/// request, so a hand-assembled engine with mismatched parts fails at
/// `predict` time with the matching stage error rather than at startup.
/// [`PriceEngine::load`] goes through the artifact loader, which does
/// verify agreement up front.
#[derive(Debug)]
pub struct PriceEngine {
    model: Box<dyn RegressionModel>,
    scaler: StandardScaler,
    encoders: EncoderSet,
    registry: CategoryRegistry,
}

impl PriceEngine {
    /// Assembles an engine from already-loaded parts.
    pub fn new(
        model: Box<dyn RegressionModel>,
        scaler: StandardScaler,
        encoders: EncoderSet,
        registry: CategoryRegistry,
    ) -> Self {
        PriceEngine {
            model,
            scaler,
            encoders,
            registry,
        }
    }

    /// Loads and validates every artifact, then assembles the engine.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self::from_bundle(load_bundle(paths)?))
    }

    /// Assembles an engine from a loaded artifact bundle.
    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self::new(bundle.model, bundle.scaler, bundle.encoders, bundle.registry)
    }

    /// The known-category vocabularies.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// The fitted label encoders.
    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// The fitted numeric scaler.
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// The scoring-ready model.
    pub fn model(&self) -> &dyn RegressionModel {
        self.model.as_ref()
    }

    /// Runs the full pipeline for one request.
    pub fn predict(&self, request: &PriceRequest) -> Result<PriceQuote, PredictError> {
        let scaled = self.scaler.transform(&request.numeric_values())?;

        let mut features = Vec::with_capacity(COLUMN_COUNT);
        features.extend_from_slice(&scaled);
        let mut unseen_fields = Vec::new();
        for field in CategoricalField::ALL {
            let code = self.encoders.encode(field, request.categorical_value(field))?;
            if code == UNSEEN_CODE {
                unseen_fields.push(field);
            }
            features.push(code as f64);
        }
        if !unseen_fields.is_empty() {
            debug!("Values outside the fitted vocabulary: {:?}", unseen_fields);
        }

        let log_price = self.model.predict(&features)?;
        let price = log_price.exp_m1().max(0.0);
        if !price.is_finite() {
            return Err(PredictError::Prediction(PredictionError::NonFiniteScore(
                price,
            )));
        }
        debug!("Scored request: raw {:.4} -> {}", log_price, format_usd(price));

        Ok(PriceQuote {
            price,
            log_price,
            unseen_fields,
        })
    }
}
