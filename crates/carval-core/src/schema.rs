//! Feature schema for the fitted pricing pipeline.
//!
//! The scaler and the model were fitted against one fixed column layout:
//! four numeric columns followed by six label-encoded categorical columns.
//! That layout is an external contract that cannot be derived at runtime,
//! so it is pinned here as two field enums whose declaration order *is* the
//! fitted column order. Everything else in the workspace goes through these
//! enums instead of raw column names or positions.
//!
//! # Example
//!
//! ```
//! use carval_core::schema::{CategoricalField, NumericField, COLUMN_COUNT};
//!
//! assert_eq!(NumericField::ALL.len() + CategoricalField::ALL.len(), COLUMN_COUNT);
//! assert_eq!(NumericField::ModelYear.column(), 0);
//! assert_eq!(CategoricalField::Make.column(), 4);
//! assert_eq!(CategoricalField::from_name("transmission_type"),
//!            Some(CategoricalField::TransmissionType));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of numeric feature columns.
pub const NUMERIC_FEATURE_COUNT: usize = 4;

/// Number of categorical feature columns.
pub const CATEGORICAL_FEATURE_COUNT: usize = 6;

/// Total width of the feature vector handed to the model.
pub const COLUMN_COUNT: usize = NUMERIC_FEATURE_COUNT + CATEGORICAL_FEATURE_COUNT;

/// Numeric feature columns, in fitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    /// Model year of the car.
    ModelYear,
    /// Odometer reading in miles.
    Mileage,
    /// Engine power in horsepower.
    Horsepower,
    /// Engine displacement in liters.
    EngineSize,
}

impl NumericField {
    /// All numeric fields, in fitted column order.
    pub const ALL: [NumericField; NUMERIC_FEATURE_COUNT] = [
        NumericField::ModelYear,
        NumericField::Mileage,
        NumericField::Horsepower,
        NumericField::EngineSize,
    ];

    /// The column name used when the pipeline was fitted.
    pub const fn name(self) -> &'static str {
        match self {
            NumericField::ModelYear => "model_year",
            NumericField::Mileage => "mileage",
            NumericField::Horsepower => "horsepower",
            NumericField::EngineSize => "engine_size",
        }
    }

    /// Position of this field within the numeric block.
    pub const fn position(self) -> usize {
        match self {
            NumericField::ModelYear => 0,
            NumericField::Mileage => 1,
            NumericField::Horsepower => 2,
            NumericField::EngineSize => 3,
        }
    }

    /// Column index of this field within the full feature vector.
    pub const fn column(self) -> usize {
        self.position()
    }

    /// Looks up a field by its fitted column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categorical feature columns, in fitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    /// Manufacturer (e.g. "Toyota").
    Make,
    /// Model line (e.g. "Corolla").
    CarModel,
    /// Exterior color.
    ExtCol,
    /// Interior color.
    IntCol,
    /// Whether the car has been in an accident.
    Accident,
    /// Transmission type.
    TransmissionType,
}

impl CategoricalField {
    /// All categorical fields, in fitted column order.
    pub const ALL: [CategoricalField; CATEGORICAL_FEATURE_COUNT] = [
        CategoricalField::Make,
        CategoricalField::CarModel,
        CategoricalField::ExtCol,
        CategoricalField::IntCol,
        CategoricalField::Accident,
        CategoricalField::TransmissionType,
    ];

    /// The column name used when the pipeline was fitted.
    pub const fn name(self) -> &'static str {
        match self {
            CategoricalField::Make => "make",
            CategoricalField::CarModel => "car_model",
            CategoricalField::ExtCol => "ext_col",
            CategoricalField::IntCol => "int_col",
            CategoricalField::Accident => "accident",
            CategoricalField::TransmissionType => "transmission_type",
        }
    }

    /// Position of this field within the categorical block.
    pub const fn position(self) -> usize {
        match self {
            CategoricalField::Make => 0,
            CategoricalField::CarModel => 1,
            CategoricalField::ExtCol => 2,
            CategoricalField::IntCol => 3,
            CategoricalField::Accident => 4,
            CategoricalField::TransmissionType => 5,
        }
    }

    /// Column index of this field within the full feature vector.
    pub const fn column(self) -> usize {
        NUMERIC_FEATURE_COUNT + self.position()
    }

    /// Looks up a field by its fitted column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All column names in fitted order, numeric block first.
pub fn column_names() -> [&'static str; COLUMN_COUNT] {
    let mut names = [""; COLUMN_COUNT];
    for field in NumericField::ALL {
        names[field.column()] = field.name();
    }
    for field in CategoricalField::ALL {
        names[field.column()] = field.name();
    }
    names
}

/// Transmission type of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    /// Automatic gearbox.
    Automatic,
    /// Manual gearbox.
    Manual,
}

impl Transmission {
    /// The exact string the encoders were fitted on.
    pub const fn as_str(self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
        }
    }

    /// Parses a user-supplied transmission value (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value.trim().to_lowercase().as_str() {
            "automatic" | "auto" | "a" => Ok(Transmission::Automatic),
            "manual" | "m" => Ok(Transmission::Manual),
            _ => Err(RequestError::InvalidChoice {
                field: "transmission_type",
                value: value.to_string(),
                expected: "Automatic or Manual",
            }),
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Transmission {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Accident history of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accident {
    /// No reported accident.
    No,
    /// At least one reported accident.
    Yes,
}

impl Accident {
    /// The exact string the encoders were fitted on.
    pub const fn as_str(self) -> &'static str {
        match self {
            Accident::No => "No",
            Accident::Yes => "Yes",
        }
    }

    /// Parses a user-supplied accident value (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value.trim().to_lowercase().as_str() {
            "no" | "n" => Ok(Accident::No),
            "yes" | "y" => Ok(Accident::Yes),
            _ => Err(RequestError::InvalidChoice {
                field: "accident",
                value: value.to_string(),
                expected: "No or Yes",
            }),
        }
    }
}

impl fmt::Display for Accident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Accident {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Earliest accepted model year.
pub const MODEL_YEAR_MIN: i32 = 1900;
/// Latest accepted model year.
pub const MODEL_YEAR_MAX: i32 = 2025;
/// Largest accepted mileage, in miles.
pub const MILEAGE_MAX: f64 = 1_000_000.0;
/// Largest accepted horsepower.
pub const HORSEPOWER_MAX: f64 = 2_000.0;
/// Largest accepted engine size, in liters.
pub const ENGINE_SIZE_MAX: f64 = 10.0;

/// Form default for the model year.
pub const DEFAULT_MODEL_YEAR: i32 = 2020;
/// Form default for the mileage.
pub const DEFAULT_MILEAGE: f64 = 50_000.0;
/// Form default for the horsepower.
pub const DEFAULT_HORSEPOWER: f64 = 150.0;
/// Form default for the engine size.
pub const DEFAULT_ENGINE_SIZE: f64 = 2.0;

/// Errors raised while collecting a request at the input boundary.
///
/// These are collection-time problems, not pipeline problems: a request
/// that passes [`PriceRequest::validate`] can still contain strings the
/// encoders have never seen, and that is fine. Unseen values go through
/// the pipeline on the sentinel code instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// A numeric field is outside its declared bounds.
    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        /// Fitted column name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite {
        /// Fitted column name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A fixed-choice field received a string outside its choice list.
    #[error("{field} must be {expected}, got {value:?}")]
    InvalidChoice {
        /// Fitted column name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable description of the accepted values.
        expected: &'static str,
    },
}

/// One fully collected pricing request.
///
/// Free-text categorical fields (`make`, `car_model`, `ext_col`, `int_col`)
/// are deliberately *not* checked against any vocabulary here: out-of-
/// vocabulary strings are a designed pipeline path, not invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRequest {
    /// Manufacturer.
    pub make: String,
    /// Model line.
    pub car_model: String,
    /// Model year.
    pub model_year: i32,
    /// Odometer reading in miles.
    pub mileage: f64,
    /// Transmission type.
    pub transmission: Transmission,
    /// Exterior color.
    pub ext_col: String,
    /// Interior color.
    pub int_col: String,
    /// Accident history.
    pub accident: Accident,
    /// Engine power in horsepower.
    pub horsepower: f64,
    /// Engine displacement in liters.
    pub engine_size: f64,
}

impl PriceRequest {
    /// Checks the declared bounds on the numeric fields.
    pub fn validate(&self) -> Result<(), RequestError> {
        check_range(
            NumericField::ModelYear.name(),
            f64::from(self.model_year),
            f64::from(MODEL_YEAR_MIN),
            f64::from(MODEL_YEAR_MAX),
        )?;
        check_range(NumericField::Mileage.name(), self.mileage, 0.0, MILEAGE_MAX)?;
        check_range(
            NumericField::Horsepower.name(),
            self.horsepower,
            0.0,
            HORSEPOWER_MAX,
        )?;
        check_range(
            NumericField::EngineSize.name(),
            self.engine_size,
            0.0,
            ENGINE_SIZE_MAX,
        )?;
        Ok(())
    }

    /// Raw numeric values in fitted column order.
    pub fn numeric_values(&self) -> [f64; NUMERIC_FEATURE_COUNT] {
        [
            f64::from(self.model_year),
            self.mileage,
            self.horsepower,
            self.engine_size,
        ]
    }

    /// The raw string carried by a categorical field.
    pub fn categorical_value(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Make => &self.make,
            CategoricalField::CarModel => &self.car_model,
            CategoricalField::ExtCol => &self.ext_col,
            CategoricalField::IntCol => &self.int_col,
            CategoricalField::Accident => self.accident.as_str(),
            CategoricalField::TransmissionType => self.transmission.as_str(),
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), RequestError> {
    if !value.is_finite() {
        return Err(RequestError::NotFinite { field, value });
    }
    if value < min || value > max {
        return Err(RequestError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
