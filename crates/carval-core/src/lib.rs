//! Feature schema and preprocessing primitives for Carval.
//!
//! This crate holds the parts of the car price pipeline that are pure data
//! transformation: the fitted column schema, the category vocabularies, the
//! label encoders with their unseen-value sentinel, and the standard scaler
//! for the numeric block. Artifact loading and model scoring live in
//! `carval-serving`; this crate has no I/O.
//!
//! # Overview
//!
//! A request flows through two independent transforms before scoring. The
//! numeric block is standardized and the categorical block is label
//! encoded, and both land in one fixed-order feature vector:
//!
//! ```
//! use carval_core::encode::{LabelEncoder, UNSEEN_CODE};
//! use carval_core::scale::StandardScaler;
//!
//! let scaler = StandardScaler::new(vec![2015.0], vec![5.0]).unwrap();
//! assert_eq!(scaler.transform(&[2020.0]).unwrap(), vec![1.0]);
//!
//! let make = LabelEncoder::from_classes(vec!["BMW".into(), "Toyota".into()]).unwrap();
//! assert_eq!(make.encode("Toyota"), 1);
//! assert_eq!(make.encode("DeLorean"), UNSEEN_CODE);
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Field enums pinning the fitted column order, plus the
//!   request type and its bounds
//! - [`vocab`] - Known-category vocabularies for selection UIs
//! - [`encode`] - Fitted label encoders and the unseen-value sentinel
//! - [`scale`] - Standardization of the numeric block

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encode;
pub mod scale;
pub mod schema;
pub mod vocab;

// Re-export main types for convenience
pub use encode::{EncoderSet, EncodingError, LabelEncoder, UNSEEN_CODE};
pub use scale::{ScalerParameters, ScalingError, StandardScaler};
pub use schema::{
    Accident, CategoricalField, NumericField, PriceRequest, RequestError, Transmission,
    CATEGORICAL_FEATURE_COUNT, COLUMN_COUNT, NUMERIC_FEATURE_COUNT,
};
pub use vocab::{CategoryRegistry, Vocabulary};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```
/// use carval_core::prelude::*;
///
/// assert_eq!(UNSEEN_CODE, -1);
/// assert_eq!(CategoricalField::Make.name(), "make");
/// ```
pub mod prelude {
    pub use crate::encode::{EncoderSet, LabelEncoder, UNSEEN_CODE};
    pub use crate::scale::StandardScaler;
    pub use crate::schema::{
        Accident, CategoricalField, NumericField, PriceRequest, Transmission, COLUMN_COUNT,
    };
    pub use crate::vocab::{CategoryRegistry, Vocabulary};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        assert_eq!(COLUMN_COUNT, 10);
        assert_eq!(UNSEEN_CODE, -1);
    }

    #[test]
    fn test_full_preprocessing_path() {
        use crate::prelude::*;

        let req = PriceRequest {
            make: "Toyota".to_string(),
            car_model: "Starship".to_string(),
            model_year: 2020,
            mileage: 20_000.0,
            transmission: Transmission::Manual,
            ext_col: "Blue".to_string(),
            int_col: "Black".to_string(),
            accident: Accident::No,
            horsepower: 200.0,
            engine_size: 2.5,
        };
        req.validate().unwrap();

        let scaler = StandardScaler::new(
            vec![2015.0, 60_000.0, 200.0, 2.5],
            vec![5.0, 40_000.0, 80.0, 1.0],
        )
        .unwrap();
        let scaled = scaler.transform(&req.numeric_values()).unwrap();
        assert_eq!(scaled, vec![1.0, -1.0, 0.0, 0.0]);

        let mut encoders = EncoderSet::new();
        for field in CategoricalField::ALL {
            let classes = match field {
                CategoricalField::Make => vec!["Ford".to_string(), "Toyota".to_string()],
                CategoricalField::CarModel => vec!["Corolla".to_string()],
                CategoricalField::ExtCol => vec!["Black".to_string(), "Blue".to_string()],
                CategoricalField::IntCol => vec!["Black".to_string()],
                CategoricalField::Accident => vec!["No".to_string(), "Yes".to_string()],
                CategoricalField::TransmissionType => {
                    vec!["Automatic".to_string(), "Manual".to_string()]
                }
            };
            encoders = encoders.with_encoder(field, LabelEncoder::from_classes(classes).unwrap());
        }

        let mut codes = Vec::new();
        for field in CategoricalField::ALL {
            codes.push(
                encoders
                    .encode(field, req.categorical_value(field))
                    .unwrap(),
            );
        }
        // car_model "Starship" was never fitted and rides the sentinel.
        assert_eq!(codes, vec![1, UNSEEN_CODE, 1, 0, 0, 1]);
    }
}
