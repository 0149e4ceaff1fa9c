//! Fitted label encoders for the categorical fields.
//!
//! A [`LabelEncoder`] maps a category string to its position in the fitted
//! class list. Strings the encoder was never fitted on map to
//! [`UNSEEN_CODE`] instead of failing: the model was trained to tolerate
//! that sentinel, so an unknown make or color is a legal input, not an
//! error. The only encoding-stage error is a *missing encoder*, which
//! means the artifact bundle itself is incomplete.
//!
//! # Example
//!
//! ```
//! use carval_core::encode::{LabelEncoder, UNSEEN_CODE};
//!
//! let enc = LabelEncoder::from_classes(vec!["BMW".into(), "Toyota".into()]).unwrap();
//! assert_eq!(enc.encode("Toyota"), 1);
//! assert_eq!(enc.encode("DeLorean"), UNSEEN_CODE);
//! ```

use crate::schema::{CategoricalField, CATEGORICAL_FEATURE_COUNT};
use std::collections::HashMap;
use thiserror::Error;

/// Code assigned to a category the encoder was not fitted on.
///
/// The value is part of the model contract: the regression model was
/// trained with this sentinel standing in for out-of-vocabulary
/// categories, so it must reach the feature vector unchanged.
pub const UNSEEN_CODE: i64 = -1;

/// Errors raised by the encoding stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A fitted class list names the same category twice.
    #[error("fitted class list repeats class {class:?}")]
    DuplicateClass {
        /// The repeated class.
        class: String,
    },

    /// No fitted encoder was supplied for a categorical field.
    #[error("no label encoder fitted for field {0}")]
    MissingEncoder(CategoricalField),
}

/// One fitted label encoder: classes in fitted order, code = position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Builds an encoder from its fitted class list.
    ///
    /// The list order is the fitted order and determines the codes.
    pub fn from_classes(classes: Vec<String>) -> Result<Self, EncodingError> {
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code as i64).is_some() {
                return Err(EncodingError::DuplicateClass {
                    class: class.clone(),
                });
            }
        }
        Ok(LabelEncoder { classes, index })
    }

    /// Encodes a category string.
    ///
    /// Total over all strings: fitted categories get their position,
    /// everything else gets [`UNSEEN_CODE`].
    pub fn encode(&self, value: &str) -> i64 {
        self.index.get(value).copied().unwrap_or(UNSEEN_CODE)
    }

    /// Whether `value` was in the fitted classes.
    pub fn is_known(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    /// The fitted classes, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of fitted classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the encoder has no fitted classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The fitted encoders for all six categorical fields.
///
/// Built incrementally while loading artifacts; completeness is checked
/// by the loader before the set is used. Looking up a field that never
/// received an encoder reports [`EncodingError::MissingEncoder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderSet {
    encoders: [Option<LabelEncoder>; CATEGORICAL_FEATURE_COUNT],
}

impl EncoderSet {
    /// An empty set with no fitted encoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the encoder for `field`, replacing any previous one.
    pub fn with_encoder(mut self, field: CategoricalField, encoder: LabelEncoder) -> Self {
        self.encoders[field.position()] = Some(encoder);
        self
    }

    /// The fitted encoder for `field`, if one was installed.
    pub fn encoder(&self, field: CategoricalField) -> Option<&LabelEncoder> {
        self.encoders[field.position()].as_ref()
    }

    /// Encodes one categorical value through its field's fitted encoder.
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<i64, EncodingError> {
        match self.encoder(field) {
            Some(encoder) => Ok(encoder.encode(value)),
            None => Err(EncodingError::MissingEncoder(field)),
        }
    }

    /// Whether every categorical field has a fitted encoder.
    pub fn is_complete(&self) -> bool {
        self.encoders.iter().all(Option::is_some)
    }

    /// The fields still missing an encoder.
    pub fn missing_fields(&self) -> Vec<CategoricalField> {
        CategoricalField::ALL
            .into_iter()
            .filter(|f| self.encoders[f.position()].is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(classes: &[&str]) -> LabelEncoder {
        LabelEncoder::from_classes(classes.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_code_is_fitted_position() {
        let enc = encoder(&["BMW", "Ford", "Toyota"]);
        assert_eq!(enc.encode("BMW"), 0);
        assert_eq!(enc.encode("Ford"), 1);
        assert_eq!(enc.encode("Toyota"), 2);
    }

    #[test]
    fn test_unseen_value_gets_sentinel() {
        let enc = encoder(&["BMW", "Ford"]);
        assert_eq!(enc.encode("Tesla"), UNSEEN_CODE);
        assert_eq!(enc.encode(""), UNSEEN_CODE);
        assert!(!enc.is_known("Tesla"));
    }

    #[test]
    fn test_encoding_is_case_sensitive() {
        let enc = encoder(&["Toyota"]);
        assert_eq!(enc.encode("toyota"), UNSEEN_CODE);
        assert_eq!(enc.encode("Toyota"), 0);
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let result = LabelEncoder::from_classes(vec!["BMW".into(), "BMW".into()]);
        assert_eq!(
            result,
            Err(EncodingError::DuplicateClass {
                class: "BMW".to_string()
            })
        );
    }

    #[test]
    fn test_empty_encoder_maps_everything_to_sentinel() {
        let enc = encoder(&[]);
        assert!(enc.is_empty());
        assert_eq!(enc.encode("anything"), UNSEEN_CODE);
    }

    #[test]
    fn test_encoder_set_completeness() {
        let mut set = EncoderSet::new();
        assert!(!set.is_complete());
        assert_eq!(set.missing_fields().len(), CATEGORICAL_FEATURE_COUNT);

        for field in CategoricalField::ALL {
            set = set.with_encoder(field, encoder(&["a", "b"]));
        }
        assert!(set.is_complete());
        assert!(set.missing_fields().is_empty());
    }

    #[test]
    fn test_encoder_set_missing_field_is_an_error() {
        let set = EncoderSet::new().with_encoder(CategoricalField::Make, encoder(&["BMW"]));
        assert_eq!(set.encode(CategoricalField::Make, "BMW"), Ok(0));
        assert_eq!(
            set.encode(CategoricalField::IntCol, "Black"),
            Err(EncodingError::MissingEncoder(CategoricalField::IntCol))
        );
    }

    #[test]
    fn test_encoder_set_unseen_is_not_an_error() {
        let set = EncoderSet::new().with_encoder(CategoricalField::Make, encoder(&["BMW"]));
        assert_eq!(set.encode(CategoricalField::Make, "Tesla"), Ok(UNSEEN_CODE));
    }
}
