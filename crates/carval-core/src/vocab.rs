//! Known-category vocabularies for the categorical fields.
//!
//! The vocabularies exist to drive selection UIs and artifact validation.
//! They are *not* the encoding: codes always come from the fitted label
//! encoders in [`crate::encode`], and a value missing from a vocabulary is
//! still a legal request.

use crate::schema::{CategoricalField, CATEGORICAL_FEATURE_COUNT};

/// The two accident-history choices, in fitted order.
pub const ACCIDENT_CHOICES: [&str; 2] = ["No", "Yes"];

/// The two transmission choices, in fitted order.
pub const TRANSMISSION_CHOICES: [&str; 2] = ["Automatic", "Manual"];

/// An ordered, de-duplicated list of known values for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    values: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary preserving the order of `values`.
    ///
    /// Duplicates after the first occurrence are dropped.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !out.contains(&value) {
                out.push(value);
            }
        }
        Vocabulary { values: out }
    }

    /// Builds a vocabulary sorted lexicographically, matching how the
    /// choice files were produced at export time.
    pub fn sorted<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::new(values);
        vocab.values.sort();
        vocab
    }

    /// Number of known values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `value` is a known category.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Position of `value` in the vocabulary, if known.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// The values, in vocabulary order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterates over the values in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

/// Vocabularies for all six categorical fields, indexed by field.
///
/// The four free-text fields carry vocabularies loaded from the exported
/// choice files; `accident` and `transmission_type` carry their fixed
/// two-value lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    vocabularies: [Vocabulary; CATEGORICAL_FEATURE_COUNT],
}

impl CategoryRegistry {
    /// Builds a registry from the four exported choice lists.
    ///
    /// Each list is sorted, matching the export step that produced the
    /// choice files from the training data.
    pub fn new(
        makes: Vec<String>,
        car_models: Vec<String>,
        ext_cols: Vec<String>,
        int_cols: Vec<String>,
    ) -> Self {
        let mut vocabularies: [Vocabulary; CATEGORICAL_FEATURE_COUNT] = Default::default();
        vocabularies[CategoricalField::Make.position()] = Vocabulary::sorted(makes);
        vocabularies[CategoricalField::CarModel.position()] = Vocabulary::sorted(car_models);
        vocabularies[CategoricalField::ExtCol.position()] = Vocabulary::sorted(ext_cols);
        vocabularies[CategoricalField::IntCol.position()] = Vocabulary::sorted(int_cols);
        vocabularies[CategoricalField::Accident.position()] = Vocabulary::new(ACCIDENT_CHOICES);
        vocabularies[CategoricalField::TransmissionType.position()] =
            Vocabulary::new(TRANSMISSION_CHOICES);
        CategoryRegistry { vocabularies }
    }

    /// The vocabulary for `field`.
    pub fn vocabulary(&self, field: CategoricalField) -> &Vocabulary {
        &self.vocabularies[field.position()]
    }

    /// Whether `value` is a known category for `field`.
    pub fn contains(&self, field: CategoricalField, value: &str) -> bool {
        self.vocabulary(field).contains(value)
    }

    /// The known values for `field`, in vocabulary order.
    pub fn choices(&self, field: CategoricalField) -> &[String] {
        self.vocabulary(field).values()
    }
}
