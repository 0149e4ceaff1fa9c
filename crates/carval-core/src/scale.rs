//! Standardization of the numeric feature block.
//!
//! Applies the affine transform `(x - mean) / scale` per column, with the
//! mean and scale vectors recovered from the fitted scaler artifact. The
//! transform runs on the numeric block only; encoded categorical codes are
//! never scaled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the scaling stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalingError {
    /// The input row width does not match the fitted scaler.
    #[error("scaler fitted on {expected} features, got {actual}")]
    FeatureCountMismatch {
        /// Width the scaler was fitted on.
        expected: usize,
        /// Width of the rejected input.
        actual: usize,
    },

    /// The mean and scale vectors have different lengths.
    #[error("scaler parameter lengths differ: {mean} means, {scale} scales")]
    ParameterLengthMismatch {
        /// Length of the mean vector.
        mean: usize,
        /// Length of the scale vector.
        scale: usize,
    },

    /// A fitted scale entry is zero or not finite.
    #[error("scaler column {index} has unusable scale {value}")]
    InvalidScale {
        /// Column index of the bad entry.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// A fitted mean entry is not finite.
    #[error("scaler column {index} has non-finite mean {value}")]
    InvalidMean {
        /// Column index of the bad entry.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// An input value is NaN or infinite.
    #[error("scaler input column {index} is non-finite: {value}")]
    NonFiniteInput {
        /// Column index of the bad entry.
        index: usize,
        /// The rejected value.
        value: f64,
    },
}

/// Serialized form of the fitted scaler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParameters {
    /// Per-column means.
    pub mean: Vec<f64>,
    /// Per-column scales (standard deviations).
    pub scale: Vec<f64>,
}

/// A fitted standard scaler for the numeric block.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Builds a scaler from fitted mean and scale vectors.
    ///
    /// Rejects mismatched lengths, non-finite entries, and zero scales up
    /// front so [`StandardScaler::transform`] never divides by zero.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalingError> {
        if mean.len() != scale.len() {
            return Err(ScalingError::ParameterLengthMismatch {
                mean: mean.len(),
                scale: scale.len(),
            });
        }
        for (index, &value) in mean.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScalingError::InvalidMean { index, value });
            }
        }
        for (index, &value) in scale.iter().enumerate() {
            if !value.is_finite() || value == 0.0 {
                return Err(ScalingError::InvalidScale { index, value });
            }
        }
        Ok(StandardScaler { mean, scale })
    }

    /// Builds a scaler from its serialized parameters.
    pub fn from_params(params: ScalerParameters) -> Result<Self, ScalingError> {
        Self::new(params.mean, params.scale)
    }

    /// An identity scaler (mean 0, scale 1) of the given width.
    pub fn identity(len: usize) -> Self {
        StandardScaler {
            mean: vec![0.0; len],
            scale: vec![1.0; len],
        }
    }

    /// Width of row this scaler was fitted on.
    pub fn expected_features(&self) -> usize {
        self.mean.len()
    }

    /// The fitted per-column means.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// The fitted per-column scales.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardizes one row of raw numeric values.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScalingError> {
        if row.len() != self.mean.len() {
            return Err(ScalingError::FeatureCountMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }
        let mut out = Vec::with_capacity(row.len());
        for (index, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScalingError::NonFiniteInput { index, value });
            }
            out.push((value - self.mean[index]) / self.scale[index]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardizes_each_column() {
        let scaler = StandardScaler::new(vec![2015.0, 60_000.0], vec![5.0, 40_000.0]).unwrap();
        let out = scaler.transform(&[2020.0, 20_000.0]).unwrap();
        assert_eq!(out, vec![1.0, -1.0]);
    }

    #[test]
    fn test_identity_scaler_is_a_no_op() {
        let scaler = StandardScaler::identity(3);
        let row = [1.5, -2.0, 0.0];
        assert_eq!(scaler.transform(&row).unwrap(), row.to_vec());
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let scaler = StandardScaler::identity(4);
        assert_eq!(
            scaler.transform(&[1.0, 2.0]),
            Err(ScalingError::FeatureCountMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_parameter_length_mismatch_rejected() {
        assert!(matches!(
            StandardScaler::new(vec![0.0, 0.0], vec![1.0]),
            Err(ScalingError::ParameterLengthMismatch { mean: 2, scale: 1 })
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(matches!(
            StandardScaler::new(vec![0.0, 0.0], vec![1.0, 0.0]),
            Err(ScalingError::InvalidScale { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        assert!(matches!(
            StandardScaler::new(vec![f64::NAN], vec![1.0]),
            Err(ScalingError::InvalidMean { index: 0, .. })
        ));
        assert!(matches!(
            StandardScaler::new(vec![0.0], vec![f64::INFINITY]),
            Err(ScalingError::InvalidScale { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let scaler = StandardScaler::identity(2);
        assert!(matches!(
            scaler.transform(&[1.0, f64::NAN]),
            Err(ScalingError::NonFiniteInput { index: 1, .. })
        ));
    }

    #[test]
    fn test_params_round_trip() {
        let params = ScalerParameters {
            mean: vec![10.0, 20.0],
            scale: vec![2.0, 4.0],
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: ScalerParameters = serde_json::from_str(&json).unwrap();
        let scaler = StandardScaler::from_params(back).unwrap();
        assert_eq!(scaler.transform(&[12.0, 16.0]).unwrap(), vec![1.0, -1.0]);
    }
}
