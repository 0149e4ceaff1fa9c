//! Loading and validation of the fitted artifacts.
//!
//! Everything the engine needs is read from one artifact directory:
//!
//! - `model.json`: serialized [`ModelSpec`];
//! - `scaler.json`: fitted mean/scale vectors;
//! - `label_encoders.json`: fitted class lists, keyed by field name;
//! - `*_choices.txt`: bracketed vocabulary lists for the free-text
//!   fields (`accident` and `transmission_type` have fixed choices and
//!   no file).
//!
//! Loading is strict. A missing file, unparsable content, or artifacts
//! that disagree with the pipeline shape (scaler width, model width,
//! encoder coverage) all fail startup with an [`ArtifactError`] naming
//! the artifact and path; nothing is defaulted or repaired.

use crate::list_format::{parse_string_list, ListParseError};
use crate::model::{build_model, ModelSpec, PredictionError, RegressionModel};
use carval_core::encode::{EncoderSet, EncodingError, LabelEncoder};
use carval_core::scale::{ScalerParameters, ScalingError, StandardScaler};
use carval_core::schema::{CategoricalField, COLUMN_COUNT, NUMERIC_FEATURE_COUNT};
use carval_core::vocab::CategoryRegistry;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the model artifact.
pub const MODEL_FILE: &str = "model.json";
/// File name of the scaler artifact.
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the label-encoder artifact.
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// The choices file for a field, or `None` for fixed-choice fields.
pub fn choices_file_name(field: CategoricalField) -> Option<&'static str> {
    match field {
        CategoricalField::Make => Some("make_choices.txt"),
        CategoricalField::CarModel => Some("car_model_choices.txt"),
        CategoricalField::ExtCol => Some("ext_col_choices.txt"),
        CategoricalField::IntCol => Some("int_col_choices.txt"),
        CategoricalField::Accident | CategoricalField::TransmissionType => None,
    }
}

/// Which artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The serialized model.
    Model,
    /// The fitted scaler parameters.
    Scaler,
    /// The fitted label encoders.
    Encoders,
    /// A vocabulary choices file.
    Choices,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Encoders => "label encoders",
            ArtifactKind::Choices => "choices",
        };
        f.write_str(name)
    }
}

/// Fatal artifact-loading errors. The engine never starts past one.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An artifact file could not be read.
    #[error("failed to read {kind} artifact at {path:?}")]
    Read {
        /// Which artifact failed.
        kind: ArtifactKind,
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact did not deserialize.
    #[error("failed to parse {kind} artifact at {path:?}")]
    Json {
        /// Which artifact failed.
        kind: ArtifactKind,
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A choices file is not a valid bracketed list.
    #[error("failed to parse choices file at {path:?}")]
    ChoiceList {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ListParseError,
    },

    /// The scaler parameters are unusable.
    #[error("scaler artifact at {path:?} is unusable")]
    InvalidScaler {
        /// Path of the scaler artifact.
        path: PathBuf,
        /// What was wrong with the parameters.
        #[source]
        source: ScalingError,
    },

    /// The scaler was fitted on the wrong number of features.
    #[error("scaler at {path:?} fitted on {actual} features, pipeline has {expected}")]
    WrongScalerWidth {
        /// Path of the scaler artifact.
        path: PathBuf,
        /// Width the pipeline requires.
        expected: usize,
        /// Width found in the artifact.
        actual: usize,
    },

    /// A fitted class list is unusable.
    #[error("label encoder for {field} at {path:?} is unusable")]
    InvalidEncoder {
        /// Field whose class list failed.
        field: CategoricalField,
        /// Path of the encoder artifact.
        path: PathBuf,
        /// What was wrong with the class list.
        #[source]
        source: EncodingError,
    },

    /// The encoder artifact does not cover every categorical field.
    #[error("label encoders at {path:?} missing fields {fields:?}")]
    MissingEncoders {
        /// Path of the encoder artifact.
        path: PathBuf,
        /// Fields with no fitted class list.
        fields: Vec<CategoricalField>,
    },

    /// The model specification failed validation.
    #[error("model artifact at {path:?} is unusable")]
    InvalidModel {
        /// Path of the model artifact.
        path: PathBuf,
        /// What was wrong with the specification.
        #[source]
        source: PredictionError,
    },

    /// The model was fitted on the wrong number of features.
    #[error("model at {path:?} expects {actual} features, pipeline produces {expected}")]
    WrongModelWidth {
        /// Path of the model artifact.
        path: PathBuf,
        /// Width the pipeline produces.
        expected: usize,
        /// Width found in the artifact.
        actual: usize,
    },
}

/// Locations of the artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Path of `model.json`.
    pub model: PathBuf,
    /// Path of `scaler.json`.
    pub scaler: PathBuf,
    /// Path of `label_encoders.json`.
    pub encoders: PathBuf,
    /// Directory holding the `*_choices.txt` files.
    pub choices_dir: PathBuf,
}

impl ArtifactPaths {
    /// Standard layout: every artifact directly under one directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            encoders: dir.join(ENCODERS_FILE),
            choices_dir: dir.to_path_buf(),
        }
    }

    /// Path of the choices file for `field`, if the field has one.
    pub fn choices_file(&self, field: CategoricalField) -> Option<PathBuf> {
        choices_file_name(field).map(|name| self.choices_dir.join(name))
    }
}

/// Everything loaded from the artifact directory, validated and ready.
#[derive(Debug)]
pub struct ArtifactBundle {
    /// The scoring-ready model.
    pub model: Box<dyn RegressionModel>,
    /// The fitted numeric scaler.
    pub scaler: StandardScaler,
    /// The fitted label encoders, one per categorical field.
    pub encoders: EncoderSet,
    /// The known-category vocabularies.
    pub registry: CategoryRegistry,
}

/// Loads and validates every artifact.
pub fn load_bundle(paths: &ArtifactPaths) -> Result<ArtifactBundle, ArtifactError> {
    let model = load_model(paths)?;
    let scaler = load_scaler(paths)?;
    let encoders = load_encoders(paths)?;
    let registry = load_registry(paths)?;

    info!(
        "Loaded artifacts: {} model over {} features, {} makes, {} car models",
        model.family(),
        model.expected_features(),
        registry.choices(CategoricalField::Make).len(),
        registry.choices(CategoricalField::CarModel).len(),
    );
    Ok(ArtifactBundle {
        model,
        scaler,
        encoders,
        registry,
    })
}

fn load_model(paths: &ArtifactPaths) -> Result<Box<dyn RegressionModel>, ArtifactError> {
    debug!("Reading model spec from {:?}", paths.model);
    let spec: ModelSpec = read_json(ArtifactKind::Model, &paths.model)?;
    let model = build_model(spec).map_err(|source| ArtifactError::InvalidModel {
        path: paths.model.clone(),
        source,
    })?;
    if model.expected_features() != COLUMN_COUNT {
        return Err(ArtifactError::WrongModelWidth {
            path: paths.model.clone(),
            expected: COLUMN_COUNT,
            actual: model.expected_features(),
        });
    }
    Ok(model)
}

fn load_scaler(paths: &ArtifactPaths) -> Result<StandardScaler, ArtifactError> {
    debug!("Reading scaler parameters from {:?}", paths.scaler);
    let params: ScalerParameters = read_json(ArtifactKind::Scaler, &paths.scaler)?;
    let scaler = StandardScaler::from_params(params).map_err(|source| {
        ArtifactError::InvalidScaler {
            path: paths.scaler.clone(),
            source,
        }
    })?;
    if scaler.expected_features() != NUMERIC_FEATURE_COUNT {
        return Err(ArtifactError::WrongScalerWidth {
            path: paths.scaler.clone(),
            expected: NUMERIC_FEATURE_COUNT,
            actual: scaler.expected_features(),
        });
    }
    Ok(scaler)
}

fn load_encoders(paths: &ArtifactPaths) -> Result<EncoderSet, ArtifactError> {
    debug!("Reading label encoders from {:?}", paths.encoders);
    let mut tables: BTreeMap<String, Vec<String>> =
        read_json(ArtifactKind::Encoders, &paths.encoders)?;

    let mut encoders = EncoderSet::new();
    let mut missing = Vec::new();
    for field in CategoricalField::ALL {
        match tables.remove(field.name()) {
            Some(classes) => {
                let encoder = LabelEncoder::from_classes(classes).map_err(|source| {
                    ArtifactError::InvalidEncoder {
                        field,
                        path: paths.encoders.clone(),
                        source,
                    }
                })?;
                encoders = encoders.with_encoder(field, encoder);
            }
            None => missing.push(field),
        }
    }
    if !missing.is_empty() {
        return Err(ArtifactError::MissingEncoders {
            path: paths.encoders.clone(),
            fields: missing,
        });
    }
    for unknown in tables.keys() {
        warn!("Ignoring unknown encoder table {:?} in {:?}", unknown, paths.encoders);
    }
    Ok(encoders)
}

fn load_registry(paths: &ArtifactPaths) -> Result<CategoryRegistry, ArtifactError> {
    let makes = load_choices(paths, CategoricalField::Make)?;
    let car_models = load_choices(paths, CategoricalField::CarModel)?;
    let ext_cols = load_choices(paths, CategoricalField::ExtCol)?;
    let int_cols = load_choices(paths, CategoricalField::IntCol)?;
    Ok(CategoryRegistry::new(makes, car_models, ext_cols, int_cols))
}

fn load_choices(
    paths: &ArtifactPaths,
    field: CategoricalField,
) -> Result<Vec<String>, ArtifactError> {
    // Callers only pass free-text fields, which all have a file.
    let path = match paths.choices_file(field) {
        Some(path) => path,
        None => return Ok(Vec::new()),
    };
    debug!("Reading {} choices from {:?}", field, path);
    let text = fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
        kind: ArtifactKind::Choices,
        path: path.clone(),
        source,
    })?;
    parse_string_list(&text).map_err(|source| ArtifactError::ChoiceList { path, source })
}

fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Json {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
