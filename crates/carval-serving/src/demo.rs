//! Generation of a small, internally consistent artifact set.
//!
//! The real fitted artifacts are produced by an offline training job and
//! are not checked in. This module writes a miniature stand-in bundle
//! (ten makes, a dozen model lines, a five-tree boosted model) that
//! loads through the normal artifact path and produces plausible
//! used-car prices. Used by `carval demo` and by the integration tests.

use crate::artifacts::{choices_file_name, ENCODERS_FILE, MODEL_FILE, SCALER_FILE};
use crate::list_format::format_string_list;
use crate::model::{GbdtSpec, ModelSpec, TreeNode, TreeSpec};
use carval_core::scale::ScalerParameters;
use carval_core::schema::{CategoricalField, NumericField, COLUMN_COUNT};
use carval_core::vocab::{ACCIDENT_CHOICES, TRANSMISSION_CHOICES};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Vocabulary for one free-text field, sorted like the exported files.
pub fn demo_choices(field: CategoricalField) -> Vec<String> {
    let values: &[&str] = match field {
        CategoricalField::Make => &[
            "Audi",
            "BMW",
            "Chevrolet",
            "Ford",
            "Honda",
            "Hyundai",
            "Kia",
            "Mercedes-Benz",
            "Nissan",
            "Toyota",
        ],
        CategoricalField::CarModel => &[
            "3 Series",
            "A4",
            "Accord",
            "Altima",
            "C-Class",
            "Camry",
            "Civic",
            "Corolla",
            "Elantra",
            "F-150",
            "Silverado",
            "Sportage",
        ],
        CategoricalField::ExtCol => &[
            "Black", "Blue", "Gray", "Green", "Red", "Silver", "White",
        ],
        CategoricalField::IntCol => &["Beige", "Black", "Brown", "Gray", "Red"],
        CategoricalField::Accident => &ACCIDENT_CHOICES,
        CategoricalField::TransmissionType => &TRANSMISSION_CHOICES,
    };
    values.iter().map(|s| s.to_string()).collect()
}

/// Scaler parameters over the four numeric columns.
pub fn demo_scaler_params() -> ScalerParameters {
    ScalerParameters {
        mean: vec![2015.0, 60_000.0, 200.0, 2.5],
        scale: vec![5.0, 40_000.0, 80.0, 1.0],
    }
}

/// A boosted-tree model over the full feature vector.
///
/// The base score is `ln(20001)`: with every tree contribution at zero
/// the quote would be exactly $20,000. Stumps nudge the log price for
/// newer years, low mileage, premium makes, high horsepower, and a
/// clean accident history.
pub fn demo_model_spec() -> ModelSpec {
    let stump = |field: usize, threshold: f64, below: f64, above: f64| TreeSpec {
        nodes: vec![
            TreeNode::Split {
                feature: field,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: below },
            TreeNode::Leaf { value: above },
        ],
    };

    // Accident splits first; clean cars then split on transmission.
    let accident_tree = TreeSpec {
        nodes: vec![
            TreeNode::Split {
                feature: CategoricalField::Accident.column(),
                threshold: 0.5,
                left: 1,
                right: 2,
            },
            TreeNode::Split {
                feature: CategoricalField::TransmissionType.column(),
                threshold: 0.5,
                left: 3,
                right: 4,
            },
            TreeNode::Leaf { value: -0.45 },
            TreeNode::Leaf { value: 0.1 },
            TreeNode::Leaf { value: 0.02 },
        ],
    };

    ModelSpec::Gbdt(GbdtSpec {
        num_features: COLUMN_COUNT,
        base_score: 20_001.0_f64.ln(),
        trees: vec![
            stump(NumericField::ModelYear.column(), 0.0, -0.35, 0.3),
            stump(NumericField::Mileage.column(), 0.0, 0.25, -0.3),
            stump(CategoricalField::Make.column(), 6.5, -0.05, 0.15),
            stump(NumericField::Horsepower.column(), 1.0, 0.0, 0.2),
            accident_tree,
        ],
    })
}

/// Writes the demo artifact files under `dir`, creating it if needed.
///
/// Returns the written paths. Existing files are overwritten.
pub fn write_demo_artifacts(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let model = to_pretty_json(&demo_model_spec())?;
    written.push(write_file(dir, MODEL_FILE, &model)?);

    let scaler = to_pretty_json(&demo_scaler_params())?;
    written.push(write_file(dir, SCALER_FILE, &scaler)?);

    // Encoder classes are the vocabularies themselves: the demo training
    // data contains every listed value, and fitting sorts classes the
    // same way the choice files are sorted.
    let mut tables: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for field in CategoricalField::ALL {
        tables.insert(field.name(), demo_choices(field));
    }
    let encoders = to_pretty_json(&tables)?;
    written.push(write_file(dir, ENCODERS_FILE, &encoders)?);

    for field in CategoricalField::ALL {
        if let Some(name) = choices_file_name(field) {
            let body = format_string_list(&demo_choices(field));
            written.push(write_file(dir, name, &body)?);
        }
    }

    Ok(written)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn write_file(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("{body}\n"))?;
    Ok(path)
}
