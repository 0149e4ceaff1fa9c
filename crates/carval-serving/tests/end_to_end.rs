//! End-to-end checks: demo artifacts on disk through engine quotes.

use carval_core::schema::{Accident, CategoricalField, PriceRequest, Transmission};
use carval_serving::artifacts::{ArtifactError, ArtifactPaths, ENCODERS_FILE};
use carval_serving::demo::write_demo_artifacts;
use carval_serving::engine::PriceEngine;
use tempfile::tempdir;

fn demo_engine(dir: &std::path::Path) -> PriceEngine {
    write_demo_artifacts(dir).unwrap();
    PriceEngine::load(&ArtifactPaths::from_dir(dir)).unwrap()
}

fn corolla() -> PriceRequest {
    PriceRequest {
        make: "Toyota".to_string(),
        car_model: "Corolla".to_string(),
        model_year: 2020,
        mileage: 20_000.0,
        transmission: Transmission::Automatic,
        ext_col: "Blue".to_string(),
        int_col: "Black".to_string(),
        accident: Accident::No,
        horsepower: 200.0,
        engine_size: 2.5,
    }
}

#[test]
fn in_vocabulary_request_yields_a_positive_quote() {
    let dir = tempdir().unwrap();
    let engine = demo_engine(dir.path());

    let quote = engine.predict(&corolla()).unwrap();
    assert!(quote.price.is_finite());
    assert!(quote.price > 0.0);
    assert!(!quote.had_unseen());

    let formatted = quote.formatted_price();
    assert!(formatted.starts_with('$'), "got {formatted}");
    assert!(formatted.ends_with(|c: char| c.is_ascii_digit()));
}

#[test]
fn unknown_make_still_prices() {
    let dir = tempdir().unwrap();
    let engine = demo_engine(dir.path());

    let mut req = corolla();
    req.make = "DeLorean".to_string();
    let quote = engine.predict(&req).unwrap();

    assert_eq!(quote.unseen_fields, vec![CategoricalField::Make]);
    assert!(quote.price > 0.0);
}

#[test]
fn worse_cars_quote_lower() {
    let dir = tempdir().unwrap();
    let engine = demo_engine(dir.path());

    let clean = engine.predict(&corolla()).unwrap();

    let mut worse = corolla();
    worse.model_year = 2008;
    worse.mileage = 180_000.0;
    worse.accident = Accident::Yes;
    let beater = engine.predict(&worse).unwrap();

    assert!(beater.price < clean.price);
}

#[test]
fn registry_serves_the_original_dropdown_contents() {
    let dir = tempdir().unwrap();
    let engine = demo_engine(dir.path());
    let registry = engine.registry();

    assert!(registry.contains(CategoricalField::Make, "Toyota"));
    assert!(!registry.contains(CategoricalField::Make, "DeLorean"));
    assert_eq!(
        registry.choices(CategoricalField::Accident),
        ["No", "Yes"]
    );
    assert_eq!(
        registry.choices(CategoricalField::TransmissionType),
        ["Automatic", "Manual"]
    );

    // Choice lists and fitted encoder classes agree in the demo bundle.
    for field in CategoricalField::ALL {
        let encoder = engine.encoders().encoder(field).unwrap();
        assert_eq!(encoder.classes(), registry.choices(field), "{field}");
    }
}

#[test]
fn deleted_artifact_refuses_to_start() {
    let dir = tempdir().unwrap();
    write_demo_artifacts(dir.path()).unwrap();
    std::fs::remove_file(dir.path().join(ENCODERS_FILE)).unwrap();

    let err = PriceEngine::load(&ArtifactPaths::from_dir(dir.path())).unwrap_err();
    match err {
        ArtifactError::Read { path, .. } => assert!(path.ends_with(ENCODERS_FILE)),
        other => panic!("expected Read error, got {other:?}"),
    }
}

#[test]
fn engine_shares_across_threads() {
    let dir = tempdir().unwrap();
    let engine = std::sync::Arc::new(demo_engine(dir.path()));

    let mut handles = Vec::new();
    for year in [2012, 2016, 2020, 2024] {
        let engine = engine.clone();
        handles.push(std::thread::spawn(move || {
            let mut req = corolla();
            req.model_year = year;
            engine.predict(&req).unwrap().price
        }));
    }
    for handle in handles {
        let price = handle.join().unwrap();
        assert!(price > 0.0);
    }
}
