//! Artifact loading, model scoring, and the price engine for Carval.
//!
//! This crate turns the fitted artifacts on disk into a ready-to-serve
//! [`PriceEngine`]. Loading happens once at startup and is strict: a
//! missing or malformed artifact refuses to start the engine with an
//! error naming the file. After that the engine is immutable and
//! `Send + Sync`; requests only read it, so one engine serves any
//! number of threads behind a plain reference or an `Arc`.
//!
//! # Overview
//!
//! ```no_run
//! use carval_serving::{ArtifactPaths, PriceEngine};
//! use carval_core::schema::{Accident, PriceRequest, Transmission};
//!
//! let engine = PriceEngine::load(&ArtifactPaths::from_dir("artifacts"))?;
//! let quote = engine.predict(&PriceRequest {
//!     make: "Kia".into(),
//!     car_model: "Sportage".into(),
//!     model_year: 2019,
//!     mileage: 42_000.0,
//!     transmission: Transmission::Automatic,
//!     ext_col: "Silver".into(),
//!     int_col: "Black".into(),
//!     accident: Accident::No,
//!     horsepower: 181.0,
//!     engine_size: 2.4,
//! })?;
//! println!("estimated price: {}", quote.formatted_price());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`artifacts`] - Artifact file layout, loading, and validation
//! - [`model`] - Model specifications and scoring (`linear`, `gbdt`)
//! - [`engine`] - The end-to-end pipeline and quote formatting
//! - [`list_format`] - Reader/writer for the bracketed choice files
//! - [`demo`] - Generation of a small self-consistent artifact set

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifacts;
pub mod demo;
pub mod engine;
pub mod list_format;
pub mod model;

// Re-export main types for convenience
pub use artifacts::{ArtifactBundle, ArtifactError, ArtifactKind, ArtifactPaths};
pub use engine::{format_usd, PredictError, PriceEngine, PriceQuote};
pub use list_format::{parse_string_list, ListParseError};
pub use model::{build_model, ModelSpec, PredictionError, RegressionModel};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```
/// use carval_serving::prelude::*;
///
/// let spec = demo_model_spec();
/// assert!(build_model(spec).is_ok());
/// ```
pub mod prelude {
    pub use crate::artifacts::{ArtifactError, ArtifactPaths};
    pub use crate::demo::{demo_model_spec, write_demo_artifacts};
    pub use crate::engine::{format_usd, PredictError, PriceEngine, PriceQuote};
    pub use crate::model::{build_model, ModelSpec, RegressionModel};
    pub use carval_core::prelude::*;
}
