//! # soil_core - Geotechnical Laboratory Calculation Engine
//!
//! `soil_core` is the computational heart of SoilLab, providing soil and
//! aggregate laboratory test calculations with a clean, LLM-friendly API. All
//! inputs and outputs are JSON-serializable, making it ideal for integration
//! with AI assistants via MCP or similar protocols.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Raw Entries In**: Inputs carry bench readings as entered (strings);
//!   parsing gates decide what counts as missing
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Total**: Insufficient data yields `None`, never a partial result
//!
//! ## Quick Start
//!
//! ```rust
//! use soil_core::calculations::atterberg::{
//!     compute_limits, AtterbergTestData, LiquidLimitSample, PlasticLimitSample,
//! };
//!
//! let data = AtterbergTestData {
//!     liquid_limit_samples: vec![
//!         LiquidLimitSample::new("18", "41.2"),
//!         LiquidLimitSample::new("24", "38.5"),
//!         LiquidLimitSample::new("31", "36.1"),
//!     ],
//!     plastic_limit_samples: vec![PlasticLimitSample::new("21.4")],
//!     ..Default::default()
//! };
//!
//! let result = compute_limits(&data).expect("enough usable samples");
//! assert!(result.plasticity_index > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - All laboratory test types (Atterberg, sieve, Proctor,
//!   CBR, Gs, field density, aggregate quality)
//! - [`classify`] - USCS and AASHTO classification, frost rating, property
//!   prediction
//! - [`specs`] - Gradation envelope registry and compliance checks
//! - [`session`] - Lab session container, metadata, and settings
//! - [`sampledata`] - Seeded example-data generators
//! - [`fitting`] - Regression and interpolation primitives
//! - [`parse`] - Numeric entry parsing gates
//! - [`errors`] - Structured error and warning types

pub mod calculations;
pub mod classify;
pub mod errors;
pub mod fitting;
pub mod parse;
pub mod sampledata;
pub mod session;
pub mod specs;

// Re-export commonly used types at crate root for convenience
pub use calculations::ReportItem;
pub use errors::{CalcError, CalcResult, Severity, ValidationReport, Warning};
pub use session::{LabSession, SessionMetadata, SessionSettings, TestInfo};
