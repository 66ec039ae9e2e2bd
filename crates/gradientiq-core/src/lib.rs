//! gradientiq-core: Answer analysis, typing telemetry, and concept progression.
//!
//! This crate defines the concept catalog, the heuristic text analyzer, the
//! signal synthesizer and the progression tracker, plus the session facade
//! that ties them together for an interactive client.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod progression;
pub mod session;
pub mod synthesizer;
pub mod telemetry;

pub use uuid::Uuid;
