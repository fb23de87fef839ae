//! Extraction adapter for the VoiceTriage pipeline.
//!
//! Turns one free-text transcript into a validated [`report_schema::ClinicalReport`]
//! by delegating to an opaque text-generation provider and parsing its output
//! at a strict boundary. Callers receive either a fully normalized record or
//! a typed [`error::ExtractionError`] with the raw model output attached;
//! never a partially-valid record, never a panic on hostile output.

pub mod config;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod providers;
pub mod service;

pub use config::*;
pub use error::*;
pub use parse::parse_model_output;
pub use service::*;
