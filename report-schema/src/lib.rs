//! Clinical report schema for the VoiceTriage pipeline.
//!
//! The types here are the strict boundary between free-text extraction and
//! everything downstream: model output is deserialized with unknown fields
//! rejected, validated for range rules, and normalized (one-of flag groups
//! collapsed, dependent values cleared) exactly once. Consumers past the
//! extraction adapter can rely on every invariant already holding.
//!
//! # Example
//!
//! ```rust
//! use report_schema::{normalize, validate, ClinicalReport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = r#"{ "patient": { "sex": "M" } }"#;
//! let mut report: ClinicalReport = serde_json::from_str(raw)?;
//! validate(&report)?;
//! let adjustments = normalize(&mut report);
//! assert!(report.call_info.exit_code.white);
//! assert_eq!(adjustments.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod normalize;
pub mod report;
pub mod validate;

pub use error::*;
pub use normalize::normalize;
pub use report::*;
pub use validate::validate;
