//! Speech-to-text adapter for the VoiceTriage pipeline.
//!
//! Transcription is an opaque collaborator: the pipeline hands audio bytes
//! to a configured provider and receives text back. Providers implement
//! [`providers::SpeechProviderTrait`]; the default is an OpenAI-compatible
//! Whisper endpoint, and a mock provider keeps tests and offline
//! development independent of any running model.

pub mod config;
pub mod error;
pub mod providers;
pub mod service;
pub mod transcript;

pub use config::*;
pub use error::*;
pub use service::*;
pub use transcript::*;
