use thiserror::Error;

/// Failure categories of one extraction attempt.
///
/// Malformed and validation failures carry the raw model output so callers
/// can audit what the model actually said; they are deterministic against
/// the same input and must never be retried automatically.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Malformed model payload: {detail}")]
    MalformedPayload { detail: String, raw_output: String },

    #[error("Schema validation failed: {detail}")]
    SchemaValidation { detail: String, raw_output: String },
}

impl ExtractionError {
    /// Stable category tag used on the wire and in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::ModelUnavailable(_) => "modelUnavailable",
            Self::MalformedPayload { .. } => "malformedPayload",
            Self::SchemaValidation { .. } => "schemaValidation",
        }
    }

    /// The unparsed model output, when the failure happened past transport.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::MalformedPayload { raw_output, .. }
            | Self::SchemaValidation { raw_output, .. } => Some(raw_output),
            _ => None,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Config(detail) | Self::ModelUnavailable(detail) => detail.clone(),
            Self::MalformedPayload { detail, .. } | Self::SchemaValidation { detail, .. } => {
                detail.clone()
            }
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
