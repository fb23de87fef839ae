use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
