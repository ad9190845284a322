use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Methodology mismatch: {0}")]
    MethodologyMismatch(String),

    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: String,
        from: String,
        to: String,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FundEngineError {
    fn from(e: serde_json::Error) -> Self {
        FundEngineError::SerializationError(e.to_string())
    }
}
