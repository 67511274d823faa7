use thiserror::Error;

#[derive(Debug, Error)]
pub enum DollarMentoError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DollarMentoError {
    fn from(e: serde_json::Error) -> Self {
        DollarMentoError::SerializationError(e.to_string())
    }
}
