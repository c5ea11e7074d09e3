use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanPricingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid schedule: {cause}")]
    InvalidSchedule { cause: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanPricingError {
    fn from(e: serde_json::Error) -> Self {
        LoanPricingError::SerializationError(e.to_string())
    }
}
