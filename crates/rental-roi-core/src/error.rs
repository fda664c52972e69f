use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalRoiError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Duplicate catalog entry: {0}")]
    DuplicateEntry(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentalRoiError {
    fn from(e: serde_json::Error) -> Self {
        RentalRoiError::SerializationError(e.to_string())
    }
}
