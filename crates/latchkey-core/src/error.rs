use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Enrollment errors
    #[error("Image capture failed: {0}")]
    Capture(String),

    #[error("Model creation failed: {0}")]
    ModelCreation(String),

    #[error("Template store failed: {0}")]
    Store(String),

    #[error("No free template slot")]
    CapacityExceeded,

    // Removal errors
    #[error("Template delete failed: {0}")]
    Delete(String),

    // Authentication errors
    #[error("Credential mismatch")]
    AuthMismatch,

    #[error("No input within {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    // Validation errors
    #[error("Invalid slot ID: {0}")]
    InvalidSlotId(String),

    #[error("Invalid PIN format: {0}")]
    InvalidPinFormat(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
