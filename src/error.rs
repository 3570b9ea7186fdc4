use thiserror::Error;

// Operational failures. Rejected user input is not an error, see `validation`.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Duplicate form field: {0}")]
    DuplicateField(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
