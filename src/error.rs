/// Error taxonomy for the air-quality service.
///
/// The computational core only ever produces `InvalidInput` and
/// `UnknownDevice`; the remaining variants belong to the configuration
/// and endpoint layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AqmonError>;

#[derive(Debug, Error)]
pub enum AqmonError {
    /// Caller violated an input constraint (empty reading set, negative hours, …).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Device id is not present in the location registry.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl AqmonError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AqmonError::InvalidInput(message.into())
    }
}
