use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// The Error type for annotation handling.
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("NLP provider error for task '{task}': {message}")]
    ProviderError { task: String, message: String },

    #[error("Document store error: {0}")]
    StoreError(String),

    #[error("Warehouse error: {0}")]
    WarehouseError(String),

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

// serde_yaml errors only surface while loading configuration files, so they
// fold into the configuration variant instead of carrying the source type.
impl From<serde_yaml::Error> for AnnotateError {
    fn from(err: serde_yaml::Error) -> Self {
        AnnotateError::ConfigError(format!("Failed to parse YAML: {}", err))
    }
}
