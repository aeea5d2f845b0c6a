use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid port spec '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },

    #[error("Directory lookup failed: {context}")]
    DirectoryLookup { context: String },

    #[error("Evaluation submission failed: {message}")]
    Submission { message: String },

    #[error("Malformed invocation event: {message}")]
    InvalidEvent { message: String },

    #[error("Configuration error: {field}: {reason}")]
    ConfigError { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
