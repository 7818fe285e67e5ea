use config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Unknown chain: {0}")]
    UnknownChain(u64),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Broker error: {0}")]
    BrokerError(String),
}

pub type InspectorResult<T> = Result<T, AppError>;
