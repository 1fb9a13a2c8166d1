use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid POI data, missing fields: {missing}")]
    DataIntegrity { missing: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Network graph unavailable: {0}")]
    GraphUnavailable(String),
    #[error("Network provider error: {0}")]
    Provider(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Worker pool error: {0}")]
    ThreadPool(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Decode error: {0}")]
    Decode(String),
}
