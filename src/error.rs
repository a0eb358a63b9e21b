use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GET {endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response body from {endpoint}: {reason}")]
    MalformedBody { endpoint: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
