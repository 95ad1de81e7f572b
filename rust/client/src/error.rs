use thiserror::Error;

#[derive(Error, Debug)]
pub enum GymError {
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Environment must be reset before calling step")]
    NotReset,

    #[error("Request to gymnasium server failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not encode request body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response from gymnasium server: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, GymError>;
