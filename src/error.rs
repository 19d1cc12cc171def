use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
