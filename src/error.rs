use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Required input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session data is stale (created {} minutes ago, limit is {} minutes)", .age_secs / 60, .max_age_secs / 60)]
    StaleSession { age_secs: u64, max_age_secs: u64 },

    #[error("Portal error: {0}")]
    Portal(String),

    #[error("No course data was scraped")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
