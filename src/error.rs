use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupeError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, DedupeError>;
