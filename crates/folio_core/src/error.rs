use thiserror::Error;

use crate::types::ArticleId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Article {0} not found")]
    NotFound(ArticleId),

    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for failures that happened before or while talking to the store,
    /// as opposed to local validation.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. } | Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
