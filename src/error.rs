//! Error types shared across the crate.
//!
//! Most "failures" in the crawler are ordinary values: a page that could not be
//! fetched is `None`, a search with no hits is an empty `Vec`. [`NewsError`]
//! covers the cases that are reported back to a caller of the
//! [`NewsDesk`](crate::NewsDesk) facade or the CLI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    /// The URL's domain matches none of the known sources.
    #[error("unsupported news source: {0}")]
    UnsupportedSource(String),

    /// The page could not be fetched or its structure could not be parsed.
    #[error("failed to fetch article content: {0}")]
    FetchFailed(String),

    /// The article handed to the analyzer has no content blocks.
    #[error("invalid article data")]
    InvalidArticle,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsError>;
