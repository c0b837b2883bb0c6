//! Error types for registry-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Registry client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Artefact not found: {url}")]
    NotFound { url: String },

    #[error("Registry returned status {status} for {url}")]
    Registry { status: u16, url: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid structure message: {0}")]
    InvalidMessage(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Query(#[from] sdmx_query::Error),

    #[error(transparent)]
    Model(#[from] sdmx_models::Error),
}

impl Error {
    /// Whether the registry reported that the artefact does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
