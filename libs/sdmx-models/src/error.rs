//! Error types for SDMX models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid source pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
