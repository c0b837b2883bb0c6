//! Error types for query building

use crate::data::DataContext;
use crate::structure::StructureType;
use crate::version::ApiVersion;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Client-side query errors.
///
/// All of these are detected locally, before any request is made. Use
/// [`Error::status`] and [`Error::title`] to report them the way an SDMX-REST
/// service would.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidSchema(String),

    #[error("{context} is not valid for SDMX-REST {version}.")]
    UnsupportedContext {
        context: DataContext,
        version: ApiVersion,
    },

    #[error("Multiple {field} values ({values}) are not allowed in SDMX-REST {version}.")]
    MultipleValues {
        field: &'static str,
        values: String,
        version: ApiVersion,
    },

    #[error("A dataflow must be provided in SDMX-REST {version}.")]
    MissingDataflow { version: ApiVersion },

    #[error(
        "{attributes} and {measures} is not a valid combination for the detail attribute in SDMX-REST {version}."
    )]
    InvalidDetail {
        attributes: String,
        measures: String,
        version: ApiVersion,
    },

    #[error("Component filters ({components}) are not supported in SDMX-REST {version}.")]
    UnsupportedComponents {
        components: String,
        version: ApiVersion,
    },

    #[error("{structure_type} queries are not supported in SDMX-REST {version}.")]
    UnsupportedStructureType {
        structure_type: StructureType,
        version: ApiVersion,
    },

    #[error("Metadata set queries are not supported in SDMX-REST {version}.")]
    UnsupportedMetadataQuery { version: ApiVersion },

    #[error("Invalid query URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unknown SDMX-REST API version: {0}")]
    UnknownApiVersion(String),
}

impl Error {
    /// HTTP-like status code for the error
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidUrl { .. } | Error::UnknownApiVersion(_) => 400,
            _ => 422,
        }
    }

    /// Short, human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Error::InvalidSchema(_) => "Invalid Schema Query",
            Error::InvalidUrl { .. } | Error::UnknownApiVersion(_) => "Bad Request",
            _ => "Validation Error",
        }
    }
}
