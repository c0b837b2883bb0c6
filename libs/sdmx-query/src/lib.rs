//! SDMX-REST query builder
//!
//! Translates typed query values into URLs for the SDMX-REST API, for both the
//! 1.x and the 2.x API families. The two families disagree on
//! path layout, wildcard keywords and how attribute/measure selection is
//! encoded, so every query is validated against the target [`ApiVersion`]
//! before it is rendered.
//!
//! # Examples
//!
//! ```rust
//! use sdmx_query::{ApiVersion, DataContext, DataQuery};
//!
//! let query = DataQuery::builder()
//!     .context(DataContext::Dataflow)
//!     .agency_id("BIS")
//!     .resource_id("CPI")
//!     .version("1.0")
//!     .key("A.USD")
//!     .build();
//!
//! assert_eq!(
//!     query.get_url(ApiVersion::V2_0_0, false)?,
//!     "/data/dataflow/BIS/CPI/1.0/A.USD?attributes=dsd&measures=all&includeHistory=false"
//! );
//! assert_eq!(
//!     query.get_url(ApiVersion::V1_5_0, false)?,
//!     "/data/BIS,CPI,1.0/A.USD?detail=full&includeHistory=false"
//! );
//! assert_eq!(query.get_url(ApiVersion::V2_0_0, true)?, "/data/dataflow/BIS/CPI/1.0/A.USD");
//! # Ok::<(), sdmx_query::Error>(())
//! ```
//!
//! Invalid combinations are reported as [`Error`]s with an HTTP-like status:
//!
//! ```rust
//! use sdmx_query::{ApiVersion, DataQuery};
//!
//! let query = DataQuery::builder().resource_id(vec!["CPI", "PPI"]).build();
//! let err = query.get_url(ApiVersion::V1_5_0, false).unwrap_err();
//! assert_eq!(err.status(), 422);
//! ```

pub mod data;
pub mod error;
pub mod metadata;
pub mod selection;
pub mod structure;
pub mod version;

pub use data::{DataContext, DataFormat, DataQuery, DataQueryBuilder, Detail};
pub use error::{Error, Result};
pub use metadata::MetadataQuery;
pub use selection::{Selection, REST_ALL, REST_LATEST};
pub use structure::{References, StructureQuery, StructureType};
pub use version::ApiVersion;
