//! SDMX metadata models
//!
//! Strongly-typed value objects for the structural metadata a client works with
//! when talking to an SDMX registry.
//!
//! # Module Organization
//!
//! - `code`: Codes, codelists and value lists
//! - `map`: Mapping definitions (component maps, value maps, representation maps)
//! - `metadata`: Reference metadata reports
//!
//! All types are plain values: equality is structural and nothing holds
//! interior mutability, so they can be shared freely across threads.
//!
//! # Example
//!
//! ```rust
//! use sdmx_models::{ComponentMapper, ValueMap};
//!
//! let ar = ValueMap::new("AR", "ARG");
//! let uy = ValueMap::new("UY", "URY");
//! let mapper = ComponentMapper::new("COUNTRY", "REF_AREA", vec![ar, uy]);
//!
//! assert_eq!(mapper.map_value("UY", None).as_deref(), Some("URY"));
//! ```

pub mod code;
pub mod error;
pub mod map;
pub mod metadata;

// Re-export commonly used types
pub use code::*;
pub use error::{Error, Result};
pub use map::*;
pub use metadata::*;
