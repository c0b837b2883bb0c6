//! SDMX Registry Client
//!
//! Async access to the structural metadata and data held by an SDMX-REST
//! service. Structure messages are read from Fusion-JSON or SDMX-JSON and
//! returned as `sdmx-models` types; data is returned as raw bytes in the
//! requested [`DataFormat`](sdmx_query::DataFormat).
//!
//! # Examples
//!
//! ```rust,no_run
//! use sdmx_registry_client::{Format, RegistryClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fmr = RegistryClient::new("https://registry.sdmx.org/sdmx/v2/", Format::FusionJson)?;
//! let codes = fmr.get_codes("TEST", "CTYPES", "1.0").await?;
//! for code in &codes {
//!     println!("{} {:?}", code.id, code.name);
//! }
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod config;
pub mod error;
pub mod reader;

pub use client::RegistryClient;
pub use config::{ClientConfig, Format};
pub use error::{Error, Result};
