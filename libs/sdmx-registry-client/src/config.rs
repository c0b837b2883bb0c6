//! Client configuration

use crate::error::{Error, Result};
use sdmx_query::ApiVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Message formats for structural metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// The Fusion-JSON format used by the Fusion Metadata Registry
    #[default]
    FusionJson,
    /// SDMX-JSON 2.0 structure messages
    SdmxJson,
}

impl Format {
    /// The media type to send in the `Accept` header
    pub fn media_type(&self) -> &'static str {
        match self {
            Format::FusionJson => "application/vnd.fusion.json",
            Format::SdmxJson => "application/vnd.sdmx.structure+json;version=2.0.0",
        }
    }

    /// The media type to send when requesting metadata sets
    pub fn metadata_media_type(&self) -> &'static str {
        match self {
            Format::FusionJson => "application/vnd.fusion.json",
            Format::SdmxJson => "application/vnd.sdmx.metadata+json;version=2.0.0",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::FusionJson => "fusion-json",
            Format::SdmxJson => "sdmx-json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fusion-json" | "fusion" => Ok(Format::FusionJson),
            "sdmx-json" | "sdmx" => Ok(Format::SdmxJson),
            other => Err(Error::Config(format!(
                "unknown structure format '{}' (expected fusion-json or sdmx-json)",
                other
            ))),
        }
    }
}

/// Connection settings for a [`RegistryClient`](crate::RegistryClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the SDMX-REST API, e.g. `https://registry.sdmx.org/sdmx/v2/`
    pub endpoint: String,
    pub format: Format,
    pub timeout: Duration,
    /// API version used to render structure and data queries
    pub api_version: ApiVersion,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, format: Format) -> Self {
        Self {
            endpoint: endpoint.into(),
            format,
            timeout: Duration::from_secs(30),
            api_version: ApiVersion::V2_0_0,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// The endpoint without its trailing slash
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url().is_empty() {
            return Err(Error::Config("endpoint must not be empty".to_string()));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(Error::Config(format!(
                "endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}
