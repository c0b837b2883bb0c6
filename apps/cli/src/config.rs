//! CLI configuration
//!
//! Settings are layered: built-in defaults, then `sdmx.toml` in the working
//! directory (or the file given with `--config`), then `SDMX__*` environment
//! variables, e.g. `SDMX__REGISTRY__ENDPOINT`. A `.env` file is loaded first.

use anyhow::Context;
use sdmx_query::ApiVersion;
use sdmx_registry_client::{ClientConfig, Format};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://registry.sdmx.org/sdmx/v2/";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub endpoint: String,
    pub format: Format,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// SDMX-REST version used when none is given on the command line
    pub api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("sdmx").required(false),
        };

        let settings = config::Config::builder()
            .set_default("registry.endpoint", DEFAULT_ENDPOINT)?
            .set_default("registry.format", Format::default().as_str())?
            .set_default("registry.timeout_secs", 30)?
            .set_default("query.api_version", ApiVersion::V2_0_0.as_str())?
            .set_default("logging.level", "warn")?
            .set_default("logging.json", false)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SDMX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.client_config()
            .validate()
            .context("Invalid registry settings")?;
        self.api_version()?;
        Ok(())
    }

    pub fn api_version(&self) -> anyhow::Result<ApiVersion> {
        self.query
            .api_version
            .parse()
            .with_context(|| format!("Invalid query.api_version '{}'", self.query.api_version))
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.registry.endpoint.clone(), self.registry.format)
            .with_timeout(Duration::from_secs(self.registry.timeout_secs));
        match self.api_version() {
            Ok(version) => config.with_api_version(version),
            Err(_) => config,
        }
    }
}
