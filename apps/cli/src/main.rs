//! SDMX command line client
//!
//! Renders data query URLs for any SDMX-REST version and fetches codelists,
//! representation maps, structure maps, metadata reports and data from a
//! registry.

mod args;
mod config;
mod logging;

use anyhow::Context;
use args::{ArtefactArgs, Cli, Command, QueryArgs, ReportArgs};
use clap::Parser;
use config::Config;
use sdmx_query::ApiVersion;
use sdmx_registry_client::RegistryClient;
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(endpoint) = cli.endpoint {
        config.registry.endpoint = endpoint;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e:#}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.registry.endpoint,
        format = %config.registry.format,
        "Configuration loaded"
    );

    match cli.command {
        Command::Url {
            query,
            short,
            absolute,
        } => print_url(&config, &query, short, absolute),
        Command::Codes(artefact) => print_codes(&config, &artefact).await,
        Command::CodeMap(artefact) => print_code_map(&config, &artefact).await,
        Command::Mapping(artefact) => print_mapping(&config, &artefact).await,
        Command::Report(report) => print_report(&config, &report).await,
        Command::Data { query, format } => write_data(&config, &query, format.into()).await,
    }
}

fn query_version(config: &Config, query: &QueryArgs) -> anyhow::Result<ApiVersion> {
    Ok(args::api_version(query.api_version, config.api_version()?))
}

/// Render a query error the way a REST service would report it
fn query_error(err: sdmx_query::Error) -> anyhow::Error {
    anyhow::anyhow!("{} {}: {}", err.status(), err.title(), err)
}

/// Query errors are reported as-is; anything else failed while fetching
fn data_error(err: sdmx_registry_client::Error) -> anyhow::Error {
    match err {
        sdmx_registry_client::Error::Query(e) => query_error(e),
        other => anyhow::Error::new(other).context("Failed to get data"),
    }
}

fn print_url(config: &Config, args: &QueryArgs, short: bool, absolute: bool) -> anyhow::Result<()> {
    let version = query_version(config, args)?;
    let path = args
        .to_query()
        .get_url(version, short)
        .map_err(query_error)?;

    if absolute {
        println!("{}{}", config.client_config().base_url(), path);
    } else {
        println!("{}", path);
    }
    Ok(())
}

fn client(config: &Config) -> anyhow::Result<RegistryClient> {
    RegistryClient::with_config(config.client_config()).context("Failed to create registry client")
}

async fn print_codes(config: &Config, artefact: &ArtefactArgs) -> anyhow::Result<()> {
    let codes = client(config)?
        .get_codes(&artefact.agency, &artefact.id, &artefact.version)
        .await
        .with_context(|| {
            format!(
                "Failed to get codes for {}:{}({})",
                artefact.agency, artefact.id, artefact.version
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&codes)?);
    Ok(())
}

async fn print_code_map(config: &Config, artefact: &ArtefactArgs) -> anyhow::Result<()> {
    let map = client(config)?
        .get_code_map(&artefact.agency, &artefact.id, &artefact.version)
        .await
        .with_context(|| {
            format!(
                "Failed to get representation map {}:{}({})",
                artefact.agency, artefact.id, artefact.version
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

async fn print_mapping(config: &Config, artefact: &ArtefactArgs) -> anyhow::Result<()> {
    let mapping = client(config)?
        .get_mapping(&artefact.agency, &artefact.id, &artefact.version)
        .await
        .with_context(|| {
            format!(
                "Failed to get structure map {}:{}({})",
                artefact.agency, artefact.id, artefact.version
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(())
}

async fn print_report(config: &Config, report: &ReportArgs) -> anyhow::Result<()> {
    let metadata = client(config)?
        .get_report(&report.provider, &report.id, &report.version)
        .await
        .with_context(|| {
            format!(
                "Failed to get metadata report {}/{}/{}",
                report.provider, report.id, report.version
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

async fn write_data(
    config: &Config,
    args: &QueryArgs,
    format: sdmx_query::DataFormat,
) -> anyhow::Result<()> {
    let version = query_version(config, args)?;
    let body = client(config)?
        .get_data(&args.to_query(), version, format)
        .await
        .map_err(data_error)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_reports_query_errors() {
        let err = data_error(sdmx_registry_client::Error::Query(
            sdmx_query::Error::MissingDataflow {
                version: ApiVersion::V1_5_0,
            },
        ));
        assert!(err.to_string().starts_with("422 "), "{err}");

        let err = data_error(sdmx_registry_client::Error::NotFound {
            url: "http://localhost/data/CPI".to_string(),
        });
        assert_eq!(err.to_string(), "Failed to get data");
    }
}
