//! Command line arguments

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sdmx_query::{ApiVersion, DataContext, DataFormat, DataQuery, Detail, Selection};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sdmx", version, about = "Query SDMX-REST services")]
pub struct Cli {
    /// Configuration file (defaults to ./sdmx.toml when present)
    #[arg(long, global = true, env = "SDMX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Registry endpoint, overriding the configuration
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the URL of a data query
    Url {
        #[command(flatten)]
        query: QueryArgs,

        /// Omit parameters equal to their default
        #[arg(long)]
        short: bool,

        /// Prefix the path with the registry endpoint
        #[arg(long)]
        absolute: bool,
    },

    /// Fetch a codelist (or value list) and print it as JSON
    Codes(ArtefactArgs),

    /// Fetch a representation map and print it as JSON
    CodeMap(ArtefactArgs),

    /// Fetch a structure map with its representation maps and print the
    /// mapping definition as JSON
    Mapping(ArtefactArgs),

    /// Fetch a metadata report and print it as JSON
    Report(ReportArgs),

    /// Fetch data and write the response to stdout
    Data {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, value_enum, default_value_t = DataFormatArg::Csv2)]
        format: DataFormatArg,
    },
}

#[derive(Args, Debug)]
pub struct ArtefactArgs {
    /// Maintenance agency, e.g. BIS
    pub agency: String,
    pub id: String,
    /// Artefact version, `~` for the latest
    #[arg(default_value = "~")]
    pub version: String,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Metadata provider, as AGENCY.PROVIDER
    pub provider: String,
    pub id: String,
    /// Metadata set version, `~` for the latest
    #[arg(default_value = "~")]
    pub version: String,
}

/// Fields of a data query. Lists are comma-separated.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SDMX-REST version, e.g. 2.0.0 or 1.5.0 (defaults to the configured one)
    #[arg(long)]
    pub api_version: Option<ApiVersion>,

    /// datastructure, dataflow, provisionagreement or *
    #[arg(long)]
    pub context: Option<DataContext>,

    #[arg(long)]
    pub agency: Option<String>,

    /// Dataflow (or other context) id
    #[arg(long)]
    pub resource: Option<String>,

    #[arg(long = "version")]
    pub resource_version: Option<String>,

    /// Series key, e.g. A.USD
    #[arg(long)]
    pub key: Option<String>,

    /// Component filter as ID=v1,v2 (repeatable)
    #[arg(long = "component", value_parser = parse_component)]
    pub components: Vec<(String, String)>,

    /// RFC 3339 timestamp
    #[arg(long)]
    pub updated_after: Option<DateTime<Utc>>,

    #[arg(long)]
    pub first_n_obs: Option<u32>,

    #[arg(long)]
    pub last_n_obs: Option<u32>,

    #[arg(long)]
    pub obs_dimension: Option<String>,

    #[arg(long, conflicts_with = "detail")]
    pub attributes: Option<String>,

    #[arg(long, conflicts_with = "detail")]
    pub measures: Option<String>,

    /// Pre-2.0 detail value: full, dataonly, serieskeysonly or nodata
    #[arg(long)]
    pub detail: Option<Detail>,

    #[arg(long)]
    pub include_history: bool,
}

fn parse_component(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, values)) if !id.is_empty() => Ok((id.to_string(), values.to_string())),
        _ => Err(format!("'{}' is not of the form ID=v1,v2", raw)),
    }
}

impl QueryArgs {
    pub fn to_query(&self) -> DataQuery {
        let mut builder = DataQuery::builder().include_history(self.include_history);

        if let Some(context) = self.context {
            builder = builder.context(context);
        }
        if let Some(agency) = &self.agency {
            builder = builder.agency_id(Selection::parse_list(agency));
        }
        if let Some(resource) = &self.resource {
            builder = builder.resource_id(Selection::parse_list(resource));
        }
        if let Some(version) = &self.resource_version {
            builder = builder.version(Selection::parse_list(version));
        }
        if let Some(key) = &self.key {
            builder = builder.key(Selection::parse_list(key));
        }
        for (id, values) in &self.components {
            builder = builder.component(id.as_str(), Selection::parse_list(values));
        }
        if let Some(updated_after) = self.updated_after {
            builder = builder.updated_after(updated_after);
        }
        if let Some(n) = self.first_n_obs {
            builder = builder.first_n_obs(n);
        }
        if let Some(n) = self.last_n_obs {
            builder = builder.last_n_obs(n);
        }
        if let Some(dimension) = &self.obs_dimension {
            builder = builder.obs_dimension(dimension.as_str());
        }
        if let Some(detail) = self.detail {
            builder = builder.detail(detail);
        }
        if let Some(attributes) = &self.attributes {
            builder = builder.attributes(Selection::parse_list(attributes));
        }
        if let Some(measures) = &self.measures {
            builder = builder.measures(Selection::parse_list(measures));
        }

        builder.build()
    }
}

/// Data formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormatArg {
    /// SDMX-CSV 1.0
    Csv1,
    /// SDMX-CSV 2.0
    Csv2,
    /// SDMX-JSON 1.0
    Json1,
    /// SDMX-JSON 2.0
    Json2,
    /// SDMX-ML 2.1 generic
    GenericXml,
    /// SDMX-ML 2.1 structure specific
    StructureSpecificXml,
    /// SDMX-ML 2.1 generic time series
    GenericTsXml,
    /// SDMX-ML 2.1 structure specific time series
    StructureSpecificTsXml,
    /// SDMX-ML 3.0
    Xml3,
}

impl From<DataFormatArg> for DataFormat {
    fn from(arg: DataFormatArg) -> Self {
        match arg {
            DataFormatArg::Csv1 => DataFormat::SdmxCsv1_0_0,
            DataFormatArg::Csv2 => DataFormat::SdmxCsv2_0_0,
            DataFormatArg::Json1 => DataFormat::SdmxJson1_0_0,
            DataFormatArg::Json2 => DataFormat::SdmxJson2_0_0,
            DataFormatArg::GenericXml => DataFormat::SdmxMl2_1Generic,
            DataFormatArg::StructureSpecificXml => DataFormat::SdmxMl2_1StructureSpecific,
            DataFormatArg::GenericTsXml => DataFormat::SdmxMl2_1GenericTimeSeries,
            DataFormatArg::StructureSpecificTsXml => {
                DataFormat::SdmxMl2_1StructureSpecificTimeSeries
            }
            DataFormatArg::Xml3 => DataFormat::SdmxMl3_0,
        }
    }
}

/// Pick the version given on the command line, else the configured one
pub fn api_version(arg: Option<ApiVersion>, configured: ApiVersion) -> ApiVersion {
    arg.unwrap_or(configured)
}
