//! SDMX-REST data queries
//!
//! A [`DataQuery`] is an immutable description of the data to retrieve. It is
//! rendered to a URL for a given [`ApiVersion`] either in full (every parameter
//! explicit) or in short form (parameters equal to their default omitted).

mod parse;
mod schema;
mod v1;
mod v2;

use crate::error::{Error, Result};
use crate::selection::{Selection, REST_ALL};
use crate::version::ApiVersion;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kind of structure a data query is scoped to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataContext {
    #[serde(rename = "datastructure")]
    DataStructure,
    #[serde(rename = "dataflow")]
    Dataflow,
    #[serde(rename = "provisionagreement")]
    ProvisionAgreement,
    #[default]
    #[serde(rename = "*")]
    All,
}

impl DataContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataContext::DataStructure => "datastructure",
            DataContext::Dataflow => "dataflow",
            DataContext::ProvisionAgreement => "provisionagreement",
            DataContext::All => REST_ALL,
        }
    }

    /// Whether the context can be used with the given API version
    pub fn is_supported_by(&self, version: ApiVersion) -> bool {
        version.is_v2() || matches!(self, DataContext::Dataflow | DataContext::All)
    }
}

impl fmt::Display for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "datastructure" => Ok(DataContext::DataStructure),
            "dataflow" => Ok(DataContext::Dataflow),
            "provisionagreement" => Ok(DataContext::ProvisionAgreement),
            REST_ALL => Ok(DataContext::All),
            other => Err(Error::InvalidSchema(format!(
                "'{}' is not a valid data context",
                other
            ))),
        }
    }
}

/// Response formats for data queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    SdmxJson1_0_0,
    SdmxJson2_0_0,
    SdmxCsv1_0_0,
    SdmxCsv2_0_0,
    SdmxMl2_1Generic,
    SdmxMl2_1StructureSpecific,
    SdmxMl2_1GenericTimeSeries,
    SdmxMl2_1StructureSpecificTimeSeries,
    SdmxMl3_0,
}

impl DataFormat {
    /// The media type to send in the `Accept` header
    pub fn media_type(&self) -> &'static str {
        match self {
            DataFormat::SdmxJson1_0_0 => "application/vnd.sdmx.data+json;version=1.0.0",
            DataFormat::SdmxJson2_0_0 => "application/vnd.sdmx.data+json;version=2.0.0",
            DataFormat::SdmxCsv1_0_0 => "application/vnd.sdmx.data+csv;version=1.0.0",
            DataFormat::SdmxCsv2_0_0 => "application/vnd.sdmx.data+csv;version=2.0.0",
            DataFormat::SdmxMl2_1Generic => "application/vnd.sdmx.genericdata+xml;version=2.1",
            DataFormat::SdmxMl2_1StructureSpecific => {
                "application/vnd.sdmx.structurespecificdata+xml;version=2.1"
            }
            DataFormat::SdmxMl2_1GenericTimeSeries => {
                "application/vnd.sdmx.generictimeseriesdata+xml;version=2.1"
            }
            DataFormat::SdmxMl2_1StructureSpecificTimeSeries => {
                "application/vnd.sdmx.structurespecifictimeseriesdata+xml;version=2.1"
            }
            DataFormat::SdmxMl3_0 => "application/vnd.sdmx.data+xml;version=3.0.0",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Pre-2.0 encoding of the attributes and measures to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detail {
    /// All attributes and all measures
    Full,
    /// Measures only, no attributes
    DataOnly,
    /// Series keys and series-level attributes, no measures
    SeriesKeysOnly,
    /// All attributes, no measures
    NoData,
}

impl Detail {
    pub fn as_str(&self) -> &'static str {
        match self {
            Detail::Full => "full",
            Detail::DataOnly => "dataonly",
            Detail::SeriesKeysOnly => "serieskeysonly",
            Detail::NoData => "nodata",
        }
    }

    /// Collapse an attributes/measures pair into a detail value.
    ///
    /// Returns `None` for pairs that have no 1.x equivalent.
    pub fn from_selection(attributes: &Selection, measures: &Selection) -> Option<Self> {
        let all_measures = measures.is_any_of(&["all", "OBS_VALUE"]);
        if all_measures && attributes.is("dsd") {
            Some(Detail::Full)
        } else if all_measures && attributes.is("none") {
            Some(Detail::DataOnly)
        } else if measures.is("none") && attributes.is("series") {
            Some(Detail::SeriesKeysOnly)
        } else if measures.is("none") && attributes.is("dsd") {
            Some(Detail::NoData)
        } else {
            None
        }
    }

    /// The attributes/measures pair equivalent to this detail value
    pub fn selection(&self) -> (Selection, Selection) {
        let (attributes, measures) = match self {
            Detail::Full => ("dsd", "all"),
            Detail::DataOnly => ("none", "all"),
            Detail::SeriesKeysOnly => ("series", "none"),
            Detail::NoData => ("dsd", "none"),
        };
        (attributes.into(), measures.into())
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Detail {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Detail::Full),
            "dataonly" => Ok(Detail::DataOnly),
            "serieskeysonly" => Ok(Detail::SeriesKeysOnly),
            "nodata" => Ok(Detail::NoData),
            other => Err(Error::InvalidSchema(format!(
                "'{}' is not a valid detail value",
                other
            ))),
        }
    }
}

/// A data query.
///
/// Every field defaults to its unrestricted value: all contexts, agencies,
/// resources, versions and keys, the attributes defined in the data structure
/// (`dsd`), all measures, and no history. Build one with
/// [`DataQuery::builder`]; once built it cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQuery {
    context: DataContext,
    agency_id: Selection,
    resource_id: Selection,
    version: Selection,
    key: Selection,
    components: BTreeMap<String, Selection>,
    updated_after: Option<DateTime<Utc>>,
    first_n_obs: Option<u32>,
    last_n_obs: Option<u32>,
    obs_dimension: Option<String>,
    attributes: Selection,
    measures: Selection,
    include_history: bool,
}

impl Default for DataQuery {
    fn default() -> Self {
        Self {
            context: DataContext::All,
            agency_id: Selection::all(),
            resource_id: Selection::all(),
            version: Selection::all(),
            key: Selection::all(),
            components: BTreeMap::new(),
            updated_after: None,
            first_n_obs: None,
            last_n_obs: None,
            obs_dimension: None,
            attributes: Selection::from("dsd"),
            measures: Selection::from("all"),
            include_history: false,
        }
    }
}

impl DataQuery {
    pub fn builder() -> DataQueryBuilder {
        DataQueryBuilder::default()
    }

    /// The context for which data must be retrieved
    pub fn context(&self) -> DataContext {
        self.context
    }

    /// The agency maintaining the context
    pub fn agency_id(&self) -> &Selection {
        &self.agency_id
    }

    /// The id of the context
    pub fn resource_id(&self) -> &Selection {
        &self.resource_id
    }

    /// The version of the context
    pub fn version(&self) -> &Selection {
        &self.version
    }

    /// The series key (dimension values), `*` wildcards allowed
    pub fn key(&self) -> &Selection {
        &self.key
    }

    /// Component filters, keyed by component id
    pub fn components(&self) -> &BTreeMap<String, Selection> {
        &self.components
    }

    pub fn updated_after(&self) -> Option<DateTime<Utc>> {
        self.updated_after
    }

    pub fn first_n_obs(&self) -> Option<u32> {
        self.first_n_obs
    }

    pub fn last_n_obs(&self) -> Option<u32> {
        self.last_n_obs
    }

    /// The dimension attached at the observation level
    pub fn obs_dimension(&self) -> Option<&str> {
        self.obs_dimension.as_deref()
    }

    /// The attributes to return (`dsd`, `msd`, `dataset`, `series`, `obs`,
    /// `all`, `none` or attribute ids)
    pub fn attributes(&self) -> &Selection {
        &self.attributes
    }

    /// The measures to return (`all`, `none` or measure ids)
    pub fn measures(&self) -> &Selection {
        &self.measures
    }

    pub fn include_history(&self) -> bool {
        self.include_history
    }

    /// Check the query against its schema, independently of any API version.
    ///
    /// The query is re-encoded and decoded through a strict schema, so values
    /// that cannot appear in a valid query (zero observation counts, malformed
    /// identifiers) are rejected.
    pub fn validate(&self) -> Result<()> {
        schema::check(self)
    }

    /// Check that the query can be expressed in the given API version.
    ///
    /// A 1.x URL also needs a dataflow id; that is checked when rendering, so
    /// an unrestricted query validates against every version.
    pub fn validate_for(&self, version: ApiVersion) -> Result<()> {
        self.validate()?;
        if version.is_v2() {
            Ok(())
        } else {
            v1::validate(self, version)
        }
    }

    /// The URL path and query string for the query in the selected API version.
    ///
    /// With `omit_defaults`, parameters equal to their default are left out and
    /// the most compact equivalent URL is produced.
    pub fn get_url(&self, version: ApiVersion, omit_defaults: bool) -> Result<String> {
        self.validate_for(version)?;
        if !version.is_v2() {
            v1::check_resource(self, version)?;
        }

        let url = match (version.is_v2(), omit_defaults) {
            (true, false) => v2::full_url(self),
            (true, true) => v2::short_url(self),
            (false, false) => v1::full_url(self, version)?,
            (false, true) => v1::short_url(self, version)?,
        };

        tracing::debug!(version = %version, omit_defaults, url = %url, "Rendered data query");
        Ok(url)
    }

    /// Parse a data query URL rendered for the given API version.
    ///
    /// Accepts a path (`/data/...`) or a full URL, with or without a query
    /// string. Omitted parts resolve to their defaults.
    pub fn from_url(url: &str, version: ApiVersion) -> Result<Self> {
        parse::parse_url(url, version)
    }

    /// Observation filters shared by both API families, in rendering order
    fn filter_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(updated_after) = self.updated_after {
            params.push(format!(
                "updatedAfter={}",
                updated_after.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }
        if let Some(n) = self.first_n_obs {
            params.push(format!("firstNObservations={}", n));
        }
        if let Some(n) = self.last_n_obs {
            params.push(format!("lastNObservations={}", n));
        }
        if let Some(dim) = &self.obs_dimension {
            params.push(format!("dimensionAtObservation={}", dim));
        }
        params
    }
}

/// Append the parameters, if any, as a query string
fn with_query_string(path: String, params: Vec<String>) -> String {
    if params.is_empty() {
        path
    } else {
        format!("{}?{}", path, params.join("&"))
    }
}

/// Builder for [`DataQuery`]
#[derive(Debug, Clone, Default)]
pub struct DataQueryBuilder {
    query: DataQuery,
}

impl DataQueryBuilder {
    pub fn context(mut self, context: DataContext) -> Self {
        self.query.context = context;
        self
    }

    pub fn agency_id(mut self, agency_id: impl Into<Selection>) -> Self {
        self.query.agency_id = agency_id.into();
        self
    }

    pub fn resource_id(mut self, resource_id: impl Into<Selection>) -> Self {
        self.query.resource_id = resource_id.into();
        self
    }

    pub fn version(mut self, version: impl Into<Selection>) -> Self {
        self.query.version = version.into();
        self
    }

    pub fn key(mut self, key: impl Into<Selection>) -> Self {
        self.query.key = key.into();
        self
    }

    /// Filter on the values of a component (2.x only)
    pub fn component(mut self, id: impl Into<String>, values: impl Into<Selection>) -> Self {
        self.query.components.insert(id.into(), values.into());
        self
    }

    pub fn updated_after(mut self, updated_after: DateTime<Utc>) -> Self {
        self.query.updated_after = Some(updated_after);
        self
    }

    pub fn first_n_obs(mut self, n: u32) -> Self {
        self.query.first_n_obs = Some(n);
        self
    }

    pub fn last_n_obs(mut self, n: u32) -> Self {
        self.query.last_n_obs = Some(n);
        self
    }

    pub fn obs_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.query.obs_dimension = Some(dimension.into());
        self
    }

    pub fn attributes(mut self, attributes: impl Into<Selection>) -> Self {
        self.query.attributes = attributes.into();
        self
    }

    pub fn measures(mut self, measures: impl Into<Selection>) -> Self {
        self.query.measures = measures.into();
        self
    }

    /// Set attributes and measures from a 1.x detail value
    pub fn detail(self, detail: Detail) -> Self {
        let (attributes, measures) = detail.selection();
        self.attributes(attributes).measures(measures)
    }

    pub fn include_history(mut self, include_history: bool) -> Self {
        self.query.include_history = include_history;
        self
    }

    pub fn build(self) -> DataQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unrestricted() {
        let q = DataQuery::default();
        assert_eq!(q.context(), DataContext::All);
        assert!(q.agency_id().is_all());
        assert!(q.resource_id().is_all());
        assert!(q.version().is_all());
        assert!(q.key().is_all());
        assert!(q.components().is_empty());
        assert!(q.attributes().is("dsd"));
        assert!(q.measures().is("all"));
        assert!(!q.include_history());
        assert_eq!(DataQuery::builder().build(), q);
    }

    #[test]
    fn test_detail_table() {
        let cases = [
            ("dsd", "all", Some(Detail::Full)),
            ("dsd", "OBS_VALUE", Some(Detail::Full)),
            ("none", "all", Some(Detail::DataOnly)),
            ("none", "OBS_VALUE", Some(Detail::DataOnly)),
            ("series", "none", Some(Detail::SeriesKeysOnly)),
            ("dsd", "none", Some(Detail::NoData)),
            ("series", "all", None),
            ("all", "all", None),
            ("none", "none", None),
            ("dsd", "OBS_STATUS", None),
        ];

        for (attributes, measures, expected) in cases {
            assert_eq!(
                Detail::from_selection(&attributes.into(), &measures.into()),
                expected,
                "{attributes} / {measures}"
            );
        }
    }

    #[test]
    fn test_detail_selection_round_trip() {
        for detail in [
            Detail::Full,
            Detail::DataOnly,
            Detail::SeriesKeysOnly,
            Detail::NoData,
        ] {
            let (attributes, measures) = detail.selection();
            assert_eq!(Detail::from_selection(&attributes, &measures), Some(detail));
            assert_eq!(detail.as_str().parse::<Detail>().unwrap(), detail);
        }
    }

    #[test]
    fn test_context_support() {
        assert!(DataContext::Dataflow.is_supported_by(ApiVersion::V1_0_0));
        assert!(DataContext::All.is_supported_by(ApiVersion::V1_5_0));
        assert!(!DataContext::DataStructure.is_supported_by(ApiVersion::V1_5_0));
        assert!(!DataContext::ProvisionAgreement.is_supported_by(ApiVersion::V1_5_0));
        assert!(DataContext::ProvisionAgreement.is_supported_by(ApiVersion::V2_0_0));
    }

    #[test]
    fn test_context_parse() {
        assert_eq!("*".parse::<DataContext>().unwrap(), DataContext::All);
        assert_eq!(
            "provisionagreement".parse::<DataContext>().unwrap(),
            DataContext::ProvisionAgreement
        );
        assert!("flow".parse::<DataContext>().is_err());
    }

    #[test]
    fn test_builder_collects_components() {
        let q = DataQuery::builder()
            .component("FREQ", "A")
            .component("REF_AREA", ["CH", "DE"])
            .build();
        assert_eq!(q.components().len(), 2);
        assert!(q.components()["REF_AREA"].is_multiple());
    }

    #[test]
    fn test_with_query_string() {
        assert_eq!(with_query_string("/data".to_string(), vec![]), "/data");
        assert_eq!(
            with_query_string(
                "/data/CPI".to_string(),
                vec!["detail=nodata".to_string(), "includeHistory=true".to_string()]
            ),
            "/data/CPI?detail=nodata&includeHistory=true"
        );
    }
}
