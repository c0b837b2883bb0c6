//! Async SDMX registry client

use crate::config::{ClientConfig, Format};
use crate::error::{Error, Result};
use crate::reader;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use sdmx_models::{Codelist, CodelistType, MappingDefinition, MetadataReport, RepresentationMap};
use sdmx_query::{
    ApiVersion, DataFormat, DataQuery, MetadataQuery, References, StructureQuery, StructureType,
};

/// Client for an SDMX-REST registry such as the Fusion Metadata Registry.
pub struct RegistryClient {
    client: Client,
    config: ClientConfig,
}

impl RegistryClient {
    /// Create a client for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>, format: Format) -> Result<Self> {
        Self::with_config(ClientConfig::new(endpoint, format))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The absolute URL for a path rendered by a query
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// The URL of a single structural artefact
    pub fn structure_url(
        &self,
        artefact_type: StructureType,
        agency: &str,
        id: &str,
        version: &str,
    ) -> Result<String> {
        let query = StructureQuery::artefact(artefact_type, agency, id, version);
        Ok(self.url_for(&query.get_url(self.config.api_version)?))
    }

    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, accept, "Requesting");
        let response = self.client.get(url).header(ACCEPT, accept).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Registry {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(url, bytes = body.len(), "Received response");
        Ok(body.to_vec())
    }

    async fn fetch_codes(
        &self,
        sdmx_type: CodelistType,
        agency: &str,
        id: &str,
        version: &str,
    ) -> Result<Codelist> {
        let artefact_type = match sdmx_type {
            CodelistType::Codelist => StructureType::Codelist,
            CodelistType::Valuelist => StructureType::ValueList,
        };
        let url = self.structure_url(artefact_type, agency, id, version)?;
        let body = self.fetch(&url, self.config.format.media_type()).await?;
        reader::read_codes(self.config.format, &body, sdmx_type)
    }

    /// Get the codes of a codelist, or of a value list with the same id.
    ///
    /// The registry is asked for a codelist first; when it has none, the
    /// value list is retrieved instead (value lists require SDMX-REST 2.x).
    pub async fn get_codes(&self, agency: &str, id: &str, version: &str) -> Result<Codelist> {
        match self
            .fetch_codes(CodelistType::Codelist, agency, id, version)
            .await
        {
            Err(err) if err.is_not_found() && self.config.api_version.is_v2() => {
                tracing::warn!(agency, id, version, "No codelist found, trying value list");
                self.fetch_codes(CodelistType::Valuelist, agency, id, version)
                    .await
            }
            result => result,
        }
    }

    /// Get a representation map, used to map codes between codelists.
    pub async fn get_code_map(
        &self,
        agency: &str,
        id: &str,
        version: &str,
    ) -> Result<RepresentationMap> {
        let url = self.structure_url(StructureType::RepresentationMap, agency, id, version)?;
        let body = self.fetch(&url, self.config.format.media_type()).await?;
        reader::read_code_map(self.config.format, &body)
    }

    /// Get the mapping definition of a structure map.
    ///
    /// The representation maps the structure map references are retrieved in
    /// the same request and resolved into component mappers.
    pub async fn get_mapping(
        &self,
        agency: &str,
        id: &str,
        version: &str,
    ) -> Result<MappingDefinition> {
        let query = StructureQuery::artefact(StructureType::StructureMap, agency, id, version)
            .with_references(References::Children);
        let url = self.url_for(&query.get_url(self.config.api_version)?);
        let body = self.fetch(&url, self.config.format.media_type()).await?;
        reader::read_mapping(self.config.format, &body)
    }

    /// Get a metadata report published by `provider` (`AGENCY.PROVIDER`).
    pub async fn get_report(
        &self,
        provider: &str,
        id: &str,
        version: &str,
    ) -> Result<MetadataReport> {
        let query = MetadataQuery::metadataset(provider, id, version);
        let url = self.url_for(&query.get_url(self.config.api_version)?);
        let body = self
            .fetch(&url, self.config.format.metadata_media_type())
            .await?;
        reader::read_report(self.config.format, &body)
    }

    /// Get data matching `query`, as the raw bytes of the response.
    ///
    /// The query is validated and rendered in short form for `api_version`
    /// before any request is made.
    pub async fn get_data(
        &self,
        query: &DataQuery,
        api_version: ApiVersion,
        data_format: DataFormat,
    ) -> Result<Vec<u8>> {
        let url = self.url_for(&query.get_url(api_version, true)?);
        self.fetch(&url, data_format.media_type()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_version: ApiVersion) -> RegistryClient {
        let config = ClientConfig::new("https://registry.sdmx.org/sdmx/v2/", Format::FusionJson)
            .with_api_version(api_version);
        RegistryClient::with_config(config).unwrap()
    }

    #[test]
    fn test_structure_urls() {
        let fmr = client(ApiVersion::V2_0_0);
        assert_eq!(
            fmr.structure_url(StructureType::Codelist, "TEST", "CTYPES", "1.0")
                .unwrap(),
            "https://registry.sdmx.org/sdmx/v2/structure/codelist/TEST/CTYPES/1.0"
        );
        assert_eq!(
            fmr.structure_url(StructureType::ValueList, "TEST", "CTYPES", "1.0")
                .unwrap(),
            "https://registry.sdmx.org/sdmx/v2/structure/valuelist/TEST/CTYPES/1.0"
        );
    }

    #[test]
    fn test_v1_structure_urls() {
        let fmr = client(ApiVersion::V1_5_0);
        assert_eq!(
            fmr.structure_url(StructureType::Codelist, "BIS", "CL_FREQ", "~")
                .unwrap(),
            "https://registry.sdmx.org/sdmx/v2/codelist/BIS/CL_FREQ/latest"
        );
        assert!(fmr
            .structure_url(StructureType::RepresentationMap, "BIS", "MAP", "1.0")
            .is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            RegistryClient::new("", Format::SdmxJson),
            Err(Error::Config(_))
        ));
    }
}
