//! SDMX-REST metadata queries
//!
//! Reference metadata is organised in metadata sets, each published by a
//! metadata provider. Metadata set queries exist from SDMX-REST 2.0.

use crate::error::{Error, Result};
use crate::selection::{Selection, REST_LATEST};
use crate::version::ApiVersion;

/// A query for the metadata sets of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataQuery {
    provider_id: Selection,
    resource_id: Selection,
    version: Selection,
}

impl MetadataQuery {
    /// A single metadata set
    pub fn metadataset(
        provider_id: impl Into<Selection>,
        resource_id: impl Into<Selection>,
        version: impl Into<Selection>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            resource_id: resource_id.into(),
            version: version.into(),
        }
    }

    /// Every metadata set of a provider, in its latest version
    pub fn provider(provider_id: impl Into<Selection>) -> Self {
        Self::metadataset(provider_id, Selection::all(), REST_LATEST)
    }

    /// The provider, as `AGENCY.PROVIDER`
    pub fn provider_id(&self) -> &Selection {
        &self.provider_id
    }

    pub fn resource_id(&self) -> &Selection {
        &self.resource_id
    }

    pub fn version(&self) -> &Selection {
        &self.version
    }

    pub fn get_url(&self, version: ApiVersion) -> Result<String> {
        if !version.is_v2() {
            return Err(Error::UnsupportedMetadataQuery { version });
        }

        let url = format!(
            "/metadata/metadataset/{}/{}/{}",
            self.provider_id, self.resource_id, self.version
        );
        tracing::debug!(version = %version, url = %url, "Rendered metadata query");
        Ok(url)
    }
}
