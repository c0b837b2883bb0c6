//! SDMX-REST structure queries
//!
//! Structure queries retrieve metadata artefacts (codelists, dataflows,
//! representation maps, ...). In 2.x they live under `/structure/{type}`; in
//! 1.x the artefact type is the first path segment.

use crate::error::{Error, Result};
use crate::selection::{v1_keyword, Selection, REST_LATEST};
use crate::version::ApiVersion;
use std::fmt;

/// Types of structural metadata artefacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    AgencyScheme,
    CategoryScheme,
    Codelist,
    ConceptScheme,
    Dataflow,
    DataProviderScheme,
    DataStructure,
    Hierarchy,
    HierarchyAssociation,
    ProvisionAgreement,
    RepresentationMap,
    StructureMap,
    ValueList,
}

impl StructureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::AgencyScheme => "agencyscheme",
            StructureType::CategoryScheme => "categoryscheme",
            StructureType::Codelist => "codelist",
            StructureType::ConceptScheme => "conceptscheme",
            StructureType::Dataflow => "dataflow",
            StructureType::DataProviderScheme => "dataproviderscheme",
            StructureType::DataStructure => "datastructure",
            StructureType::Hierarchy => "hierarchy",
            StructureType::HierarchyAssociation => "hierarchyassociation",
            StructureType::ProvisionAgreement => "provisionagreement",
            StructureType::RepresentationMap => "representationmap",
            StructureType::StructureMap => "structuremap",
            StructureType::ValueList => "valuelist",
        }
    }

    /// Whether the artefact type exists in the given API version.
    ///
    /// Value lists, hierarchies and the SDMX 3.0 mapping artefacts were
    /// introduced with SDMX-REST 2.0.
    pub fn is_supported_by(&self, version: ApiVersion) -> bool {
        version.is_v2()
            || !matches!(
                self,
                StructureType::Hierarchy
                    | StructureType::HierarchyAssociation
                    | StructureType::RepresentationMap
                    | StructureType::StructureMap
                    | StructureType::ValueList
            )
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artefacts to return along with the ones matching a structure query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum References {
    #[default]
    None,
    Parents,
    ParentsAndSiblings,
    Children,
    Descendants,
    All,
}

impl References {
    pub fn as_str(&self) -> &'static str {
        match self {
            References::None => "none",
            References::Parents => "parents",
            References::ParentsAndSiblings => "parentsandsiblings",
            References::Children => "children",
            References::Descendants => "descendants",
            References::All => "all",
        }
    }
}

impl fmt::Display for References {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query for structural metadata artefacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureQuery {
    artefact_type: StructureType,
    agency_id: Selection,
    resource_id: Selection,
    version: Selection,
    references: References,
}

impl StructureQuery {
    /// All artefacts of the given type, in their latest version
    pub fn new(artefact_type: StructureType) -> Self {
        Self {
            artefact_type,
            agency_id: Selection::all(),
            resource_id: Selection::all(),
            version: Selection::from(REST_LATEST),
            references: References::None,
        }
    }

    /// A single artefact
    pub fn artefact(
        artefact_type: StructureType,
        agency_id: impl Into<Selection>,
        resource_id: impl Into<Selection>,
        version: impl Into<Selection>,
    ) -> Self {
        Self {
            artefact_type,
            agency_id: agency_id.into(),
            resource_id: resource_id.into(),
            version: version.into(),
            references: References::None,
        }
    }

    /// Also return the artefacts referenced by, or referencing, the matches
    pub fn with_references(mut self, references: References) -> Self {
        self.references = references;
        self
    }

    pub fn artefact_type(&self) -> StructureType {
        self.artefact_type
    }

    pub fn agency_id(&self) -> &Selection {
        &self.agency_id
    }

    pub fn resource_id(&self) -> &Selection {
        &self.resource_id
    }

    pub fn version(&self) -> &Selection {
        &self.version
    }

    pub fn references(&self) -> References {
        self.references
    }

    pub fn validate_for(&self, version: ApiVersion) -> Result<()> {
        if !self.artefact_type.is_supported_by(version) {
            return Err(Error::UnsupportedStructureType {
                structure_type: self.artefact_type,
                version,
            });
        }
        if !version.is_v2() {
            for (field, selection) in [
                ("agency", &self.agency_id),
                ("resource", &self.resource_id),
                ("version", &self.version),
            ] {
                if selection.is_multiple() {
                    return Err(Error::MultipleValues {
                        field,
                        values: selection.to_string(),
                        version,
                    });
                }
            }
        }
        Ok(())
    }

    /// The URL path for the query in the selected API version
    pub fn get_url(&self, version: ApiVersion) -> Result<String> {
        self.validate_for(version)?;

        let path = if version.is_v2() {
            format!(
                "/structure/{}/{}/{}/{}",
                self.artefact_type, self.agency_id, self.resource_id, self.version
            )
        } else {
            format!(
                "/{}/{}/{}/{}",
                self.artefact_type,
                self.agency_id.join_with(v1_keyword),
                self.resource_id.join_with(v1_keyword),
                self.version.join_with(v1_keyword)
            )
        };
        let url = match self.references {
            References::None => path,
            references => format!("{}?references={}", path, references),
        };

        tracing::debug!(version = %version, url = %url, "Rendered structure query");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_structure_url() {
        let q = StructureQuery::artefact(StructureType::Codelist, "TEST", "CTYPES", "1.0");
        assert_eq!(
            q.get_url(ApiVersion::V2_0_0).unwrap(),
            "/structure/codelist/TEST/CTYPES/1.0"
        );
    }

    #[test]
    fn test_v1_structure_url_uses_keywords() {
        let q = StructureQuery::new(StructureType::Dataflow);
        assert_eq!(q.get_url(ApiVersion::V1_5_0).unwrap(), "/dataflow/all/all/latest");
        assert_eq!(q.get_url(ApiVersion::V2_0_0).unwrap(), "/structure/dataflow/*/*/~");
    }

    #[test]
    fn test_v2_only_types() {
        let q = StructureQuery::artefact(StructureType::ValueList, "TEST", "CTYPES", "1.0");
        let err = q.get_url(ApiVersion::V1_5_0).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStructureType { .. }));
        assert_eq!(err.status(), 422);
    }

    #[test]
    fn test_references_parameter() {
        let q = StructureQuery::artefact(StructureType::StructureMap, "BIS", "SRC_2_MDD", "1.0")
            .with_references(References::Children);
        assert_eq!(
            q.get_url(ApiVersion::V2_0_0).unwrap(),
            "/structure/structuremap/BIS/SRC_2_MDD/1.0?references=children"
        );

        let q = StructureQuery::artefact(StructureType::Dataflow, "BIS", "CPI", "~")
            .with_references(References::ParentsAndSiblings);
        assert_eq!(
            q.get_url(ApiVersion::V1_5_0).unwrap(),
            "/dataflow/BIS/CPI/latest?references=parentsandsiblings"
        );
    }

    #[test]
    fn test_lists_only_from_v2() {
        let q = StructureQuery::artefact(StructureType::Codelist, ["BIS", "ECB"], "CL_FREQ", "1.0");
        assert!(q.get_url(ApiVersion::V1_5_0).is_err());
        assert_eq!(
            q.get_url(ApiVersion::V2_0_0).unwrap(),
            "/structure/codelist/BIS,ECB/CL_FREQ/1.0"
        );
    }
}
