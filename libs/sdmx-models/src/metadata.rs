//! Reference metadata reports

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An attribute of a metadata report, possibly holding nested attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataAttribute {
    pub id: String,

    /// The reported value; presentational attributes carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<MetadataAttribute>,
}

impl MetadataAttribute {
    pub fn new(id: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            id: id.into(),
            value,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<MetadataAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// A nested attribute by id
    pub fn get(&self, id: &str) -> Option<&MetadataAttribute> {
        self.attributes.iter().find(|a| a.id == id)
    }
}

/// A metadata report: attribute values reported for one or more targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataReport {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short URN of the metadataflow the report belongs to
    pub metadataflow: String,

    /// Short URNs of the artefacts the metadata is about
    #[serde(default)]
    pub targets: Vec<String>,

    #[serde(default)]
    pub attributes: Vec<MetadataAttribute>,
}

impl MetadataReport {
    /// A top-level attribute by id
    pub fn get(&self, id: &str) -> Option<&MetadataAttribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataAttribute> {
        self.attributes.iter()
    }
}

impl<'a> IntoIterator for &'a MetadataReport {
    type Item = &'a MetadataAttribute;
    type IntoIter = std::slice::Iter<'a, MetadataAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
