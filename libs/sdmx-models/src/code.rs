//! SDMX Codelist model
//!
//! Codelists and value lists share one representation; `sdmx_type` records
//! which kind of artefact the codes were read from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A code: an identifier with an optional name and description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Code {
    /// Identifier of the code (e.g. `CH`)
    pub id: String,

    /// Name of the code (e.g. `Switzerland`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Start of validity for the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of validity for the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
}

impl Code {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            valid_from: None,
            valid_to: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Kind of artefact a set of codes comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodelistType {
    #[default]
    Codelist,
    Valuelist,
}

impl CodelistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodelistType::Codelist => "codelist",
            CodelistType::Valuelist => "valuelist",
        }
    }
}

impl fmt::Display for CodelistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable collection of codes maintained by an agency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Codelist {
    pub id: String,

    /// Maintenance agency (e.g. `BIS`)
    pub agency: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub sdmx_type: CodelistType,

    #[serde(default)]
    pub codes: Vec<Code>,
}

impl Codelist {
    /// Number of codes in the list
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Code> {
        self.codes.iter()
    }

    /// Look up a code by id
    pub fn get(&self, id: &str) -> Option<&Code> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// The SDMX short URN of the list, e.g. `Codelist=BIS:CL_FREQ(1.0)`
    pub fn short_urn(&self) -> String {
        let class = match self.sdmx_type {
            CodelistType::Codelist => "Codelist",
            CodelistType::Valuelist => "ValueList",
        };
        format!("{}={}:{}({})", class, self.agency, self.id, self.version)
    }
}

impl<'a> IntoIterator for &'a Codelist {
    type Item = &'a Code;
    type IntoIter = std::slice::Iter<'a, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}
