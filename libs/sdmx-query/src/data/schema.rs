//! Strict schema for data queries
//!
//! A query is encoded to JSON and every field is decoded again into a type
//! that only accepts well-formed values. Failures name the field as a JSON
//! path (`$.first_n_obs`).

use super::{DataContext, DataQuery};
use crate::error::{Error, Result};
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

static NC_NAME_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("identifier pattern must compile")
});

pub(crate) fn is_nc_name_id(value: &str) -> bool {
    NC_NAME_ID.is_match(value)
}

// Newtypes below are decoded only for their checks
#[allow(dead_code)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
struct NcNameId(String);

impl TryFrom<String> for NcNameId {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if is_nc_name_id(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "'{}' is not a valid identifier (expected {})",
                value,
                NC_NAME_ID.as_str()
            ))
        }
    }
}

/// A selection whose values are all identifiers
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(try_from = "Selection")]
struct IdSelection(Vec<NcNameId>);

impl TryFrom<Selection> for IdSelection {
    type Error = String;

    fn try_from(selection: Selection) -> std::result::Result<Self, Self::Error> {
        selection
            .values()
            .iter()
            .cloned()
            .map(NcNameId::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(try_from = "u32")]
struct PositiveCount(u32);

impl TryFrom<u32> for PositiveCount {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(format!("expected a number of observations greater than 0, got {}", value))
        }
    }
}

type FieldCheck = fn(Value) -> serde_json::Result<()>;

fn decodes<T: DeserializeOwned>(value: Value) -> serde_json::Result<()> {
    serde_json::from_value::<T>(value).map(|_| ())
}

const FIELDS: [(&str, FieldCheck); 13] = [
    ("context", decodes::<DataContext>),
    ("agency_id", decodes::<Selection>),
    ("resource_id", decodes::<Selection>),
    ("version", decodes::<Selection>),
    ("key", decodes::<Selection>),
    ("components", decodes::<BTreeMap<NcNameId, Selection>>),
    ("updated_after", decodes::<Option<DateTime<Utc>>>),
    ("first_n_obs", decodes::<Option<PositiveCount>>),
    ("last_n_obs", decodes::<Option<PositiveCount>>),
    ("obs_dimension", decodes::<Option<NcNameId>>),
    ("attributes", decodes::<IdSelection>),
    ("measures", decodes::<IdSelection>),
    ("include_history", decodes::<bool>),
];

pub(crate) fn check(query: &DataQuery) -> Result<()> {
    let encoded =
        serde_json::to_value(query).map_err(|e| Error::InvalidSchema(e.to_string()))?;
    let Value::Object(mut fields) = encoded else {
        return Err(Error::InvalidSchema("expected a query object - at `$`".to_string()));
    };

    for (name, decode) in FIELDS {
        let value = fields.remove(name).unwrap_or(Value::Null);
        decode(value).map_err(|e| Error::InvalidSchema(format!("{} - at `$.{}`", e, name)))?;
    }

    match fields.keys().next() {
        Some(unknown) => Err(Error::InvalidSchema(format!(
            "unknown field - at `$.{}`",
            unknown
        ))),
        None => Ok(()),
    }
}
