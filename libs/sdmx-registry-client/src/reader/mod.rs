//! Readers for structure messages
//!
//! Each supported [`Format`] has its own module with serde mirrors of the
//! message layout. The mirrors are converted into `sdmx-models` types; the
//! parts both formats share (value narrowing, structure map assembly) live
//! here.

pub mod fusion;
pub mod sdmx_json;

use crate::config::Format;
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sdmx_models::{
    Codelist, CodelistType, ComponentMapper, DatePatternMap, FixedValueMap, ImplicitMapper, Location,
    MappingDefinition, MetadataReport, MultipleComponentMapper, MultipleValueMap,
    RepresentationMap, SourceValue, ValueMap,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Read a codelist or value list message
pub fn read_codes(format: Format, body: &[u8], sdmx_type: CodelistType) -> Result<Codelist> {
    match format {
        Format::FusionJson => fusion::read_codes(body, sdmx_type),
        Format::SdmxJson => sdmx_json::read_codes(body, sdmx_type),
    }
}

/// Read a representation map message
pub fn read_code_map(format: Format, body: &[u8]) -> Result<RepresentationMap> {
    match format {
        Format::FusionJson => fusion::read_code_map(body),
        Format::SdmxJson => sdmx_json::read_code_map(body),
    }
}

/// Read a structure map message, with the representation maps it references
pub fn read_mapping(format: Format, body: &[u8]) -> Result<MappingDefinition> {
    match format {
        Format::FusionJson => fusion::read_mapping(body),
        Format::SdmxJson => sdmx_json::read_mapping(body),
    }
}

/// Read a metadata set message
pub fn read_report(format: Format, body: &[u8]) -> Result<MetadataReport> {
    match format {
        Format::FusionJson => fusion::read_report(body),
        Format::SdmxJson => sdmx_json::read_report(body),
    }
}

const DEFAULT_LANGUAGE: &str = "en";

/// Pick the English text of a localised map, or any text if there is none
pub(crate) fn localised(texts: &BTreeMap<String, String>) -> Option<String> {
    texts
        .get(DEFAULT_LANGUAGE)
        .or_else(|| texts.values().next())
        .cloned()
}

/// Shorten a full SDMX URN to `Class=AGENCY:ID(VERSION)`.
///
/// Anything that is not a URN, such as a value type, is returned unchanged.
pub(crate) fn short_urn(urn: &str) -> String {
    match urn.split_once('=') {
        Some((class_path, rest)) => {
            let class = class_path.rsplit('.').next().unwrap_or(class_path);
            format!("{}={}", class, rest)
        }
        None => urn.to_string(),
    }
}

/// Parse a validity date: RFC 3339, or a plain date taken as midnight UTC
pub(crate) fn parse_validity(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| Error::InvalidMessage(format!("'{}' is not a valid validity date", value)))
}

pub(crate) fn parse_optional_validity(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(parse_validity).transpose()
}

/// The single artefact of a message, failing if the message holds none
pub(crate) fn single<T>(artefacts: Vec<T>, kind: &str) -> Result<T> {
    let count = artefacts.len();
    let mut artefacts = artefacts.into_iter();
    match artefacts.next() {
        Some(first) => {
            if count > 1 {
                tracing::warn!(kind, count, "Message holds several artefacts, using the first");
            }
            Ok(first)
        }
        None => Err(Error::InvalidMessage(format!("no {} in message", kind))),
    }
}

/// Narrow a mapping to a single source and a single target value
pub(crate) fn single_value_map(map: MultipleValueMap, map_id: &str) -> Result<ValueMap> {
    let MultipleValueMap {
        source,
        target,
        valid_from,
        valid_to,
    } = map;
    match (
        <[SourceValue; 1]>::try_from(source),
        <[String; 1]>::try_from(target),
    ) {
        (Ok([source]), Ok([target])) => {
            Ok(ValueMap::new(source, target).with_validity(valid_from, valid_to))
        }
        _ => Err(Error::InvalidMessage(format!(
            "representation map {} maps several values at once",
            map_id
        ))),
    }
}

/// A literal source value, or a pattern when flagged as a regular expression
pub(crate) fn source_value(value: String, is_regex: bool) -> Result<SourceValue> {
    if is_regex {
        Ok(SourceValue::pattern(value)?)
    } else {
        Ok(SourceValue::literal(value))
    }
}

/// Build a fixed value map; several values are kept as a list
pub(crate) fn fixed_value_map(
    source: Option<String>,
    target: Option<String>,
    mut values: Vec<Value>,
    map_id: &str,
) -> Result<FixedValueMap> {
    let (component, location) = match (source, target) {
        (None, Some(target)) => (target, Location::Target),
        (Some(source), None) => (source, Location::Source),
        _ => {
            return Err(Error::InvalidMessage(format!(
                "fixed value map in {} must set either a source or a target",
                map_id
            )))
        }
    };
    let value = match values.len() {
        0 => {
            return Err(Error::InvalidMessage(format!(
                "fixed value map for {} in {} has no value",
                component, map_id
            )))
        }
        1 => values.remove(0),
        _ => Value::Array(values),
    };
    Ok(FixedValueMap::new(component, value).located_in(location))
}

/// Short URN of a representation map, as used to reference it
pub(crate) fn representation_map_urn(agency: &str, id: &str, version: &str) -> String {
    format!("RepresentationMap={}:{}({})", agency, id, version)
}

/// A component map of a structure map, as read from either format
#[derive(Debug)]
pub(crate) struct ComponentMapping {
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub representation_map: Option<String>,
}

/// The parts of a structure map, before representation maps are resolved
#[derive(Debug, Default)]
pub(crate) struct StructureMapParts {
    pub id: String,
    pub components: Vec<ComponentMapping>,
    pub date_maps: Vec<DatePatternMap>,
    pub fixed_value_maps: Vec<FixedValueMap>,
    /// Value maps of the referenced representation maps, by short URN
    pub representation_maps: BTreeMap<String, Vec<MultipleValueMap>>,
}

impl StructureMapParts {
    /// Resolve component maps into mappers.
    ///
    /// A component map with a representation map becomes a
    /// [`ComponentMapper`] when it relates one component to another, and a
    /// [`MultipleComponentMapper`] otherwise. Without a representation map,
    /// values are copied as-is ([`ImplicitMapper`]).
    pub fn into_mapping(mut self) -> Result<MappingDefinition> {
        let mut mapping = MappingDefinition {
            date_maps: std::mem::take(&mut self.date_maps),
            fixed_value_maps: std::mem::take(&mut self.fixed_value_maps),
            ..Default::default()
        };

        for component in std::mem::take(&mut self.components) {
            let ComponentMapping {
                source,
                target,
                representation_map,
            } = component;

            match representation_map {
                None => {
                    let (Ok([source]), Ok([target])) = (
                        <[String; 1]>::try_from(source),
                        <[String; 1]>::try_from(target),
                    ) else {
                        return Err(Error::InvalidMessage(format!(
                            "structure map {} copies several components without a representation map",
                            self.id
                        )));
                    };
                    mapping.implicit_maps.push(ImplicitMapper::new(source, target));
                }
                Some(urn) => {
                    let urn = short_urn(&urn);
                    let values = self.representation_maps.get(&urn).cloned().ok_or_else(|| {
                        Error::InvalidMessage(format!(
                            "structure map {} references {}, which is not in the message",
                            self.id, urn
                        ))
                    })?;

                    if source.len() == 1 && target.len() == 1 {
                        let values = values
                            .into_iter()
                            .map(|v| single_value_map(v, &urn))
                            .collect::<Result<Vec<_>>>()?;
                        let (source, target) = (source[0].clone(), target[0].clone());
                        mapping
                            .component_maps
                            .push(ComponentMapper::new(source, target, values));
                    } else {
                        mapping
                            .multiple_component_maps
                            .push(MultipleComponentMapper::new(source, target, values));
                    }
                }
            }
        }

        tracing::debug!(id = %self.id, rules = mapping.len(), "Read structure map");
        Ok(mapping)
    }
}
