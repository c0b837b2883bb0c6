//! SDMX-JSON 2.0 structure messages

use super::{
    fixed_value_map, localised, parse_optional_validity, representation_map_urn, short_urn,
    single, single_value_map, source_value, ComponentMapping, StructureMapParts,
};
use crate::error::{Error, Result};
use sdmx_models::{
    Code, Codelist, CodelistType, DatePatternMap, DatePatternType, MappingDefinition,
    MetadataAttribute, MetadataReport, MultipleValueMap, RepresentationMap,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct StructureMessage<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CodelistData {
    codelists: Vec<JsonCodelist>,
    valuelists: Vec<JsonCodelist>,
}

/// Localised text, as a default-language string plus all translations
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Text {
    name: Option<String>,
    names: BTreeMap<String, String>,
    description: Option<String>,
    descriptions: BTreeMap<String, String>,
}

impl Text {
    fn name(&self) -> Option<String> {
        self.name.clone().or_else(|| localised(&self.names))
    }

    fn description(&self) -> Option<String> {
        self.description
            .clone()
            .or_else(|| localised(&self.descriptions))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonCodelist {
    id: String,
    #[serde(rename = "agencyID")]
    agency_id: String,
    version: String,
    #[serde(flatten)]
    text: Text,
    #[serde(alias = "valueItems", default)]
    codes: Vec<JsonCode>,
}

#[derive(Debug, Deserialize)]
struct JsonCode {
    id: String,
    #[serde(flatten)]
    text: Text,
}

pub fn read_codes(body: &[u8], sdmx_type: CodelistType) -> Result<Codelist> {
    let message: StructureMessage<CodelistData> = serde_json::from_slice(body)?;
    let lists = match sdmx_type {
        CodelistType::Codelist => message.data.codelists,
        CodelistType::Valuelist => message.data.valuelists,
    };
    let list = single(lists, sdmx_type.as_str())?;

    Ok(Codelist {
        name: list.text.name(),
        description: list.text.description(),
        id: list.id,
        agency: list.agency_id,
        version: list.version,
        sdmx_type,
        codes: list
            .codes
            .into_iter()
            .map(|code| Code {
                name: code.text.name(),
                description: code.text.description(),
                id: code.id,
                valid_from: None,
                valid_to: None,
            })
            .collect(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RepresentationMapData {
    representation_maps: Vec<JsonRepresentationMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRepresentationMap {
    id: String,
    #[serde(rename = "agencyID")]
    agency_id: String,
    version: String,
    #[serde(flatten)]
    text: Text,
    #[serde(default)]
    source: Vec<JsonRepresentation>,
    #[serde(default)]
    target: Vec<JsonRepresentation>,
    #[serde(default)]
    representation_mappings: Vec<JsonMapping>,
}

/// A reference to a codelist, a value list or a plain value type
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonRepresentation {
    codelist: Option<String>,
    valuelist: Option<String>,
    data_type: Option<String>,
}

impl JsonRepresentation {
    fn reference(&self) -> Result<String> {
        self.codelist
            .as_deref()
            .or(self.valuelist.as_deref())
            .map(short_urn)
            .or_else(|| self.data_type.clone())
            .ok_or_else(|| Error::InvalidMessage("empty representation reference".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonSourceValue {
    value: String,
    #[serde(rename = "isRegEx", default)]
    is_regex: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonMapping {
    source_values: Vec<JsonSourceValue>,
    target_values: Vec<String>,
    valid_from: Option<String>,
    valid_to: Option<String>,
}

impl JsonMapping {
    fn into_model(self) -> Result<MultipleValueMap> {
        let source = self
            .source_values
            .into_iter()
            .map(|v| source_value(v.value, v.is_regex))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultipleValueMap::new(source, self.target_values).with_validity(
            parse_optional_validity(self.valid_from.as_deref())?,
            parse_optional_validity(self.valid_to.as_deref())?,
        ))
    }
}

impl JsonRepresentationMap {
    fn value_maps(self) -> Result<Vec<MultipleValueMap>> {
        self.representation_mappings
            .into_iter()
            .map(JsonMapping::into_model)
            .collect()
    }
}

pub fn read_code_map(body: &[u8]) -> Result<RepresentationMap> {
    let message: StructureMessage<RepresentationMapData> = serde_json::from_slice(body)?;
    let map = single(message.data.representation_maps, "representation map")?;

    let source = map
        .source
        .iter()
        .map(JsonRepresentation::reference)
        .collect::<Result<Vec<_>>>()?;
    let target = map
        .target
        .iter()
        .map(JsonRepresentation::reference)
        .collect::<Result<Vec<_>>>()?;
    let name = map.text.name();
    let description = map.text.description();
    let (id, agency, version) = (map.id.clone(), map.agency_id.clone(), map.version.clone());

    let maps = map
        .value_maps()?
        .into_iter()
        .map(|v| single_value_map(v, &id))
        .collect::<Result<Vec<_>>>()?;

    Ok(RepresentationMap {
        id,
        agency,
        version,
        name,
        description,
        source,
        target,
        maps,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MappingData {
    structure_maps: Vec<JsonStructureMap>,
    representation_maps: Vec<JsonRepresentationMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonStructureMap {
    id: String,
    #[serde(default)]
    component_maps: Vec<JsonComponentMap>,
    #[serde(default)]
    date_pattern_maps: Vec<JsonDatePatternMap>,
    #[serde(default)]
    fixed_value_maps: Vec<JsonFixedValueMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonComponentMap {
    source: Vec<String>,
    target: Vec<String>,
    representation_map: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonDatePatternMap {
    id: Option<String>,
    source_pattern: String,
    locale: Option<String>,
    #[serde(rename = "targetFrequencyID")]
    target_frequency_id: Option<String>,
    frequency_dimension: Option<String>,
    mapped_components: Vec<JsonMappedComponent>,
}

#[derive(Debug, Deserialize)]
struct JsonMappedComponent {
    source: String,
    target: String,
}

impl JsonDatePatternMap {
    /// One date pattern map per mapped component pair
    fn into_model(self, map_id: &str) -> Result<Vec<DatePatternMap>> {
        let (frequency, pattern_type) = match (&self.target_frequency_id, &self.frequency_dimension) {
            (Some(code), _) => (code.clone(), DatePatternType::Fixed),
            (None, Some(dimension)) => (dimension.clone(), DatePatternType::Variable),
            (None, None) => {
                return Err(Error::InvalidMessage(format!(
                    "date pattern map in {} has no frequency",
                    map_id
                )))
            }
        };
        let locale = self.locale.unwrap_or_else(|| "en".to_string());

        Ok(self
            .mapped_components
            .into_iter()
            .map(|c| {
                let mut map = DatePatternMap::new(c.source, c.target, &self.source_pattern, &frequency)
                    .with_locale(&locale)
                    .with_pattern_type(pattern_type);
                map.id = self.id.clone();
                map
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct JsonFixedValueMap {
    source: Option<String>,
    target: Option<String>,
    values: Vec<Value>,
}

pub fn read_mapping(body: &[u8]) -> Result<MappingDefinition> {
    let message: StructureMessage<MappingData> = serde_json::from_slice(body)?;
    let map = single(message.data.structure_maps, "structure map")?;

    let representation_maps = message
        .data
        .representation_maps
        .into_iter()
        .map(|rm| {
            let urn = representation_map_urn(&rm.agency_id, &rm.id, &rm.version);
            rm.value_maps().map(|values| (urn, values))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    let mut date_maps = Vec::new();
    for date_map in map.date_pattern_maps {
        date_maps.extend(date_map.into_model(&map.id)?);
    }
    let fixed_value_maps = map
        .fixed_value_maps
        .into_iter()
        .map(|f| fixed_value_map(f.source, f.target, f.values, &map.id))
        .collect::<Result<Vec<_>>>()?;
    let components = map
        .component_maps
        .into_iter()
        .map(|c| ComponentMapping {
            source: c.source,
            target: c.target,
            representation_map: c.representation_map,
        })
        .collect();

    StructureMapParts {
        id: map.id,
        components,
        date_maps,
        fixed_value_maps,
        representation_maps,
    }
    .into_mapping()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MetadataData {
    metadata_sets: Vec<JsonMetadataSet>,
}

#[derive(Debug, Deserialize)]
struct JsonMetadataSet {
    id: String,
    #[serde(flatten)]
    text: Text,
    metadataflow: String,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    attributes: Vec<JsonMetadataAttribute>,
}

#[derive(Debug, Deserialize)]
struct JsonMetadataAttribute {
    id: String,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    attributes: Vec<JsonMetadataAttribute>,
}

impl From<JsonMetadataAttribute> for MetadataAttribute {
    fn from(attribute: JsonMetadataAttribute) -> Self {
        MetadataAttribute::new(attribute.id, attribute.value).with_attributes(
            attribute
                .attributes
                .into_iter()
                .map(MetadataAttribute::from)
                .collect(),
        )
    }
}

pub fn read_report(body: &[u8]) -> Result<MetadataReport> {
    let message: StructureMessage<MetadataData> = serde_json::from_slice(body)?;
    let report = single(message.data.metadata_sets, "metadata report")?;

    Ok(MetadataReport {
        name: report.text.name(),
        id: report.id,
        metadataflow: short_urn(&report.metadataflow),
        targets: report.targets.iter().map(|t| short_urn(t)).collect(),
        attributes: report
            .attributes
            .into_iter()
            .map(MetadataAttribute::from)
            .collect(),
    })
}
