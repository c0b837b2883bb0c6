//! Fusion-JSON structure messages

use super::{
    localised, parse_optional_validity, representation_map_urn, short_urn, single,
    fixed_value_map, single_value_map, source_value, ComponentMapping, StructureMapParts,
};
use crate::error::{Error, Result};
use sdmx_models::{
    Code, Codelist, CodelistType, DatePatternMap, DatePatternType, FixedValueMap,
    MappingDefinition, MetadataAttribute, MetadataReport, MultipleValueMap, RepresentationMap,
    SourceValue,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct FusionCodelistMessage {
    #[serde(rename = "Codelist", alias = "ValueList", default)]
    codelists: Vec<FusionCodelist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionCodelist {
    id: String,
    agency_id: String,
    version: String,
    #[serde(default)]
    names: BTreeMap<String, String>,
    #[serde(default)]
    descriptions: BTreeMap<String, String>,
    #[serde(default)]
    items: Vec<FusionCode>,
}

#[derive(Debug, Deserialize)]
struct FusionCode {
    id: String,
    #[serde(default)]
    names: BTreeMap<String, String>,
    #[serde(default)]
    descriptions: BTreeMap<String, String>,
}

impl From<FusionCode> for Code {
    fn from(code: FusionCode) -> Self {
        Code {
            id: code.id,
            name: localised(&code.names),
            description: localised(&code.descriptions),
            valid_from: None,
            valid_to: None,
        }
    }
}

impl FusionCodelist {
    fn into_model(self, sdmx_type: CodelistType) -> Codelist {
        Codelist {
            name: localised(&self.names),
            description: localised(&self.descriptions),
            id: self.id,
            agency: self.agency_id,
            version: self.version,
            sdmx_type,
            codes: self.items.into_iter().map(Code::from).collect(),
        }
    }
}

pub fn read_codes(body: &[u8], sdmx_type: CodelistType) -> Result<Codelist> {
    let message: FusionCodelistMessage = serde_json::from_slice(body)?;
    Ok(single(message.codelists, sdmx_type.as_str())?.into_model(sdmx_type))
}

#[derive(Debug, Deserialize)]
struct FusionRepresentationMapMessage {
    #[serde(rename = "RepresentationMap", default)]
    maps: Vec<FusionRepresentationMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionRepresentationMap {
    id: String,
    agency_id: String,
    version: String,
    #[serde(default)]
    names: BTreeMap<String, String>,
    #[serde(default)]
    descriptions: BTreeMap<String, String>,
    #[serde(default)]
    source: Vec<FusionRepresentation>,
    #[serde(default)]
    target: Vec<FusionRepresentation>,
    #[serde(default)]
    mapped_values: Vec<FusionMappedValue>,
}

#[derive(Debug, Deserialize)]
struct FusionRepresentation {
    representation: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FusionSourceValue {
    Literal(String),
    Value {
        value: String,
        #[serde(rename = "isRegEx", default)]
        is_regex: bool,
    },
}

impl FusionSourceValue {
    fn into_model(self) -> Result<SourceValue> {
        match self {
            FusionSourceValue::Literal(value) => Ok(SourceValue::literal(value)),
            FusionSourceValue::Value { value, is_regex } => source_value(value, is_regex),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionMappedValue {
    source: Vec<FusionSourceValue>,
    target: Vec<String>,
    valid_from: Option<String>,
    valid_to: Option<String>,
}

impl FusionMappedValue {
    fn into_model(self) -> Result<MultipleValueMap> {
        let source = self
            .source
            .into_iter()
            .map(FusionSourceValue::into_model)
            .collect::<Result<Vec<_>>>()?;
        Ok(MultipleValueMap::new(source, self.target).with_validity(
            parse_optional_validity(self.valid_from.as_deref())?,
            parse_optional_validity(self.valid_to.as_deref())?,
        ))
    }
}

impl FusionRepresentationMap {
    fn value_maps(self) -> Result<Vec<MultipleValueMap>> {
        self.mapped_values
            .into_iter()
            .map(FusionMappedValue::into_model)
            .collect()
    }
}

pub fn read_code_map(body: &[u8]) -> Result<RepresentationMap> {
    let message: FusionRepresentationMapMessage = serde_json::from_slice(body)?;
    let map = single(message.maps, "representation map")?;

    let name = localised(&map.names);
    let description = localised(&map.descriptions);
    let source = map.source.iter().map(|r| short_urn(&r.representation)).collect();
    let target = map.target.iter().map(|r| short_urn(&r.representation)).collect();
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

#[derive(Debug, Deserialize)]
struct FusionMappingMessage {
    #[serde(rename = "StructureMap", default)]
    structure_maps: Vec<FusionStructureMap>,
    #[serde(rename = "RepresentationMap", default)]
    representation_maps: Vec<FusionRepresentationMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionStructureMap {
    id: String,
    #[serde(default)]
    components: Vec<FusionComponentMap>,
    #[serde(default)]
    date_pattern_maps: Vec<FusionDatePatternMap>,
    #[serde(default)]
    fixed_value_maps: Vec<FusionFixedValueMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionComponentMap {
    source: Vec<String>,
    target: Vec<String>,
    representation_map: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionDatePatternMap {
    id: Option<String>,
    source_attributes: Vec<String>,
    target_attribute: String,
    date_map: FusionDateMap,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FusionDateMap {
    source_pattern: String,
    locale: Option<String>,
    target_frequency_id: Option<String>,
    frequency_dimension: Option<String>,
}

impl FusionDatePatternMap {
    fn into_model(self, map_id: &str) -> Result<DatePatternMap> {
        let (frequency, pattern_type) = match (
            self.date_map.target_frequency_id,
            self.date_map.frequency_dimension,
        ) {
            (Some(code), _) => (code, DatePatternType::Fixed),
            (None, Some(dimension)) => (dimension, DatePatternType::Variable),
            (None, None) => {
                return Err(Error::InvalidMessage(format!(
                    "date pattern map in {} has no frequency",
                    map_id
                )))
            }
        };
        let source = <[String; 1]>::try_from(self.source_attributes).map_err(|_| {
            Error::InvalidMessage(format!(
                "date pattern map in {} must have exactly one source component",
                map_id
            ))
        })?;
        let [source] = source;

        let mut map = DatePatternMap::new(
            source,
            self.target_attribute,
            self.date_map.source_pattern,
            frequency,
        )
        .with_pattern_type(pattern_type);
        if let Some(locale) = self.date_map.locale {
            map = map.with_locale(locale);
        }
        map.id = self.id;
        Ok(map)
    }
}

/// A component set to a fixed value, in the source or the target structure
#[derive(Debug, Deserialize)]
struct FusionFixedValueMap {
    source: Option<String>,
    target: Option<String>,
    values: Vec<Value>,
}

impl FusionFixedValueMap {
    fn into_model(self, map_id: &str) -> Result<FixedValueMap> {
        fixed_value_map(self.source, self.target, self.values, map_id)
    }
}

pub fn read_mapping(body: &[u8]) -> Result<MappingDefinition> {
    let message: FusionMappingMessage = serde_json::from_slice(body)?;
    let map = single(message.structure_maps, "structure map")?;

    let representation_maps = message
        .representation_maps
        .into_iter()
        .map(|rm| {
            let urn = representation_map_urn(&rm.agency_id, &rm.id, &rm.version);
            rm.value_maps().map(|values| (urn, values))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    let date_maps = map
        .date_pattern_maps
        .into_iter()
        .map(|d| d.into_model(&map.id))
        .collect::<Result<Vec<_>>>()?;
    let fixed_value_maps = map
        .fixed_value_maps
        .into_iter()
        .map(|f| f.into_model(&map.id))
        .collect::<Result<Vec<_>>>()?;
    let components = map
        .components
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

#[derive(Debug, Deserialize)]
struct FusionMetadataMessage {
    #[serde(rename = "MetadataSet", default)]
    reports: Vec<FusionMetadataReport>,
}

#[derive(Debug, Deserialize)]
struct FusionMetadataReport {
    id: String,
    #[serde(default)]
    names: BTreeMap<String, String>,
    metadataflow: String,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    attributes: Vec<FusionMetadataAttribute>,
}

#[derive(Debug, Deserialize)]
struct FusionMetadataAttribute {
    id: String,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    attributes: Vec<FusionMetadataAttribute>,
}

impl From<FusionMetadataAttribute> for MetadataAttribute {
    fn from(attribute: FusionMetadataAttribute) -> Self {
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
    let message: FusionMetadataMessage = serde_json::from_slice(body)?;
    let report = single(message.reports, "metadata report")?;

    Ok(MetadataReport {
        name: localised(&report.names),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_valuelist_items() {
        let body = br#"{
            "ValueList": [{
                "id": "CTYPES",
                "agencyId": "TEST",
                "version": "1.0",
                "names": {"en": "Currency types"},
                "items": [
                    {"id": "CHF", "names": {"en": "Swiss franc"}},
                    {"id": "EUR", "names": {"en": "Euro"}, "descriptions": {"en": "Single currency"}}
                ]
            }]
        }"#;

        let list = read_codes(body, CodelistType::Valuelist).unwrap();
        assert_eq!(list.short_urn(), "ValueList=TEST:CTYPES(1.0)");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("EUR").and_then(|c| c.description.as_deref()), Some("Single currency"));
    }

    #[test]
    fn test_empty_message_is_invalid() {
        let err = read_codes(br#"{"Codelist": []}"#, CodelistType::Codelist).unwrap_err();
        assert!(matches!(err, Error::InvalidMessage(_)));
    }

    #[test]
    fn test_date_pattern_frequency() {
        let body = br#"{
            "StructureMap": [{
                "id": "SRC_2_MDD",
                "datePatternMaps": [
                    {"sourceAttributes": ["DATE"], "targetAttribute": "TIME_PERIOD",
                     "dateMap": {"sourcePattern": "MMM yy", "targetFrequencyId": "M"}},
                    {"id": "VAR", "sourceAttributes": ["DATE"], "targetAttribute": "TIME_PERIOD",
                     "dateMap": {"sourcePattern": "dd.MM.yyyy", "frequencyDimension": "FREQ", "locale": "de"}}
                ]
            }]
        }"#;

        let mapping = read_mapping(body).unwrap();
        assert_eq!(mapping.date_maps[0].frequency, "M");
        assert_eq!(mapping.date_maps[0].pattern_type, DatePatternType::Fixed);
        assert_eq!(mapping.date_maps[1].pattern_type, DatePatternType::Variable);
        assert_eq!(mapping.date_maps[1].locale, "de");
        assert_eq!(mapping.date_maps[1].id.as_deref(), Some("VAR"));
    }

    #[test]
    fn test_multi_value_mappings_are_rejected() {
        let body = br#"{
            "RepresentationMap": [{
                "id": "CCY", "agencyId": "BIS", "version": "1.0",
                "mappedValues": [{"source": ["DE", "LC"], "target": ["EUR"]}]
            }]
        }"#;
        assert!(matches!(read_code_map(body), Err(Error::InvalidMessage(_))));
    }
}
