//! SDMX mapping definitions
//!
//! Models for structure maps (how the components of a source structure relate
//! to those of a target structure) and representation maps (how codes in one
//! list translate to codes in another).
//!
//! Source values may be regular expressions with capture groups. A pattern
//! must match the whole input value, and targets can reference the captured
//! groups using `$1`, `${name}`, etc.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// A value in the source of a mapping: a literal code or a regular expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SourceValueRepr", into = "SourceValueRepr")]
pub struct SourceValue {
    raw: String,
    regex: Option<Regex>,
}

impl SourceValue {
    /// A source value matched verbatim
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            raw: value.into(),
            regex: None,
        }
    }

    /// A source value matched as a regular expression against the whole input
    pub fn pattern(pattern: impl Into<String>) -> Result<Self> {
        let raw = pattern.into();
        let regex =
            Regex::new(&format!("^(?:{})$", raw)).map_err(|source| Error::InvalidPattern {
                pattern: raw.clone(),
                source,
            })?;
        Ok(Self {
            raw,
            regex: Some(regex),
        })
    }

    /// The literal value or the pattern as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_pattern(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, input: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(input),
            None => self.raw == input,
        }
    }

    /// Map `input` onto `target`, expanding capture groups for patterns.
    ///
    /// Returns `None` when the input does not match.
    pub fn map_onto(&self, input: &str, target: &str) -> Option<String> {
        match &self.regex {
            Some(re) => {
                let caps = re.captures(input)?;
                let mut out = String::new();
                caps.expand(target, &mut out);
                Some(out)
            }
            None => (self.raw == input).then(|| target.to_string()),
        }
    }
}

impl PartialEq for SourceValue {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.is_pattern() == other.is_pattern()
    }
}

impl Eq for SourceValue {}

impl Hash for SourceValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.is_pattern().hash(state);
    }
}

impl From<&str> for SourceValue {
    fn from(value: &str) -> Self {
        SourceValue::literal(value)
    }
}

impl From<String> for SourceValue {
    fn from(value: String) -> Self {
        SourceValue::literal(value)
    }
}

impl PartialEq<&str> for SourceValue {
    fn eq(&self, other: &&str) -> bool {
        !self.is_pattern() && self.raw == *other
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SourceValueRepr {
    Literal(String),
    Pattern { pattern: String },
}

impl TryFrom<SourceValueRepr> for SourceValue {
    type Error = Error;

    fn try_from(repr: SourceValueRepr) -> Result<Self> {
        match repr {
            SourceValueRepr::Literal(value) => Ok(SourceValue::literal(value)),
            SourceValueRepr::Pattern { pattern } => SourceValue::pattern(pattern),
        }
    }
}

impl From<SourceValue> for SourceValueRepr {
    fn from(value: SourceValue) -> Self {
        if value.is_pattern() {
            SourceValueRepr::Pattern { pattern: value.raw }
        } else {
            SourceValueRepr::Literal(value.raw)
        }
    }
}

fn valid_at(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>, at: Option<DateTime<Utc>>) -> bool {
    let Some(at) = at else {
        return true;
    };
    from.map_or(true, |f| f <= at) && to.map_or(true, |t| at <= t)
}

/// Maps the values of two components together.
///
/// A map may carry a business validity period; outside of it the map does not
/// apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ValueMap {
    /// The source value
    pub source: SourceValue,

    /// The target value
    pub target: String,

    /// Start of business validity for the mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of business validity for the mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
}

impl ValueMap {
    pub fn new(source: impl Into<SourceValue>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            valid_from: None,
            valid_to: None,
        }
    }

    pub fn with_validity(
        mut self,
        valid_from: Option<DateTime<Utc>>,
        valid_to: Option<DateTime<Utc>>,
    ) -> Self {
        self.valid_from = valid_from;
        self.valid_to = valid_to;
        self
    }

    /// Whether the map is in force at the given instant (`None` means any time)
    pub fn is_valid_at(&self, at: Option<DateTime<Utc>>) -> bool {
        valid_at(self.valid_from, self.valid_to, at)
    }

    /// The target value for `input`, if this map applies to it at `at`
    pub fn apply(&self, input: &str, at: Option<DateTime<Utc>>) -> Option<String> {
        if !self.is_valid_at(at) {
            return None;
        }
        self.source.map_onto(input, &self.target)
    }
}

/// Provides the values for a mapping between one or more components.
///
/// For instance, the local currency `LC` maps to `EUR` when the country is
/// `DE` and to `CHF` when it is `CH`:
///
/// ```rust
/// use sdmx_models::MultipleValueMap;
///
/// let de = MultipleValueMap::new(vec!["DE".into(), "LC".into()], vec!["EUR".to_string()]);
/// assert_eq!(de.apply(&["DE", "LC"], None), Some(vec!["EUR".to_string()]));
/// assert_eq!(de.apply(&["CH", "LC"], None), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MultipleValueMap {
    /// One or more source values
    pub source: Vec<SourceValue>,

    /// One or more target values
    pub target: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
}

impl MultipleValueMap {
    pub fn new(source: Vec<SourceValue>, target: Vec<String>) -> Self {
        Self {
            source,
            target,
            valid_from: None,
            valid_to: None,
        }
    }

    pub fn with_validity(
        mut self,
        valid_from: Option<DateTime<Utc>>,
        valid_to: Option<DateTime<Utc>>,
    ) -> Self {
        self.valid_from = valid_from;
        self.valid_to = valid_to;
        self
    }

    pub fn is_valid_at(&self, at: Option<DateTime<Utc>>) -> bool {
        valid_at(self.valid_from, self.valid_to, at)
    }

    /// The target values when every input matches its source value at `at`
    pub fn apply(&self, inputs: &[&str], at: Option<DateTime<Utc>>) -> Option<Vec<String>> {
        if inputs.len() != self.source.len() || !self.is_valid_at(at) {
            return None;
        }
        let all_match = self
            .source
            .iter()
            .zip(inputs)
            .all(|(source, input)| source.matches(input));
        all_match.then(|| self.target.clone())
    }
}

/// Maps a source component to a target component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ComponentMapper {
    /// The source component
    pub source: String,

    /// The target component
    pub target: String,

    /// The mapped values
    #[serde(default)]
    pub values: Vec<ValueMap>,
}

impl ComponentMapper {
    pub fn new(source: impl Into<String>, target: impl Into<String>, values: Vec<ValueMap>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            values,
        }
    }

    /// Map a source value using the first value map that applies
    pub fn map_value(&self, input: &str, at: Option<DateTime<Utc>>) -> Option<String> {
        self.values.iter().find_map(|vm| vm.apply(input, at))
    }
}

/// Maps one or more source components to one or more target components
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MultipleComponentMapper {
    pub source: Vec<String>,
    pub target: Vec<String>,
    #[serde(default)]
    pub values: Vec<MultipleValueMap>,
}

impl MultipleComponentMapper {
    pub fn new(source: Vec<String>, target: Vec<String>, values: Vec<MultipleValueMap>) -> Self {
        Self {
            source,
            target,
            values,
        }
    }

    pub fn map_values(&self, inputs: &[&str], at: Option<DateTime<Utc>>) -> Option<Vec<String>> {
        self.values.iter().find_map(|vm| vm.apply(inputs, at))
    }
}

/// Whether the frequency of a date pattern map is a fixed code or a reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePatternType {
    /// `frequency` is a code from the frequency codelist (e.g. `A`)
    #[default]
    Fixed,
    /// `frequency` references a component of the target structure (e.g. `FREQ`)
    Variable,
}

/// A mapping based on a date pattern.
///
/// E.g. a source `DATE` component holding values such as `Sep 23` mapped to
/// monthly ISO 8601 periods in `TIME_PERIOD` uses the pattern `MMM yy` and
/// frequency `M`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DatePatternMap {
    pub source: String,
    pub target: String,

    /// Describes the source date (years, months, days, ...)
    pub pattern: String,

    /// A frequency code or a reference to the component holding it
    pub frequency: String,

    /// The map id, as defined in the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Locale used to parse the input according to the pattern
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub pattern_type: DatePatternType,
}

fn default_locale() -> String {
    "en".to_string()
}

impl DatePatternMap {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        pattern: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            pattern: pattern.into(),
            frequency: frequency.into(),
            id: None,
            locale: default_locale(),
            pattern_type: DatePatternType::Fixed,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_pattern_type(mut self, pattern_type: DatePatternType) -> Self {
        self.pattern_type = pattern_type;
        self
    }
}

/// Structure in which a component with a fixed value is located
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Source,
    #[default]
    Target,
}

/// Sets a component to a fixed value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedValueMap {
    pub target: String,
    pub value: Value,
    #[serde(default)]
    pub located_in: Location,
}

impl FixedValueMap {
    pub fn new(target: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
            located_in: Location::Target,
        }
    }

    pub fn located_in(mut self, location: Location) -> Self {
        self.located_in = location;
        self
    }
}

/// Copies the source value as-is to the target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ImplicitMapper {
    pub source: String,
    pub target: String,
}

impl ImplicitMapper {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Maps a source structure to a target structure, with rules grouped by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MappingDefinition {
    #[serde(default)]
    pub component_maps: Vec<ComponentMapper>,
    #[serde(default)]
    pub date_maps: Vec<DatePatternMap>,
    #[serde(default)]
    pub fixed_value_maps: Vec<FixedValueMap>,
    #[serde(default)]
    pub implicit_maps: Vec<ImplicitMapper>,
    #[serde(default)]
    pub multiple_component_maps: Vec<MultipleComponentMapper>,
}

impl MappingDefinition {
    /// Total number of rules across all kinds
    pub fn len(&self) -> usize {
        self.component_maps.len()
            + self.date_maps.len()
            + self.fixed_value_maps.len()
            + self.implicit_maps.len()
            + self.multiple_component_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Component maps whose target is `component`
    pub fn component_maps_for<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = &'a ComponentMapper> + 'a {
        self.component_maps
            .iter()
            .filter(move |m| m.target == component)
    }
}

/// Maps the codes of one or more source lists to those of one or more target lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepresentationMap {
    pub id: String,
    pub agency: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URNs (or value types) of the source representations
    #[serde(default)]
    pub source: Vec<String>,

    /// URNs (or value types) of the target representations
    #[serde(default)]
    pub target: Vec<String>,

    #[serde(default)]
    pub maps: Vec<ValueMap>,
}

impl RepresentationMap {
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValueMap> {
        self.maps.iter()
    }

    /// Map a source code using the first value map that applies at `at`
    pub fn map_value(&self, input: &str, at: Option<DateTime<Utc>>) -> Option<String> {
        self.maps.iter().find_map(|vm| vm.apply(input, at))
    }
}

impl<'a> IntoIterator for &'a RepresentationMap {
    type Item = &'a ValueMap;
    type IntoIter = std::slice::Iter<'a, ValueMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_literal_source_matches_exactly() {
        let vm = ValueMap::new("BE", "BEL");
        assert_eq!(vm.apply("BE", None).as_deref(), Some("BEL"));
        assert_eq!(vm.apply("BEL", None), None);
    }

    #[test]
    fn test_pattern_source_expands_groups() {
        let vm = ValueMap::new(SourceValue::pattern("A([0-9]{2})").unwrap(), "Y$1");
        assert_eq!(vm.apply("A99", None).as_deref(), Some("Y99"));
        // Patterns are anchored on both ends
        assert_eq!(vm.apply("XA99", None), None);
        assert_eq!(vm.apply("A999", None), None);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = SourceValue::pattern("A(").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "A("));
    }

    #[test]
    fn test_validity_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2003, 7, 23, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2006, 6, 1, 0, 0, 0).unwrap();
        let vm = ValueMap::new("SCG", "CS").with_validity(Some(from), Some(to));

        assert!(vm.is_valid_at(Some(from)));
        assert!(vm.is_valid_at(Some(to)));
        assert!(vm.is_valid_at(None));
        assert!(!vm.is_valid_at(Some(Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap())));
    }

    #[test]
    fn test_literal_and_pattern_are_not_equal() {
        let literal = SourceValue::literal("A.*");
        let pattern = SourceValue::pattern("A.*").unwrap();
        assert_ne!(literal, pattern);
        assert_eq!(pattern, SourceValue::pattern("A.*").unwrap());
    }

    #[test]
    fn test_source_value_serde() {
        let pattern = SourceValue::pattern("^A").unwrap();
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json, serde_json::json!({"pattern": "^A"}));

        let literal: SourceValue = serde_json::from_value(serde_json::json!("AR")).unwrap();
        assert_eq!(literal, "AR");

        let back: SourceValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn test_multiple_value_map_requires_all_inputs() {
        let t1 = Utc.with_ymd_and_hms(1998, 12, 31, 23, 59, 59).unwrap();
        let t2 = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let dem = MultipleValueMap::new(vec!["DE".into(), "LC".into()], vec!["DEM".into()])
            .with_validity(None, Some(t1));
        let eur = MultipleValueMap::new(vec!["DE".into(), "LC".into()], vec!["EUR".into()])
            .with_validity(Some(t2), None);
        let mapper = MultipleComponentMapper::new(
            vec!["COUNTRY".into(), "CURRENCY".into()],
            vec!["CURRENCY".into()],
            vec![dem, eur],
        );

        assert_eq!(mapper.map_values(&["DE", "LC"], Some(t1)), Some(vec!["DEM".to_string()]));
        assert_eq!(mapper.map_values(&["DE", "LC"], Some(t2)), Some(vec!["EUR".to_string()]));
        assert_eq!(mapper.map_values(&["DE"], Some(t2)), None);
    }

    #[test]
    fn test_mapping_definition_defaults_empty() {
        let md = MappingDefinition::default();
        assert!(md.is_empty());

        let md = MappingDefinition {
            implicit_maps: vec![ImplicitMapper::new("OBS_CONF", "CONF_STATUS")],
            fixed_value_maps: vec![FixedValueMap::new("CONF_STATUS", "F")],
            ..Default::default()
        };
        assert_eq!(md.len(), 2);
        assert_eq!(md.fixed_value_maps[0].located_in, Location::Target);
    }

    #[test]
    fn test_date_pattern_map_defaults() {
        let dm = DatePatternMap::new("DATE", "TIME_PERIOD", "MMM yy", "M");
        assert_eq!(dm.locale, "en");
        assert_eq!(dm.pattern_type, DatePatternType::Fixed);

        let json = serde_json::json!({
            "source": "DATE",
            "target": "TIME_PERIOD",
            "pattern": "MMM yy",
            "frequency": "FREQ",
            "pattern_type": "variable"
        });
        let parsed: DatePatternMap = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.locale, "en");
        assert_eq!(parsed.pattern_type, DatePatternType::Variable);
    }
}
