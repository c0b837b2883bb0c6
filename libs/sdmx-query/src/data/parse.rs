//! Parsing of data query URLs back into [`DataQuery`] values

use super::{DataContext, DataQuery, DataQueryBuilder, Detail};
use crate::error::{Error, Result};
use crate::selection::{from_v1_keyword, Selection};
use crate::version::ApiVersion;
use chrono::{DateTime, Utc};

struct UrlParser<'a> {
    url: &'a str,
    version: ApiVersion,
}

impl<'a> UrlParser<'a> {
    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidUrl {
            url: self.url.to_string(),
            reason: reason.into(),
        }
    }

    fn decode(&self, raw: &str) -> Result<String> {
        urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .map_err(|e| self.invalid(format!("'{}' is not valid UTF-8: {}", raw, e)))
    }

    /// Raw path segments and the raw query string
    fn split(&self) -> (Vec<&'a str>, Option<&'a str>) {
        let url: &'a str = self.url;
        let without_origin = match url.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
            None => url,
        };
        let (path, query_string) = match without_origin.split_once('?') {
            Some((path, qs)) => (path, Some(qs)),
            None => (without_origin, None),
        };

        let segments = path.split('/').filter(|s| !s.is_empty()).collect();
        (segments, query_string)
    }

    /// Parse the segments following one `data` resource segment
    fn parse_from(&self, segments: &[&str], query_string: Option<&str>) -> Result<DataQuery> {
        let segments = segments
            .iter()
            .map(|s| self.decode(s))
            .collect::<Result<Vec<_>>>()?;

        let builder = DataQuery::builder();
        let mut builder = if self.version.is_v2() {
            self.parse_v2_path(builder, &segments)?
        } else {
            self.parse_v1_path(builder, &segments)?
        };

        if let Some(query_string) = query_string {
            builder = self.parse_params(builder, query_string)?;
        }

        Ok(builder.build())
    }

    fn parse_v2_path(&self, mut builder: DataQueryBuilder, segments: &[String]) -> Result<DataQueryBuilder> {
        if segments.len() > 5 {
            return Err(self.invalid(format!(
                "expected at most 5 path segments after 'data', found {}",
                segments.len()
            )));
        }

        let mut parts = segments.iter();
        if let Some(context) = parts.next() {
            let context: DataContext = context.parse().map_err(|e: Error| self.invalid(e.to_string()))?;
            builder = builder.context(context);
        }
        if let Some(agency) = parts.next() {
            builder = builder.agency_id(Selection::parse_list(agency));
        }
        if let Some(resource) = parts.next() {
            builder = builder.resource_id(Selection::parse_list(resource));
        }
        if let Some(version) = parts.next() {
            builder = builder.version(Selection::parse_list(version));
        }
        if let Some(key) = parts.next() {
            builder = builder.key(Selection::parse_list(key));
        }
        Ok(builder)
    }

    fn parse_v1_path(&self, mut builder: DataQueryBuilder, segments: &[String]) -> Result<DataQueryBuilder> {
        if segments.len() > 2 {
            return Err(self.invalid("provider references are not supported"));
        }

        if let Some(flow) = segments.first() {
            let parts: Vec<&str> = flow.split(',').map(from_v1_keyword).collect();
            builder = match parts.as_slice() {
                [resource] => builder.resource_id(*resource),
                [agency, resource] => builder.agency_id(*agency).resource_id(*resource),
                [agency, resource, version] => builder
                    .agency_id(*agency)
                    .resource_id(*resource)
                    .version(*version),
                _ => return Err(self.invalid(format!("'{}' is not a valid flow reference", flow))),
            };
        }
        if let Some(key) = segments.get(1) {
            builder = builder.key(from_v1_keyword(key));
        }
        Ok(builder)
    }

    fn parse_params(&self, mut builder: DataQueryBuilder, query_string: &str) -> Result<DataQueryBuilder> {
        let v2 = self.version.is_v2();

        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (raw_name, raw_value) = pair
                .split_once('=')
                .ok_or_else(|| self.invalid(format!("parameter '{}' has no value", pair)))?;
            let name = self.decode(raw_name)?;
            let value = self.decode(raw_value)?;

            builder = match name.as_str() {
                "updatedAfter" => {
                    let updated_after = DateTime::parse_from_rfc3339(&value)
                        .map_err(|e| self.invalid(format!("updatedAfter '{}': {}", value, e)))?;
                    builder.updated_after(updated_after.with_timezone(&Utc))
                }
                "firstNObservations" => builder.first_n_obs(self.count(&name, &value)?),
                "lastNObservations" => builder.last_n_obs(self.count(&name, &value)?),
                "dimensionAtObservation" => builder.obs_dimension(value),
                "includeHistory" => {
                    let include = value
                        .parse::<bool>()
                        .map_err(|_| self.invalid(format!("includeHistory '{}' is not a boolean", value)))?;
                    builder.include_history(include)
                }
                "attributes" if v2 => builder.attributes(Selection::parse_list(&value)),
                "measures" if v2 => builder.measures(Selection::parse_list(&value)),
                "detail" if !v2 => {
                    let detail: Detail = value.parse().map_err(|e: Error| self.invalid(e.to_string()))?;
                    builder.detail(detail)
                }
                component if v2 && component.starts_with("c[") && component.ends_with(']') => {
                    let id = &component[2..component.len() - 1];
                    builder.component(id, Selection::parse_list(&value))
                }
                other => {
                    return Err(self.invalid(format!(
                        "unsupported parameter '{}' for SDMX-REST {}",
                        other, self.version
                    )))
                }
            };
        }

        Ok(builder)
    }

    fn count(&self, name: &str, value: &str) -> Result<u32> {
        value
            .parse::<u32>()
            .map_err(|_| self.invalid(format!("{} '{}' is not a number", name, value)))
    }
}

/// The endpoint may itself contain a `data` segment, so every `data` segment
/// is tried from the left and the first one that parses wins. When none does,
/// the error for the leftmost one is reported.
pub(super) fn parse_url(url: &str, version: ApiVersion) -> Result<DataQuery> {
    let parser = UrlParser { url, version };
    let (segments, query_string) = parser.split();

    let mut attempts = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == "data")
        .map(|(i, _)| parser.parse_from(&segments[i + 1..], query_string));

    match attempts.next() {
        Some(Ok(query)) => Ok(query),
        Some(Err(e)) => attempts.find_map(Result::ok).ok_or(e),
        None => Err(parser.invalid("missing 'data' resource in path")),
    }
}
