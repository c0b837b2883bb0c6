//! Validation and rendering for SDMX-REST 1.x
//!
//! Path: `/data/{agency},{resource},{version}/{key}`. The 1.x family has no
//! context segment, no lists, uses the `all` and `latest` keywords instead of
//! `*` and `~`, and collapses attributes and measures into `detail`.

use super::{with_query_string, DataQuery, Detail};
use crate::error::{Error, Result};
use crate::selection::{v1_keyword, Selection};
use crate::version::ApiVersion;

fn keywords(selection: &Selection) -> String {
    selection.join_with(v1_keyword)
}

fn check_single(field: &'static str, selection: &Selection, version: ApiVersion) -> Result<()> {
    if selection.is_multiple() {
        return Err(Error::MultipleValues {
            field,
            values: selection.to_string(),
            version,
        });
    }
    Ok(())
}

pub(super) fn validate(query: &DataQuery, version: ApiVersion) -> Result<()> {
    if !query.context().is_supported_by(version) {
        return Err(Error::UnsupportedContext {
            context: query.context(),
            version,
        });
    }

    check_single("agency", query.agency_id(), version)?;
    check_single("resource", query.resource_id(), version)?;
    check_single("version", query.version(), version)?;
    check_single("key", query.key(), version)?;

    if !query.components().is_empty() {
        let components = query
            .components()
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::UnsupportedComponents {
            components,
            version,
        });
    }

    detail(query, version).map(|_| ())
}

/// A 1.x URL always names a dataflow
pub(super) fn check_resource(query: &DataQuery, version: ApiVersion) -> Result<()> {
    if query.resource_id().is_all() {
        return Err(Error::MissingDataflow { version });
    }
    Ok(())
}

pub(super) fn detail(query: &DataQuery, version: ApiVersion) -> Result<Detail> {
    Detail::from_selection(query.attributes(), query.measures()).ok_or_else(|| {
        Error::InvalidDetail {
            attributes: query.attributes().to_string(),
            measures: query.measures().to_string(),
            version,
        }
    })
}

pub(super) fn full_url(query: &DataQuery, version: ApiVersion) -> Result<String> {
    // A 1.x flow reference without a version means the latest one
    let flow_version = if query.version().is_all() {
        "latest".to_string()
    } else {
        keywords(query.version())
    };
    let path = format!(
        "/data/{},{},{}/{}",
        keywords(query.agency_id()),
        keywords(query.resource_id()),
        flow_version,
        keywords(query.key()),
    );

    let mut params = query.filter_params();
    params.push(format!("detail={}", detail(query, version)?));
    params.push(format!("includeHistory={}", query.include_history()));

    Ok(with_query_string(path, params))
}

pub(super) fn short_path(query: &DataQuery) -> String {
    let versioned = !query.version().is_all();

    let mut flow = keywords(query.resource_id());
    if versioned {
        flow = format!("{},{}", flow, keywords(query.version()));
    }
    if versioned || !query.agency_id().is_all() {
        flow = format!("{},{}", keywords(query.agency_id()), flow);
    }

    if query.key().is_all() {
        format!("/data/{}", flow)
    } else {
        format!("/data/{}/{}", flow, keywords(query.key()))
    }
}

pub(super) fn short_url(query: &DataQuery, version: ApiVersion) -> Result<String> {
    let mut params = query.filter_params();
    let detail = detail(query, version)?;
    if detail != Detail::Full {
        params.push(format!("detail={}", detail));
    }
    if query.include_history() {
        params.push("includeHistory=true".to_string());
    }

    Ok(with_query_string(short_path(query), params))
}
