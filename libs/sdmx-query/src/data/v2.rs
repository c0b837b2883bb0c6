//! Rendering for SDMX-REST 2.x
//!
//! Path: `/data/{context}/{agency}/{resource}/{version}/{key}`. Wildcard and
//! latest tokens are kept as `*` and `~`, lists are comma-joined, and
//! attributes and measures are independent parameters.

use super::{with_query_string, DataContext, DataQuery};
use crate::selection::Selection;

fn join(selection: &Selection) -> String {
    selection.join_with(|v| v)
}

fn component_params(query: &DataQuery) -> Vec<String> {
    query
        .components()
        .iter()
        .map(|(id, values)| format!("c[{}]={}", id, join(values)))
        .collect()
}

pub(super) fn full_url(query: &DataQuery) -> String {
    let path = format!(
        "/data/{}/{}/{}/{}/{}",
        query.context(),
        join(query.agency_id()),
        join(query.resource_id()),
        join(query.version()),
        join(query.key()),
    );

    let mut params = component_params(query);
    params.extend(query.filter_params());
    params.push(format!("attributes={}", join(query.attributes())));
    params.push(format!("measures={}", join(query.measures())));
    params.push(format!("includeHistory={}", query.include_history()));

    with_query_string(path, params)
}

/// Each segment is rendered when it, or any more specific segment, differs
/// from the default; defaulted segments in between render as `*`.
pub(super) fn short_path(query: &DataQuery) -> String {
    let segments = [
        (query.context().to_string(), query.context() != DataContext::All),
        (join(query.agency_id()), !query.agency_id().is_all()),
        (join(query.resource_id()), !query.resource_id().is_all()),
        (join(query.version()), !query.version().is_all()),
        (join(query.key()), !query.key().is_all()),
    ];

    let mut path = String::new();
    let mut needed = false;
    for (value, explicit) in segments.into_iter().rev() {
        needed |= explicit;
        if needed {
            path = format!("/{}{}", value, path);
        }
    }

    format!("/data{}", path)
}

pub(super) fn short_url(query: &DataQuery) -> String {
    let mut params = component_params(query);
    params.extend(query.filter_params());
    if !query.attributes().is("dsd") {
        params.push(format!("attributes={}", join(query.attributes())));
    }
    if !query.measures().is("all") {
        params.push(format!("measures={}", join(query.measures())));
    }
    if query.include_history() {
        params.push("includeHistory=true".to_string());
    }

    with_query_string(short_path(query), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_path_all_defaults() {
        assert_eq!(short_path(&DataQuery::default()), "/data");
    }

    #[test]
    fn test_short_path_fills_intervening_wildcards() {
        let q = DataQuery::builder().key("A.USD").build();
        assert_eq!(short_path(&q), "/data/*/*/*/*/A.USD");

        let q = DataQuery::builder().agency_id("BIS").build();
        assert_eq!(short_path(&q), "/data/*/BIS");

        let q = DataQuery::builder()
            .context(DataContext::Dataflow)
            .version("~")
            .build();
        assert_eq!(short_path(&q), "/data/dataflow/*/*/~");
    }

    #[test]
    fn test_lists_are_comma_joined() {
        let q = DataQuery::builder()
            .context(DataContext::Dataflow)
            .agency_id(["BIS", "ECB"])
            .resource_id("CPI")
            .key(["A.USD", "M.USD"])
            .build();
        assert_eq!(
            full_url(&q),
            "/data/dataflow/BIS,ECB/CPI/*/A.USD,M.USD?attributes=dsd&measures=all&includeHistory=false"
        );
    }

    #[test]
    fn test_component_filters_come_first() {
        let q = DataQuery::builder()
            .component("REF_AREA", ["CH", "DE"])
            .component("FREQ", "A")
            .last_n_obs(1)
            .build();
        assert_eq!(
            short_url(&q),
            "/data?c[FREQ]=A&c[REF_AREA]=CH,DE&lastNObservations=1"
        );
    }
}
