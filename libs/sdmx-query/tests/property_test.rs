//! Property-based tests using QuickCheck

use chrono::{TimeZone, Utc};
use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use sdmx_query::{ApiVersion, DataContext, DataQuery, DataQueryBuilder, Detail, Selection};

fn pick<T: Clone>(g: &mut Gen, values: &[T]) -> T {
    g.choose(values).cloned().unwrap_or_else(|| values[0].clone())
}

fn maybe(g: &mut Gen) -> bool {
    bool::arbitrary(g)
}

fn one_or_many(g: &mut Gen, values: &[&str]) -> Selection {
    let first = pick(g, values);
    if maybe(g) {
        Selection::from(first)
    } else {
        Selection::from([first, pick(g, values)])
    }
}

/// Fields shared by both API families
fn filters(g: &mut Gen, mut builder: DataQueryBuilder) -> DataQueryBuilder {
    if maybe(g) {
        let secs = i64::from(u32::arbitrary(g));
        if let Some(at) = Utc.timestamp_opt(secs, 0).single() {
            builder = builder.updated_after(at);
        }
    }
    if maybe(g) {
        builder = builder.first_n_obs(u32::arbitrary(g).max(1));
    }
    if maybe(g) {
        builder = builder.last_n_obs(u32::arbitrary(g).max(1));
    }
    if maybe(g) {
        builder = builder.obs_dimension(pick(g, &["TIME_PERIOD", "REF_AREA"]));
    }
    builder.include_history(maybe(g))
}

/// A query valid for every 2.x version
#[derive(Debug, Clone)]
struct V2Query(DataQuery);

impl Arbitrary for V2Query {
    fn arbitrary(g: &mut Gen) -> Self {
        let ids = ["*", "BIS", "ECB", "CPI", "EXR"];
        let versions = ["*", "~", "1.0", "2.1.0"];
        let keys = ["*", "A.USD", "M..EUR", "Q.CH"];

        let mut builder = DataQuery::builder().context(pick(
            g,
            &[
                DataContext::All,
                DataContext::Dataflow,
                DataContext::DataStructure,
                DataContext::ProvisionAgreement,
            ],
        ));
        if maybe(g) {
            builder = builder.agency_id(one_or_many(g, &ids));
        }
        if maybe(g) {
            builder = builder.resource_id(one_or_many(g, &ids));
        }
        if maybe(g) {
            builder = builder.version(one_or_many(g, &versions));
        }
        if maybe(g) {
            builder = builder.key(one_or_many(g, &keys));
        }
        if maybe(g) {
            builder = builder.component("FREQ", one_or_many(g, &["A", "M", "Q"]));
        }
        if maybe(g) {
            builder = builder.component("REF_AREA", one_or_many(g, &["CH", "DE", "US"]));
        }
        if maybe(g) {
            builder = builder.attributes(one_or_many(
                g,
                &["dsd", "none", "all", "series", "OBS_STATUS"],
            ));
        }
        if maybe(g) {
            builder = builder.measures(one_or_many(g, &["all", "none", "OBS_VALUE"]));
        }

        V2Query(filters(g, builder).build())
    }
}

/// A query valid for every 1.x version
#[derive(Debug, Clone)]
struct V1Query(DataQuery);

impl Arbitrary for V1Query {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut builder = DataQuery::builder()
            .context(pick(g, &[DataContext::All, DataContext::Dataflow]))
            .resource_id(pick(g, &["CPI", "EXR"]));
        if maybe(g) {
            builder = builder.agency_id(pick(g, &["*", "BIS", "ECB"]));
        }
        if maybe(g) {
            builder = builder.version(pick(g, &["*", "~", "1.0"]));
        }
        if maybe(g) {
            builder = builder.key(pick(g, &["*", "A.USD", "M..EUR"]));
        }
        builder = builder.detail(pick(
            g,
            &[
                Detail::Full,
                Detail::DataOnly,
                Detail::SeriesKeysOnly,
                Detail::NoData,
            ],
        ));

        V1Query(filters(g, builder).build())
    }
}

fn round_trips(query: &DataQuery, version: ApiVersion) -> TestResult {
    let (full, short) = match (query.get_url(version, false), query.get_url(version, true)) {
        (Ok(full), Ok(short)) => (full, short),
        (full, short) => {
            return TestResult::error(format!("{:?} is not renderable: {:?} {:?}", query, full, short))
        }
    };

    match DataQuery::from_url(&short, version).and_then(|q| q.get_url(version, false)) {
        Ok(reparsed) if reparsed == full => TestResult::passed(),
        Ok(reparsed) => TestResult::error(format!("{} parsed back to {}, expected {}", short, reparsed, full)),
        Err(e) => TestResult::error(format!("{}: {}", short, e)),
    }
}

/// Property: the short URL carries the same query as the full URL
#[test]
fn prop_v2_short_url_is_equivalent() {
    fn prop(query: V2Query) -> TestResult {
        let results: Vec<TestResult> = [ApiVersion::V2_0_0, ApiVersion::V2_1_0]
            .into_iter()
            .map(|version| round_trips(&query.0, version))
            .collect();
        results
            .into_iter()
            .find(|r| r.is_failure())
            .unwrap_or_else(TestResult::passed)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(V2Query) -> TestResult);
}

/// Property: the short URL carries the same query as the full URL
#[test]
fn prop_v1_short_url_is_equivalent() {
    fn prop(query: V1Query) -> TestResult {
        let results: Vec<TestResult> = [ApiVersion::V1_0_0, ApiVersion::V1_5_0]
            .into_iter()
            .map(|version| round_trips(&query.0, version))
            .collect();
        results
            .into_iter()
            .find(|r| r.is_failure())
            .unwrap_or_else(TestResult::passed)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(V1Query) -> TestResult);
}

/// Property: the context segment appears exactly for 2.x versions
#[test]
fn prop_context_segment_follows_version() {
    fn prop(query: V1Query) -> bool {
        let query = DataQuery::builder()
            .context(DataContext::Dataflow)
            .resource_id(query.0.resource_id().clone())
            .build();
        ApiVersion::ALL.into_iter().all(|version| {
            query
                .get_url(version, false)
                .map(|url| url.starts_with("/data/dataflow/") == version.is_v2())
                .unwrap_or(false)
        })
    }

    QuickCheck::new()
        .tests(50)
        .quickcheck(prop as fn(V1Query) -> bool);
}

/// Property: schema validation never rejects a generated query
#[test]
fn prop_generated_queries_validate() {
    fn prop(query: V2Query) -> bool {
        query.0.validate().is_ok()
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(V2Query) -> bool);
}
