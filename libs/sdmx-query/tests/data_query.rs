use chrono::{TimeZone, Utc};
use sdmx_query::{ApiVersion, DataContext, DataQuery, Detail, Error};

fn v1_versions() -> impl Iterator<Item = ApiVersion> {
    ApiVersion::ALL.into_iter().filter(|v| !v.is_v2())
}

fn v2_versions() -> impl Iterator<Item = ApiVersion> {
    ApiVersion::ALL.into_iter().filter(|v| v.is_v2())
}

fn cpi() -> DataQuery {
    DataQuery::builder()
        .context(DataContext::Dataflow)
        .agency_id("BIS")
        .resource_id("CPI")
        .version("1.0")
        .key("A.USD")
        .build()
}

#[test]
fn test_v2_full_url() {
    for version in v2_versions() {
        assert_eq!(
            cpi().get_url(version, false).unwrap(),
            "/data/dataflow/BIS/CPI/1.0/A.USD?attributes=dsd&measures=all&includeHistory=false"
        );
    }
}

#[test]
fn test_v1_full_url() {
    for version in v1_versions() {
        assert_eq!(
            cpi().get_url(version, false).unwrap(),
            "/data/BIS,CPI,1.0/A.USD?detail=full&includeHistory=false"
        );
    }
}

#[test]
fn test_short_urls() {
    assert_eq!(
        cpi().get_url(ApiVersion::V2_1_0, true).unwrap(),
        "/data/dataflow/BIS/CPI/1.0/A.USD"
    );
    assert_eq!(
        cpi().get_url(ApiVersion::V1_5_0, true).unwrap(),
        "/data/BIS,CPI,1.0/A.USD"
    );
}

#[test]
fn test_context_segment_only_from_v2() {
    let query = DataQuery::builder()
        .context(DataContext::Dataflow)
        .resource_id("CPI")
        .build();

    for version in ApiVersion::ALL {
        let url = query.get_url(version, false).unwrap();
        assert_eq!(url.starts_with("/data/dataflow/"), version.is_v2(), "{url}");
    }
}

#[test]
fn test_default_query_validates() {
    let query = DataQuery::default();
    assert!(query.validate().is_ok());
    for version in ApiVersion::ALL {
        assert!(query.validate_for(version).is_ok(), "{version}");
    }
    for version in v2_versions() {
        assert_eq!(query.get_url(version, true).unwrap(), "/data");
        assert_eq!(
            query.get_url(version, false).unwrap(),
            "/data/*/*/*/*/*?attributes=dsd&measures=all&includeHistory=false"
        );
    }
}

#[test]
fn test_pre_v2_requires_dataflow() {
    for version in v1_versions() {
        let err = DataQuery::default().get_url(version, false).unwrap_err();
        assert!(matches!(err, Error::MissingDataflow { .. }));
        assert_eq!(err.status(), 422);
    }
}

#[test]
fn test_pre_v2_rejects_multiple_values() {
    let queries = [
        ("agency", DataQuery::builder().resource_id("CPI").agency_id(["BIS", "ECB"]).build()),
        ("resource", DataQuery::builder().resource_id(["CPI", "PPI"]).build()),
        ("version", DataQuery::builder().resource_id("CPI").version(["1.0", "2.0"]).build()),
        ("key", DataQuery::builder().resource_id("CPI").key(["A.USD", "M.USD"]).build()),
    ];

    for (expected, query) in queries {
        for version in v1_versions() {
            let err = query.get_url(version, false).unwrap_err();
            assert!(
                matches!(err, Error::MultipleValues { field, .. } if field == expected),
                "{expected}: {err}"
            );
            assert_eq!(err.status(), 422);
        }
        for version in v2_versions() {
            assert!(query.get_url(version, false).is_ok());
        }
    }
}

#[test]
fn test_pre_v2_rejects_structure_contexts() {
    for context in [DataContext::DataStructure, DataContext::ProvisionAgreement] {
        let query = DataQuery::builder().context(context).resource_id("CPI").build();
        let err = query.get_url(ApiVersion::V1_4_0, true).unwrap_err();
        assert!(matches!(err, Error::UnsupportedContext { .. }));
        assert!(query.get_url(ApiVersion::V2_0_0, true).is_ok());
    }
}

#[test]
fn test_pre_v2_detail_is_total() {
    let attributes = ["dsd", "none", "series", "all", "msd", "OBS_STATUS"];
    let measures = ["all", "none", "OBS_VALUE", "OBS_CONF"];

    for a in attributes {
        for m in measures {
            let query = DataQuery::builder()
                .resource_id("CPI")
                .attributes(a)
                .measures(m)
                .build();
            let result = query.get_url(ApiVersion::V1_5_0, false);

            match Detail::from_selection(query.attributes(), query.measures()) {
                Some(detail) => {
                    let url = result.unwrap();
                    assert!(url.contains(&format!("detail={}", detail)), "{url}");
                }
                None => {
                    let err = result.unwrap_err();
                    assert!(matches!(err, Error::InvalidDetail { .. }), "{a}/{m}");
                    assert_eq!(err.status(), 422);
                }
            }
        }
    }
}

#[test]
fn test_detail_values_in_urls() {
    let query = DataQuery::builder()
        .resource_id("CPI")
        .attributes("series")
        .measures("none")
        .build();
    assert_eq!(
        query.get_url(ApiVersion::V1_3_0, true).unwrap(),
        "/data/CPI?detail=serieskeysonly"
    );
    assert_eq!(
        query.get_url(ApiVersion::V2_0_0, true).unwrap(),
        "/data/*/*/CPI?attributes=series&measures=none"
    );
}

#[test]
fn test_observation_filters() {
    let query = DataQuery::builder()
        .context(DataContext::Dataflow)
        .agency_id("ECB")
        .resource_id("EXR")
        .updated_after(Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap())
        .first_n_obs(2)
        .last_n_obs(3)
        .obs_dimension("TIME_PERIOD")
        .include_history(true)
        .build();

    assert_eq!(
        query.get_url(ApiVersion::V2_0_0, true).unwrap(),
        "/data/dataflow/ECB/EXR?updatedAfter=2024-01-31T10:00:00Z&firstNObservations=2\
         &lastNObservations=3&dimensionAtObservation=TIME_PERIOD&includeHistory=true"
    );
    assert_eq!(
        query.get_url(ApiVersion::V1_5_0, false).unwrap(),
        "/data/ECB,EXR,latest/all?updatedAfter=2024-01-31T10:00:00Z&firstNObservations=2\
         &lastNObservations=3&dimensionAtObservation=TIME_PERIOD&detail=full&includeHistory=true"
    );
}

#[test]
fn test_component_filters_are_v2_only() {
    let query = DataQuery::builder()
        .resource_id("EXR")
        .component("CURRENCY", ["USD", "CHF"])
        .build();

    assert_eq!(
        query.get_url(ApiVersion::V2_1_0, true).unwrap(),
        "/data/*/*/EXR?c[CURRENCY]=USD,CHF"
    );
    let err = query.get_url(ApiVersion::V1_5_0, true).unwrap_err();
    assert!(matches!(err, Error::UnsupportedComponents { .. }));
}

#[test]
fn test_schema_errors_take_precedence() {
    let query = DataQuery::builder().resource_id("CPI").last_n_obs(0).build();
    for version in ApiVersion::ALL {
        let err = query.get_url(version, false).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)), "{version}: {err}");
        assert_eq!(err.title(), "Invalid Schema Query");
    }
}

#[test]
fn test_from_url_with_endpoint() {
    let query = DataQuery::from_url(
        "https://stats.bis.org/api/v1/data/BIS,CPI,1.0/A.USD?detail=dataonly",
        ApiVersion::V1_5_0,
    )
    .unwrap();

    assert!(query.agency_id().is("BIS"));
    assert!(query.key().is("A.USD"));
    assert!(query.attributes().is("none"));
    assert!(query.measures().is("all"));
}

#[test]
fn test_serde_json_round_trip() {
    let query = DataQuery::builder()
        .context(DataContext::Dataflow)
        .resource_id(["CPI", "PPI"])
        .component("FREQ", "A")
        .last_n_obs(1)
        .build();

    let json = serde_json::to_string(&query).unwrap();
    let decoded: DataQuery = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, query);

    let partial: DataQuery = serde_json::from_str(r#"{"resource_id": "CPI"}"#).unwrap();
    assert_eq!(partial, DataQuery::builder().resource_id("CPI").build());
}

#[test]
fn test_schema_errors_name_the_field() {
    let first = DataQuery::builder().resource_id("CPI").first_n_obs(0).build();
    let last = DataQuery::builder().resource_id("CPI").last_n_obs(0).build();
    let attributes = DataQuery::builder().resource_id("CPI").attributes("1BAD").build();
    let dimension = DataQuery::builder().resource_id("CPI").obs_dimension("1BAD").build();

    let messages: Vec<String> = [first, last, attributes, dimension]
        .iter()
        .map(|q| q.get_url(ApiVersion::V2_0_0, false).unwrap_err().to_string())
        .collect();

    assert!(messages[0].contains("$.first_n_obs"), "{}", messages[0]);
    assert!(messages[1].contains("$.last_n_obs"), "{}", messages[1]);
    assert!(messages[2].contains("$.attributes"), "{}", messages[2]);
    assert!(messages[2].contains("'1BAD'"), "{}", messages[2]);
    assert!(messages[3].contains("$.obs_dimension"), "{}", messages[3]);
    assert_ne!(messages[0], messages[1]);
}
