//! Tests for the provider client

use super::*;
use crate::types::{QueryValue, Resource};
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider() -> Provider {
    Provider::with_token("Test", "https://mds.example.test", "token")
}

fn client(version: &str) -> ProviderClient {
    ProviderClient::builder()
        .provider(provider())
        .version(version)
        .build()
        .unwrap()
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_defaults_to_minimum_version() {
    let client = ProviderClient::new(None).unwrap();
    assert_eq!(client.version(), Version::new(0, 2, 0));
    assert_eq!(client.time_unit(), TimeUnit::Seconds);
    assert!(client.provider().is_none());
}

#[test]
fn test_builder_rejects_unsupported_version() {
    let err = ProviderClient::builder().version("0.1.0").build().unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion { .. }));
    assert!(err.to_string().contains("0.1.0"));
}

#[test]
fn test_builder_rejects_malformed_version() {
    let err = ProviderClient::builder().version("latest").build().unwrap_err();
    assert!(matches!(err, Error::InvalidVersion { .. }));
}

#[test]
fn test_builder_time_unit_follows_version() {
    assert_eq!(client("0.2.1").time_unit(), TimeUnit::Seconds);
    assert_eq!(client("0.3.0").time_unit(), TimeUnit::Milliseconds);

    let overridden = ProviderClient::builder()
        .version("0.3.0")
        .time_unit(TimeUnit::Seconds)
        .build()
        .unwrap();
    assert_eq!(overridden.time_unit(), TimeUnit::Seconds);
}

// ============================================================================
// Request Resolution Tests
// ============================================================================

#[test]
fn test_request_without_provider_fails() {
    let client = ProviderClient::new(None).unwrap();

    let err = client.request(&StatusChangesQuery::new()).unwrap_err();
    assert!(matches!(err, Error::MissingProvider));

    assert!(client.trips(&TripsQuery::new()).is_err());
}

#[test]
fn test_request_provider_override_wins() {
    let client = client("0.2.0");
    let other = Provider::with_token("Other", "https://other.example.test", "t");

    let request = client
        .request(&TripsQuery::new().provider(other.clone()))
        .unwrap();
    assert_eq!(request.provider, other);
    assert_eq!(request.resource, Resource::Trips);

    let request = client.request(&TripsQuery::new()).unwrap();
    assert_eq!(request.provider.name, "Test");
}

#[test]
fn test_unset_filters_are_omitted() {
    let request = client("0.2.0")
        .request(&StatusChangesQuery::new().end_time(100))
        .unwrap();

    assert!(!request.params.contains_key("start_time"));
    assert_eq!(request.params.get("end_time"), Some(&QueryValue::Int(100)));
}

#[test]
fn test_raw_time_passes_through_unchanged() {
    let request = client("0.3.0")
        .request(&StatusChangesQuery::new().start_time(1_533_081_600))
        .unwrap();

    assert_eq!(
        request.params.get("start_time"),
        Some(&QueryValue::Int(1_533_081_600))
    );
}

#[test]
fn test_datetime_encoded_per_version() {
    let dt = Utc.with_ymd_and_hms(2018, 8, 1, 0, 0, 0).unwrap();
    let query = TripsQuery::new().min_end_time(dt).max_end_time(dt);

    let seconds = client("0.2.0").request(&query).unwrap();
    assert_eq!(
        seconds.params.get("min_end_time"),
        Some(&QueryValue::Int(1_533_081_600))
    );

    let millis = client("0.3.0").request(&query).unwrap();
    assert_eq!(
        millis.params.get("max_end_time"),
        Some(&QueryValue::Int(1_533_081_600_000))
    );
}

#[test]
fn test_trips_identifier_filters() {
    let request = client("0.2.0")
        .request(&TripsQuery::new().device_id("dev-1").vehicle_id("veh-1"))
        .unwrap();

    assert_eq!(request.params.get("device_id"), Some(&"dev-1".into()));
    assert_eq!(request.params.get("vehicle_id"), Some(&"veh-1".into()));
}

#[test]
fn test_passthrough_params_override_filters() {
    let request = client("0.2.0")
        .request(
            &StatusChangesQuery::new()
                .start_time(10)
                .param("start_time", 20)
                .param("event_type", "available"),
        )
        .unwrap();

    assert_eq!(request.params.get("start_time"), Some(&QueryValue::Int(20)));
    assert_eq!(
        request.params.get("event_type"),
        Some(&QueryValue::Str("available".to_string()))
    );
}

#[test]
fn test_fetch_options_carried_into_request() {
    let request = client("0.2.0")
        .request(
            &TripsQuery::new()
                .paging(false)
                .rate_limit(std::time::Duration::from_secs(2)),
        )
        .unwrap();

    assert!(!request.options.paging);
    assert_eq!(request.options.rate_limit.as_secs(), 2);
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_get_status_changes_end_to_end() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/status_changes"))
        .and(query_param("start_time", "1533081600000"))
        .and(header(
            "Accept",
            "application/vnd.mds.provider+json;version=0.3",
        ))
        .and(header("Authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.3.0",
            "data": { "status_changes": [{"device_id": "a"}] },
            "links": { "next": format!("{uri}/next") },
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.3.0",
            "data": { "status_changes": [{"device_id": "b"}, {"device_id": "c"}] },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProviderClient::builder()
        .provider(Provider::with_token("Test", uri, "token"))
        .version("0.3.0")
        .build()
        .unwrap();

    let start = Utc.with_ymd_and_hms(2018, 8, 1, 0, 0, 0).unwrap();
    let pages = client
        .get_status_changes(&StatusChangesQuery::new().start_time(start))
        .await
        .unwrap();

    let counts: Vec<usize> = pages
        .iter()
        .map(|p| p.payload_len(Resource::StatusChanges))
        .collect();
    assert_eq!(counts, vec![1, 2]);
}

#[tokio::test]
async fn test_trips_stream_is_lazy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.2.0",
            "data": { "trips": [{"trip_id": "t1"}] },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProviderClient::builder()
        .provider(Provider::with_token("Test", server.uri(), "token"))
        .build()
        .unwrap();

    let mut stream = client.trips(&TripsQuery::new()).unwrap();
    let page = stream.next().await.unwrap().unwrap();
    assert_eq!(page.payload_len(Resource::Trips), 1);
    assert!(stream.next().await.is_none());
}
