//! Tests for SQL generation

use super::*;
use crate::types::Resource;
use pretty_assertions::assert_eq;

// ============================================================================
// ON CONFLICT Tests
// ============================================================================

#[test]
fn test_on_conflict_default_does_nothing() {
    assert_eq!(on_conflict_statement(None), "ON CONFLICT DO NOTHING");
}

#[test]
fn test_on_conflict_assignments() {
    let directive = OnConflict::with_assignments(
        "(provider_id, trip_id)",
        [("end_time", "EXCLUDED.end_time"), ("route", "EXCLUDED.route")],
    );

    assert_eq!(
        on_conflict_statement(Some(&directive)),
        "ON CONFLICT (provider_id, trip_id) DO UPDATE SET end_time = EXCLUDED.end_time,route = EXCLUDED.route"
    );
}

#[test]
fn test_on_conflict_fragments() {
    let directive = OnConflict::with_fragments(
        "ON CONSTRAINT unique_event",
        ["battery_pct = EXCLUDED.battery_pct", "event_location = NULL"],
    );

    assert_eq!(
        on_conflict_statement(Some(&directive)),
        "ON CONFLICT ON CONSTRAINT unique_event DO UPDATE SET battery_pct = EXCLUDED.battery_pct,event_location = NULL"
    );
}

// ============================================================================
// INSERT Tests
// ============================================================================

#[test]
fn test_insert_status_changes_from() {
    let sql = insert_status_changes_from("staging_sc", None, None);

    let expected = r#"INSERT INTO "status_changes"
(
    provider_id,
    provider_name,
    device_id,
    vehicle_id,
    vehicle_type,
    propulsion_type,
    event_type,
    event_type_reason,
    event_time,
    event_location,
    battery_pct,
    associated_trips
)
SELECT
    cast(provider_id as uuid),
    provider_name,
    cast(device_id as uuid),
    vehicle_id,
    cast(vehicle_type as vehicle_types),
    cast(propulsion_type as propulsion_types[]),
    cast(event_type as event_types),
    cast(event_type_reason as event_type_reasons),
    to_timestamp(event_time) at time zone 'UTC',
    cast(event_location as json),
    battery_pct,
    cast(associated_trips as uuid[])
FROM "staging_sc"
ON CONFLICT DO NOTHING
;"#;

    assert_eq!(sql, expected);
}

#[test]
fn test_insert_trips_from_with_update() {
    let directive = OnConflict::with_assignments("(trip_id)", [("actual_cost", "EXCLUDED.actual_cost")]);
    let sql = insert_trips_from("staging_trips", Some("trips_2018"), Some(&directive));

    let expected = r#"INSERT INTO "trips_2018"
(
    provider_id,
    provider_name,
    device_id,
    vehicle_id,
    vehicle_type,
    propulsion_type,
    trip_id,
    trip_duration,
    trip_distance,
    route,
    accuracy,
    start_time,
    end_time,
    parking_verification_url,
    standard_cost,
    actual_cost
)
SELECT
    cast(provider_id as uuid),
    provider_name,
    cast(device_id as uuid),
    vehicle_id,
    cast(vehicle_type as vehicle_types),
    cast(propulsion_type as propulsion_types[]),
    cast(trip_id as uuid),
    trip_duration,
    trip_distance,
    cast(route as json),
    accuracy,
    to_timestamp(start_time) at time zone 'UTC',
    to_timestamp(end_time) at time zone 'UTC',
    parking_verification_url,
    standard_cost,
    actual_cost
FROM "staging_trips"
ON CONFLICT (trip_id) DO UPDATE SET actual_cost = EXCLUDED.actual_cost
;"#;

    assert_eq!(sql, expected);
}

#[test]
fn test_insert_from_defaults_dest_to_resource() {
    for resource in Resource::ALL {
        let sql = insert_from(resource, "src", None, None);
        assert!(sql.starts_with(&format!("INSERT INTO \"{resource}\"\n")));
        assert!(sql.contains("FROM \"src\"\n"));
    }
}

#[test]
fn test_table_names_are_not_escaped() {
    let sql = insert_trips_from("a\"b", None, None);
    assert!(sql.contains("FROM \"a\"b\""));
}
