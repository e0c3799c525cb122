//! Statement templates

use crate::types::Resource;

/// Actions taken when an insert conflicts with an existing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictActions {
    /// Raw `SET` fragments, e.g. `"battery_pct = EXCLUDED.battery_pct"`
    List(Vec<String>),
    /// Column to expression assignments, rendered `col = expr` in order
    Map(Vec<(String, String)>),
}

impl ConflictActions {
    fn render(&self) -> String {
        match self {
            ConflictActions::List(fragments) => fragments.join(","),
            ConflictActions::Map(assignments) => assignments
                .iter()
                .map(|(column, expr)| format!("{column} = {expr}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// An `ON CONFLICT <condition> DO UPDATE SET <actions>` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict {
    /// Conflict target, e.g. `"(provider_id, trip_id)"`
    pub condition: String,
    /// Update actions
    pub actions: ConflictActions,
}

impl OnConflict {
    /// Update with raw `SET` fragments
    pub fn with_fragments<I, S>(condition: impl Into<String>, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            condition: condition.into(),
            actions: ConflictActions::List(fragments.into_iter().map(Into::into).collect()),
        }
    }

    /// Update with `column = expression` assignments
    pub fn with_assignments<I, K, V>(condition: impl Into<String>, assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            condition: condition.into(),
            actions: ConflictActions::Map(
                assignments
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Render the conflict clause: `DO NOTHING` unless an update is given
pub fn on_conflict_statement(on_conflict: Option<&OnConflict>) -> String {
    match on_conflict {
        Some(directive) => format!(
            "ON CONFLICT {} DO UPDATE SET {}",
            directive.condition,
            directive.actions.render()
        ),
        None => "ON CONFLICT DO NOTHING".to_string(),
    }
}

// ============================================================================
// Destination Schemas
// ============================================================================

/// (destination column, select expression over the staging table)
type Column = (&'static str, &'static str);

const STATUS_CHANGES_COLUMNS: &[Column] = &[
    ("provider_id", "cast(provider_id as uuid)"),
    ("provider_name", "provider_name"),
    ("device_id", "cast(device_id as uuid)"),
    ("vehicle_id", "vehicle_id"),
    ("vehicle_type", "cast(vehicle_type as vehicle_types)"),
    ("propulsion_type", "cast(propulsion_type as propulsion_types[])"),
    ("event_type", "cast(event_type as event_types)"),
    ("event_type_reason", "cast(event_type_reason as event_type_reasons)"),
    ("event_time", "to_timestamp(event_time) at time zone 'UTC'"),
    ("event_location", "cast(event_location as json)"),
    ("battery_pct", "battery_pct"),
    ("associated_trips", "cast(associated_trips as uuid[])"),
];

const TRIPS_COLUMNS: &[Column] = &[
    ("provider_id", "cast(provider_id as uuid)"),
    ("provider_name", "provider_name"),
    ("device_id", "cast(device_id as uuid)"),
    ("vehicle_id", "vehicle_id"),
    ("vehicle_type", "cast(vehicle_type as vehicle_types)"),
    ("propulsion_type", "cast(propulsion_type as propulsion_types[])"),
    ("trip_id", "cast(trip_id as uuid)"),
    ("trip_duration", "trip_duration"),
    ("trip_distance", "trip_distance"),
    ("route", "cast(route as json)"),
    ("accuracy", "accuracy"),
    ("start_time", "to_timestamp(start_time) at time zone 'UTC'"),
    ("end_time", "to_timestamp(end_time) at time zone 'UTC'"),
    ("parking_verification_url", "parking_verification_url"),
    ("standard_cost", "standard_cost"),
    ("actual_cost", "actual_cost"),
];

fn columns(resource: Resource) -> &'static [Column] {
    match resource {
        Resource::StatusChanges => STATUS_CHANGES_COLUMNS,
        Resource::Trips => TRIPS_COLUMNS,
    }
}

/// `INSERT INTO` statement copying `source` into the table for `resource`.
///
/// `dest` defaults to the resource name.
pub fn insert_from(
    resource: Resource,
    source: &str,
    dest: Option<&str>,
    on_conflict: Option<&OnConflict>,
) -> String {
    let dest = dest.unwrap_or(resource.as_str());
    let columns = columns(resource);

    let names = columns
        .iter()
        .map(|(name, _)| format!("    {name}"))
        .collect::<Vec<_>>()
        .join(",\n");
    let selects = columns
        .iter()
        .map(|(_, expr)| format!("    {expr}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "INSERT INTO \"{dest}\"\n(\n{names}\n)\nSELECT\n{selects}\nFROM \"{source}\"\n{}\n;",
        on_conflict_statement(on_conflict)
    )
}

/// `INSERT INTO` statement copying `source` into the status changes table
pub fn insert_status_changes_from(
    source: &str,
    dest: Option<&str>,
    on_conflict: Option<&OnConflict>,
) -> String {
    insert_from(Resource::StatusChanges, source, dest, on_conflict)
}

/// `INSERT INTO` statement copying `source` into the trips table
pub fn insert_trips_from(
    source: &str,
    dest: Option<&str>,
    on_conflict: Option<&OnConflict>,
) -> String {
    insert_from(Resource::Trips, source, dest, on_conflict)
}
