//! Common types used throughout the MDS client
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query string parameters, ordered by name so requests are reproducible
pub type QueryParams = BTreeMap<String, QueryValue>;

// ============================================================================
// Resources
// ============================================================================

/// The resource types exposed by an MDS Provider API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Vehicle status change events
    StatusChanges,
    /// Trip records
    Trips,
}

impl Resource {
    /// All known resources
    pub const ALL: [Resource; 2] = [Resource::StatusChanges, Resource::Trips];

    /// Endpoint name, also the key of the payload array under `data`
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::StatusChanges => "status_changes",
            Resource::Trips => "trips",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "status_changes" => Ok(Resource::StatusChanges),
            "trips" => Ok(Resource::Trips),
            other => Err(crate::error::Error::config(format!(
                "Unknown resource '{other}', expected one of: status_changes, trips"
            ))),
        }
    }
}

// ============================================================================
// Query Values
// ============================================================================

/// A scalar query string value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Integer value (timestamps, counts)
    Int(i64),
    /// String value (identifiers, free-form filters)
    Str(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

/// Flatten query params into the string pairs sent on the wire
pub fn query_pairs(params: &QueryParams) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect()
}

// ============================================================================
// Time Filters
// ============================================================================

/// Numeric representation used to encode datetimes in query strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Unix timestamp (seconds)
    #[default]
    Seconds,
    /// Unix timestamp (milliseconds)
    Milliseconds,
}

impl TimeUnit {
    /// Encode a datetime as a unix-epoch integer in this unit
    pub fn encode(&self, dt: &DateTime<Utc>) -> i64 {
        match self {
            TimeUnit::Seconds => dt.timestamp(),
            TimeUnit::Milliseconds => dt.timestamp_millis(),
        }
    }
}

/// A time-valued filter: either a datetime or an already-encoded integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    /// Datetime, encoded with the client's time unit before sending
    At(DateTime<Utc>),
    /// Raw integer, sent unchanged
    Raw(i64),
}

impl TimeFilter {
    /// Normalize to the integer sent on the wire
    pub fn normalize(&self, unit: TimeUnit) -> i64 {
        match self {
            TimeFilter::At(dt) => unit.encode(dt),
            TimeFilter::Raw(n) => *n,
        }
    }
}

impl From<DateTime<Utc>> for TimeFilter {
    fn from(value: DateTime<Utc>) -> Self {
        TimeFilter::At(value)
    }
}

impl From<i64> for TimeFilter {
    fn from(value: i64) -> Self {
        TimeFilter::Raw(value)
    }
}

impl FromStr for TimeFilter {
    type Err = crate::error::Error;

    /// Parse an RFC 3339 datetime or a raw integer
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Ok(TimeFilter::Raw(n));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| TimeFilter::At(dt.with_timezone(&Utc)))
            .map_err(|e| {
                crate::error::Error::config(format!(
                    "Invalid time '{s}': expected RFC 3339 or integer ({e})"
                ))
            })
    }
}
