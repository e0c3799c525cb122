//! Resource query options
//!
//! Typed filters for the two MDS resources. Each query turns into the query
//! string of the first page request; `extra` carries provider-specific
//! filters verbatim.

use crate::pagination::FetchOptions;
use crate::provider::Provider;
use crate::types::{QueryParams, QueryValue, Resource, TimeFilter, TimeUnit};
use std::time::Duration;

/// A query against one MDS resource
pub trait ResourceQuery {
    /// Resource endpoint this query targets
    const RESOURCE: Resource;

    /// Provider override, if any
    fn provider_override(&self) -> Option<&Provider>;

    /// Paging behaviour
    fn fetch_options(&self) -> FetchOptions;

    /// Named filters, with time filters encoded in `unit`
    fn filters(&self, unit: TimeUnit) -> QueryParams;

    /// Passthrough parameters
    fn passthrough(&self) -> &QueryParams;

    /// Named filters merged with the passthrough parameters; on a key
    /// collision the passthrough value wins
    fn params(&self, unit: TimeUnit) -> QueryParams {
        let mut params = self.filters(unit);
        params.extend(self.passthrough().iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

fn insert_time(params: &mut QueryParams, key: &str, value: Option<TimeFilter>, unit: TimeUnit) {
    if let Some(value) = value {
        params.insert(key.to_string(), QueryValue::Int(value.normalize(unit)));
    }
}

fn insert_str(params: &mut QueryParams, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        params.insert(key.to_string(), QueryValue::from(value));
    }
}

// ============================================================================
// Status Changes
// ============================================================================

/// Options for a status changes request
#[derive(Debug, Clone, Default)]
pub struct StatusChangesQuery {
    /// Provider to query instead of the client's default
    pub provider: Option<Provider>,
    /// Events where `event_time` is at or after this time
    pub start_time: Option<TimeFilter>,
    /// Events where `event_time` is before this time
    pub end_time: Option<TimeFilter>,
    /// Paging behaviour
    pub options: FetchOptions,
    /// Additional query parameters
    pub extra: QueryParams,
}

impl StatusChangesQuery {
    /// Create an unfiltered query
    pub fn new() -> Self {
        Self::default()
    }

    /// Query this provider
    #[must_use]
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the start time filter
    #[must_use]
    pub fn start_time(mut self, time: impl Into<TimeFilter>) -> Self {
        self.start_time = Some(time.into());
        self
    }

    /// Set the end time filter
    #[must_use]
    pub fn end_time(mut self, time: impl Into<TimeFilter>) -> Self {
        self.end_time = Some(time.into());
        self
    }

    /// Follow paging (default) or request only the first page
    #[must_use]
    pub fn paging(mut self, paging: bool) -> Self {
        self.options.paging = paging;
        self
    }

    /// Delay between page requests
    #[must_use]
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.options.rate_limit = delay;
        self
    }

    /// Add a passthrough query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ResourceQuery for StatusChangesQuery {
    const RESOURCE: Resource = Resource::StatusChanges;

    fn provider_override(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    fn fetch_options(&self) -> FetchOptions {
        self.options
    }

    fn filters(&self, unit: TimeUnit) -> QueryParams {
        let mut params = QueryParams::new();
        insert_time(&mut params, "start_time", self.start_time, unit);
        insert_time(&mut params, "end_time", self.end_time, unit);
        params
    }

    fn passthrough(&self) -> &QueryParams {
        &self.extra
    }
}

// ============================================================================
// Trips
// ============================================================================

/// Options for a trips request
#[derive(Debug, Clone, Default)]
pub struct TripsQuery {
    /// Provider to query instead of the client's default
    pub provider: Option<Provider>,
    /// Trips taken by this device
    pub device_id: Option<String>,
    /// Trips taken by this vehicle
    pub vehicle_id: Option<String>,
    /// Trips where `end_time` is at or after this time
    pub min_end_time: Option<TimeFilter>,
    /// Trips where `end_time` is before this time
    pub max_end_time: Option<TimeFilter>,
    /// Paging behaviour
    pub options: FetchOptions,
    /// Additional query parameters
    pub extra: QueryParams,
}

impl TripsQuery {
    /// Create an unfiltered query
    pub fn new() -> Self {
        Self::default()
    }

    /// Query this provider
    #[must_use]
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Filter by device
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Filter by vehicle
    #[must_use]
    pub fn vehicle_id(mut self, vehicle_id: impl Into<String>) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self
    }

    /// Set the minimum end time filter
    #[must_use]
    pub fn min_end_time(mut self, time: impl Into<TimeFilter>) -> Self {
        self.min_end_time = Some(time.into());
        self
    }

    /// Set the maximum end time filter
    #[must_use]
    pub fn max_end_time(mut self, time: impl Into<TimeFilter>) -> Self {
        self.max_end_time = Some(time.into());
        self
    }

    /// Follow paging (default) or request only the first page
    #[must_use]
    pub fn paging(mut self, paging: bool) -> Self {
        self.options.paging = paging;
        self
    }

    /// Delay between page requests
    #[must_use]
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.options.rate_limit = delay;
        self
    }

    /// Add a passthrough query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ResourceQuery for TripsQuery {
    const RESOURCE: Resource = Resource::Trips;

    fn provider_override(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    fn fetch_options(&self) -> FetchOptions {
        self.options
    }

    fn filters(&self, unit: TimeUnit) -> QueryParams {
        let mut params = QueryParams::new();
        insert_str(&mut params, "device_id", self.device_id.as_deref());
        insert_str(&mut params, "vehicle_id", self.vehicle_id.as_deref());
        insert_time(&mut params, "min_end_time", self.min_end_time, unit);
        insert_time(&mut params, "max_end_time", self.max_end_time, unit);
        params
    }

    fn passthrough(&self) -> &QueryParams {
        &self.extra
    }
}
