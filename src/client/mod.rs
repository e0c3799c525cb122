//! Provider client module
//!
//! `ProviderClient` is the entry point: it holds the default provider, the
//! targeted MDS version and the shared HTTP client, and turns typed resource
//! queries into page streams.
//!
//! ```rust,ignore
//! use mds_client::client::{ProviderClient, TripsQuery};
//! use mds_client::provider::Provider;
//!
//! let provider = Provider::with_token("Lime", "https://data.lime.test/mds", "token");
//! let client = ProviderClient::builder()
//!     .provider(provider)
//!     .version("0.2.0")
//!     .build()?;
//!
//! let pages = client
//!     .get_trips(TripsQuery::new().min_end_time(1_533_081_600))
//!     .await?;
//! ```

mod query;

pub use query::{ResourceQuery, StatusChangesQuery, TripsQuery};

use crate::auth::{Authenticate, SessionBuilder};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::{collect_pages, fetch_pages, Page, PageRequest, PageStream};
use crate::provider::Provider;
use crate::types::TimeUnit;
use crate::version::Version;
use std::sync::Arc;

/// Client for MDS Provider APIs
pub struct ProviderClient {
    provider: Option<Provider>,
    version: Version,
    time_unit: TimeUnit,
    authenticator: Arc<dyn Authenticate>,
}

impl ProviderClient {
    /// Create a new client builder
    pub fn builder() -> ProviderClientBuilder {
        ProviderClientBuilder::default()
    }

    /// Create a client targeting the minimum supported MDS version
    pub fn new(provider: Option<Provider>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(provider) = provider {
            builder = builder.provider(provider);
        }
        builder.build()
    }

    /// Default provider, if configured
    pub fn provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    /// Targeted MDS version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Encoding used for datetime filters
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Resolve the provider and query string for `query` without any I/O
    pub fn request<Q: ResourceQuery>(&self, query: &Q) -> Result<PageRequest> {
        let provider = query
            .provider_override()
            .or(self.provider.as_ref())
            .cloned()
            .ok_or(Error::MissingProvider)?;

        Ok(PageRequest::new(provider, Q::RESOURCE)
            .params(query.params(self.time_unit))
            .options(query.fetch_options()))
    }

    /// Stream the non-empty pages matching `query`
    pub fn pages<Q: ResourceQuery>(&self, query: &Q) -> Result<PageStream> {
        let request = self.request(query)?;
        Ok(fetch_pages(Arc::clone(&self.authenticator), request))
    }

    /// Stream status changes pages
    pub fn status_changes(&self, query: &StatusChangesQuery) -> Result<PageStream> {
        self.pages(query)
    }

    /// Stream trips pages
    pub fn trips(&self, query: &TripsQuery) -> Result<PageStream> {
        self.pages(query)
    }

    /// Request status changes, returning the non-empty pages
    pub async fn get_status_changes(&self, query: &StatusChangesQuery) -> Result<Vec<Page>> {
        collect_pages(self.status_changes(query)?).await
    }

    /// Request trips, returning the non-empty pages
    pub async fn get_trips(&self, query: &TripsQuery) -> Result<Vec<Page>> {
        collect_pages(self.trips(query)?).await
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("provider", &self.provider.as_ref().map(|p| p.name.as_str()))
            .field("version", &self.version)
            .field("time_unit", &self.time_unit)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProviderClient`]
#[derive(Default)]
pub struct ProviderClientBuilder {
    provider: Option<Provider>,
    version: Option<String>,
    time_unit: Option<TimeUnit>,
    http: HttpClientConfig,
    authenticator: Option<Arc<dyn Authenticate>>,
}

impl ProviderClientBuilder {
    /// Set the default provider
    #[must_use]
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Target an MDS version, e.g. `"0.3.0"` or a [`Version`]
    #[must_use]
    pub fn version(mut self, version: impl ToString) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Override the datetime encoding implied by the version
    #[must_use]
    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    /// Set the HTTP client configuration
    #[must_use]
    pub fn http(mut self, config: HttpClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Replace the session strategy
    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticate>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Validate the version and build the client
    pub fn build(self) -> Result<ProviderClient> {
        let version = match self.version {
            Some(v) => v.parse::<Version>()?,
            None => Version::minimum(),
        }
        .ensure_supported()?;

        let authenticator = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(SessionBuilder::new(self.http.build_client()?, version)),
        };

        Ok(ProviderClient {
            provider: self.provider,
            version,
            time_unit: self.time_unit.unwrap_or_else(|| version.time_unit()),
            authenticator,
        })
    }
}

#[cfg(test)]
mod tests;
