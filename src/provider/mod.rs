//! Provider module
//!
//! Provider descriptors, the endpoint URL builder and the YAML provider
//! registry.

mod registry;
mod types;

pub use registry::{load_registry, load_registry_from_str, ProviderRegistry};
pub use types::{ClientAuthMethod, OAuthCredentials, Provider, ProviderAuth, ProviderDefinition};

use crate::types::Resource;

/// Build the API URL for a provider's resource endpoint.
///
/// Base URL, optional suffix (trailing slashes stripped), then the endpoint
/// name, joined with single slashes.
pub fn build_url(provider: &Provider, resource: Resource) -> String {
    let mut url = provider.api_url.trim_end_matches('/').to_string();

    if let Some(suffix) = provider.api_suffix.as_deref() {
        let suffix = suffix.trim_matches('/');
        if !suffix.is_empty() {
            url.push('/');
            url.push_str(suffix);
        }
    }

    url.push('/');
    url.push_str(resource.as_str());
    url
}
