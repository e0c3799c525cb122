//! Provider registry loading
//!
//! Parses and validates a YAML file listing the providers a deployment
//! talks to.

use super::types::Provider;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A set of known providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRegistry {
    /// Registered providers
    #[serde(default)]
    pub providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Create a registry from providers
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Find a provider by name or id (case-insensitive)
    pub fn find(&self, key: &str) -> Option<&Provider> {
        let key = key.trim();
        self.providers.iter().find(|p| {
            p.name.eq_ignore_ascii_case(key)
                || p
                    .provider_id
                    .as_deref()
                    .is_some_and(|id| id.eq_ignore_ascii_case(key))
        })
    }

    /// Find a provider or fail with [`Error::ProviderNotFound`]
    pub fn get(&self, key: &str) -> Result<&Provider> {
        self.find(key).ok_or_else(|| Error::ProviderNotFound {
            name: key.to_string(),
        })
    }

    /// Registered provider names, in file order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name.as_str()).collect()
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Load a provider registry from a YAML file
pub fn load_registry(path: impl AsRef<Path>) -> Result<ProviderRegistry> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read provider registry '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_registry_from_str(&content)
}

/// Load a provider registry from a YAML string
pub fn load_registry_from_str(yaml: &str) -> Result<ProviderRegistry> {
    let registry: ProviderRegistry = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse provider registry YAML: {e}")))?;

    validate_registry(&registry)?;
    Ok(registry)
}

/// Validate a registry
fn validate_registry(registry: &ProviderRegistry) -> Result<()> {
    for provider in &registry.providers {
        validate_provider(provider)?;
    }

    let names: HashSet<_> = registry
        .providers
        .iter()
        .map(|p| p.name.to_lowercase())
        .collect();
    if names.len() != registry.providers.len() {
        return Err(Error::config("Duplicate provider names found"));
    }

    Ok(())
}

/// Validate a single provider
fn validate_provider(provider: &Provider) -> Result<()> {
    if provider.name.trim().is_empty() {
        return Err(Error::config("Provider name cannot be empty"));
    }

    if provider.api_url.trim().is_empty() {
        return Err(Error::config(format!(
            "Provider '{}' mds_api_url cannot be empty",
            provider.name
        )));
    }

    url::Url::parse(&provider.api_url).map_err(|e| {
        Error::config(format!(
            "Provider '{}' has invalid mds_api_url '{}': {e}",
            provider.name, provider.api_url
        ))
    })?;

    Ok(())
}
