//! Error types for the MDS client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Non-200 responses from a provider are deliberately absent: the fetcher
//! logs them and ends the page stream instead of raising.

use thiserror::Error;

/// The main error type for the MDS client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid MDS version '{version}': expected <major>.<minor>[.<patch>]")]
    InvalidVersion { version: String },

    #[error("MDS version {version} is not supported by the current version of this library")]
    UnsupportedVersion { version: String },

    #[error("Provider instance not found for ProviderClient")]
    MissingProvider,

    #[error("Provider '{name}' not found in registry")]
    ProviderNotFound { name: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode page from {url}: {message}")]
    Decode { url: String, message: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an OAuth2 error
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    /// Create a decode error for a page fetched from `url`
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised before any network I/O took place
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidVersion { .. }
                | Error::UnsupportedVersion { .. }
                | Error::MissingProvider
                | Error::ProviderNotFound { .. }
        )
    }
}

/// Result type alias for the MDS client
pub type Result<T> = std::result::Result<T, Error>;
