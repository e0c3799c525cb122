//! Provider descriptor types
//!
//! A provider is resolved into a [`ProviderAuth`] variant once, when it is
//! constructed or deserialized. Nothing downstream probes for optional fields.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How client credentials are presented to an OAuth token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// `client_id` / `client_secret` in the form body
    #[default]
    Body,
    /// HTTP Basic authorization header
    Basic,
}

/// OAuth 2.0 client-credentials configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    /// Token endpoint URL
    pub token_url: String,
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Requested scope (space separated)
    pub scope: Option<String>,
    /// Where the client credentials go on the token request
    pub client_auth: ClientAuthMethod,
}

impl OAuthCredentials {
    /// Create client-credentials config with body authentication and no scope
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: None,
            client_auth: ClientAuthMethod::Body,
        }
    }

    /// Set the requested scope
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the client authentication method
    #[must_use]
    pub fn client_auth(mut self, method: ClientAuthMethod) -> Self {
        self.client_auth = method;
        self
    }
}

/// Authentication mode of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderAuth {
    /// Long-lived token issued by the provider, sent as a bearer credential
    StaticToken {
        /// The token
        token: String,
    },
    /// OAuth 2.0 client-credentials grant
    OAuth(OAuthCredentials),
}

impl ProviderAuth {
    /// Check if this is the static token mode
    pub fn is_static_token(&self) -> bool {
        matches!(self, Self::StaticToken { .. })
    }

    /// Check if this is the OAuth mode
    pub fn is_oauth(&self) -> bool {
        matches!(self, Self::OAuth(_))
    }
}

/// An MDS Provider: identity plus connection descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProviderDefinition", into = "ProviderDefinition")]
pub struct Provider {
    /// Human-readable provider name
    pub name: String,
    /// Provider identifier (a UUID in the MDS registry)
    pub provider_id: Option<String>,
    /// Base URL of the provider API
    pub api_url: String,
    /// Path segment between the base URL and the endpoint name
    pub api_suffix: Option<String>,
    /// Authentication mode
    pub auth: ProviderAuth,
}

impl Provider {
    /// Provider authenticated with a static token
    pub fn with_token(
        name: impl Into<String>,
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider_id: None,
            api_url: api_url.into(),
            api_suffix: None,
            auth: ProviderAuth::StaticToken {
                token: token.into(),
            },
        }
    }

    /// Provider authenticated through OAuth client credentials
    pub fn with_oauth(
        name: impl Into<String>,
        api_url: impl Into<String>,
        credentials: OAuthCredentials,
    ) -> Self {
        Self {
            name: name.into(),
            provider_id: None,
            api_url: api_url.into(),
            api_suffix: None,
            auth: ProviderAuth::OAuth(credentials),
        }
    }

    /// Set the provider identifier
    #[must_use]
    pub fn id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Set the API path suffix
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.api_suffix = Some(suffix.into());
        self
    }

    /// Label used in logs: the name, with the id when known
    pub fn label(&self) -> String {
        match &self.provider_id {
            Some(id) => format!("{} ({id})", self.name),
            None => self.name.clone(),
        }
    }
}

// ============================================================================
// Serialized Form
// ============================================================================

/// Flat provider record, as found in registry files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderDefinition {
    /// Provider name
    #[serde(alias = "provider_name")]
    pub name: String,
    /// Provider identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Base API URL
    #[serde(alias = "api_url")]
    pub mds_api_url: String,
    /// Optional path suffix
    #[serde(default, alias = "api_suffix", skip_serializing_if = "Option::is_none")]
    pub mds_api_suffix: Option<String>,
    /// Static auth token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// OAuth token endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// OAuth client id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// OAuth scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// OAuth client authentication method
    #[serde(default)]
    pub client_auth: ClientAuthMethod,
}

impl ProviderDefinition {
    /// Resolve the auth mode: a token without a token URL is a static token,
    /// anything else must be a complete OAuth configuration.
    pub fn resolve_auth(&self) -> Result<ProviderAuth> {
        match (&self.token, &self.token_url) {
            (Some(token), None) => Ok(ProviderAuth::StaticToken {
                token: token.clone(),
            }),
            (_, token_url) => {
                let require = |value: &Option<String>, field: &str| {
                    value.clone().ok_or_else(|| {
                        Error::missing_field(format!("{field} (provider '{}')", self.name))
                    })
                };
                Ok(ProviderAuth::OAuth(OAuthCredentials {
                    token_url: require(token_url, "token_url")?,
                    client_id: require(&self.client_id, "client_id")?,
                    client_secret: require(&self.client_secret, "client_secret")?,
                    scope: self.scope.clone(),
                    client_auth: self.client_auth,
                }))
            }
        }
    }
}

impl TryFrom<ProviderDefinition> for Provider {
    type Error = Error;

    fn try_from(def: ProviderDefinition) -> Result<Self> {
        let auth = def.resolve_auth()?;
        Ok(Self {
            name: def.name,
            provider_id: def.provider_id,
            api_url: def.mds_api_url,
            api_suffix: def.mds_api_suffix,
            auth,
        })
    }
}

impl From<Provider> for ProviderDefinition {
    fn from(provider: Provider) -> Self {
        let mut def = ProviderDefinition {
            name: provider.name,
            provider_id: provider.provider_id,
            mds_api_url: provider.api_url,
            mds_api_suffix: provider.api_suffix,
            ..Default::default()
        };
        match provider.auth {
            ProviderAuth::StaticToken { token } => def.token = Some(token),
            ProviderAuth::OAuth(creds) => {
                def.token_url = Some(creds.token_url);
                def.client_id = Some(creds.client_id);
                def.client_secret = Some(creds.client_secret);
                def.scope = creds.scope;
                def.client_auth = creds.client_auth;
            }
        }
        def
    }
}
