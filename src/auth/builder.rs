//! Session builder
//!
//! Selects the auth strategy from the provider's resolved auth mode and
//! produces a [`Session`].

use super::session::Session;
use super::types::{CachedToken, TokenResponse};
use crate::error::{Error, Result};
use crate::provider::{ClientAuthMethod, OAuthCredentials, Provider, ProviderAuth};
use crate::version::Version;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use tracing::debug;

/// Capability to produce an authenticated session for a provider
#[async_trait]
pub trait Authenticate: Send + Sync {
    /// Build a fresh session for `provider`
    async fn session(&self, provider: &Provider) -> Result<Session>;
}

/// Default [`Authenticate`] implementation: static token or OAuth
/// client-credentials grant, with the MDS media-type `Accept` header.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    client: Client,
    version: Version,
}

impl SessionBuilder {
    /// Create a session builder sharing `client`'s connection pool
    pub fn new(client: Client, version: Version) -> Self {
        Self { client, version }
    }

    /// Targeted MDS version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Establish an authenticated session for a provider
    pub async fn build(&self, provider: &Provider) -> Result<Session> {
        let accept = HeaderValue::from_str(&self.version.media_type())
            .map_err(|e| Error::config(format!("Invalid media type header: {e}")))?;

        match &provider.auth {
            ProviderAuth::StaticToken { token } => {
                debug!("Using static token session for {}", provider.label());
                Ok(Session::with_static_token(
                    self.client.clone(),
                    accept,
                    token.clone(),
                ))
            }
            ProviderAuth::OAuth(credentials) => {
                debug!(
                    "Requesting OAuth token for {} from {}",
                    provider.label(),
                    credentials.token_url
                );
                let token = fetch_client_credentials_token(&self.client, credentials).await?;
                Ok(Session::with_oauth(
                    self.client.clone(),
                    accept,
                    credentials.clone(),
                    token,
                ))
            }
        }
    }
}

#[async_trait]
impl Authenticate for SessionBuilder {
    async fn session(&self, provider: &Provider) -> Result<Session> {
        self.build(provider).await
    }
}

/// Fetch an access token using the OAuth2 client credentials grant
pub(crate) async fn fetch_client_credentials_token(
    client: &Client,
    credentials: &OAuthCredentials,
) -> Result<CachedToken> {
    let mut form = vec![("grant_type", "client_credentials".to_string())];

    if let Some(scope) = credentials.scope.as_deref().filter(|s| !s.is_empty()) {
        form.push(("scope", scope.to_string()));
    }

    let mut req = client.post(&credentials.token_url);
    match credentials.client_auth {
        ClientAuthMethod::Body => {
            form.push(("client_id", credentials.client_id.clone()));
            form.push(("client_secret", credentials.client_secret.clone()));
        }
        ClientAuthMethod::Basic => {
            req = req.basic_auth(&credentials.client_id, Some(&credentials.client_secret));
        }
    }

    let response = req.form(&form).send().await.map_err(Error::Http)?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::oauth2(format!(
            "Token request failed with status {status}: {body}"
        )));
    }

    let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
    Ok(token_response.into_cached_token())
}
