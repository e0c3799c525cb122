//! Authenticated session
//!
//! A session pairs the shared HTTP client with one provider's bearer
//! credential and the versioned `Accept` header.

use super::builder::fetch_client_credentials_token;
use super::types::{AuthMode, CachedToken};
use crate::error::Result;
use crate::provider::OAuthCredentials;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use tokio::sync::RwLock;
use tracing::debug;

enum Credential {
    Static(String),
    OAuth {
        credentials: OAuthCredentials,
        token: RwLock<CachedToken>,
    },
}

/// An authenticated session for one provider
pub struct Session {
    client: Client,
    accept: HeaderValue,
    credential: Credential,
}

impl Session {
    pub(crate) fn with_static_token(client: Client, accept: HeaderValue, token: String) -> Self {
        Self {
            client,
            accept,
            credential: Credential::Static(token),
        }
    }

    pub(crate) fn with_oauth(
        client: Client,
        accept: HeaderValue,
        credentials: OAuthCredentials,
        token: CachedToken,
    ) -> Self {
        Self {
            client,
            accept,
            credential: Credential::OAuth {
                credentials,
                token: RwLock::new(token),
            },
        }
    }

    /// Strategy that authenticated this session
    pub fn mode(&self) -> AuthMode {
        match self.credential {
            Credential::Static(_) => AuthMode::StaticToken,
            Credential::OAuth { .. } => AuthMode::OAuth,
        }
    }

    /// Value of the `Accept` header sent with every request
    pub fn accept(&self) -> &str {
        self.accept.to_str().unwrap_or_default()
    }

    /// Current bearer token, re-running the grant if an OAuth token expired
    pub async fn bearer_token(&self) -> Result<String> {
        match &self.credential {
            Credential::Static(token) => Ok(token.clone()),
            Credential::OAuth { credentials, token } => {
                {
                    let cached = token.read().await;
                    if !cached.is_expired() {
                        return Ok(cached.token.clone());
                    }
                }

                let mut cached = token.write().await;
                if !cached.is_expired() {
                    return Ok(cached.token.clone());
                }

                debug!("Access token expired, requesting a new one");
                *cached = fetch_client_credentials_token(&self.client, credentials).await?;
                Ok(cached.token.clone())
            }
        }
    }

    /// Send an authenticated GET request.
    ///
    /// `query` is appended to the URL; pass an empty slice for cursor URLs,
    /// which already carry their parameters.
    pub async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Response> {
        let token = self.bearer_token().await?;

        let mut req = self
            .client
            .get(url)
            .header(ACCEPT, self.accept.clone())
            .bearer_auth(token);

        if !query.is_empty() {
            req = req.query(query);
        }

        debug!("GET {} ({} query params)", url, query.len());
        Ok(req.send().await?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode())
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}
