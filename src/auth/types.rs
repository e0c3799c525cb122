//! Auth types
//!
//! Token bookkeeping for sessions that authenticate through OAuth.

use crate::provider::ProviderAuth;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which strategy authenticated a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Static provider token
    StaticToken,
    /// OAuth 2.0 client-credentials grant
    #[serde(rename = "oauth")]
    OAuth,
}

impl From<&ProviderAuth> for AuthMode {
    fn from(auth: &ProviderAuth) -> Self {
        match auth {
            ProviderAuth::StaticToken { .. } => AuthMode::StaticToken,
            ProviderAuth::OAuth(_) => AuthMode::OAuth,
        }
    }
}

/// Access token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
