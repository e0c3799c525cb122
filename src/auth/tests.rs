//! Tests for the auth module

use super::*;
use crate::provider::{ClientAuthMethod, OAuthCredentials, Provider};
use crate::version::Version;
use base64::Engine;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEDIA_TYPE_02: &str = "application/vnd.mds.provider+json;version=0.2";

fn builder(version: Version) -> SessionBuilder {
    SessionBuilder::new(reqwest::Client::new(), version)
}

fn oauth_provider(server: &MockServer) -> Provider {
    Provider::with_oauth(
        "Bird",
        server.uri(),
        OAuthCredentials::new(format!("{}/oauth/token", server.uri()), "bird-id", "s3cret")
            .scope("mds.read"),
    )
}

#[tokio::test]
async fn test_static_token_never_requests_oauth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .and(header("Authorization", "Bearer static-abc"))
        .and(header("Accept", MEDIA_TYPE_02))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::with_token("Lime", server.uri(), "static-abc");
    let session = builder(Version::new(0, 2, 0)).build(&provider).await.unwrap();

    assert_eq!(session.mode(), AuthMode::StaticToken);
    assert_eq!(session.accept(), MEDIA_TYPE_02);

    let response = session
        .get(&format!("{}/trips", server.uri()), &[])
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_oauth_client_credentials_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=bird-id"))
        .and(body_string_contains("client_secret=s3cret"))
        .and(body_string_contains("scope=mds.read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-xyz",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/status_changes"))
        .and(header("Authorization", "Bearer oauth-xyz"))
        .and(header(
            "Accept",
            "application/vnd.mds.provider+json;version=0.3",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let session = builder(Version::new(0, 3, 0))
        .build(&oauth_provider(&server))
        .await
        .unwrap();
    assert_eq!(session.mode(), AuthMode::OAuth);

    let url = format!("{}/status_changes", server.uri());
    session.get(&url, &[]).await.unwrap();
    // Token is still valid, so no second grant
    session.get(&url, &[]).await.unwrap();
}

#[tokio::test]
async fn test_oauth_basic_client_auth() {
    let server = MockServer::start().await;

    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("bird-id:s3cret")
    );

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("Authorization", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "basic-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut provider = oauth_provider(&server);
    if let crate::provider::ProviderAuth::OAuth(creds) = &mut provider.auth {
        creds.client_auth = ClientAuthMethod::Basic;
    }

    let session = builder(Version::default()).build(&provider).await.unwrap();
    assert_eq!(session.bearer_token().await.unwrap(), "basic-token");
}

#[tokio::test]
async fn test_oauth_token_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let err = builder(Version::default())
        .build(&oauth_provider(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::OAuth2 { .. }));
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_expired_oauth_token_is_refreshed() {
    let server = MockServer::start().await;

    // Expiry inside the 30s buffer: every use triggers a new grant
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short-lived",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&server)
        .await;

    let session = builder(Version::default())
        .build(&oauth_provider(&server))
        .await
        .unwrap();

    assert_eq!(session.bearer_token().await.unwrap(), "short-lived");
}

#[tokio::test]
async fn test_session_sends_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .and(wiremock::matchers::query_param("min_end_time", "100"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::with_token("Lime", server.uri(), "t");
    let session = builder(Version::default()).build(&provider).await.unwrap();
    session
        .get(
            &format!("{}/trips", server.uri()),
            &[("min_end_time".to_string(), "100".to_string())],
        )
        .await
        .unwrap();
}
