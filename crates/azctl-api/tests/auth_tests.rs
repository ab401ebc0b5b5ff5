//! Integration tests for the client credential flow using a mock authority

use azctl_api::auth::{ClientSecretCredential, TokenCredential};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential(server: &MockServer) -> ClientSecretCredential {
    ClientSecretCredential::new(server.uri(), "tenant-1", "client-1", "s3cret")
}

#[tokio::test]
async fn test_token_exchange_sends_form_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("client_secret=s3cret"))
        .and(body_string_contains(
            "resource=https%3A%2F%2Fmanagement.azure.com",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cred = credential(&server);
    let token = cred.get_token("https://management.azure.com").await.unwrap();
    assert_eq!(token.token, "tok-abc");
}

#[tokio::test]
async fn test_token_is_cached_per_resource() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&server)
        .await;

    let cred = credential(&server);
    // two calls for the same resource hit the wire once
    cred.get_token("https://management.azure.com").await.unwrap();
    cred.get_token("https://management.azure.com").await.unwrap();
    // a different resource forces a fresh exchange
    cred.get_token("https://vault.azure.net").await.unwrap();
}

#[tokio::test]
async fn test_expires_in_accepts_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-str",
            "token_type": "Bearer",
            "expires_in": "3600"
        })))
        .mount(&server)
        .await;

    let cred = credential(&server);
    let token = cred.get_token("https://management.azure.com").await.unwrap();
    assert_eq!(token.token, "tok-str");
}

#[tokio::test]
async fn test_rejected_exchange_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let cred = credential(&server);
    let err = cred
        .get_token("https://management.azure.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        azctl_api::ApiError::AuthenticationFailed { .. }
    ));
    assert!(err.to_string().contains("invalid_client"));
}
