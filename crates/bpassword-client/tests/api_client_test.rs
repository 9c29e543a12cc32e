//! Integration tests for the credential API client against a mock server.
//!
//! Covers the request wrapper's error normalization, the endpoint templates
//! of the derived operations, and the catch-all semantics of
//! `test_connection`.

use std::sync::Arc;

use bpassword_client::{ApiClient, ApiError, CredentialDraft, MemoryStore, RequestOptions};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Client wired to the mock server with a valid stored key
async fn configured_client(server: &MockServer) -> ApiClient {
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(store);
    client.set_api_key(KEY).await.unwrap();
    client.set_api_url(&server.uri()).await.unwrap();
    client
}

#[tokio::test]
async fn test_missing_key_fails_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(store);
    client.set_api_url(&server.uri()).await.unwrap();

    let err = client.list_credentials(None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotConfigured));
    assert_eq!(err.to_string(), "API Key not configured");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no request should have been sent");
}

#[tokio::test]
async fn test_list_sends_auth_and_content_type_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials"))
        .and(header("Authorization", format!("Api-Key {}", KEY).as_str()))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = configured_client(&server).await;
    let credentials = client.list_credentials(None).await.unwrap();
    assert!(credentials.is_empty());
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials"))
        .and(header("Content-Type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = configured_client(&server).await;
    let options = RequestOptions::new(Method::GET).with_header("Content-Type", "text/plain");
    client.request("credentials", options).await.unwrap();
}

#[tokio::test]
async fn test_http_status_mapping_ignores_body() {
    let cases = [
        (401, "Invalid API Key"),
        (403, "Access forbidden"),
        (404, "Resource not found"),
        (429, "Rate limit exceeded"),
    ];

    for (status, message) in cases {
        let server = MockServer::start().await;
        // A detail field is present but must not leak into mapped statuses
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"detail": "server says no"})),
            )
            .mount(&server)
            .await;

        let client = configured_client(&server).await;
        let err = client.list_credentials(None).await.unwrap_err();
        assert_eq!(err.to_string(), message, "status {}", status);

        let matches_kind = matches!(
            (status, &err),
            (401, ApiError::Unauthorized)
                | (403, ApiError::Forbidden)
                | (404, ApiError::NotFound)
                | (429, ApiError::RateLimited)
        );
        assert!(matches_kind, "status {} mapped to {:?}", status, err);
    }
}

#[tokio::test]
async fn test_unmapped_status_uses_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Query parameter 'q' is required."})),
        )
        .mount(&server)
        .await;

    let client = configured_client(&server).await;
    let err = client.list_credentials(None).await.unwrap_err();
    match err {
        ApiError::RequestFailed(message) => {
            assert_eq!(message, "Query parameter 'q' is required.");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unmapped_status_without_detail_falls_back() {
    for body in [
        ResponseTemplate::new(500).set_body_string("<html>boom</html>"),
        ResponseTemplate::new(500).set_body_json(json!({"error": "no detail field"})),
        ResponseTemplate::new(502),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(body).mount(&server).await;

        let client = configured_client(&server).await;
        let err = client.list_credentials(None).await.unwrap_err();
        match err {
            ApiError::RequestFailed(message) => assert_eq!(message, "Request failed"),
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_no_content_resolves_to_no_value() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/credentials/7/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = configured_client(&server).await;

    let value = client
        .request("credentials/7/", RequestOptions::new(Method::DELETE))
        .await
        .unwrap();
    assert!(value.is_none(), "204 must resolve to no value");

    // An empty JSON object is a value, distinguishable from 204
    let value = client
        .request("empty", RequestOptions::new(Method::GET))
        .await
        .unwrap();
    assert_eq!(value, Some(json!({})));

    client.delete_credential(7).await.unwrap();
}

#[tokio::test]
async fn test_search_query_is_urlencoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/"))
        .and(query_param("q", "git hub & co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = configured_client(&server).await;
    client.list_credentials(Some("git hub & co")).await.unwrap();
}

#[tokio::test]
async fn test_empty_query_lists_plain_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = configured_client(&server).await;
    client.list_credentials(Some("")).await.unwrap();
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let server = MockServer::start().await;
    let draft = CredentialDraft::new("GitHub", "me", "p1");

    Mock::given(method("POST"))
        .and(path("/credentials/"))
        .and(body_json(json!({"name": "GitHub", "username": "me", "password": "p1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 42, "name": "GitHub", "username": "me", "password": "p1"}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!([{"id": 42, "name": "GitHub", "username": "me", "password": "p1"}]),
        ))
        .mount(&server)
        .await;

    let client = configured_client(&server).await;

    let created = client.create_credential(&draft).await.unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.name, "GitHub");
    assert_eq!(created.username, "me");
    assert_eq!(created.password, "p1");

    let listed = client.list_credentials(None).await.unwrap();
    assert!(listed.iter().any(|c| c.id == 42 && c.name == "GitHub"));
}

#[tokio::test]
async fn test_get_and_update_use_id_scoped_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 42, "name": "GitHub", "username": "me", "password": "p1"}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/credentials/42/"))
        .and(body_json(json!({"name": "GitHub", "username": "me", "password": "p2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 42, "name": "GitHub", "username": "me", "password": "p2"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = configured_client(&server).await;

    let fetched = client.get_credential(42).await.unwrap();
    assert_eq!(fetched.password, "p1");

    // Full replacement: fetched record with the password swapped
    let mut draft = CredentialDraft::from(fetched);
    draft.password = "p2".to_string();
    let updated = client.update_credential(42, &draft).await.unwrap();
    assert_eq!(updated.password, "p2");
}

#[tokio::test]
async fn test_transport_failure_maps_to_network_error() {
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(store);
    client.set_api_key(KEY).await.unwrap();
    // Discard port: connection refused
    client.set_api_url("http://127.0.0.1:9/api/").await.unwrap();

    let err = client.list_credentials(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Network));
    assert_eq!(
        err.to_string(),
        "Network error. Check your connection and API URL."
    );
}

#[tokio::test]
async fn test_connection_probe_never_errors() {
    // Success path
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let client = configured_client(&server).await;
    let probe = client.test_connection().await;
    assert!(probe.success);
    assert_eq!(probe.message, "Connection successful!");

    // Always-rejecting transport
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(store);
    client.set_api_key(KEY).await.unwrap();
    client.set_api_url("http://127.0.0.1:9/api/").await.unwrap();
    let probe = client.test_connection().await;
    assert!(!probe.success);
    assert_eq!(
        probe.message,
        "Network error. Check your connection and API URL."
    );

    // Unconfigured client
    let client = ApiClient::new(Arc::new(MemoryStore::new()));
    let probe = client.test_connection().await;
    assert!(!probe.success);
    assert_eq!(probe.message, "API Key not configured");
}

#[tokio::test]
async fn test_default_url_scenario_key_of_64_a_chars() {
    // With the url unset, the default service URL (slash-terminated) is used.
    let client = ApiClient::new(Arc::new(MemoryStore::new()));
    client.set_api_key(&"a".repeat(64)).await.unwrap();
    assert_eq!(
        client.api_url().await.unwrap(),
        bpassword_client::DEFAULT_API_URL
    );
    assert!(client.api_url().await.unwrap().ends_with('/'));
    assert_eq!(client.api_key().await.unwrap().unwrap().expose(), "a".repeat(64));
}
