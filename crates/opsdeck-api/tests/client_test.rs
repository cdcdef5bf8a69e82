// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_api::{ApiClient, Environment, Error, JobStatus, Module, Role};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "email": "ops@opsdeck.dev", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-1" })))
        .mount(&server)
        .await;

    let token = client
        .login("ops@opsdeck.dev", &SecretString::from("hunter2"))
        .await
        .unwrap();
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn test_me_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Olive Ops",
            "initials": "OO",
            "email": "ops@opsdeck.dev",
            "modules": ["scheduler", "user-management"],
        })))
        .mount(&server)
        .await;

    let me = client.me("tok-1").await.unwrap();
    assert_eq!(me.initials, "OO");
    assert_eq!(me.modules, vec![Module::Scheduler, Module::UserManagement]);
}

#[tokio::test]
async fn test_cron_jobs_pass_env() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/scheduler/cron-jobs"))
        .and(query_param("env", "staging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "job-1",
            "name": "Nightly backup",
            "userId": "u-1",
            "status": "inactive",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "email": "a@b.io",
        }])))
        .mount(&server)
        .await;

    let jobs = client.cron_jobs(Environment::Staging).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, JobStatus::Inactive);
    assert_eq!(jobs[0].user_id, "u-1");
}

#[tokio::test]
async fn test_users_pass_env() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("env", "production"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "u-1",
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@navy.mil",
            "role": "admin",
            "jobTitle": "Rear Admiral",
            "createdAt": "2023-12-09T00:00:00.000Z",
        }])))
        .mount(&server)
        .await;

    let users = client.users(Environment::Production).await.unwrap();
    assert_eq!(users[0].name(), "Grace Hopper");
    assert_eq!(users[0].role, Role::Admin);
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_login_rejected_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Invalid email or password" })),
        )
        .mount(&server)
        .await;

    let err = client
        .login("who@else.io", &SecretString::from("nope"))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_me_without_valid_token_is_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Missing Authorization header" })),
        )
        .mount(&server)
        .await;

    let err = client.me("stale").await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_server_error_without_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client.users(Environment::Development).await.unwrap_err();
    match &err {
        Error::Api { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/scheduler/cron-jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{\"id\": 1}]"))
        .mount(&server)
        .await;

    let err = client.cron_jobs(Environment::Development).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "[{\"id\": 1}]"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}
