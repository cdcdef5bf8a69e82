// End-to-end tests: real mock server on an ephemeral port, driven by the API client.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tokio::net::TcpListener;
use url::Url;

use opsdeck_api::{ApiClient, Environment, Error, Module};
use opsdeck_mock::{FixtureOptions, MockOptions, MockState};

// ── Helpers ─────────────────────────────────────────────────────────

async fn spawn_server() -> ApiClient {
    let state = Arc::new(MockState::new(MockOptions {
        latency: Duration::ZERO,
        accepted_domain: "opsdeck.dev".into(),
        fixtures: FixtureOptions::new(10, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(opsdeck_mock::serve(listener, state, std::future::pending()));

    ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}")).unwrap(),
    )
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_then_me() {
    let client = spawn_server().await;

    let token = client
        .login("olive.ops@opsdeck.dev", &SecretString::from("pw"))
        .await
        .unwrap();
    let me = client.me(&token).await.unwrap();

    assert_eq!(me.name, "Olive Ops");
    assert_eq!(me.email, "olive.ops@opsdeck.dev");
    assert_eq!(me.modules, vec![Module::Scheduler, Module::UserManagement]);
}

#[tokio::test]
async fn test_login_outside_domain_is_refused() {
    let client = spawn_server().await;

    let err = client
        .login("mallory@elsewhere.io", &SecretString::from("password"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "{err:?}");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let client = spawn_server().await;
    let err = client.me("mock-forged").await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }), "{err:?}");
}

#[tokio::test]
async fn test_collections_are_per_environment() {
    let client = spawn_server().await;

    let dev = client.users(Environment::Development).await.unwrap();
    let staging = client.users(Environment::Staging).await.unwrap();
    let dev_again = client.users(Environment::Development).await.unwrap();

    assert_eq!(dev.len(), 10);
    assert_eq!(dev, dev_again);
    assert!(dev.iter().zip(&staging).all(|(a, b)| a.id != b.id));
}

#[tokio::test]
async fn test_cron_jobs_reference_users() {
    let client = spawn_server().await;

    let users = client.users(Environment::Production).await.unwrap();
    let jobs = client.cron_jobs(Environment::Production).await.unwrap();

    assert_eq!(jobs.len(), users.len());
    for job in &jobs {
        let owner = users.iter().find(|u| u.id == job.user_id).unwrap();
        assert_eq!(owner.email, job.email);
    }
}
