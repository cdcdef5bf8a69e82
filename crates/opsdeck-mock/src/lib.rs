// opsdeck-mock: stand-in for the dashboard backend, serving seeded fixtures.

pub mod fixtures;
pub mod handlers;
pub mod state;
mod words;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

pub use fixtures::{FixtureOptions, FixtureSet};
pub use state::{MockOptions, MockState};

/// Assemble the full router.
pub fn build_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route("/api/me", get(handlers::me))
        .route("/api/scheduler/cron-jobs", get(handlers::cron_jobs))
        .route("/api/users", get(handlers::users))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<MockState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(Arc::new(MockState::new(MockOptions {
            latency: Duration::ZERO,
            accepted_domain: "opsdeck.dev".into(),
            fixtures: FixtureOptions::new(4, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        })))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let resp = router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_env_defaults_to_development() {
        let (status, body) = get_json("/api/users").await;
        let (_, dev) = get_json("/api/users?env=development").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, dev);
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unknown_env_is_bad_request() {
        let (status, body) = get_json("/api/scheduler/cron-jobs?env=qa").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown environment: qa");
    }

    #[tokio::test]
    async fn me_without_header_is_unauthorized() {
        let (status, body) = get_json("/api/me").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn cron_jobs_use_camel_case() {
        let (_, body) = get_json("/api/scheduler/cron-jobs?env=staging").await;
        let first = &body[0];
        assert!(first.get("userId").is_some());
        assert!(first.get("createdAt").is_some());
        assert!(first["status"] == "active" || first["status"] == "inactive");
    }
}
