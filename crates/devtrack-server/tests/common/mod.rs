//! Shared harness for API integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use devtrack_auth::{AuthConfig, TokenIssuer, TokenVerifier};
use devtrack_server::ratelimit::{RateLimiter, RateLimits};
use devtrack_server::{AppState, app};
use devtrack_store::{DatasetStore, MemoryBlobClient};

pub const SECRET: &str = "test-signing-secret";
pub const ADMIN: &str = "admin";
pub const PASSWORD: &str = "hunter2";

pub const SAMPLE_CSV: &str = "\
Category,Project Name,Comments Due Date,Submission Number,Requirements,Submitted Requirements,TRC Reviewers,Reviewed TRC Departments
Rezoning,Oak St,,2,\"Survey, Plat\",Survey,\"Fire, Public Works\",Public Works
Rezoning,Elm St,03/15/2025,1,,,,
Final Plat,Riverbend,01/02/2025,3,,,,
";

/// An app over an in-memory dataset, plus a handle on the raw blob bytes.
pub struct TestHarness {
    pub app: Router,
    pub blob: MemoryBlobClient,
    pub store: DatasetStore,
}

impl TestHarness {
    /// Harness with budgets high enough that tests never trip the limiter.
    pub fn new() -> Self {
        Self::with_limits(RateLimits {
            read_per_window: 1000,
            write_per_window: 1000,
            ..RateLimits::default()
        })
    }

    /// Harness with explicit budgets, for rate-limit tests.
    pub fn with_limits(limits: RateLimits) -> Self {
        let blob = MemoryBlobClient::with_bytes(SAMPLE_CSV.as_bytes().to_vec());
        let store = DatasetStore::new(Arc::new(blob.clone()));
        let state = AppState::new(
            store.clone(),
            TokenIssuer::new(AuthConfig::new(SECRET, ADMIN, PASSWORD)),
            TokenVerifier::new(SECRET),
            RateLimiter::new(limits),
            "http://localhost:3000",
        );
        Self {
            app: app(state),
            blob,
            store,
        }
    }

    /// Obtains a bearer token through the `/token` endpoint.
    pub async fn token(&self) -> String {
        let response = self
            .request(
                Request::post("/token")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"username":"{ADMIN}","password":"{PASSWORD}"}}"#
                    )))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.0, StatusCode::OK);
        response.1["access_token"]
            .as_str()
            .expect("token response carries access_token")
            .to_string()
    }

    /// Sends one request, returning status and parsed JSON body.
    pub async fn request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// A GET with a bearer token.
    pub async fn get(&self, token: &str, path: &str) -> (StatusCode, Value) {
        self.request(
            Request::get(path)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
