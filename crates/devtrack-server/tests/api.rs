//! End-to-end tests of the API surface against an in-memory dataset.

#![allow(clippy::unwrap_used)]

mod common;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;

use common::TestHarness;
use devtrack_core::repository;
use devtrack_server::ratelimit::RateLimits;

fn put(token: &str, path: &str, body: serde_json::Value) -> Request<Body> {
    Request::put(path)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_needs_no_auth() {
    let harness = TestHarness::new();
    let (status, body) = harness
        .request(Request::get("/").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Devtrack"));
}

#[tokio::test]
async fn token_with_bad_credentials_is_401() {
    let harness = TestHarness::new();
    let (status, body) = harness
        .request(
            Request::post("/token")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"username": "admin", "password": "wrong"}).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].as_str().unwrap().contains("username or password"));
}

#[tokio::test]
async fn projects_without_token_is_401() {
    let harness = TestHarness::new();
    let (status, _) = harness
        .request(Request::get("/projects").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn projects_with_garbage_token_is_401() {
    let harness = TestHarness::new();
    let (status, _) = harness.get("not-a-jwt", "/projects").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_projects_returns_full_collection() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness.get(&token, "/projects").await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 3);
}

#[tokio::test]
async fn filter_by_category() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness.get(&token, "/projects/Rezoning").await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|p| p["Category"] == "Rezoning"));
}

#[tokio::test]
async fn filter_by_unknown_category_is_empty_not_404() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness.get(&token, "/projects/Annexation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn project_detail_normalizes_empty_to_null() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness.get(&token, "/projects/Rezoning/Oak%20St").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Project Name"], "Oak St");
    assert!(body["Comments Due Date"].is_null());
    assert_eq!(body["Requirements"], "Survey, Plat");
}

#[tokio::test]
async fn project_detail_missing_is_404() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, _) = harness.get(&token, "/projects/Rezoning/Nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_merges_known_fields_and_drops_unknown() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness
        .request(put(
            &token,
            "/projects/Rezoning/Oak%20St",
            json!({"Comments Due Date": "03/15/2025", "NewField": "x"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project updated successfully");

    // Reload through the store: date updated, no new column anywhere.
    let snapshot = harness.store.load_all().await.unwrap();
    let oak = repository::find_one(&snapshot, "Rezoning", "Oak St").unwrap();
    assert_eq!(oak.get("Comments Due Date"), Some("03/15/2025"));
    assert!(!oak.has_field("NewField"));
    assert!(!snapshot.schema.contains("NewField"));
}

#[tokio::test]
async fn update_missing_project_is_404() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, _) = harness
        .request(put(
            &token,
            "/projects/Rezoning/Nowhere",
            json!({"Comments Due Date": "03/15/2025"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_appends_record_conformed_to_schema() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, _) = harness
        .request(
            Request::post("/projects")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "Category": "Preliminary Plat",
                        "Project Name": "Maple Commons",
                        "Bogus": "dropped"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let snapshot = harness.store.load_all().await.unwrap();
    assert_eq!(snapshot.len(), 4);
    let maple = repository::find_one(&snapshot, "Preliminary Plat", "Maple Commons").unwrap();
    assert!(!maple.has_field("Bogus"));
    assert!(maple.has_field("TRC Reviewers"));

    // The blob itself was rewritten under the original header.
    let bytes = harness.blob.bytes().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Maple Commons"));
    assert!(!text.contains("Bogus"));
}

#[tokio::test]
async fn delete_removes_record() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, body) = harness
        .request(
            Request::delete("/projects/Final%20Plat/Riverbend")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let snapshot = harness.store.load_all().await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn delete_missing_is_404_and_keeps_data() {
    let harness = TestHarness::new();
    let token = harness.token().await;

    let (status, _) = harness
        .request(
            Request::delete("/projects/Rezoning/Nowhere")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let snapshot = harness.store.load_all().await.unwrap();
    assert_eq!(snapshot.len(), 3);
}

#[tokio::test]
async fn read_budget_rejects_sixth_request() {
    let harness = TestHarness::with_limits(RateLimits::default());
    let token = harness.token().await;

    for _ in 0..5 {
        let (status, _) = harness.get(&token, "/projects").await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = harness.get(&token, "/projects").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["detail"], "rate limit exceeded");
}

#[tokio::test]
async fn write_budget_is_independent_of_reads() {
    let harness = TestHarness::with_limits(RateLimits::default());
    let token = harness.token().await;

    for _ in 0..3 {
        let (status, _) = harness
            .request(put(
                &token,
                "/projects/Rezoning/Oak%20St",
                json!({"Submission Number": "3"}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = harness
        .request(put(
            &token,
            "/projects/Rezoning/Oak%20St",
            json!({"Submission Number": "4"}),
        ))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Reads still have budget left.
    let (status, _) = harness.get(&token, "/projects").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rate_limiter_runs_before_auth() {
    let harness = TestHarness::with_limits(RateLimits {
        read_per_window: 1,
        ..RateLimits::default()
    });

    // Unauthenticated requests still spend budget: limiter is outermost.
    let (status, _) = harness
        .request(Request::get("/projects").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = harness
        .request(Request::get("/projects").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn concurrent_updates_lose_the_first_write() {
    // Demonstrates the accepted read-modify-write hazard: two actors load
    // the same snapshot, patch different fields, and save in turn. The
    // second save wins wholesale; the first patch is silently lost.
    let harness = TestHarness::new();

    let mut first = harness.store.load_all().await.unwrap();
    let mut second = harness.store.load_all().await.unwrap();

    let patch_date = std::collections::HashMap::from([(
        "Comments Due Date".to_string(),
        Some("04/01/2025".to_string()),
    )]);
    let patch_number = std::collections::HashMap::from([(
        "Submission Number".to_string(),
        Some("9".to_string()),
    )]);

    repository::merge_patch(&mut first, "Rezoning", "Oak St", &patch_date).unwrap();
    harness.store.save_all(&first).await.unwrap();

    repository::merge_patch(&mut second, "Rezoning", "Oak St", &patch_number).unwrap();
    harness.store.save_all(&second).await.unwrap();

    let persisted = harness.store.load_all().await.unwrap();
    let oak = repository::find_one(&persisted, "Rezoning", "Oak St").unwrap();
    assert_eq!(oak.get("Submission Number"), Some("9"));
    // The first write's date change was overwritten by the stale snapshot.
    assert_eq!(oak.get("Comments Due Date"), None);
}

#[tokio::test]
async fn cors_preflight_admits_configured_origin_only() {
    let harness = TestHarness::new();

    let (status, _) = harness
        .request(
            Request::builder()
                .method("OPTIONS")
                .uri("/projects")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let response = {
        use tower::ServiceExt;
        harness
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/projects")
                    .header("origin", "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    };
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
