//! Page routing.
//!
//! `/project/{name}` serves the detail page; everything else, the overview.

use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use http::StatusCode;

use devtrack_core::slug;
use devtrack_store::Error as StoreError;

use crate::{WebState, render};

/// Builds the page router.
pub fn app(state: WebState) -> Router {
    Router::new()
        .route("/project/{name}", get(detail_page))
        .fallback(get(overview_page))
        .with_state(state)
}

async fn overview_page(State(state): State<WebState>) -> Response {
    match state.fetcher.fetch().await {
        Ok(snapshot) => Html(render::overview(&snapshot)).into_response(),
        Err(err) => unavailable_page(&err),
    }
}

async fn detail_page(State(state): State<WebState>, Path(name): Path<String>) -> Response {
    let snapshot = match state.fetcher.fetch().await {
        Ok(snapshot) => snapshot,
        Err(err) => return unavailable_page(&err),
    };
    match render::detail(&snapshot, &name) {
        Some(page) => Html(page).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(render::not_found(&slug::decode(&name))),
        )
            .into_response(),
    }
}

fn unavailable_page(err: &StoreError) -> Response {
    tracing::error!(error = %err, "failed to load dataset for page render");
    let status = match err {
        StoreError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Html(render::unavailable())).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use devtrack_core::Snapshot;
    use devtrack_store::{DatasetStore, MemoryBlobClient, error};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::SnapshotFetcher;

    const SAMPLE_CSV: &str = "\
Category,Project Name,Comments Due Date,Submission Number,Requirements,Submitted Requirements,TRC Reviewers,Reviewed TRC Departments
Rezoning,Oak St,,2,\"Survey, Plat\",Survey,\"Fire, Public Works\",Public Works
Final Plat,Riverbend,01/02/2025,3,,,,
";

    fn sample_app() -> Router {
        let blob = MemoryBlobClient::with_bytes(SAMPLE_CSV.as_bytes().to_vec());
        app(WebState::new(DatasetStore::new(Arc::new(blob))))
    }

    async fn get_page(app: &Router, path: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_serves_overview() {
        let app = sample_app();
        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Plan Review Tracker"));
        assert!(body.contains("href=\"/project/Oak%20St\""));
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_overview() {
        let app = sample_app();
        let (status, body) = get_page(&app, "/no/such/page").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Plan Review Tracker"));
    }

    #[tokio::test]
    async fn test_detail_page_renders_checklists() {
        let app = sample_app();
        let (status, body) = get_page(&app, "/project/Oak%20St").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Oak St</h1>"));
        assert!(body.contains(&format!("{} Survey", render::MARK_DONE)));
        assert!(body.contains(&format!("{} Plat", render::MARK_PENDING)));
    }

    #[tokio::test]
    async fn test_missing_project_is_404_with_home_link() {
        let app = sample_app();
        let (status, body) = get_page(&app, "/project/Nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Project Not Found"));
        assert!(body.contains("href=\"/\""));
    }

    struct FailingFetcher;

    #[async_trait]
    impl SnapshotFetcher for FailingFetcher {
        async fn fetch(&self) -> devtrack_store::Result<Snapshot> {
            Err(error::Error::unavailable("storage offline"))
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_503() {
        let app = app(WebState::new(FailingFetcher));
        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Service Unavailable"));
    }
}
