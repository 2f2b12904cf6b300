//! Request handlers and router assembly.
//!
//! Handlers are thin: load a fresh snapshot, apply one pure repository
//! operation, persist on mutation. The read-modify-write window between
//! load and save is uncoordinated by design (single-admin assumption;
//! last writer wins).

use axum::extract::{Path, State};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use devtrack_auth::AuthLayer;
use devtrack_core::{Patch, Record, repository};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{cors, ratelimit};

/// Builds the full API router over the given state.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{category}", get(projects_by_category))
        .route(
            "/projects/{category}/{name}",
            get(project_detail)
                .put(update_project)
                .delete(delete_project),
        )
        .route_layer(AuthLayer::new(state.verifier.clone()))
        // Outside the auth gate: admission control runs first.
        .layer(from_fn_with_state(state.clone(), ratelimit::middleware));

    Router::new()
        .route("/", get(root))
        .route("/token", axum::routing::post(issue_token))
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), cors::middleware))
        .with_state(state)
}

/// Health check.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Devtrack plan review API" }))
}

/// Credential pair presented to `/token`.
#[derive(Debug, Deserialize)]
struct TokenRequest {
    username: String,
    password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

/// Exchanges the admin credential pair for a bearer token.
async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let access_token = state.issuer.issue(&body.username, &body.password)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Full collection.
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let snapshot = state.store.load_all().await?;
    Ok(Json(snapshot.records))
}

/// Collection filtered by category.
async fn projects_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let snapshot = state.store.load_all().await?;
    let matches = repository::find_by_category(&snapshot, &category)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matches))
}

/// Single record by identity, or 404.
async fn project_detail(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<Record>, ApiError> {
    let snapshot = state.store.load_all().await?;
    let record = repository::find_one(&snapshot, &category, &name)
        .cloned()
        .ok_or_else(|| devtrack_core::Error::not_found(&category, &name))?;
    Ok(Json(record))
}

/// Merge-patches the matching record and persists the snapshot.
async fn update_project(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    Json(patch): Json<Patch>,
) -> Result<Json<Value>, ApiError> {
    let mut snapshot = state.store.load_all().await?;
    repository::merge_patch(&mut snapshot, &category, &name, &patch)?;
    state.store.save_all(&snapshot).await?;
    Ok(Json(json!({ "message": "Project updated successfully" })))
}

/// Appends a new record and persists the snapshot.
async fn create_project(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError> {
    let mut snapshot = state.store.load_all().await?;
    repository::insert(&mut snapshot, record);
    state.store.save_all(&snapshot).await?;
    Ok(Json(json!({ "message": "Project added successfully" })))
}

/// Removes all matching records and persists the snapshot, or 404.
async fn delete_project(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut snapshot = state.store.load_all().await?;
    let removed = repository::delete(&mut snapshot, &category, &name)?;
    state.store.save_all(&snapshot).await?;
    tracing::info!(%category, %name, removed, "deleted project");
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}
