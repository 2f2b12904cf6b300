//! CORS for the single configured frontend origin.
//!
//! Hand-rolled rather than a catch-all layer: exactly one origin is ever
//! allowed, credentials are permitted, and preflights short-circuit.

use axum::body::Body;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, Method, Request, StatusCode};

use crate::state::AppState;

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "authorization,content-type";

/// axum middleware admitting the configured origin.
pub async fn middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let allowed = origin.as_deref() == Some(state.frontend_origin.as_str());

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allowed {
            apply_headers(&mut resp, &state.frontend_origin);
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if allowed {
        apply_headers(&mut resp, &state.frontend_origin);
    }
    resp
}

fn apply_headers(resp: &mut Response, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        resp.headers_mut()
            .insert("access-control-allow-origin", value);
    }
    resp.headers_mut().insert(
        "access-control-allow-credentials",
        HeaderValue::from_static("true"),
    );
    resp.headers_mut().insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    resp.headers_mut().insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
