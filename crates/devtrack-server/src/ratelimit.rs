//! Per-address, per-endpoint-class admission control.
//!
//! Fixed one-minute windows: the first request from an address starts the
//! window, each further request in the window spends budget, and elapsed
//! windows are evicted. Requests over budget are rejected with 429, never
//! queued or delayed. Counters are the only shared mutable state in the
//! process.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::Json;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{Method, Request, StatusCode};
use serde_json::json;

/// The two request classes with independent budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// GET on project data: 5/minute by default.
    Read,
    /// PUT/POST/DELETE on project data: 3/minute by default.
    Write,
}

/// Budgets and window size.
#[derive(Clone, Copy, Debug)]
pub struct RateLimits {
    /// Read-class requests allowed per window.
    pub read_per_window: u32,
    /// Write-class requests allowed per window.
    pub write_per_window: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            read_per_window: 5,
            write_per_window: 3,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimits {
    fn budget(&self, class: EndpointClass) -> u32 {
        match class {
            EndpointClass::Read => self.read_per_window,
            EndpointClass::Write => self.write_per_window,
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counters keyed by client address and class.
pub struct RateLimiter {
    limits: RateLimits,
    windows: Mutex<HashMap<(IpAddr, EndpointClass), Window>>,
}

impl RateLimiter {
    /// Creates a limiter with the given budgets.
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Spends one unit of `addr`'s budget for `class`. Returns whether the
    /// request is admitted.
    pub fn allow(&self, addr: IpAddr, class: EndpointClass) -> bool {
        let now = Instant::now();
        let Ok(mut windows) = self.windows.lock() else {
            // Poisoned lock: fail open rather than deny all traffic.
            return true;
        };

        // Elapsed windows are dropped; the map only ever holds addresses
        // seen within the current window.
        windows.retain(|_, window| now.duration_since(window.started) < self.limits.window);

        let window = windows.entry((addr, class)).or_insert(Window {
            started: now,
            count: 0,
        });

        if window.count < self.limits.budget(class) {
            window.count += 1;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    fn tracked_windows(&self) -> usize {
        self.windows.lock().map(|windows| windows.len()).unwrap_or(0)
    }
}

/// Classifies a request, if it is subject to rate limiting at all.
///
/// Only the `/projects` endpoints are classified; `/` and `/token` are
/// unlimited.
pub fn classify(method: &Method, path: &str) -> Option<EndpointClass> {
    if !path.starts_with("/projects") {
        return None;
    }
    match *method {
        Method::GET => Some(EndpointClass::Read),
        Method::PUT | Method::POST | Method::DELETE => Some(EndpointClass::Write),
        _ => None,
    }
}

/// axum middleware applying the limiter. Runs before the auth gate.
pub async fn middleware(
    State(state): State<crate::state::AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(class) = classify(req.method(), req.uri().path()) else {
        return next.run(req).await;
    };

    let addr = client_addr(&req);
    if state.limiter.allow(addr, class) {
        next.run(req).await
    } else {
        tracing::warn!(%addr, ?class, "rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "detail": "rate limit exceeded" })),
        )
            .into_response()
    }
}

/// The client's network address: `X-Forwarded-For` when fronted by a proxy,
/// otherwise the socket peer address.
fn client_addr(req: &Request<Body>) -> IpAddr {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
    {
        return forwarded;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
