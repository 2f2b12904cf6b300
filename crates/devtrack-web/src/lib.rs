//! Server-rendered web UI over the plan-review dataset.
//!
//! Two pages: a category overview of every open project and a per-project
//! detail page with submittal and reviewer checklists. Pages are plain HTML
//! rendered on each request from a freshly fetched snapshot, so the UI never
//! serves stale data from process startup.

pub mod escape;
pub mod render;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use devtrack_core::Snapshot;
use devtrack_store::DatasetStore;

/// Source of dataset snapshots for page renders.
///
/// Injected rather than hard-wired to the blob store so tests can render
/// against fixed data and so fetch failures stay the caller's concern.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Loads a current snapshot of the dataset.
    async fn fetch(&self) -> devtrack_store::Result<Snapshot>;
}

#[async_trait]
impl SnapshotFetcher for DatasetStore {
    async fn fetch(&self) -> devtrack_store::Result<Snapshot> {
        self.load_all().await
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct WebState {
    /// Snapshot source consulted on every page render.
    pub fetcher: Arc<dyn SnapshotFetcher>,
}

impl WebState {
    /// Wraps a snapshot fetcher.
    pub fn new(fetcher: impl SnapshotFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}
