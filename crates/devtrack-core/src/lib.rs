//! Core types and pure logic for the Devtrack plan-review tracker.
//!
//! Provides:
//! - [`Record`] / [`Schema`] / [`Snapshot`]: the tabular project dataset
//! - [`repository`]: pure lookup and mutation operations over a snapshot
//! - [`ProjectView`]: typed accessors over a record for rendering
//! - [`slug`]: URL encoding/decoding of project names
//! - [`Error`]: the core error taxonomy
//!
//! This crate performs no I/O. Loading and persisting snapshots is the
//! `devtrack-store` crate's job; everything here operates on values already
//! in memory, which keeps the mutation logic independently testable.

pub mod error;
pub mod record;
pub mod repository;
pub mod slug;
pub mod view;

pub use error::{Error, Result};
pub use record::{Patch, Record, Schema, Snapshot, columns};
pub use view::ProjectView;
