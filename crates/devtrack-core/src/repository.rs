//! Pure lookup and mutation operations over a loaded snapshot.
//!
//! Every function here takes the snapshot by reference and performs no I/O.
//! Callers own the read-modify-write cycle: load a fresh snapshot from the
//! store, apply one of these operations, and persist the result. The window
//! between load and save is the system's sole concurrency hazard
//! (last-writer-wins, accepted for single-admin use).

use crate::error::{Error, Result};
use crate::record::{Patch, Record, Snapshot, columns};

/// All records whose `Category` equals `category` exactly, in storage order.
pub fn find_by_category<'a>(snapshot: &'a Snapshot, category: &str) -> Vec<&'a Record> {
    snapshot
        .records
        .iter()
        .filter(|r| r.get(columns::CATEGORY) == Some(category))
        .collect()
}

/// The first record matching the `(category, name)` identity, if any.
///
/// Duplicate identities are possible (uniqueness is convention, not
/// enforced); this returns the first in storage order.
pub fn find_one<'a>(snapshot: &'a Snapshot, category: &str, name: &str) -> Option<&'a Record> {
    snapshot.records.iter().find(|r| r.matches(category, name))
}

/// Merge-patches the first record matching `(category, name)`.
///
/// Only patch keys that are declared schema columns are applied; unknown
/// keys are dropped so malformed client input cannot widen the schema. A
/// patch whose keys all miss the schema is an accepted no-op. Returns the
/// updated record; the caller must persist the snapshot for the change to
/// stick.
pub fn merge_patch<'a>(
    snapshot: &'a mut Snapshot,
    category: &str,
    name: &str,
    patch: &Patch,
) -> Result<&'a Record> {
    let position = snapshot
        .records
        .iter()
        .position(|r| r.matches(category, name))
        .ok_or_else(|| Error::not_found(category, name))?;

    for (field, value) in patch {
        if snapshot.schema.contains(field) {
            snapshot.records[position].set(field.clone(), value.clone());
        } else {
            tracing::debug!(field, "dropping patch field not in schema");
        }
    }

    Ok(&snapshot.records[position])
}

/// Appends a new record to the snapshot.
///
/// The record is conformed to the snapshot's schema first: fields that are
/// not declared columns are dropped and missing columns are backfilled as
/// absent, so the collection stays homogeneous with its header row.
pub fn insert(snapshot: &mut Snapshot, mut record: Record) {
    record.conform(&snapshot.schema);
    snapshot.records.push(record);
}

/// Removes every record matching `(category, name)` and returns how many
/// were removed. Fails with `NotFound` when nothing matched, leaving the
/// snapshot unmodified.
pub fn delete(snapshot: &mut Snapshot, category: &str, name: &str) -> Result<usize> {
    let before = snapshot.records.len();
    snapshot.records.retain(|r| !r.matches(category, name));
    let removed = before - snapshot.records.len();

    if removed == 0 {
        return Err(Error::not_found(category, name));
    }
    Ok(removed)
}
