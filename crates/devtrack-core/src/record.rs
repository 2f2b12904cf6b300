//! The tabular project dataset: records, the declared schema, snapshots.
//!
//! A dataset is one header row (the [`Schema`]) plus one [`Record`] per data
//! row. Field values are optional strings; the empty string and "absent" are
//! the same thing everywhere in the system, so normalization happens both
//! when a value is stored and when it is read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Column names of the project dataset.
///
/// The store does not require these to be present (the schema is whatever
/// the header row says), but the API identity scheme and the presentation
/// layer interpret exactly these names.
pub mod columns {
    /// Project category (one of [`CATEGORIES`] by convention, not enforced).
    pub const CATEGORY: &str = "Category";
    /// Project name, unique within a category by convention only.
    pub const PROJECT_NAME: &str = "Project Name";
    /// Due date for review comments (`MM/DD/YYYY`); absent means the
    /// project is awaiting resubmittal.
    pub const COMMENTS_DUE_DATE: &str = "Comments Due Date";
    /// Opaque submission counter.
    pub const SUBMISSION_NUMBER: &str = "Submission Number";
    /// Comma-separated list of required submittal items.
    pub const REQUIREMENTS: &str = "Requirements";
    /// Comma-separated subset of [`REQUIREMENTS`] already submitted.
    pub const SUBMITTED_REQUIREMENTS: &str = "Submitted Requirements";
    /// Comma-separated list of Technical Review Committee reviewers.
    pub const TRC_REVIEWERS: &str = "TRC Reviewers";
    /// Comma-separated subset of [`TRC_REVIEWERS`] that have reviewed.
    pub const REVIEWED_TRC_DEPARTMENTS: &str = "Reviewed TRC Departments";

    /// The review stages the overview page groups by, in display order.
    pub const CATEGORIES: [&str; 4] = [
        "Rezoning",
        "Preliminary Plat",
        "Construction Drawings",
        "Final Plat",
    ];
}

/// The declared, ordered set of column names for a dataset.
///
/// Owned by the store and taken from the CSV header row. Serialization always
/// goes through the schema, so output columns never depend on which record
/// happens to be first in the collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from an ordered list of column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// The column names, in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether `name` is a declared column.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Schema {
    fn from(columns: [S; N]) -> Self {
        Self::new(columns.into_iter().map(Into::into).collect())
    }
}

/// One project: a mapping from column name to optional value.
///
/// Serializes to a flat JSON object with `null` for absent fields, which is
/// the wire shape of every API response that carries project data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Option<String>>,
}

/// A merge-patch body: field name to replacement value.
///
/// Keys that are not declared columns are dropped, not added; see
/// [`crate::repository::merge_patch`].
pub type Patch = HashMap<String, Option<String>>;

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a field, treating missing, null, and empty-string values
    /// uniformly as absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Some(v)) if !v.is_empty() => Some(v.as_str()),
            _ => None,
        }
    }

    /// Sets a field, normalizing the empty string to absent.
    pub fn set(&mut self, field: impl Into<String>, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.fields.insert(field.into(), value);
    }

    /// Whether the record carries the field at all (even as an absent value).
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over `(field, value)` pairs in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref().filter(|s| !s.is_empty())))
    }

    /// Restricts the record to the schema's columns, backfilling any column
    /// the record lacks as absent. Keeps every record in a snapshot
    /// homogeneous with the header before it ever reaches the store.
    pub fn conform(&mut self, schema: &Schema) {
        self.fields.retain(|k, _| schema.contains(k));
        for column in schema.columns() {
            self.fields.entry(column.clone()).or_insert(None);
        }
    }

    /// Whether the record matches the `(category, name)` composite identity.
    pub fn matches(&self, category: &str, name: &str) -> bool {
        self.get(columns::CATEGORY) == Some(category)
            && self.get(columns::PROJECT_NAME) == Some(name)
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Option<String>); N]> for Record {
    fn from(pairs: [(K, Option<String>); N]) -> Self {
        let mut record = Record::new();
        for (k, v) in pairs {
            record.set(k, v);
        }
        record
    }
}

/// The full in-memory collection as of one `load_all` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Declared column set, from the dataset's header row.
    pub schema: Schema,
    /// The records, in storage order.
    pub records: Vec<Record>,
}

impl Snapshot {
    /// Creates a snapshot from a schema and records.
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(category: &str, name: &str) -> Record {
        Record::from([
            (columns::CATEGORY, Some(category.to_string())),
            (columns::PROJECT_NAME, Some(name.to_string())),
        ])
    }

    #[test]
    fn test_empty_string_reads_as_absent() {
        let mut r = Record::new();
        r.set("Comments Due Date", Some(String::new()));
        assert_eq!(r.get("Comments Due Date"), None);
        assert!(r.has_field("Comments Due Date"));
    }

    #[test]
    fn test_missing_field_reads_as_absent() {
        let r = Record::new();
        assert_eq!(r.get("Category"), None);
        assert!(!r.has_field("Category"));
    }

    #[test]
    fn test_set_then_get() {
        let mut r = Record::new();
        r.set("Category", Some("Rezoning".to_string()));
        assert_eq!(r.get("Category"), Some("Rezoning"));
    }

    #[test]
    fn test_matches_identity() {
        let r = record("Rezoning", "Oak St");
        assert!(r.matches("Rezoning", "Oak St"));
        assert!(!r.matches("Rezoning", "Elm St"));
        assert!(!r.matches("Final Plat", "Oak St"));
    }

    #[test]
    fn test_absent_category_never_matches() {
        let mut r = Record::new();
        r.set(columns::PROJECT_NAME, Some("Oak St".to_string()));
        assert!(!r.matches("", "Oak St"));
    }

    #[test]
    fn test_conform_drops_unknown_and_backfills() {
        let schema = Schema::from(["Category", "Project Name", "Requirements"]);
        let mut r = record("Rezoning", "Oak St");
        r.set("Bogus Column", Some("x".to_string()));
        r.conform(&schema);

        assert!(!r.has_field("Bogus Column"));
        assert!(r.has_field("Requirements"));
        assert_eq!(r.get("Requirements"), None);
        assert_eq!(r.get("Category"), Some("Rezoning"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut r = record("Rezoning", "Oak St");
        r.set("Comments Due Date", None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["Category"], "Rezoning");
        assert!(json["Comments Due Date"].is_null());

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_schema_contains_and_order() {
        let schema = Schema::from(["Category", "Project Name"]);
        assert!(schema.contains("Category"));
        assert!(!schema.contains("category"));
        assert_eq!(schema.columns(), ["Category", "Project Name"]);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_snapshot_len() {
        let schema = Schema::from(["Category", "Project Name"]);
        let snapshot = Snapshot::new(schema, vec![record("Rezoning", "Oak St")]);
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.is_empty());
    }
}
