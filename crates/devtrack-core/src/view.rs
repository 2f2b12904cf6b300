//! Typed read access over a record for the presentation layer.
//!
//! Records are schema-shaped string maps; this view layers the known-column
//! interpretations on top: parsed due dates, list-valued fields with `", "`
//! separators, and the satisfied/unsatisfied checklists the detail page
//! renders. Membership checks are case-sensitive exact string matches.

use chrono::NaiveDate;

use crate::record::{Record, columns};

/// A borrowed, typed view over one project record.
#[derive(Clone, Copy, Debug)]
pub struct ProjectView<'a> {
    record: &'a Record,
}

impl<'a> ProjectView<'a> {
    /// Wraps a record.
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// The underlying record.
    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Project category, if present.
    pub fn category(&self) -> Option<&'a str> {
        self.record.get(columns::CATEGORY)
    }

    /// Project name, if present.
    pub fn name(&self) -> Option<&'a str> {
        self.record.get(columns::PROJECT_NAME)
    }

    /// Opaque submission number, if present.
    pub fn submission_number(&self) -> Option<&'a str> {
        self.record.get(columns::SUBMISSION_NUMBER)
    }

    /// The comments-due date, parsed.
    ///
    /// Absent or unparseable dates mean the project is awaiting resubmittal.
    /// `MM/DD/YYYY` is what the dataset stores; ISO dates are tolerated.
    pub fn comments_due(&self) -> Option<NaiveDate> {
        let raw = self.record.get(columns::COMMENTS_DUE_DATE)?;
        NaiveDate::parse_from_str(raw, "%m/%d/%Y")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// All required submittal items.
    pub fn requirements(&self) -> Vec<&'a str> {
        split_list(self.record.get(columns::REQUIREMENTS))
    }

    /// Requirement items already submitted.
    pub fn submitted_requirements(&self) -> Vec<&'a str> {
        split_list(self.record.get(columns::SUBMITTED_REQUIREMENTS))
    }

    /// All TRC reviewers assigned to the project.
    pub fn trc_reviewers(&self) -> Vec<&'a str> {
        split_list(self.record.get(columns::TRC_REVIEWERS))
    }

    /// TRC departments that have completed review.
    pub fn reviewed_trc_departments(&self) -> Vec<&'a str> {
        split_list(self.record.get(columns::REVIEWED_TRC_DEPARTMENTS))
    }

    /// Each requirement with whether it has been submitted.
    pub fn requirement_checklist(&self) -> Vec<(&'a str, bool)> {
        checklist(self.requirements(), &self.submitted_requirements())
    }

    /// Each reviewer with whether their department has reviewed.
    pub fn reviewer_checklist(&self) -> Vec<(&'a str, bool)> {
        checklist(self.trc_reviewers(), &self.reviewed_trc_departments())
    }
}

/// Splits a `", "`-separated list field. Absent fields yield an empty list.
fn split_list(value: Option<&str>) -> Vec<&str> {
    match value {
        Some(v) => v.split(", ").collect(),
        None => Vec::new(),
    }
}

fn checklist<'a>(all: Vec<&'a str>, satisfied: &[&str]) -> Vec<(&'a str, bool)> {
    all.into_iter()
        .map(|item| (item, satisfied.contains(&item)))
        .collect()
}
