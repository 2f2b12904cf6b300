//! HTML rendering of the overview and detail pages.
//!
//! Pure functions from a snapshot to markup, so every layout decision is
//! testable without a server. The overview groups projects into the four
//! fixed review-stage columns; the detail page shows the submittal and
//! reviewer checklists for one project.

use std::cmp::Ordering;

use devtrack_core::{ProjectView, Snapshot, columns, slug};

use crate::escape;

/// Checklist marker for a satisfied item.
pub const MARK_DONE: &str = "\u{2714}";
/// Checklist marker for an outstanding item.
pub const MARK_PENDING: &str = "\u{2718}";

const AWAITING_RESUBMITTAL: &str = "Awaiting Resubmittal";

/// Renders the category overview page.
pub fn overview(snapshot: &Snapshot) -> String {
    let mut columns_html = String::new();
    for category in columns::CATEGORIES {
        let mut projects: Vec<ProjectView> = snapshot
            .records
            .iter()
            .map(ProjectView::new)
            .filter(|v| v.category() == Some(category))
            .collect();
        projects.sort_by(compare_for_overview);

        let mut entries = String::new();
        for project in &projects {
            let name = project.name().unwrap_or("");
            let due = match project.comments_due() {
                Some(date) => format!("Comments Due: {}", date.format("%m/%d/%Y")),
                None => AWAITING_RESUBMITTAL.to_string(),
            };
            entries.push_str(&format!(
                "<li><a href=\"/project/{href}\"><span class=\"name\">{name}</span>\
                 <span class=\"due\">{due}</span></a></li>\n",
                href = escape::html(&slug::encode(name)),
                name = escape::html(name),
                due = escape::html(&due),
            ));
        }

        columns_html.push_str(&format!(
            "<section class=\"category\"><h2>{title}</h2><ul>\n{entries}</ul></section>\n",
            title = escape::html(category),
        ));
    }

    page(
        "Plan Review Tracker",
        &format!(
            "<header><h1>Welcome</h1><p>Plan Review Tracker</p></header>\n\
             <main class=\"overview\">\n{columns_html}</main>"
        ),
    )
}

/// Renders the detail page for the project named by a raw URL path segment.
///
/// The segment is percent-decoded and matched against project names after
/// trimming, case-insensitively. Returns `None` when no project matches.
pub fn detail(snapshot: &Snapshot, raw_segment: &str) -> Option<String> {
    let wanted = slug::decode(raw_segment).trim().to_lowercase();
    let record = snapshot.records.iter().find(|r| {
        ProjectView::new(r)
            .name()
            .is_some_and(|n| n.trim().to_lowercase() == wanted)
    })?;
    let project = ProjectView::new(record);
    let name = project.name().unwrap_or("");

    let status = match project.comments_due() {
        Some(date) => format!("Comments Due: {}", date.format("%m/%d/%Y")),
        None => AWAITING_RESUBMITTAL.to_string(),
    };
    let submission = match project.submission_number() {
        Some(n) => format!("Submission #: {}", escape::html(n)),
        None => "N/A".to_string(),
    };

    let body = format!(
        "<main class=\"detail\">\n\
         <h1>{name}</h1>\n\
         <h3>{status}</h3>\n\
         <p>{submission}</p>\n\
         <section><h4>Submittal Requirements</h4>{requirements}</section>\n\
         <section><h4>TRC Reviewers</h4>{reviewers}</section>\n\
         <a href=\"/\">Back to overview</a>\n\
         </main>",
        name = escape::html(name),
        status = escape::html(&status),
        requirements = checklist_html(&project.requirement_checklist()),
        reviewers = checklist_html(&project.reviewer_checklist()),
    );
    Some(page(name, &body))
}

/// Renders the not-found page for a project name that matched nothing.
pub fn not_found(name: &str) -> String {
    page(
        "Project Not Found",
        &format!(
            "<main class=\"detail\">\n\
             <h1>Project Not Found</h1>\n\
             <p>No project named \u{201c}{}\u{201d}.</p>\n\
             <a href=\"/\">Back to overview</a>\n\
             </main>",
            escape::html(name)
        ),
    )
}

/// Renders the page shown when the dataset cannot be loaded.
pub fn unavailable() -> String {
    page(
        "Service Unavailable",
        "<main class=\"detail\">\n\
         <h1>Service Unavailable</h1>\n\
         <p>The project dataset could not be loaded. Try again shortly.</p>\n\
         </main>",
    )
}

/// Soonest due date first, dateless projects last, ties broken by name.
fn compare_for_overview(a: &ProjectView, b: &ProjectView) -> Ordering {
    match (a.comments_due(), b.comments_due()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name().cmp(&b.name())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name().cmp(&b.name()),
    }
}

fn checklist_html(items: &[(&str, bool)]) -> String {
    if items.is_empty() {
        return "<p>None listed.</p>".to_string();
    }
    let mut out = String::from("<ul>\n");
    for (item, satisfied) in items {
        let mark = if *satisfied { MARK_DONE } else { MARK_PENDING };
        out.push_str(&format!("<li>{mark} {}</li>\n", escape::html(item)));
    }
    out.push_str("</ul>");
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape::html(title),
    )
}

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem;background:#f4f6f8;color:#1f2933}\
header{text-align:center;margin-bottom:2rem}\
.overview{display:flex;gap:1rem;align-items:flex-start}\
.category{flex:1;background:#fff;border-radius:6px;padding:1rem;box-shadow:0 1px 3px rgba(0,0,0,.15)}\
.category h2{font-size:1.1rem;margin-top:0}\
.category ul{list-style:none;margin:0;padding:0;max-height:24rem;overflow-y:auto}\
.category li a{display:block;padding:.5rem;margin-bottom:.5rem;background:#eef2f6;border-radius:4px;\
color:inherit;text-decoration:none}\
.category .name{display:block;font-weight:600}\
.category .due{display:block;font-size:.85rem;color:#52606d}\
.detail{max-width:40rem;margin:0 auto;background:#fff;border-radius:6px;padding:1.5rem;\
box-shadow:0 1px 3px rgba(0,0,0,.15)}\
.detail ul{list-style:none;padding-left:.5rem}";
