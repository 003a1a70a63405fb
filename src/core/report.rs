//! Report rendering.
//!
//! The body (violation lines only) is what the digest is computed over; the
//! header carries the host and time and is attached only to outgoing mail.

use chrono::{DateTime, Local};

use super::evaluator::{Category, Violation};
use crate::ui::{format_size, format_time, format_value};

/// Rendered alert ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

/// Renders violations into deterministic text
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    hostname: String,
}

impl ReportBuilder {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_uppercase(),
        }
    }

    /// Violation lines in category order. Empty when there is nothing to report.
    pub fn render_body(&self, violations: &[Violation]) -> String {
        let mut ordered: Vec<&Violation> = violations.iter().collect();
        ordered.sort_by_key(|v| v.category);
        ordered.into_iter().map(render_line).collect()
    }

    /// Host/time line framed by dashes of the same width
    pub fn render_header(&self, now: &DateTime<Local>) -> String {
        let title = format!("{} {}", self.hostname, format_time(now));
        let rule = "-".repeat(title.chars().count());
        format!("{rule}\n{title}\n{rule}\n")
    }

    pub fn subject(&self) -> String {
        format!("ATTENTION! {}", self.hostname)
    }

    /// Full message for a non-empty body
    pub fn compose(&self, body: &str, now: &DateTime<Local>) -> AlertMessage {
        AlertMessage {
            subject: self.subject(),
            body: format!("{}{}", self.render_header(now), body),
        }
    }
}

fn render_line(violation: &Violation) -> String {
    let tag = violation.category.tag();
    let observed = format_value(violation.observed);
    match violation.category {
        Category::Load => format!("* [{}]\t{}\t{}\n", tag, violation.label, observed),
        Category::MemorySwap | Category::MemoryRam | Category::Filesystem => {
            format!("* [{}]\t{}\t{}%\tused\n", tag, violation.label, observed)
        }
        Category::File => format!(
            "* [{}]\t{}\texceeds {}\n",
            tag,
            violation.label,
            format_size(violation.limit)
        ),
    }
}
