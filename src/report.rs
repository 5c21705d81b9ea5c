//! Per-collection migration tallies and the final summary.
//!
//! Each collection migrator returns exactly one [`MigrationReport`]; the
//! driver appends it to a [`ReportSet`] in run order. Nothing else mutates
//! a report once its collection has finished.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub collection: String,
    /// Records created, or that would have been created in dry-run.
    pub success: usize,
    pub failed: usize,
    /// `"<key>: <message>"`, one per failure, in processing order.
    pub errors: Vec<String>,
}

impl MigrationReport {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            success: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, key: &str, message: &str) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", key, message));
    }

    /// Source items seen so far (`success + failed`).
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }
}

/// Ordered, append-only list of collection reports for one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReportSet {
    reports: Vec<MigrationReport>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: MigrationReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[MigrationReport] {
        &self.reports
    }

    pub fn get(&self, collection: &str) -> Option<&MigrationReport> {
        self.reports.iter().find(|r| r.collection == collection)
    }

    pub fn total_success(&self) -> usize {
        self.reports.iter().map(|r| r.success).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed).sum()
    }

    /// Human-readable summary: one block per collection, then totals.
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "MIGRATION REPORT");
        let _ = writeln!(out, "{}", rule);

        for report in &self.reports {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}:", report.collection);
            let _ = writeln!(out, "  success: {}", report.success);
            let _ = writeln!(out, "  failed: {}", report.failed);
            if !report.errors.is_empty() {
                let _ = writeln!(out, "  errors:");
                for error in &report.errors {
                    let _ = writeln!(out, "    - {}", error);
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "total success: {}", self.total_success());
        let _ = writeln!(out, "total failed: {}", self.total_failed());
        let _ = writeln!(out, "{}", rule);
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "reports": self.reports,
            "total_success": self.total_success(),
            "total_failed": self.total_failed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportSet {
        let mut vendors = MigrationReport::new("vendors");
        vendors.record_success();
        vendors.record_failure("broken", "malformed frontmatter");
        let mut products = MigrationReport::new("products");
        products.record_success();
        products.record_success();

        let mut set = ReportSet::new();
        set.push(vendors);
        set.push(products);
        set
    }

    #[test]
    fn test_counts_and_errors() {
        let set = sample();
        let vendors = set.get("vendors").unwrap();
        assert_eq!(vendors.success, 1);
        assert_eq!(vendors.failed, 1);
        assert_eq!(vendors.processed(), 2);
        assert_eq!(vendors.errors, vec!["broken: malformed frontmatter"]);
        assert_eq!(set.total_success(), 3);
        assert_eq!(set.total_failed(), 1);
    }

    #[test]
    fn test_render_lists_errors_and_totals() {
        let text = sample().render();
        assert!(text.contains("vendors:\n  success: 1\n  failed: 1\n"));
        assert!(text.contains("    - broken: malformed frontmatter"));
        assert!(text.contains("total success: 3"));
        assert!(text.contains("total failed: 1"));
        assert!(text.find("vendors:").unwrap() < text.find("products:").unwrap());
    }

    #[test]
    fn test_json_shape() {
        let value = sample().to_json();
        assert_eq!(value["reports"][0]["collection"], "vendors");
        assert_eq!(value["reports"][1]["success"], 2);
        assert_eq!(value["total_failed"], 1);
    }
}
