#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard summary types.
//!
//! Produced by `cidade_alerta_analytics` and serialized as-is by the
//! server and CLI.

use cidade_alerta_report_models::{Category, Report, Severity};
use serde::{Deserialize, Serialize};

/// Number of reports in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Report category.
    pub category: Category,
    /// Number of reports.
    pub count: u64,
}

/// Number of reports at one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Report severity.
    pub severity: Severity,
    /// Number of reports.
    pub count: u64,
}

/// Summary counts shown on the authority dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Total number of reports.
    pub total: u64,
    /// Reports that are resolved or closed.
    pub resolved_count: u64,
    /// Reports still needing attention.
    pub pending_count: u64,
    /// One entry per category, zero counts included.
    pub by_category: Vec<CategoryCount>,
    /// One entry per severity, zero counts included.
    pub by_severity: Vec<SeverityCount>,
    /// Most recently created reports, newest first.
    pub recent: Vec<Report>,
}

impl DashboardSummary {
    /// Count for a single category.
    #[must_use]
    pub fn category_count(&self, category: Category) -> u64 {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Count for a single severity.
    #[must_use]
    pub fn severity_count(&self, severity: Severity) -> u64 {
        self.by_severity
            .iter()
            .find(|s| s.severity == severity)
            .map_or(0, |s| s.count)
    }
}
