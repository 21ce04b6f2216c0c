#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard aggregation over problem reports.
//!
//! [`aggregate`] turns an in-memory report collection into the summary
//! counts shown to authority users. It performs no I/O; callers fetch
//! the reports first.

use std::cmp::Reverse;

use cidade_alerta_analytics_models::{CategoryCount, DashboardSummary, SeverityCount};
use cidade_alerta_report_models::{Category, Report, Severity};

/// How many reports the dashboard lists as recent.
pub const RECENT_LIMIT: usize = 10;

/// Computes dashboard counts for `reports`.
///
/// Every category and severity appears in the breakdowns, in declaration
/// order, even with a zero count. `recent` holds the newest
/// [`RECENT_LIMIT`] reports by creation time; reports created at the same
/// instant keep their input order.
#[must_use]
pub fn aggregate(reports: &[Report]) -> DashboardSummary {
    let total = reports.len() as u64;
    let resolved_count = reports.iter().filter(|r| r.status.is_resolved()).count() as u64;

    let by_category = Category::all()
        .iter()
        .map(|&category| CategoryCount {
            category,
            count: reports.iter().filter(|r| r.category == category).count() as u64,
        })
        .collect();

    let by_severity = Severity::all()
        .iter()
        .map(|&severity| SeverityCount {
            severity,
            count: reports.iter().filter(|r| r.severity == severity).count() as u64,
        })
        .collect();

    let mut recent: Vec<&Report> = reports.iter().collect();
    recent.sort_by_key(|r| Reverse(r.created_at));
    let recent = recent.into_iter().take(RECENT_LIMIT).cloned().collect();

    log::debug!("Aggregated {total} report(s), {resolved_count} resolved");

    DashboardSummary {
        total,
        resolved_count,
        pending_count: total - resolved_count,
        by_category,
        by_severity,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone as _, Utc};
    use cidade_alerta_report_models::{Coordinate, NewReport, Status};

    use super::*;

    fn report(id: &str, status: Status, minutes: i64) -> Report {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        let mut report = Report::from_input(
            id,
            NewReport {
                title: id.to_string(),
                description: String::new(),
                location: Coordinate::new(-8.05, -34.9),
                severity: Severity::Low,
                category: Category::Traffic,
            },
            "u1",
            None,
            created,
        );
        report.status = status;
        report
    }

    #[test]
    fn resolved_and_pending_counts() {
        let reports = vec![
            report("a", Status::Reported, 0),
            report("b", Status::Resolved, 1),
            report("c", Status::Closed, 2),
        ];

        let summary = aggregate(&reports);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.resolved_count, 2);
        assert_eq!(summary.pending_count, 1);
    }

    #[test]
    fn breakdowns_list_every_variant_and_sum_to_total() {
        let mut reports = vec![
            report("a", Status::InReview, 0),
            report("b", Status::InProgress, 1),
            report("c", Status::Reported, 2),
        ];
        reports[1].category = Category::Security;
        reports[2].severity = Severity::High;

        let summary = aggregate(&reports);

        assert_eq!(summary.by_category.len(), Category::all().len());
        assert_eq!(summary.by_severity.len(), Severity::all().len());
        let categories: Vec<Category> = summary.by_category.iter().map(|c| c.category).collect();
        assert_eq!(categories, Category::all());

        assert_eq!(summary.by_category.iter().map(|c| c.count).sum::<u64>(), summary.total);
        assert_eq!(summary.by_severity.iter().map(|s| s.count).sum::<u64>(), summary.total);
        assert_eq!(summary.category_count(Category::Traffic), 2);
        assert_eq!(summary.category_count(Category::Security), 1);
        assert_eq!(summary.category_count(Category::Environment), 0);
        assert_eq!(summary.severity_count(Severity::Medium), 0);
        assert_eq!(summary.severity_count(Severity::High), 1);
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let reports: Vec<Report> = (0..15)
            .map(|i| report(&format!("r{i}"), Status::Reported, i))
            .collect();

        let summary = aggregate(&reports);

        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        assert_eq!(summary.recent[0].id, "r14");
        assert_eq!(summary.recent[9].id, "r5");
        for pair in summary.recent.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn same_instant_keeps_input_order() {
        let reports = vec![
            report("first", Status::Reported, 5),
            report("second", Status::Reported, 5),
            report("older", Status::Reported, 1),
        ];

        let summary = aggregate(&reports);

        let ids: Vec<&str> = summary.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "older"]);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = aggregate(&[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.resolved_count, 0);
        assert_eq!(summary.pending_count, 0);
        assert!(summary.by_category.iter().all(|c| c.count == 0));
        assert!(summary.by_severity.iter().all(|s| s.count == 0));
        assert_eq!(summary.by_category.len(), 6);
        assert_eq!(summary.by_severity.len(), 3);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn input_order_is_not_changed() {
        let reports = vec![report("old", Status::Reported, 0), report("new", Status::Reported, 9)];

        let _ = aggregate(&reports);

        assert_eq!(reports[0].id, "old");
    }
}
