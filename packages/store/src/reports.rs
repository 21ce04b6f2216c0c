//! Report store contract and the in-memory implementation.

use std::path::Path;

use async_trait::async_trait;
use cidade_alerta_report_models::{Category, Report, Severity, Status};

use crate::StoreError;

/// Equality filters supported by the store. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Only reports in this category.
    pub category: Option<Category>,
    /// Only reports at this severity.
    pub severity: Option<Severity>,
    /// Only reports in this status.
    pub status: Option<Status>,
}

impl ReportQuery {
    /// Whether `report` passes every set filter.
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        self.category.is_none_or(|c| report.category == c)
            && self.severity.is_none_or(|s| report.severity == s)
            && self.status.is_none_or(|s| report.status == s)
    }
}

/// Source of problem reports.
///
/// Only equality filtering is supported; proximity filtering happens in
/// the caller with `cidade_alerta_geo`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Returns every report matching `query`, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    async fn query(&self, query: &ReportQuery) -> Result<Vec<Report>, StoreError>;

    /// Returns the report with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such report exists.
    async fn get(&self, id: &str) -> Result<Report, StoreError>;
}

/// Immutable report collection held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportStore {
    reports: Vec<Report>,
}

impl InMemoryReportStore {
    /// Wraps an existing collection.
    #[must_use]
    pub const fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    /// Loads a JSON array of reports from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or is not a valid
    /// report array.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let reports: Vec<Report> = serde_json::from_str(&raw)?;

        let unlocated = reports.iter().filter(|r| r.coordinate().is_none()).count();
        if unlocated > 0 {
            log::warn!(
                "{unlocated} report(s) in {} have no usable coordinate",
                path.display()
            );
        }
        log::info!("Loaded {} report(s) from {}", reports.len(), path.display());

        Ok(Self::new(reports))
    }

    /// Number of reports held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the store holds no reports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn query(&self, query: &ReportQuery) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .reports
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Report, StoreError> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "report",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cidade_alerta_report_models::{Coordinate, NewReport};

    use super::*;

    fn report(id: &str, category: Category, severity: Severity, status: Status) -> Report {
        let mut report = Report::from_input(
            id,
            NewReport {
                title: id.to_string(),
                description: String::new(),
                location: Coordinate::new(-15.79, -47.88),
                severity,
                category,
            },
            "u1",
            None,
            Utc::now(),
        );
        report.status = status;
        report
    }

    fn store() -> InMemoryReportStore {
        InMemoryReportStore::new(vec![
            report("a", Category::Traffic, Severity::Low, Status::Reported),
            report("b", Category::Security, Severity::High, Status::Reported),
            report("c", Category::Security, Severity::Low, Status::Resolved),
        ])
    }

    fn ids(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_query_returns_everything() {
        let all = store().query(&ReportQuery::default()).await.unwrap();
        assert_eq!(ids(&all), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let store = store();

        let security = store
            .query(&ReportQuery {
                category: Some(Category::Security),
                ..ReportQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(&security), vec!["b", "c"]);

        let low_reported = store
            .query(&ReportQuery {
                severity: Some(Severity::Low),
                status: Some(Status::Reported),
                ..ReportQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(ids(&low_reported), vec!["a"]);
    }

    #[tokio::test]
    async fn get_missing_report_is_not_found() {
        let store = store();

        assert_eq!(store.get("b").await.unwrap().id, "b");
        assert!(matches!(
            store.get("zzz").await,
            Err(StoreError::NotFound { kind: "report", .. })
        ));
    }

    #[tokio::test]
    async fn loads_reports_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "cidade_alerta_reports_{}.json",
            std::process::id()
        ));
        let json = serde_json::to_string(&store().reports).unwrap();
        tokio::fs::write(&path, json).await.unwrap();

        let loaded = InMemoryReportStore::load(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.len(), 3);
        assert!(!loaded.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_a_json_error() {
        let path = std::env::temp_dir().join(format!(
            "cidade_alerta_bad_reports_{}.json",
            std::process::id()
        ));
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = InMemoryReportStore::load(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
