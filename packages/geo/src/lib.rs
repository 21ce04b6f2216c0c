#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geo-filter engine for problem reports.
//!
//! Computes great-circle distances, picks the reports near a reference
//! point, and reduces reports to map markers with grid-snapped clusters.
//! Every operation is a pure function over borrowed input: callers fetch
//! reports and the device location first, then pass them in explicitly.
//! Distances are always in meters.

pub mod cluster;
pub mod distance;
pub mod heatmap;
pub mod nearby;

pub use cidade_alerta_report_models::Coordinate;
pub use cluster::{BucketSize, Cluster, InvalidBucketSizeError, MapMarker, cluster, markers};
pub use distance::{DistanceUnit, distance, format_distance};
pub use heatmap::{HeatmapPoint, heatmap_points};
pub use nearby::{DistanceAnnotatedReport, Nearby, count_nearby, filter_nearby};

use cidade_alerta_report_models::Report;

/// Anything that may sit at a point on the map.
///
/// Returning `None` means the item has no usable coordinate; every
/// operation in this crate skips such items instead of failing.
pub trait Located {
    /// Returns the item's coordinate when both axes are finite.
    fn coordinate(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Option<Coordinate> {
        self.is_usable().then_some(*self)
    }
}

impl Located for Report {
    fn coordinate(&self) -> Option<Coordinate> {
        Self::coordinate(self)
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinate(&self) -> Option<Coordinate> {
        (**self).coordinate()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone as _, Utc};
    use cidade_alerta_report_models::{
        Category, Coordinate, Location, NewReport, Report, Severity,
    };

    /// A report at the given position.
    pub fn report_at(id: &str, latitude: f64, longitude: f64) -> Report {
        Report::from_input(
            id,
            NewReport {
                title: format!("report {id}"),
                description: String::new(),
                location: Coordinate::new(latitude, longitude),
                severity: Severity::Medium,
                category: Category::Infrastructure,
            },
            "tester",
            None,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        )
    }

    /// A report whose stored location has no usable latitude.
    pub fn unlocated(id: &str) -> Report {
        let mut report = report_at(id, 0.0, 0.0);
        report.location = Some(Location {
            latitude: None,
            longitude: Some(1.0),
            address: None,
        });
        report
    }
}
