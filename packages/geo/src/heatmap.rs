//! Severity-weighted heatmap points.

use cidade_alerta_report_models::Report;
use serde::{Deserialize, Serialize};

/// A weighted point for a heatmap layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Intensity from the report's severity.
    pub weight: f64,
}

/// Converts located reports into heatmap points, skipping the rest.
#[must_use]
pub fn heatmap_points(reports: &[Report]) -> Vec<HeatmapPoint> {
    reports
        .iter()
        .filter_map(|report| {
            report.coordinate().map(|c| HeatmapPoint {
                latitude: c.latitude,
                longitude: c.longitude,
                weight: report.severity.heatmap_weight(),
            })
        })
        .collect()
}
