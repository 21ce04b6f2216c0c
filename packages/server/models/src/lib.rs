#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Cidade Alerta server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! report and geo types so the wire contract can evolve separately.

use cidade_alerta_geo::{Located, MapMarker, Nearby, format_distance};
use cidade_alerta_report_models::{Category, Coordinate, Report, Severity, Status};
use serde::{Deserialize, Serialize};

/// A report as returned by the API, with its distance when the request
/// carried a reference location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    /// The report document.
    #[serde(flatten)]
    pub report: Report,
    /// Distance from the reference location, in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Human-readable distance (`"250m"`, `"1.2km"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
}

impl From<Report> for ApiReport {
    fn from(report: Report) -> Self {
        Self {
            report,
            distance: None,
            distance_label: None,
        }
    }
}

impl From<Nearby<Report>> for ApiReport {
    fn from(nearby: Nearby<Report>) -> Self {
        Self {
            report: nearby.item,
            distance: Some(nearby.distance),
            distance_label: Some(format_distance(nearby.distance)),
        }
    }
}

impl Located for ApiReport {
    fn coordinate(&self) -> Option<Coordinate> {
        self.report.coordinate()
    }
}

/// A map marker as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarker {
    /// Report ID for single markers, `cluster-{lat},{lng}` for clusters.
    pub id: String,
    /// Marker latitude.
    pub latitude: f64,
    /// Marker longitude.
    pub longitude: f64,
    /// Whether this marker merges several reports.
    pub is_cluster: bool,
    /// Number of reports behind the marker.
    pub count: usize,
    /// Severity of a single report; absent for clusters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Reports behind the marker, for drill-down.
    pub reports: Vec<ApiReport>,
}

impl From<MapMarker<ApiReport>> for ApiMarker {
    fn from(marker: MapMarker<ApiReport>) -> Self {
        match marker {
            MapMarker::Single { coordinate, item } => Self {
                id: item.report.id.clone(),
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
                is_cluster: false,
                count: 1,
                severity: Some(item.report.severity),
                reports: vec![item],
            },
            MapMarker::Cluster(cluster) => Self {
                id: cluster.id(),
                latitude: cluster.coordinate.latitude,
                longitude: cluster.coordinate.longitude,
                is_cluster: true,
                count: cluster.count,
                severity: None,
                reports: cluster.members,
            },
        }
    }
}

/// Query parameters for the problems endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemQueryParams {
    /// Only this category.
    pub category: Option<Category>,
    /// Only this severity.
    pub severity: Option<Severity>,
    /// Only this status.
    pub status: Option<Status>,
    /// Reference latitude for proximity filtering.
    pub latitude: Option<f64>,
    /// Reference longitude for proximity filtering.
    pub longitude: Option<f64>,
    /// Search radius, in `unit`.
    pub radius: Option<f64>,
    /// Unit of `radius` (`meters` or `kilometers`, default meters).
    pub unit: Option<cidade_alerta_geo::DistanceUnit>,
}

/// Query parameters for the nearby endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// Reference latitude.
    pub latitude: f64,
    /// Reference longitude.
    pub longitude: f64,
    /// Radius in meters.
    pub radius: Option<f64>,
}

/// Query parameters for the markers endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerQueryParams {
    /// Only this category.
    pub category: Option<Category>,
    /// Only this severity.
    pub severity: Option<Severity>,
    /// Reference latitude; with `longitude`, limits markers to `radius`.
    pub latitude: Option<f64>,
    /// Reference longitude.
    pub longitude: Option<f64>,
    /// Radius in meters.
    pub radius: Option<f64>,
    /// Grid step in degrees.
    pub bucket_size: Option<f64>,
    /// Merge reports sharing a grid cell (default true).
    pub grouped: Option<bool>,
}

/// Response from the nearby endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    /// Radius used, in meters.
    pub radius: f64,
    /// Number of reports within the radius.
    pub count: usize,
    /// Reports within the radius, closest first.
    pub reports: Vec<ApiReport>,
}

/// Response from the nearby count endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyCount {
    /// Radius used, in meters.
    pub radius: f64,
    /// Number of reports within the radius.
    pub count: usize,
}

/// The report taxonomy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTaxonomy {
    /// Every category.
    pub categories: Vec<Category>,
    /// Every severity, least severe first.
    pub severities: Vec<Severity>,
    /// Every status, in lifecycle order.
    pub statuses: Vec<Status>,
}

impl ApiTaxonomy {
    /// The full taxonomy.
    #[must_use]
    pub fn current() -> Self {
        Self {
            categories: Category::all().to_vec(),
            severities: Severity::all().to_vec(),
            statuses: Status::all().to_vec(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of reports loaded.
    pub report_count: usize,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}
