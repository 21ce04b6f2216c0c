#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Problem report types and taxonomy definitions.
//!
//! This crate defines the report document shape shared by every part of
//! Cidade Alerta: the store returns it, the geo engine filters and
//! clusters it, and the server serializes it. Stored documents are not
//! always well-formed, so [`Location`] deserializes its coordinates
//! leniently and exposes a usable [`Coordinate`] only when both axes are
//! finite numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How serious a reported problem is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Cosmetic or minor inconvenience
    Low,
    /// Affects daily use of the space
    Medium,
    /// Dangerous or blocking
    High,
}

impl Severity {
    /// Returns the intensity this severity contributes to a heatmap.
    #[must_use]
    pub const fn heatmap_weight(self) -> f64 {
        match self {
            Self::Low => 0.4,
            Self::Medium => 0.7,
            Self::High => 1.0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Kind of urban problem being reported.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Traffic lights, signage, congestion
    Traffic,
    /// Potholes, sidewalks, drainage
    Infrastructure,
    /// Public safety concerns
    Security,
    /// Trash, pollution, green areas
    Environment,
    /// Broken or missing street lighting
    PublicLighting,
    /// Anything not fitting the other categories
    Others,
}

impl Category {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Traffic,
            Self::Infrastructure,
            Self::Security,
            Self::Environment,
            Self::PublicLighting,
            Self::Others,
        ]
    }
}

/// Where a report is in its triage lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Newly submitted by a citizen
    Reported,
    /// Being looked at by an authority
    InReview,
    /// Work has started
    InProgress,
    /// Fixed
    Resolved,
    /// Closed without further action
    Closed,
}

impl Status {
    /// Whether the report no longer needs attention.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Reported,
            Self::InReview,
            Self::InProgress,
            Self::Resolved,
            Self::Closed,
        ]
    }
}

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both axes are finite numbers.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A report location as stored.
///
/// Either axis may be missing or hold a non-numeric value in older
/// documents; both deserialize to `None` rather than failing the whole
/// report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// Free-form street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Creates a location from a known coordinate.
    #[must_use]
    pub const fn at(coordinate: Coordinate) -> Self {
        Self {
            latitude: Some(coordinate.latitude),
            longitude: Some(coordinate.longitude),
            address: None,
        }
    }

    /// Returns the coordinate if both axes are present and finite.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.latitude?, self.longitude?);
        coordinate.is_usable().then_some(coordinate)
    }
}

impl From<Coordinate> for Location {
    fn from(coordinate: Coordinate) -> Self {
        Self::at(coordinate)
    }
}

/// Accepts JSON numbers and numeric strings; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A comment left on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    pub id: String,
    /// Comment body.
    pub text: String,
    /// Author's user ID.
    pub user_id: String,
    /// Author's display name at the time of writing.
    pub user_name: Option<String>,
    /// Whether the author is an authority.
    #[serde(default)]
    pub is_official: bool,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
}

/// A photo attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Public URL of the stored image.
    pub url: String,
    /// When the photo was attached.
    pub created_at: DateTime<Utc>,
}

/// A problem report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Store-assigned identifier.
    pub id: String,
    /// Short headline.
    #[serde(default)]
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Where the problem is, if recorded.
    #[serde(default)]
    pub location: Option<Location>,
    /// Severity chosen by the reporter.
    pub severity: Severity,
    /// Problem category.
    pub category: Category,
    /// Triage status.
    pub status: Status,
    /// Reporting user's ID.
    #[serde(default)]
    pub reported_by: String,
    /// Reporting user's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    /// Authority user the report is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Number of citizens who upvoted this report.
    #[serde(default)]
    pub upvotes: u32,
    /// Comments in the order they were added.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Photos in the order they were attached.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// When the report was submitted.
    pub created_at: DateTime<Utc>,
    /// When the report was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Builds a freshly submitted report from reporter input.
    ///
    /// New reports start as [`Status::Reported`] with no upvotes,
    /// comments, or assignee.
    #[must_use]
    pub fn from_input(
        id: impl Into<String>,
        input: NewReport,
        reported_by: impl Into<String>,
        reporter_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            description: input.description,
            location: Some(Location::at(input.location)),
            severity: input.severity,
            category: input.category,
            status: Status::Reported,
            reported_by: reported_by.into(),
            reporter_name,
            assigned_to: None,
            upvotes: 0,
            comments: Vec::new(),
            photos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the report's usable coordinate, if any.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.location.as_ref().and_then(Location::coordinate)
    }
}

/// Reporter-supplied fields for a new report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Short headline.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Where the problem is.
    pub location: Coordinate,
    /// Severity chosen by the reporter.
    pub severity: Severity,
    /// Problem category.
    pub category: Category,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity-provider user ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Whether the user can triage and resolve reports.
    #[serde(default)]
    pub is_authority: bool,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// IDs of reports this user submitted.
    #[serde(default)]
    pub reported_problems: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_names_are_screaming_snake_case() {
        assert_eq!(Category::PublicLighting.to_string(), "PUBLIC_LIGHTING");
        assert_eq!(Status::InReview.as_ref(), "IN_REVIEW");
        assert_eq!("MEDIUM".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }

    #[test]
    fn only_resolved_and_closed_count_as_resolved() {
        let resolved: Vec<Status> = Status::all()
            .iter()
            .copied()
            .filter(|s| s.is_resolved())
            .collect();
        assert_eq!(resolved, vec![Status::Resolved, Status::Closed]);
    }

    #[test]
    fn heatmap_weight_increases_with_severity() {
        for window in Severity::all().windows(2) {
            assert!(window[0].heatmap_weight() < window[1].heatmap_weight());
        }
    }

    #[test]
    fn location_accepts_numbers_and_numeric_strings() {
        let loc: Location =
            serde_json::from_str(r#"{"latitude": -23.55, "longitude": "-46.63"}"#).unwrap();
        assert_eq!(loc.coordinate(), Some(Coordinate::new(-23.55, -46.63)));
    }

    #[test]
    fn location_with_bad_axis_has_no_coordinate() {
        let missing: Location = serde_json::from_str(r#"{"latitude": 10.0}"#).unwrap();
        assert!(missing.coordinate().is_none());

        let garbage: Location =
            serde_json::from_str(r#"{"latitude": "north", "longitude": 3.0}"#).unwrap();
        assert!(garbage.latitude.is_none());
        assert!(garbage.coordinate().is_none());

        let infinite = Location::at(Coordinate::new(f64::INFINITY, 0.0));
        assert!(infinite.coordinate().is_none());
    }

    #[test]
    fn zero_coordinate_is_usable() {
        let loc = Location::at(Coordinate::new(0.0, 0.0));
        assert_eq!(loc.coordinate(), Some(Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn report_document_deserializes_with_defaults() {
        let json = r#"{
            "id": "abc",
            "title": "Buraco na rua",
            "location": {"latitude": -23.5, "longitude": -46.6, "address": "Rua A"},
            "severity": "HIGH",
            "category": "INFRASTRUCTURE",
            "status": "REPORTED",
            "reportedBy": "u1",
            "createdAt": "2024-03-01T12:00:00Z",
            "updatedAt": "2024-03-01T12:00:00Z"
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.upvotes, 0);
        assert!(report.comments.is_empty());
        assert!(report.photos.is_empty());
        assert_eq!(report.coordinate(), Some(Coordinate::new(-23.5, -46.6)));
    }

    #[test]
    fn new_report_starts_reported() {
        let now = Utc::now();
        let report = Report::from_input(
            "r1",
            NewReport {
                title: "Poste apagado".to_string(),
                description: "Sem luz desde ontem".to_string(),
                location: Coordinate::new(-22.9, -43.2),
                severity: Severity::Medium,
                category: Category::PublicLighting,
            },
            "u1",
            Some("Ana".to_string()),
            now,
        );
        assert_eq!(report.status, Status::Reported);
        assert_eq!(report.upvotes, 0);
        assert_eq!(report.created_at, report.updated_at);
        assert_eq!(report.coordinate(), Some(Coordinate::new(-22.9, -43.2)));
    }
}
