//! Great-circle distance between coordinates.

use cidade_alerta_report_models::Coordinate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Unit a caller-supplied radius is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Meters.
    #[default]
    Meters,
    /// Kilometers.
    Kilometers,
}

impl DistanceUnit {
    /// Converts a value in this unit to meters.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Meters => value,
            Self::Kilometers => value * 1000.0,
        }
    }
}

/// Haversine distance between two coordinates, in meters.
///
/// Identical points yield exactly `0.0`. Inputs are not validated; a
/// non-finite axis produces `NaN`.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points.
    let h = h.min(1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Human-readable distance label: whole meters below 1 km, otherwise
/// kilometers with one decimal (`"333m"`, `"1.1km"`). Ties round up.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    // `{:.N}` rounds ties to even; the map client rounds them up.
    if meters < 1000.0 {
        format!("{:.0}m", meters.round())
    } else {
        format!("{:.1}km", (meters / 100.0).round() / 10.0)
    }
}
