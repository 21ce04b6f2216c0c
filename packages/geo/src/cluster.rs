//! Grid-snap clustering of map markers.
//!
//! Each coordinate is snapped independently per axis to the nearest
//! multiple of the bucket size, and items sharing a snapped position are
//! merged into one marker. The map client zooms into a cluster by its
//! snapped position, so the snapping here must stay exactly
//! `round(value / size) * size` with halves rounding up.

use std::collections::BTreeMap;

use cidade_alerta_report_models::Coordinate;
use serde::{Deserialize, Serialize};

use crate::Located;

/// Grid step in degrees used to bucket coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64")]
pub struct BucketSize(f64);

impl BucketSize {
    /// Roughly 500 meters of latitude.
    pub const DEFAULT: Self = Self(0.005);

    /// Creates a bucket size from a step in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if `degrees` is not a finite, positive number.
    pub fn new(degrees: f64) -> Result<Self, InvalidBucketSizeError> {
        if degrees.is_finite() && degrees > 0.0 {
            Ok(Self(degrees))
        } else {
            Err(InvalidBucketSizeError { degrees })
        }
    }

    /// Returns the step in degrees.
    #[must_use]
    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Grid index of a single axis value. Halves round toward positive
    /// infinity.
    #[allow(clippy::cast_possible_truncation)]
    fn index(self, value: f64) -> i64 {
        (value / self.0 + 0.5).floor() as i64
    }

    fn key(self, coordinate: Coordinate) -> BucketKey {
        BucketKey {
            latitude: self.index(coordinate.latitude),
            longitude: self.index(coordinate.longitude),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn snap(self, key: BucketKey) -> Coordinate {
        Coordinate::new(key.latitude as f64 * self.0, key.longitude as f64 * self.0)
    }
}

impl TryFrom<f64> for BucketSize {
    type Error = InvalidBucketSizeError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}

impl Default for BucketSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error returned when a bucket size is zero, negative, or not finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidBucketSizeError {
    /// The rejected step in degrees.
    pub degrees: f64,
}

impl std::fmt::Display for InvalidBucketSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid bucket size {}: expected a finite positive number of degrees",
            self.degrees
        )
    }
}

impl std::error::Error for InvalidBucketSizeError {}

/// Quantized grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct BucketKey {
    latitude: i64,
    longitude: i64,
}

/// Two or more items sharing a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster<T> {
    /// Snapped position of the grid cell.
    pub coordinate: Coordinate,
    /// Number of members.
    pub count: usize,
    /// Every member, in input order.
    pub members: Vec<T>,
}

impl<T> Cluster<T> {
    /// Stable marker identifier derived from the snapped position.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "cluster-{},{}",
            self.coordinate.latitude, self.coordinate.longitude
        )
    }
}

/// A marker to draw on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MapMarker<T> {
    /// One item drawn at its exact position.
    Single {
        /// The item's own coordinate.
        coordinate: Coordinate,
        /// The item.
        item: T,
    },
    /// Several items drawn as one badge at the cell position.
    Cluster(Cluster<T>),
}

impl<T> MapMarker<T> {
    /// Where the marker is drawn.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Self::Single { coordinate, .. } => *coordinate,
            Self::Cluster(cluster) => cluster.coordinate,
        }
    }

    /// Number of items behind the marker.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Cluster(cluster) => cluster.count,
        }
    }

    /// Markers always represent at least one item.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether this marker merges several items.
    #[must_use]
    pub const fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }
}

/// Groups items into map markers by grid cell.
///
/// Cells with one member yield [`MapMarker::Single`] at the member's exact
/// coordinate; cells with more yield [`MapMarker::Cluster`] at the snapped
/// cell position. Markers are returned in the order their cells were
/// first seen. Items without a usable coordinate are dropped.
#[must_use]
pub fn cluster<T: Located + Clone>(items: &[T], bucket_size: BucketSize) -> Vec<MapMarker<T>> {
    let mut slots: BTreeMap<BucketKey, usize> = BTreeMap::new();
    let mut buckets: Vec<(BucketKey, Vec<(Coordinate, T)>)> = Vec::new();
    let mut dropped = 0_usize;

    for item in items {
        let Some(coordinate) = item.coordinate() else {
            dropped += 1;
            continue;
        };
        let key = bucket_size.key(coordinate);
        let slot = *slots.entry(key).or_insert_with(|| {
            buckets.push((key, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push((coordinate, item.clone()));
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} item(s) without a usable coordinate from clustering");
    }
    log::debug!(
        "Clustered {} item(s) into {} cell(s) at {} degrees",
        items.len() - dropped,
        buckets.len(),
        bucket_size.degrees()
    );

    buckets
        .into_iter()
        .map(|(key, mut members)| {
            if members.len() == 1 {
                let (coordinate, item) = members.remove(0);
                MapMarker::Single { coordinate, item }
            } else {
                let members: Vec<T> = members.into_iter().map(|(_, item)| item).collect();
                MapMarker::Cluster(Cluster {
                    coordinate: bucket_size.snap(key),
                    count: members.len(),
                    members,
                })
            }
        })
        .collect()
}

/// Builds the markers for a map view.
///
/// With `grouped` set, this is [`cluster`]; otherwise every located item
/// becomes its own [`MapMarker::Single`].
#[must_use]
pub fn markers<T: Located + Clone>(
    items: &[T],
    bucket_size: BucketSize,
    grouped: bool,
) -> Vec<MapMarker<T>> {
    if grouped {
        return cluster(items, bucket_size);
    }

    items
        .iter()
        .filter_map(|item| {
            item.coordinate().map(|coordinate| MapMarker::Single {
                coordinate,
                item: item.clone(),
            })
        })
        .collect()
}
