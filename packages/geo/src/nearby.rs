//! Proximity filtering around a reference point.

use cidade_alerta_report_models::{Coordinate, Report};
use serde::Serialize;

use crate::{Located, distance::distance};

/// An item annotated with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nearby<T> {
    /// The original item.
    #[serde(flatten)]
    pub item: T,
    /// Distance from the reference point, in meters.
    pub distance: f64,
}

/// A report annotated with its distance in meters.
pub type DistanceAnnotatedReport = Nearby<Report>;

impl<T: Located> Located for Nearby<T> {
    fn coordinate(&self) -> Option<Coordinate> {
        self.item.coordinate()
    }
}

/// Returns the items within `radius_m` meters of `reference`, closest
/// first.
///
/// Items without a usable coordinate are skipped. Items at the same
/// distance keep their input order.
#[must_use]
pub fn filter_nearby<T: Located + Clone>(
    reference: Coordinate,
    radius_m: f64,
    items: &[T],
) -> Vec<Nearby<T>> {
    let mut skipped = 0_usize;
    let mut nearby: Vec<Nearby<T>> = items
        .iter()
        .filter_map(|item| {
            let Some(coordinate) = item.coordinate() else {
                skipped += 1;
                return None;
            };
            let distance = distance(reference, coordinate);
            (distance <= radius_m).then(|| Nearby {
                item: item.clone(),
                distance,
            })
        })
        .collect();

    // `sort_by` is stable, so equal distances keep input order.
    nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    if skipped > 0 {
        log::debug!("Skipped {skipped} item(s) without a usable coordinate");
    }
    log::debug!(
        "{} of {} item(s) within {radius_m}m of ({}, {})",
        nearby.len(),
        items.len(),
        reference.latitude,
        reference.longitude
    );

    nearby
}

/// Counts the items within `radius_m` meters of `reference`.
#[must_use]
pub fn count_nearby<T: Located>(reference: Coordinate, radius_m: f64, items: &[T]) -> usize {
    items
        .iter()
        .filter_map(|item| item.coordinate())
        .filter(|c| distance(reference, *c) <= radius_m)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{report_at, unlocated};

    fn ids(nearby: &[DistanceAnnotatedReport]) -> Vec<String> {
        nearby.iter().map(|n| n.item.id.clone()).collect()
    }

    #[test]
    fn returns_reports_within_radius_closest_first() {
        let reports = vec![
            report_at("far", 0.0, 0.01),
            report_at("mid", 0.0, 0.003),
            report_at("here", 0.0, 0.0),
        ];

        let result = filter_nearby(Coordinate::new(0.0, 0.0), 500.0, &reports);

        assert_eq!(ids(&result), vec!["here", "mid"]);
        assert!(result[0].distance.abs() < f64::EPSILON);
        assert!((result[1].distance - 333.58).abs() < 0.5);
    }

    #[test]
    fn every_result_is_within_radius_and_sorted() {
        let reports: Vec<_> = (0..20)
            .map(|i| report_at(&i.to_string(), f64::from(i) * 0.0007, f64::from(20 - i) * 0.0004))
            .collect();
        let reference = Coordinate::new(0.005, 0.004);

        let result = filter_nearby(reference, 600.0, &reports);

        assert!(!result.is_empty());
        for n in &result {
            assert!(n.distance <= 600.0);
        }
        for pair in result.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        let excluded = reports.len() - result.len();
        let farther = reports
            .iter()
            .filter(|r| distance(reference, r.coordinate().unwrap()) > 600.0)
            .count();
        assert_eq!(excluded, farther);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let reports = vec![
            report_at("east", 0.0, 0.001),
            report_at("west", 0.0, -0.001),
            report_at("east-again", 0.0, 0.001),
        ];

        let result = filter_nearby(Coordinate::new(0.0, 0.0), 1000.0, &reports);

        assert_eq!(ids(&result), vec!["east", "west", "east-again"]);
    }

    #[test]
    fn unlocated_reports_are_skipped_not_fatal() {
        let mut missing_location = report_at("none", 0.0, 0.0);
        missing_location.location = None;
        let reports = vec![unlocated("bad"), missing_location, report_at("ok", 0.0, 0.0)];

        let result = filter_nearby(Coordinate::new(0.0, 0.0), 10.0, &reports);

        assert_eq!(ids(&result), vec!["ok"]);
    }

    #[test]
    fn input_is_left_untouched() {
        let reports = vec![report_at("b", 0.0, 0.002), report_at("a", 0.0, 0.001)];
        let before = reports.clone();

        let _ = filter_nearby(Coordinate::new(0.0, 0.0), 1000.0, &reports);

        assert_eq!(reports, before);
    }

    #[test]
    fn zero_radius_keeps_exact_matches_only() {
        let reports = vec![report_at("same", 1.0, 1.0), report_at("other", 1.0, 1.0001)];

        let result = filter_nearby(Coordinate::new(1.0, 1.0), 0.0, &reports);

        assert_eq!(ids(&result), vec!["same"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let reports: Vec<Report> = Vec::new();
        assert!(filter_nearby(Coordinate::new(0.0, 0.0), 500.0, &reports).is_empty());
        assert_eq!(count_nearby(Coordinate::new(0.0, 0.0), 500.0, &reports), 0);
    }

    #[test]
    fn count_matches_filter_length() {
        let reports = vec![
            report_at("a", -23.5505, -46.6333),
            report_at("b", -23.5510, -46.6340),
            report_at("c", -23.5600, -46.6500),
            unlocated("d"),
        ];
        let reference = Coordinate::new(-23.5505, -46.6333);

        assert_eq!(
            count_nearby(reference, 300.0, &reports),
            filter_nearby(reference, 300.0, &reports).len()
        );
        assert_eq!(count_nearby(reference, 300.0, &reports), 2);
    }

    #[test]
    fn works_over_bare_coordinates() {
        let points = [Coordinate::new(0.0, 0.0), Coordinate::new(f64::NAN, 0.0)];

        let result = filter_nearby(Coordinate::new(0.0, 0.0), 1.0, &points);

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn serializes_item_fields_alongside_distance() {
        let result = filter_nearby(
            Coordinate::new(0.0, 0.0),
            10.0,
            &[report_at("x", 0.0, 0.0)],
        );

        let json = serde_json::to_value(&result[0]).unwrap();

        assert_eq!(json["id"], "x");
        assert_eq!(json["distance"], 0.0);
    }
}
