//! Plain-text tables for terminal output.

use cidade_alerta_analytics_models::DashboardSummary;
use cidade_alerta_geo::{DistanceAnnotatedReport, HeatmapPoint, MapMarker, format_distance};
use cidade_alerta_report_models::Report;

fn nearby_rows(nearby: &[DistanceAnnotatedReport]) -> Vec<String> {
    nearby
        .iter()
        .map(|n| {
            format!(
                "{:>8}  {:<20} {:<15} {:<8} {}",
                format_distance(n.distance),
                n.item.id,
                n.item.category,
                n.item.severity,
                n.item.title
            )
        })
        .collect()
}

fn marker_rows(markers: &[MapMarker<Report>]) -> Vec<String> {
    markers
        .iter()
        .map(|marker| {
            let position = marker.coordinate();
            let label = match marker {
                MapMarker::Single { item, .. } => item.id.clone(),
                MapMarker::Cluster(cluster) => cluster.id(),
            };
            format!(
                "{:<32} {:>10.5} {:>11.5} {:>5}",
                label,
                position.latitude,
                position.longitude,
                marker.len()
            )
        })
        .collect()
}

pub fn print_nearby(nearby: &[DistanceAnnotatedReport]) {
    println!("{:>8}  {:<20} {:<15} {:<8} TITLE", "DISTANCE", "ID", "CATEGORY", "SEVERITY");
    println!("{}", "-".repeat(72));
    for row in nearby_rows(nearby) {
        println!("{row}");
    }
    println!("{} report(s)", nearby.len());
}

pub fn print_markers(markers: &[MapMarker<Report>]) {
    println!("{:<32} {:>10} {:>11} {:>5}", "MARKER", "LATITUDE", "LONGITUDE", "COUNT");
    println!("{}", "-".repeat(61));
    for row in marker_rows(markers) {
        println!("{row}");
    }
    let clusters = markers.iter().filter(|m| m.is_cluster()).count();
    println!("{} marker(s), {clusters} cluster(s)", markers.len());
}

pub fn print_dashboard(summary: &DashboardSummary) {
    println!("Total:    {}", summary.total);
    println!("Resolved: {}", summary.resolved_count);
    println!("Pending:  {}", summary.pending_count);

    println!();
    println!("{:<16} COUNT", "CATEGORY");
    for entry in &summary.by_category {
        println!("{:<16} {}", entry.category, entry.count);
    }

    println!();
    println!("{:<16} COUNT", "SEVERITY");
    for entry in &summary.by_severity {
        println!("{:<16} {}", entry.severity, entry.count);
    }

    println!();
    println!("Recent:");
    for report in &summary.recent {
        println!(
            "  {}  {:<20} {:<12} {}",
            report.created_at.format("%Y-%m-%d %H:%M"),
            report.id,
            report.status,
            report.title
        );
    }
}

pub fn print_heatmap(points: &[HeatmapPoint]) {
    println!("{:>10} {:>11} {:>6}", "LATITUDE", "LONGITUDE", "WEIGHT");
    for point in points {
        println!(
            "{:>10.5} {:>11.5} {:>6.1}",
            point.latitude, point.longitude, point.weight
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cidade_alerta_geo::{BucketSize, Coordinate, Nearby, cluster};
    use cidade_alerta_report_models::{Category, NewReport, Severity};

    use super::*;

    fn report(id: &str, latitude: f64, longitude: f64) -> Report {
        Report::from_input(
            id,
            NewReport {
                title: format!("Buraco {id}"),
                description: String::new(),
                location: Coordinate::new(latitude, longitude),
                severity: Severity::High,
                category: Category::Infrastructure,
            },
            "u1",
            None,
            Utc::now(),
        )
    }

    #[test]
    fn nearby_rows_show_formatted_distance() {
        let rows = nearby_rows(&[Nearby {
            item: report("r1", 0.0, 0.0),
            distance: 1500.0,
        }]);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].trim_start().starts_with("1.5km"));
        assert!(rows[0].contains("INFRASTRUCTURE"));
        assert!(rows[0].ends_with("Buraco r1"));
    }

    #[test]
    fn marker_rows_label_clusters_by_cell() {
        let reports = vec![report("a", 0.0, 0.0), report("b", 0.0, 0.001), report("c", 1.0, 1.0)];
        let rows = marker_rows(&cluster(&reports, BucketSize::DEFAULT));

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("cluster-"));
        assert!(rows[0].ends_with('2'));
        assert!(rows[1].starts_with('c'));
    }
}
