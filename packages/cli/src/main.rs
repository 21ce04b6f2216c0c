#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for inspecting Cidade Alerta report data.
//!
//! Runs the same geo-filter and dashboard operations the API server uses,
//! directly against a reports JSON file.

mod output;

use std::path::PathBuf;

use cidade_alerta_geo::{BucketSize, Coordinate, filter_nearby, heatmap_points, markers};
use cidade_alerta_store::{InMemoryReportStore, ReportQuery, ReportStore as _};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cidade_alerta", about = "Cidade Alerta report tools")]
struct Cli {
    /// JSON file holding the report array
    #[arg(long, global = true, default_value = "data/reports.json")]
    reports: PathBuf,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reports within a radius of a location, closest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        /// Radius in meters
        #[arg(long, default_value = "300")]
        radius: f64,
    },
    /// Reduce reports to map markers
    Markers {
        /// Only reports near this latitude (requires `--longitude`)
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,
        /// Only reports near this longitude (requires `--latitude`)
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,
        /// Radius in meters when a location is given
        #[arg(long, default_value = "300")]
        radius: f64,
        /// Grid step in degrees
        #[arg(long, default_value = "0.005")]
        bucket_size: f64,
        /// Emit one marker per report instead of merging grid cells
        #[arg(long)]
        ungrouped: bool,
    },
    /// Print dashboard summary counts
    Dashboard,
    /// Print weighted heatmap points
    Heatmap,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let store = InMemoryReportStore::load(&cli.reports).await?;
    let reports = store.query(&ReportQuery::default()).await?;
    log::debug!("{} report(s) available", reports.len());

    match cli.command {
        Commands::Nearby {
            latitude,
            longitude,
            radius,
        } => {
            let reference = Coordinate::new(latitude, longitude);
            let nearby = filter_nearby(reference, radius, &reports);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&nearby)?);
            } else {
                output::print_nearby(&nearby);
            }
        }
        Commands::Markers {
            latitude,
            longitude,
            radius,
            bucket_size,
            ungrouped,
        } => {
            let bucket_size = BucketSize::new(bucket_size)?;
            let reports = match latitude.zip(longitude) {
                Some((latitude, longitude)) => {
                    filter_nearby(Coordinate::new(latitude, longitude), radius, &reports)
                        .into_iter()
                        .map(|n| n.item)
                        .collect()
                }
                None => reports,
            };
            let markers = markers(&reports, bucket_size, !ungrouped);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&markers)?);
            } else {
                output::print_markers(&markers);
            }
        }
        Commands::Dashboard => {
            let summary = cidade_alerta_analytics::aggregate(&reports);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_dashboard(&summary);
            }
        }
        Commands::Heatmap => {
            let points = heatmap_points(&reports);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                output::print_heatmap(&points);
            }
        }
    }

    Ok(())
}
