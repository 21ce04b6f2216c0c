#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for Cidade Alerta.
//!
//! Serves the REST API the map and dashboard clients use: filtered
//! problem listings, the "near you" view, clustered map markers, heatmap
//! points and the authority dashboard. Reports and user accounts are
//! loaded once at startup from the JSON files named in the config.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use cidade_alerta_store::{
    IdentityProvider, InMemoryIdentityProvider, InMemoryReportStore, ReportStore, StoreError,
};

pub use config::{ConfigError, GeoConfig, ServerConfig};

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report or user data could not be loaded.
    #[error("Failed to load data: {0}")]
    Store(#[from] StoreError),

    /// The HTTP server failed to bind or run.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Source of problem reports.
    pub reports: Arc<dyn ReportStore>,
    /// Credential verification and user lookup.
    pub identity: Arc<dyn IdentityProvider>,
    /// Defaults for radius and bucket size.
    pub geo: GeoConfig,
    /// Number of reports loaded at startup, for the health check.
    pub report_count: usize,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/taxonomy", web::get().to(handlers::taxonomy))
            .route("/problems", web::get().to(handlers::problems))
            .route("/problems/{id}", web::get().to(handlers::problem))
            .route("/nearby", web::get().to(handlers::nearby))
            .route("/nearby/count", web::get().to(handlers::nearby_count))
            .route("/markers", web::get().to(handlers::markers))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Starts the Cidade Alerta API server.
///
/// Loads the configuration, reads the report and user files, and runs
/// the HTTP server until it is shut down. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the config or data files cannot be loaded,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;

    log::info!("Loading reports from {}...", config.data.reports.display());
    let reports = InMemoryReportStore::load(&config.data.reports).await?;

    log::info!("Loading users from {}...", config.data.users.display());
    let identity = InMemoryIdentityProvider::load(&config.data.users).await?;

    let state = web::Data::new(AppState {
        report_count: reports.len(),
        reports: Arc::new(reports),
        identity: Arc::new(identity),
        geo: config.geo,
    });

    let bind_addr = config.server.bind_addr;
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
