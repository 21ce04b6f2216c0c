//! HTTP handler functions for the Cidade Alerta API.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, http::header, web};
use cidade_alerta_geo::{
    BucketSize, Coordinate, DistanceUnit, count_nearby, filter_nearby, heatmap_points,
};
use cidade_alerta_report_models::Report;
use cidade_alerta_server_models::{
    ApiError, ApiHealth, ApiMarker, ApiReport, ApiTaxonomy, MarkerQueryParams, NearbyCount,
    NearbyQueryParams, NearbyResponse, ProblemQueryParams,
};
use cidade_alerta_store::{ReportQuery, StoreError, require_authority};

use crate::AppState;

/// Failure of a single request.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The query string was well-formed but its values were not usable.
    #[error("{0}")]
    BadRequest(String),

    /// A collaborator refused or failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Unauthenticated { .. }) => StatusCode::UNAUTHORIZED,
            Self::Store(StoreError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Io(_) | StoreError::Json(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::warn!("Request rejected ({status}): {self}");
        }

        let error = if status.is_server_error() {
            "internal error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ApiError { error })
    }
}

/// Builds the reference coordinate from optional query parameters.
///
/// Both or neither must be given.
fn reference(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinate>, HandlerError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) => usable(latitude, longitude).map(Some),
        _ => Err(HandlerError::BadRequest(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

fn usable(latitude: f64, longitude: f64) -> Result<Coordinate, HandlerError> {
    let coordinate = Coordinate::new(latitude, longitude);
    if coordinate.is_usable() {
        Ok(coordinate)
    } else {
        Err(HandlerError::BadRequest(format!(
            "invalid location ({latitude}, {longitude})"
        )))
    }
}

fn radius_m(radius: Option<f64>, unit: DistanceUnit, default_m: f64) -> Result<f64, HandlerError> {
    let meters = radius.map_or(default_m, |r| unit.to_meters(r));
    if meters.is_finite() && meters >= 0.0 {
        Ok(meters)
    } else {
        Err(HandlerError::BadRequest(format!(
            "radius must be a non-negative number, got {meters}"
        )))
    }
}

/// Applies the optional proximity filter. Without a reference location
/// reports pass through unchanged, in store order.
fn within(reports: &[Report], reference: Option<Coordinate>, radius_m: f64) -> Vec<ApiReport> {
    reference.map_or_else(
        || reports.iter().cloned().map(ApiReport::from).collect(),
        |reference| {
            filter_nearby(reference, radius_m, reports)
                .into_iter()
                .map(ApiReport::from)
                .collect()
        },
    )
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        report_count: state.report_count,
    })
}

/// `GET /api/taxonomy`
pub async fn taxonomy() -> HttpResponse {
    HttpResponse::Ok().json(ApiTaxonomy::current())
}

/// `GET /api/problems`
///
/// Lists reports matching the category, severity and status filters.
/// With a reference location, only reports within the radius are kept,
/// closest first.
pub async fn problems(
    state: web::Data<AppState>,
    params: web::Query<ProblemQueryParams>,
) -> Result<HttpResponse, HandlerError> {
    let reference = reference(params.latitude, params.longitude)?;
    let radius = radius_m(
        params.radius,
        params.unit.unwrap_or_default(),
        state.geo.search_radius_m(),
    )?;

    let reports = state
        .reports
        .query(&ReportQuery {
            category: params.category,
            severity: params.severity,
            status: params.status,
        })
        .await?;

    Ok(HttpResponse::Ok().json(within(&reports, reference, radius)))
}

/// `GET /api/problems/{id}`
pub async fn problem(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, HandlerError> {
    let report = state.reports.get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiReport::from(report)))
}

/// `GET /api/nearby`
///
/// Reports within the radius of the given location, closest first, each
/// with its distance.
pub async fn nearby(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> Result<HttpResponse, HandlerError> {
    let reference = usable(params.latitude, params.longitude)?;
    let radius = radius_m(
        params.radius,
        DistanceUnit::Meters,
        state.geo.nearby_radius_m,
    )?;

    let reports = state.reports.query(&ReportQuery::default()).await?;
    let reports: Vec<ApiReport> = filter_nearby(reference, radius, &reports)
        .into_iter()
        .map(ApiReport::from)
        .collect();

    log::debug!(
        "{} report(s) within {radius}m of ({}, {})",
        reports.len(),
        reference.latitude,
        reference.longitude
    );

    Ok(HttpResponse::Ok().json(NearbyResponse {
        radius,
        count: reports.len(),
        reports,
    }))
}

/// `GET /api/nearby/count`
///
/// Number of reports within the radius, for the "problems near you"
/// indicator.
pub async fn nearby_count(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> Result<HttpResponse, HandlerError> {
    let reference = usable(params.latitude, params.longitude)?;
    let radius = radius_m(
        params.radius,
        DistanceUnit::Meters,
        state.geo.nearby_radius_m,
    )?;

    let reports = state.reports.query(&ReportQuery::default()).await?;

    Ok(HttpResponse::Ok().json(NearbyCount {
        radius,
        count: count_nearby(reference, radius, &reports),
    }))
}

/// `GET /api/markers`
///
/// Map markers for the filtered reports. Reports sharing a grid cell are
/// merged into a cluster unless `grouped=false`.
pub async fn markers(
    state: web::Data<AppState>,
    params: web::Query<MarkerQueryParams>,
) -> Result<HttpResponse, HandlerError> {
    let reference = reference(params.latitude, params.longitude)?;
    let radius = radius_m(
        params.radius,
        DistanceUnit::Meters,
        state.geo.nearby_radius_m,
    )?;
    let bucket_size = params
        .bucket_size
        .map(BucketSize::new)
        .transpose()
        .map_err(|e| HandlerError::BadRequest(e.to_string()))?
        .unwrap_or(state.geo.bucket_size);

    let reports = state
        .reports
        .query(&ReportQuery {
            category: params.category,
            severity: params.severity,
            status: None,
        })
        .await?;
    let reports = within(&reports, reference, radius);

    let markers: Vec<ApiMarker> =
        cidade_alerta_geo::markers(&reports, bucket_size, params.grouped.unwrap_or(true))
            .into_iter()
            .map(ApiMarker::from)
            .collect();

    Ok(HttpResponse::Ok().json(markers))
}

/// `GET /api/heatmap`
pub async fn heatmap(state: web::Data<AppState>) -> Result<HttpResponse, HandlerError> {
    let reports = state.reports.query(&ReportQuery::default()).await?;
    Ok(HttpResponse::Ok().json(heatmap_points(&reports)))
}

/// `GET /api/dashboard`
///
/// Summary counts for authority users. Requires an
/// `Authorization: Bearer <token>` header.
pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, HandlerError> {
    let credential = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let user = require_authority(state.identity.as_ref(), credential).await?;
    log::info!("Dashboard requested by {}", user.id);

    let reports = state.reports.query(&ReportQuery::default()).await?;
    Ok(HttpResponse::Ok().json(cidade_alerta_analytics::aggregate(&reports)))
}
