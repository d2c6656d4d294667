//! HTTP handler functions for the seizure dashboard API.

use actix_web::{HttpResponse, web};
use seizure_map_analytics::markers::unit_markers;
use seizure_map_server_models::{
    ApiDashboard, ApiError, ApiFilterOptions, ApiHealth, ApiMapView, DashboardQueryParams,
    MAP_TITLE,
};
use seizure_map_source::SourceError;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Returns the default date range and the region selector options.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    match state.dataset().await {
        Ok(loaded) => {
            HttpResponse::Ok().json(ApiFilterOptions::from(loaded.dataset.filter_options()))
        }
        Err(e) => load_failed(&e),
    }
}

/// `GET /api/dashboard`
///
/// Filters the dataset by date range and region and returns both chart
/// series and the unit positions.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let loaded = match state.dataset().await {
        Ok(loaded) => loaded,
        Err(e) => return load_failed(&e),
    };

    let filter = loaded
        .dataset
        .resolve_filter(params.from, params.to, params.region_selection());
    let summary = loaded.dataset.summarize(filter.as_ref());

    HttpResponse::Ok().json(ApiDashboard::new(filter, summary, loaded.loaded_at))
}

/// `GET /api/markers`
///
/// Returns a `GeoJSON` `FeatureCollection` with one point per unit that
/// has coordinates, for the same filter parameters as `/api/dashboard`.
pub async fn markers(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let loaded = match state.dataset().await {
        Ok(loaded) => loaded,
        Err(e) => return load_failed(&e),
    };

    let filter = loaded
        .dataset
        .resolve_filter(params.from, params.to, params.region_selection());
    let summary = loaded.dataset.summarize(filter.as_ref());

    HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(unit_markers(&summary.unit_positions))
}

/// `GET /api/map`
///
/// Returns the initial map view from the configuration.
pub async fn map_view(state: web::Data<AppState>) -> HttpResponse {
    let map = state.config.map;
    HttpResponse::Ok().json(ApiMapView {
        title: MAP_TITLE.to_string(),
        center_latitude: map.center[0],
        center_longitude: map.center[1],
        zoom: map.zoom,
    })
}

fn load_failed(e: &SourceError) -> HttpResponse {
    log::error!("Failed to load dashboard data: {e}");
    HttpResponse::InternalServerError().json(ApiError {
        error: "Failed to load dashboard data".to_string(),
    })
}
