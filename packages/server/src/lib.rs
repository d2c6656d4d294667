#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the seizure dashboard.
//!
//! Serves the chart series, unit positions and map markers computed by
//! `seizure_map_analytics` for a given date range and region. The loaded
//! dataset is memoized for the configured TTL; the first request after it
//! expires refetches the worksheet before answering.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{DateTime, Utc};
use seizure_map_analytics::Dataset;
use seizure_map_source::SourceError;
use seizure_map_source::cache::TtlCache;
use seizure_map_source::config::DashboardConfig;
use tokio::sync::Mutex;

/// A prepared dataset and the moment its sources were fetched.
#[derive(Debug)]
pub struct LoadedDataset {
    /// Joined records and filter defaults.
    pub dataset: Dataset,
    /// When the sources were fetched.
    pub loaded_at: DateTime<Utc>,
}

/// Loads both sources and prepares the dataset.
///
/// # Errors
///
/// Returns [`SourceError`] if the worksheet or the unit reference table
/// cannot be loaded.
pub async fn load_dataset(config: &DashboardConfig) -> Result<LoadedDataset, SourceError> {
    let loaded_at = Utc::now();
    let sources = seizure_map_source::load_sources(config).await?;
    let dataset = Dataset::prepare(sources.records, &sources.units);

    Ok(LoadedDataset { dataset, loaded_at })
}

/// Shared application state.
pub struct AppState {
    /// Dashboard configuration.
    pub config: DashboardConfig,
    /// Memoized dataset. Requests wait on the lock while a refetch runs.
    cache: Mutex<TtlCache<Arc<LoadedDataset>>>,
}

impl AppState {
    /// Creates state with an empty cache.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let ttl = config.cache_ttl();
        Self {
            config,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// Returns the cached dataset, refetching it if the TTL has expired.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a refetch is needed and fails. The stale
    /// value is not served in that case.
    pub async fn dataset(&self) -> Result<Arc<LoadedDataset>, SourceError> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now();

        if let Some(loaded) = cache.get(now) {
            return Ok(Arc::clone(loaded));
        }

        log::debug!("Dataset cache miss, loading sources");
        let loaded = Arc::new(load_dataset(&self.config).await?);
        cache.store(Arc::clone(&loaded), now);

        Ok(loaded)
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filters))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/markers", web::get().to(handlers::markers))
            .route("/map", web::get().to(handlers::map_view)),
    );
}

/// Starts the seizure dashboard API server.
///
/// Reads the configuration, loads the dataset once (a failure here aborts
/// startup), and serves the API on `BIND_ADDR:PORT`. This is a regular
/// async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration or initial load
/// fails, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();

    let config = DashboardConfig::from_env().map_err(std::io::Error::other)?;
    let state = AppState::new(config);

    log::info!("Loading initial dataset...");
    let loaded = state.dataset().await.map_err(std::io::Error::other)?;
    log::info!(
        "Dataset ready: {} records, {} regions",
        loaded.dataset.records().len(),
        loaded.dataset.regions().len()
    );

    let state = web::Data::new(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

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
    .await
}
