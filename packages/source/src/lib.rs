#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Seizure data loaders.
//!
//! Loads the seizure worksheet ([`records`]) and the police unit reference
//! table ([`units`]) described by a [`config::DashboardConfig`]. Loaded
//! data is meant to be memoized for a short while with [`cache::TtlCache`].

pub mod cache;
pub mod config;
pub mod parsing;
pub mod records;
pub mod units;

use seizure_map_seizure_models::{SeizureRecord, UnitDirectory};

use crate::config::DashboardConfig;
use crate::records::RecordLoadStats;

/// Errors that can occur while loading dashboard data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file could not be read.
    #[error("Failed to read {path}: {source}")]
    File {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration document is invalid.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// A required column header is absent.
    #[error("Missing column '{column}' in {table}")]
    MissingColumn {
        /// Expected header.
        column: String,
        /// Which table was being read.
        table: String,
    },
}

/// Everything the pipeline needs from the outside world.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    /// Seizure records in worksheet order.
    pub records: Vec<SeizureRecord>,
    /// Per-row outcome counters of the worksheet load.
    pub record_stats: RecordLoadStats,
    /// Unit coordinate lookup table.
    pub units: UnitDirectory,
}

/// Loads the unit reference table and the seizure worksheet.
///
/// The reference table is read first so that a missing local file fails
/// fast, before any network traffic.
///
/// # Errors
///
/// Returns [`SourceError`] if either source cannot be loaded.
pub async fn load_sources(config: &DashboardConfig) -> Result<LoadedSources, SourceError> {
    let units = units::load_units(&config.units.path).await?;
    let load = records::load_records(&config.records).await?;

    Ok(LoadedSources {
        records: load.records,
        record_stats: load.stats,
        units,
    })
}
