//! Dashboard configuration.
//!
//! The default configuration is baked into the binary at compile time via
//! [`include_str!`]. Setting `SEIZURE_MAP_CONFIG` to the path of another
//! TOML file replaces it wholesale.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::SourceError;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "SEIZURE_MAP_CONFIG";

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Base URL of Google Sheets documents.
const GOOGLE_SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Complete dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Where seizure records come from and how long they stay cached.
    pub records: RecordsConfig,
    /// Where the unit reference table lives.
    pub units: UnitsConfig,
    /// Initial map view.
    #[serde(default)]
    pub map: MapConfig,
}

/// Seizure worksheet settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    /// Seconds a loaded dataset is reused before it is fetched again.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Whether ambiguous `a/b/yyyy` dates are read day-first.
    #[serde(default = "default_day_first")]
    pub day_first: bool,
    /// Location of the worksheet.
    pub source: RecordSourceConfig,
}

/// Where the seizure worksheet is read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordSourceConfig {
    /// A Google Sheets worksheet, read through its CSV export endpoint.
    GoogleSheet {
        /// Spreadsheet document ID (the long segment of the sheet URL).
        spreadsheet_id: String,
        /// Worksheet (tab) name.
        worksheet: String,
    },
    /// A CSV file served over HTTP(S).
    CsvUrl {
        /// Download URL.
        url: String,
    },
    /// A CSV file on the local filesystem.
    CsvFile {
        /// File path, relative to the working directory.
        path: PathBuf,
    },
}

impl RecordSourceConfig {
    /// Short human-readable description for log messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::GoogleSheet {
                spreadsheet_id,
                worksheet,
            } => format!("Google Sheet {spreadsheet_id} / {worksheet}"),
            Self::CsvUrl { url } => url.clone(),
            Self::CsvFile { path } => path.display().to_string(),
        }
    }
}

/// Builds the CSV export URL for a Google Sheets spreadsheet.
///
/// The worksheet name is passed separately as the `sheet` query parameter.
#[must_use]
pub fn google_sheet_csv_url(spreadsheet_id: &str) -> String {
    format!("{GOOGLE_SHEETS_BASE_URL}/{spreadsheet_id}/gviz/tq")
}

/// Unit reference table settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitsConfig {
    /// Path of the reference CSV file.
    pub path: PathBuf,
}

/// Initial view of the unit map.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapConfig {
    /// `[latitude, longitude]` of the map center.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [41.3851, 2.1734],
            zoom: 8,
        }
    }
}

const fn default_cache_ttl_secs() -> u64 {
    5
}

const fn default_day_first() -> bool {
    true
}

impl DashboardConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the TOML is malformed, does not
    /// match the expected shape, or `cache_ttl_secs` is too large to
    /// represent as a duration.
    pub fn parse(toml_str: &str) -> Result<Self, SourceError> {
        let config: Self = toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
            message: e.to_string(),
        })?;

        if ttl_from_secs(config.records.cache_ttl_secs).is_none() {
            return Err(SourceError::Config {
                message: format!(
                    "records.cache_ttl_secs = {} is out of range",
                    config.records.cache_ttl_secs
                ),
            });
        }

        Ok(config)
    }

    /// Returns the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded document is invalid.
    pub fn embedded() -> Result<Self, SourceError> {
        Self::parse(DEFAULT_CONFIG_TOML)
    }

    /// Reads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], falling back to the
    /// embedded default when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the configured file cannot be read or
    /// either document fails to parse.
    pub fn from_env() -> Result<Self, SourceError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading configuration from {path}");
                Self::from_path(Path::new(path.trim()))
            }
            _ => {
                log::debug!("{CONFIG_ENV_VAR} not set, using embedded configuration");
                Self::embedded()
            }
        }
    }

    /// Cache lifetime of a loaded dataset.
    ///
    /// Values beyond what [`chrono::Duration`] can hold saturate; [`Self::parse`]
    /// already rejects them.
    #[must_use]
    pub fn cache_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.records.cache_ttl_secs).unwrap_or_else(chrono::Duration::max_value)
    }
}

fn ttl_from_secs(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = DashboardConfig::embedded().unwrap();
        assert_eq!(config.records.cache_ttl_secs, 5);
        assert!(config.records.day_first);
        assert!(matches!(
            config.records.source,
            RecordSourceConfig::CsvFile { .. }
        ));
        assert_eq!(config.units.path, PathBuf::from("data/unitats.csv"));
        assert_eq!(config.map.zoom, 8);
    }

    #[test]
    fn parses_google_sheet_source_with_defaults() {
        let config = DashboardConfig::parse(
            r#"
            [records.source]
            type = "google_sheet"
            spreadsheet_id = "abc123"
            worksheet = "dadesdaga"

            [units]
            path = "unitats.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.records.cache_ttl_secs, 5);
        assert_eq!(config.map, MapConfig::default());
        match &config.records.source {
            RecordSourceConfig::GoogleSheet {
                spreadsheet_id,
                worksheet,
            } => {
                assert_eq!(spreadsheet_id, "abc123");
                assert_eq!(worksheet, "dadesdaga");
            }
            other => panic!("unexpected source: {other:?}"),
        }
        assert_eq!(config.cache_ttl(), chrono::Duration::seconds(5));
    }

    #[test]
    fn rejects_unknown_source_type() {
        let result = DashboardConfig::parse(
            r#"
            [records.source]
            type = "ftp"
            [units]
            path = "unitats.csv"
            "#,
        );
        assert!(matches!(result, Err(SourceError::Config { .. })));
    }

    #[test]
    fn rejects_cache_ttl_beyond_duration_range() {
        let result = DashboardConfig::parse(
            r#"
            [records]
            cache_ttl_secs = 100000000000000000

            [records.source]
            type = "csv_file"
            path = "dadesdaga.csv"

            [units]
            path = "unitats.csv"
            "#,
        );
        assert!(matches!(
            result,
            Err(SourceError::Config { ref message }) if message.contains("cache_ttl_secs")
        ));
    }

    #[test]
    fn builds_google_sheet_export_url() {
        assert_eq!(
            google_sheet_csv_url("abc123"),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq"
        );
    }
}
