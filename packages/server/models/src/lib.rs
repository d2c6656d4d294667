#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the seizure dashboard server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! pipeline outputs from `seizure_map_analytics_models` with the chart
//! and map metadata the dashboard frontend needs.

use chrono::{DateTime, NaiveDate, Utc};
use seizure_map_analytics_models::{
    ALL_REGIONS, DashboardSummary, FilterOptions, FilterState, GroupTotal, RegionSelection,
    UnitPosition,
};
use serde::{Deserialize, Serialize};

/// Dashboard page title.
pub const DASHBOARD_TITLE: &str = "Dashboard de Armes Blanques";
/// Title of the per-region chart.
pub const REGION_CHART_TITLE: &str = "Número armes blanques per regió policial";
/// Title of the per-unit chart.
pub const UNIT_CHART_TITLE: &str = "Número armes blanques per unitat";
/// Title of the unit map.
pub const MAP_TITLE: &str = "Mapa de Unitats Policials amb Número d'Armes";
/// Y-axis label shared by both charts.
pub const WEAPON_COUNT_LABEL: &str = "Número armes blanques";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Query parameters shared by the dashboard and marker endpoints.
///
/// Any parameter left out falls back to the dataset default, so an empty
/// query is the reset view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// First day included (`YYYY-MM-DD`).
    pub from: Option<NaiveDate>,
    /// Last day included (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
    /// Region label, or `"all"`.
    pub region: Option<String>,
}

impl DashboardQueryParams {
    /// The requested region constraint.
    #[must_use]
    pub fn region_selection(&self) -> RegionSelection {
        self.region
            .as_deref()
            .map_or(RegionSelection::All, |r| RegionSelection::from(r.to_string()))
    }
}

/// Values for the dashboard's filter controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    /// Earliest valid date (default start).
    pub min_date: Option<NaiveDate>,
    /// Latest valid date (default end).
    pub max_date: Option<NaiveDate>,
    /// Region selector options, `"all"` first.
    pub regions: Vec<String>,
    /// Selector value that matches every region.
    pub all_regions: String,
}

impl From<FilterOptions> for ApiFilterOptions {
    fn from(options: FilterOptions) -> Self {
        let mut regions = Vec::with_capacity(options.regions.len() + 1);
        regions.push(ALL_REGIONS.to_string());
        regions.extend(options.regions);

        Self {
            min_date: options.date_range.map(|r| r.start),
            max_date: options.date_range.map(|r| r.end),
            regions,
            all_regions: ALL_REGIONS.to_string(),
        }
    }
}

/// One bar chart: labels plus the ordered bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBarChart {
    /// Chart title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Bars, largest first.
    pub bars: Vec<GroupTotal>,
}

impl ApiBarChart {
    /// Per-region chart.
    #[must_use]
    pub fn by_region(bars: Vec<GroupTotal>) -> Self {
        Self {
            title: REGION_CHART_TITLE.to_string(),
            x_label: "Regió policial".to_string(),
            y_label: WEAPON_COUNT_LABEL.to_string(),
            bars,
        }
    }

    /// Per-unit chart.
    #[must_use]
    pub fn by_unit(bars: Vec<GroupTotal>) -> Self {
        Self {
            title: UNIT_CHART_TITLE.to_string(),
            x_label: "Unitat".to_string(),
            y_label: WEAPON_COUNT_LABEL.to_string(),
            bars,
        }
    }
}

/// Full dashboard payload for one filter state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// Page title.
    pub title: String,
    /// The filter that was applied; `None` when the dataset has no valid
    /// dates and no explicit range was given.
    pub filter: Option<FilterState>,
    /// Weapons per region.
    pub by_region: ApiBarChart,
    /// Weapons per unit.
    pub by_unit: ApiBarChart,
    /// Per-unit map data, including units that cannot be placed.
    pub unit_positions: Vec<UnitPosition>,
    /// Records that passed the filter.
    pub record_count: u64,
    /// Weapons across the records that passed the filter.
    pub total_weapons: u64,
    /// When the underlying data was fetched.
    pub loaded_at: DateTime<Utc>,
}

impl ApiDashboard {
    /// Wraps a summary with chart metadata.
    #[must_use]
    pub fn new(
        filter: Option<FilterState>,
        summary: DashboardSummary,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: DASHBOARD_TITLE.to_string(),
            filter,
            by_region: ApiBarChart::by_region(summary.by_region),
            by_unit: ApiBarChart::by_unit(summary.by_unit),
            unit_positions: summary.unit_positions,
            record_count: summary.record_count,
            total_weapons: summary.total_weapons,
            loaded_at,
        }
    }
}

/// Initial map view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapView {
    /// Map title.
    pub title: String,
    /// Center latitude.
    pub center_latitude: f64,
    /// Center longitude.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use seizure_map_analytics_models::DateRange;

    use super::*;

    #[test]
    fn filter_options_put_all_first() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let options = ApiFilterOptions::from(FilterOptions {
            date_range: Some(DateRange::new(start, end)),
            regions: vec!["RP Girona".to_string(), "RP Ponent".to_string()],
        });

        assert_eq!(options.regions, vec!["all", "RP Girona", "RP Ponent"]);
        assert_eq!(options.min_date, Some(start));
        assert_eq!(options.max_date, Some(end));
    }

    #[test]
    fn query_region_defaults_to_all() {
        let params = DashboardQueryParams::default();
        assert_eq!(params.region_selection(), RegionSelection::All);

        let params = DashboardQueryParams {
            region: Some("RP Girona".to_string()),
            ..DashboardQueryParams::default()
        };
        assert_eq!(
            params.region_selection(),
            RegionSelection::Only("RP Girona".to_string())
        );
    }

    #[test]
    fn dashboard_serializes_camel_case() {
        let dashboard = ApiDashboard::new(None, DashboardSummary::default(), Utc::now());
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["byRegion"]["title"], REGION_CHART_TITLE);
        assert_eq!(json["byUnit"]["xLabel"], "Unitat");
        assert_eq!(json["totalWeapons"], 0);
        assert!(json["filter"].is_null());
    }
}
