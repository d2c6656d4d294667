#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and aggregate result types for the seizure dashboard.
//!
//! A [`FilterState`] is an owned value handed to the pure filter and
//! aggregation functions in `seizure_map_analytics` on every render
//! cycle; the results come back as a [`DashboardSummary`].

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Region selector value that matches every region.
pub const ALL_REGIONS: &str = "all";

/// Inclusive calendar date range.
///
/// A range whose `start` is after its `end` contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range from its inclusive bounds.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within the range. A missing date never does.
    #[must_use]
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.start <= d && d <= self.end)
    }

    /// Smallest range covering every date yielded by `dates`.
    #[must_use]
    pub fn covering(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |range, date| {
            Some(match range {
                None => Self::new(date, date),
                Some(Self { start, end }) => Self::new(start.min(date), end.max(date)),
            })
        })
    }
}

/// Which regions a filter keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionSelection {
    /// Every region.
    #[default]
    All,
    /// Only the region with exactly this label.
    Only(String),
}

impl RegionSelection {
    /// Whether a record in `region` passes this selection.
    #[must_use]
    pub fn matches(&self, region: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => label == region,
        }
    }
}

impl FromStr for RegionSelection {
    type Err = std::convert::Infallible;

    /// `"all"` (any case), the dashboard's `"Totes"` label and blank input
    /// select every region; anything else is an exact region label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_REGIONS) || s.eq_ignore_ascii_case("totes") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

impl From<String> for RegionSelection {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(selection) => selection,
            Err(never) => match never {},
        }
    }
}

impl From<RegionSelection> for String {
    fn from(value: RegionSelection) -> Self {
        match value {
            RegionSelection::All => ALL_REGIONS.to_string(),
            RegionSelection::Only(label) => label,
        }
    }
}

impl std::fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_REGIONS}"),
            Self::Only(label) => write!(f, "{label}"),
        }
    }
}

/// The user's current date range and region constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Inclusive date bounds. Always enforced.
    pub range: DateRange,
    /// Region constraint.
    pub region: RegionSelection,
}

impl FilterState {
    /// Creates a filter from its parts.
    #[must_use]
    pub const fn new(range: DateRange, region: RegionSelection) -> Self {
        Self { range, region }
    }

    /// The default filter for a dataset whose dates span `bounds`: the
    /// whole range and every region.
    #[must_use]
    pub const fn defaults(bounds: DateRange) -> Self {
        Self::new(bounds, RegionSelection::All)
    }

    /// Restores the defaults for a dataset whose dates span `bounds`.
    pub fn reset(&mut self, bounds: DateRange) {
        *self = Self::defaults(bounds);
    }
}

/// Summed weapon count for one group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    /// Region label or unit identifier.
    pub key: String,
    /// Sum of `weapon_count` over the group.
    pub total: u64,
}

/// Map placement data for one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPosition {
    /// Police unit identifier.
    pub unit: String,
    /// First known latitude among the unit's records.
    pub latitude: Option<f64>,
    /// First known longitude among the unit's records.
    pub longitude: Option<f64>,
    /// Sum of `weapon_count` over the unit's records.
    pub total: u64,
}

impl UnitPosition {
    /// The `(latitude, longitude)` pair, when the unit can be placed.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// All aggregate outputs for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Weapon totals per region, largest first.
    pub by_region: Vec<GroupTotal>,
    /// Weapon totals per unit, largest first.
    pub by_unit: Vec<GroupTotal>,
    /// One entry per unit in the filtered set, first-seen order.
    pub unit_positions: Vec<UnitPosition>,
    /// Number of records that passed the filter.
    pub record_count: u64,
    /// Sum of `weapon_count` over the filtered records.
    pub total_weapons: u64,
}

/// Values that populate the dashboard's filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Span of valid dates in the dataset; `None` when no date parsed.
    pub date_range: Option<DateRange>,
    /// Distinct region labels in first-seen order.
    pub regions: Vec<String>,
}
