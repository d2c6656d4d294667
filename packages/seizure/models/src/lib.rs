#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Blade-weapon seizure record types and the police unit dimension table.
//!
//! These types are shared by the loaders in `seizure_map_source` and the
//! filtering/aggregation pipeline in `seizure_map_analytics`. The sheet
//! schema is fixed, so every column the pipeline reads has a typed field.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of leading sheet columns read from the seizure worksheet.
pub const SHEET_COLUMN_COUNT: usize = 6;

/// Named columns of the seizure worksheet that the pipeline uses.
///
/// The worksheet carries two more columns that are read but never used
/// downstream; see [`SeizureRecord::extra`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SheetColumn {
    /// Day the seizure was reported (`dia`).
    Dia,
    /// Police region label (`regio`).
    Regio,
    /// Police unit identifier (`unitat`).
    Unitat,
    /// Number of blade weapons seized (`num_armes`).
    NumArmes,
}

impl SheetColumn {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Dia, Self::Regio, Self::Unitat, Self::NumArmes]
    }
}

/// Named columns of the unit reference table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ReferenceColumn {
    /// Police unit identifier.
    #[strum(serialize = "unitat")]
    #[serde(rename = "unitat")]
    Unitat,
    /// Unit latitude (WGS84).
    #[strum(serialize = "Latitud")]
    #[serde(rename = "Latitud")]
    Latitud,
    /// Unit longitude (WGS84).
    #[strum(serialize = "Longitud")]
    #[serde(rename = "Longitud")]
    Longitud,
}

impl ReferenceColumn {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unitat, Self::Latitud, Self::Longitud]
    }
}

/// One row of the seizure worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeizureRecord {
    /// Reporting day. `None` when the sheet value could not be parsed.
    pub date: Option<NaiveDate>,
    /// Police region label.
    pub region: String,
    /// Police unit identifier (key into [`UnitDirectory`]).
    pub unit: String,
    /// Number of blade weapons seized.
    pub weapon_count: u64,
    /// Remaining leading sheet columns, carried but unused.
    pub extra: Vec<String>,
}

/// Coordinates of a police unit. Either component may be missing in the
/// reference table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCoordinates {
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl UnitCoordinates {
    /// Returns the `(latitude, longitude)` pair when both are present.
    #[must_use]
    pub const fn pair(self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// One row of the unit reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReference {
    /// Police unit identifier.
    pub unit: String,
    /// Unit coordinates.
    pub coordinates: UnitCoordinates,
}

/// Lookup table from unit identifier to coordinates.
///
/// Built from reference rows in file order. When a unit identifier appears
/// more than once, the first row wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitDirectory {
    units: BTreeMap<String, UnitCoordinates>,
}

impl UnitDirectory {
    /// Builds a directory from reference rows, keeping the first row for
    /// each unit identifier.
    #[must_use]
    pub fn from_references(references: impl IntoIterator<Item = UnitReference>) -> Self {
        let mut units = BTreeMap::new();
        for reference in references {
            units
                .entry(reference.unit)
                .or_insert(reference.coordinates);
        }
        Self { units }
    }

    /// Returns the coordinates for `unit`, if the unit is known.
    #[must_use]
    pub fn lookup(&self, unit: &str) -> Option<UnitCoordinates> {
        self.units.get(unit).copied()
    }

    /// Number of distinct units in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the directory holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A [`SeizureRecord`] joined with the coordinates of its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    /// Reporting day, if it could be parsed.
    pub date: Option<NaiveDate>,
    /// Police region label.
    pub region: String,
    /// Police unit identifier.
    pub unit: String,
    /// Number of blade weapons seized.
    pub weapon_count: u64,
    /// Unit latitude; `None` when the unit has no reference row or no value.
    pub latitude: Option<f64>,
    /// Unit longitude; `None` when the unit has no reference row or no value.
    pub longitude: Option<f64>,
}

impl EnrichedRecord {
    /// Joins a record with the (possibly missing) coordinates of its unit.
    #[must_use]
    pub fn new(record: SeizureRecord, coordinates: Option<UnitCoordinates>) -> Self {
        let coordinates = coordinates.unwrap_or_default();
        Self {
            date: record.date,
            region: record.region,
            unit: record.unit,
            weapon_count: record.weapon_count,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }

    /// The record's unit coordinates as a pair, when both are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        UnitCoordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
        .pair()
    }
}
