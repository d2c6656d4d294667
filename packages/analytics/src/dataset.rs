//! Prepared dataset: the joined records plus the filter defaults derived
//! from them at load time.

use chrono::NaiveDate;
use seizure_map_analytics_models::{
    DashboardSummary, DateRange, FilterOptions, FilterState, RegionSelection,
};
use seizure_map_seizure_models::{EnrichedRecord, SeizureRecord, UnitDirectory};

use crate::aggregate::summarize;
use crate::filter::apply_filter;
use crate::join::enrich;

/// Enriched records and the values computed once per load.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
    date_bounds: Option<DateRange>,
    regions: Vec<String>,
}

impl Dataset {
    /// Joins `records` onto `units` and computes the filter defaults.
    ///
    /// The default date range spans the valid dates only; records whose
    /// date could not be parsed do not widen it.
    #[must_use]
    pub fn prepare(records: Vec<SeizureRecord>, units: &UnitDirectory) -> Self {
        let records = enrich(records, units);
        let date_bounds = DateRange::covering(records.iter().filter_map(|r| r.date));

        let mut regions: Vec<String> = Vec::new();
        for record in &records {
            if !regions.iter().any(|r| r == &record.region) {
                regions.push(record.region.clone());
            }
        }

        log::debug!(
            "Prepared {} records across {} regions, dates {:?}",
            records.len(),
            regions.len(),
            date_bounds
        );

        Self {
            records,
            date_bounds,
            regions,
        }
    }

    /// All enriched records in load order.
    #[must_use]
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// Span of valid dates, or `None` if no record has a valid date.
    #[must_use]
    pub const fn date_bounds(&self) -> Option<DateRange> {
        self.date_bounds
    }

    /// Distinct region labels in first-seen order.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Values for the filter controls.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            date_range: self.date_bounds,
            regions: self.regions.clone(),
        }
    }

    /// The reset filter: full date range and every region.
    ///
    /// `None` when no record has a valid date, since there is then no
    /// range to default to.
    #[must_use]
    pub fn default_filter(&self) -> Option<FilterState> {
        self.date_bounds.map(FilterState::defaults)
    }

    /// Builds a filter from optional user input, taking each missing bound
    /// from the dataset's date span.
    ///
    /// Returns `None` when a bound is missing and the dataset has no valid
    /// dates to default to.
    #[must_use]
    pub fn resolve_filter(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        region: RegionSelection,
    ) -> Option<FilterState> {
        let start = start.or_else(|| self.date_bounds.map(|b| b.start))?;
        let end = end.or_else(|| self.date_bounds.map(|b| b.end))?;
        Some(FilterState::new(DateRange::new(start, end), region))
    }

    /// Records passing `filter`, in load order.
    #[must_use]
    pub fn filtered(&self, filter: &FilterState) -> Vec<&EnrichedRecord> {
        apply_filter(&self.records, filter)
    }

    /// Filters and aggregates in one step. A `None` filter (no resolvable
    /// date range) yields an empty summary.
    #[must_use]
    pub fn summarize(&self, filter: Option<&FilterState>) -> DashboardSummary {
        filter.map_or_else(DashboardSummary::default, |filter| {
            summarize(&self.filtered(filter))
        })
    }
}
