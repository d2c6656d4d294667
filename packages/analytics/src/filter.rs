//! Date-range and region filtering.

use seizure_map_analytics_models::FilterState;
use seizure_map_seizure_models::EnrichedRecord;

/// Whether `record` passes `filter`.
///
/// The date bounds are always enforced, so records without a parsed date
/// never pass.
#[must_use]
pub fn matches(filter: &FilterState, record: &EnrichedRecord) -> bool {
    filter.range.contains(record.date) && filter.region.matches(&record.region)
}

/// Returns the records that pass `filter`, in input order.
#[must_use]
pub fn apply_filter<'a>(
    records: &'a [EnrichedRecord],
    filter: &FilterState,
) -> Vec<&'a EnrichedRecord> {
    records
        .iter()
        .filter(|record| matches(filter, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use seizure_map_analytics_models::{DateRange, RegionSelection};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: Option<NaiveDate>, region: &str, count: u64) -> EnrichedRecord {
        EnrichedRecord {
            date,
            region: region.to_string(),
            unit: format!("{region}-unit"),
            weapon_count: count,
            latitude: None,
            longitude: None,
        }
    }

    fn sample() -> Vec<EnrichedRecord> {
        vec![
            record(Some(ymd(2024, 1, 1)), "A", 3),
            record(Some(ymd(2024, 1, 2)), "B", 5),
            record(None, "A", 7),
            record(Some(ymd(2024, 1, 10)), "A", 1),
        ]
    }

    fn full_range() -> DateRange {
        DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 10))
    }

    #[test]
    fn undated_records_never_pass() {
        let records = sample();
        let filtered = apply_filter(&records, &FilterState::defaults(full_range()));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|r| r.date.is_some()));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = sample();
        let filter = FilterState::defaults(DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 10)));
        let counts: Vec<u64> = apply_filter(&records, &filter)
            .iter()
            .map(|r| r.weapon_count)
            .collect();
        assert_eq!(counts, vec![5, 1]);
    }

    #[test]
    fn region_selection_is_exact() {
        let records = sample();
        let filter = FilterState::new(full_range(), RegionSelection::Only("A".to_string()));
        let filtered = apply_filter(&records, &filter);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.region == "A"));
    }

    #[test]
    fn output_is_a_subset_and_filtering_is_idempotent() {
        let records = sample();
        let filter = FilterState::new(full_range(), RegionSelection::Only("B".to_string()));

        let once: Vec<EnrichedRecord> = apply_filter(&records, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<EnrichedRecord> = apply_filter(&once, &filter)
            .into_iter()
            .cloned()
            .collect();

        assert!(once.iter().all(|r| records.contains(r)));
        assert_eq!(once, twice);
    }

    #[test]
    fn inverted_range_yields_nothing() {
        let records = sample();
        let filter = FilterState::defaults(DateRange::new(ymd(2024, 1, 10), ymd(2024, 1, 1)));
        assert!(apply_filter(&records, &filter).is_empty());
    }
}
