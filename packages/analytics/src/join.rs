//! Left join of seizure records onto the unit reference table.

use seizure_map_seizure_models::{EnrichedRecord, SeizureRecord, UnitDirectory};

/// Enriches every record with the coordinates of its unit.
///
/// This is a left outer join keyed by unit identifier: each input record
/// yields exactly one output row, in input order, and records whose unit
/// has no reference row get `None` coordinates.
#[must_use]
pub fn enrich(records: Vec<SeizureRecord>, units: &UnitDirectory) -> Vec<EnrichedRecord> {
    let mut unmatched = 0usize;

    let enriched: Vec<EnrichedRecord> = records
        .into_iter()
        .map(|record| {
            let coordinates = units.lookup(&record.unit);
            if coordinates.is_none() {
                unmatched += 1;
            }
            EnrichedRecord::new(record, coordinates)
        })
        .collect();

    if unmatched > 0 {
        log::debug!(
            "{unmatched} of {} records reference units missing from the reference table",
            enriched.len()
        );
    }

    enriched
}
