//! Grouped sums over a filtered record set.
//!
//! Groups are kept in first-encounter order while accumulating, then
//! sorted with a stable sort, so ties on the total keep the order in
//! which their keys first appeared. Nothing here depends on hash-map
//! iteration order.

use std::collections::HashMap;

use seizure_map_analytics_models::{DashboardSummary, GroupTotal, UnitPosition};
use seizure_map_seizure_models::EnrichedRecord;

/// Sums `weapon_count` per key, largest total first.
fn group_sum<'a>(
    records: &[&'a EnrichedRecord],
    key: impl Fn(&'a EnrichedRecord) -> &'a str,
) -> Vec<GroupTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for &record in records {
        let k = key(record);
        if let Some(&i) = index.get(k) {
            groups[i].total += record.weapon_count;
        } else {
            index.insert(k, groups.len());
            groups.push(GroupTotal {
                key: k.to_string(),
                total: record.weapon_count,
            });
        }
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Weapon totals per region, largest first.
#[must_use]
pub fn by_region(records: &[&EnrichedRecord]) -> Vec<GroupTotal> {
    group_sum(records, |r| r.region.as_str())
}

/// Weapon totals per unit, largest first.
#[must_use]
pub fn by_unit(records: &[&EnrichedRecord]) -> Vec<GroupTotal> {
    group_sum(records, |r| r.unit.as_str())
}

/// One [`UnitPosition`] per distinct unit, in first-encounter order.
///
/// Each coordinate is the first non-null value seen among the unit's
/// records, in iteration order.
#[must_use]
pub fn unit_positions(records: &[&EnrichedRecord]) -> Vec<UnitPosition> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut positions: Vec<UnitPosition> = Vec::new();

    for record in records {
        let i = *index.entry(record.unit.as_str()).or_insert_with(|| {
            positions.push(UnitPosition {
                unit: record.unit.clone(),
                latitude: None,
                longitude: None,
                total: 0,
            });
            positions.len() - 1
        });

        let position = &mut positions[i];
        position.total += record.weapon_count;
        position.latitude = position.latitude.or(record.latitude);
        position.longitude = position.longitude.or(record.longitude);
    }

    positions
}

/// Computes every aggregate output for an already-filtered record set.
#[must_use]
pub fn summarize(records: &[&EnrichedRecord]) -> DashboardSummary {
    DashboardSummary {
        by_region: by_region(records),
        by_unit: by_unit(records),
        unit_positions: unit_positions(records),
        record_count: records.len() as u64,
        total_weapons: records.iter().map(|r| r.weapon_count).sum(),
    }
}
