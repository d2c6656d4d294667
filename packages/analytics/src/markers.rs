//! `GeoJSON` markers for the unit map.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use seizure_map_analytics_models::UnitPosition;

/// Builds a point feature per unit that has both coordinates.
///
/// Units without coordinates still count in the bar-chart aggregates but
/// cannot be placed, so they are left out here.
#[must_use]
pub fn unit_markers(positions: &[UnitPosition]) -> FeatureCollection {
    let features: Vec<Feature> = positions
        .iter()
        .filter_map(|position| {
            let (lat, lng) = position.coordinates()?;

            let mut properties = JsonObject::new();
            properties.insert(
                "unit".to_string(),
                serde_json::Value::String(position.unit.clone()),
            );
            properties.insert("weaponCount".to_string(), serde_json::json!(position.total));

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![lng, lat]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    let skipped = positions.len() - features.len();
    if skipped > 0 {
        log::debug!("{skipped} units have no coordinates and were left off the map");
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(unit: &str, coords: Option<(f64, f64)>, total: u64) -> UnitPosition {
        UnitPosition {
            unit: unit.to_string(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            total,
        }
    }

    #[test]
    fn skips_units_without_coordinates() {
        let collection = unit_markers(&[
            position("U1", Some((41.0, 2.0)), 3),
            position("U2", None, 5),
        ]);

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["unit"], "U1");
        assert_eq!(properties["weaponCount"], 3);
    }

    #[test]
    fn points_are_longitude_first() {
        let collection = unit_markers(&[position("U1", Some((41.5, 2.25)), 1)]);
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![2.25, 41.5]));
    }

    #[test]
    fn serializes_as_feature_collection() {
        let collection = unit_markers(&[position("U1", Some((41.0, 2.0)), 3)]);
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
    }
}
