//! Police unit reference table loader.
//!
//! The reference table is a local CSV with at least the `unitat`,
//! `Latitud` and `Longitud` columns. It is a hard dependency: a missing
//! file or header fails the load.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use seizure_map_seizure_models::{ReferenceColumn, UnitCoordinates, UnitDirectory, UnitReference};

use crate::parsing::parse_coordinate;
use crate::SourceError;

/// Parses unit reference rows from CSV data, in file order.
///
/// Rows with an empty unit identifier are skipped. Blank or unparseable
/// coordinates become `None`.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is unreadable or one of the required
/// headers is missing.
pub fn parse_unit_references(reader: impl Read) -> Result<Vec<UnitReference>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut columns: HashMap<ReferenceColumn, usize> = HashMap::new();
    for (idx, header) in csv_reader.headers()?.iter().enumerate() {
        if let Ok(column) = header.trim().parse::<ReferenceColumn>() {
            columns.entry(column).or_insert(idx);
        }
    }

    let index_of = |column: ReferenceColumn| -> Result<usize, SourceError> {
        columns
            .get(&column)
            .copied()
            .ok_or_else(|| SourceError::MissingColumn {
                column: column.to_string(),
                table: "unit reference".to_string(),
            })
    };
    let unit_idx = index_of(ReferenceColumn::Unitat)?;
    let lat_idx = index_of(ReferenceColumn::Latitud)?;
    let lng_idx = index_of(ReferenceColumn::Longitud)?;

    let mut references = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let unit = row.get(unit_idx).unwrap_or("").trim();
        if unit.is_empty() {
            log::trace!("Skipping reference row without a unit identifier");
            continue;
        }

        references.push(UnitReference {
            unit: unit.to_string(),
            coordinates: UnitCoordinates {
                latitude: row.get(lat_idx).and_then(parse_coordinate),
                longitude: row.get(lng_idx).and_then(parse_coordinate),
            },
        });
    }

    Ok(references)
}

/// Loads the unit reference table from `path` into a [`UnitDirectory`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub async fn load_units(path: &Path) -> Result<UnitDirectory, SourceError> {
    log::info!("Loading unit reference table from {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::File {
        path: path.display().to_string(),
        source: e,
    })?;
    let references = parse_unit_references(bytes.as_slice())?;
    let row_count = references.len();
    let directory = UnitDirectory::from_references(references);

    if directory.len() < row_count {
        log::warn!(
            "Unit reference table has {} duplicate rows; the first row of each unit wins",
            row_count - directory.len()
        );
    }
    log::info!("Loaded {} police units", directory.len());

    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_rows() {
        let csv = r#"codi,unitat,Latitud,Longitud
1,ABP Girona,41.9794,2.8214
2,ABP Figueres,,
3,ABP Reus,"41,1557","1,1069"
"#;
        let references = parse_unit_references(csv.as_bytes()).unwrap();
        assert_eq!(references.len(), 3);
        assert_eq!(references[0].unit, "ABP Girona");
        assert_eq!(
            references[0].coordinates.pair(),
            Some((41.9794, 2.8214))
        );
        assert!(references[1].coordinates.pair().is_none());
        assert_eq!(references[2].coordinates.pair(), Some((41.1557, 1.1069)));
    }

    #[test]
    fn first_duplicate_wins_in_directory() {
        let csv = "unitat,Latitud,Longitud\nU1,41.0,2.0\nU1,10.0,10.0\n";
        let directory = UnitDirectory::from_references(parse_unit_references(csv.as_bytes()).unwrap());
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.lookup("U1").unwrap().pair(), Some((41.0, 2.0)));
    }

    #[test]
    fn headers_are_case_insensitive() {
        let csv = "UNITAT,latitud,LONGITUD\nU1,41.5,2.5\n";
        let references = parse_unit_references(csv.as_bytes()).unwrap();
        assert_eq!(references[0].coordinates.pair(), Some((41.5, 2.5)));
    }

    #[test]
    fn missing_coordinate_header_is_an_error() {
        let csv = "unitat,Latitud\nU1,41.0\n";
        let err = parse_unit_references(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingColumn { ref column, .. } if column == "Longitud"
        ));
    }

    #[test]
    fn skips_rows_without_unit() {
        let csv = "unitat,Latitud,Longitud\n,41.0,2.0\nU2,42.0,3.0\n";
        let references = parse_unit_references(csv.as_bytes()).unwrap();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].unit, "U2");
    }
}
