//! Seizure worksheet loader.
//!
//! Reads the first [`SHEET_COLUMN_COUNT`] columns of the worksheet, drops
//! rows that are entirely empty, and converts the rest into
//! [`SeizureRecord`]s. Unparseable dates are kept as `None`; rows that
//! cannot be grouped (no unit or region) or carry an invalid weapon count
//! are dropped with a warning.

use std::collections::BTreeMap;
use std::io::Read;

use seizure_map_seizure_models::{SHEET_COLUMN_COUNT, SeizureRecord, SheetColumn};

use crate::config::{RecordSourceConfig, RecordsConfig, google_sheet_csv_url};
use crate::parsing::{parse_sheet_date, parse_weapon_count};
use crate::SourceError;

/// Counters describing what happened to each worksheet row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordLoadStats {
    /// Rows converted into records.
    pub loaded: u64,
    /// Rows skipped because every field was empty.
    pub empty_rows: u64,
    /// Rows dropped for a missing unit/region or an invalid weapon count.
    pub dropped_rows: u64,
    /// Loaded rows whose date could not be parsed.
    pub undated_rows: u64,
}

/// Records parsed from the worksheet plus load counters.
#[derive(Debug, Clone)]
pub struct RecordLoad {
    /// Parsed records in worksheet order.
    pub records: Vec<SeizureRecord>,
    /// Per-row outcome counters.
    pub stats: RecordLoadStats,
}

/// Positions of the named columns within the leading sheet columns.
struct ColumnLayout {
    named: BTreeMap<SheetColumn, usize>,
    extra: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SourceError> {
        let mut named = BTreeMap::new();
        let mut extra = Vec::new();

        for (idx, header) in headers.iter().take(SHEET_COLUMN_COUNT).enumerate() {
            match header.trim().parse::<SheetColumn>() {
                Ok(column) => {
                    named.entry(column).or_insert(idx);
                }
                Err(_) => extra.push(idx),
            }
        }

        for column in SheetColumn::all() {
            if !named.contains_key(column) {
                return Err(SourceError::MissingColumn {
                    column: column.to_string(),
                    table: "seizure worksheet".to_string(),
                });
            }
        }

        Ok(Self { named, extra })
    }

    fn field<'a>(&self, row: &'a csv::StringRecord, column: SheetColumn) -> &'a str {
        self.named
            .get(&column)
            .and_then(|idx| row.get(*idx))
            .unwrap_or("")
            .trim()
    }
}

/// Parses seizure records from CSV data.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is unreadable or a required header
/// (`dia`, `regio`, `unitat`, `num_armes`) is missing from the leading
/// columns.
pub fn parse_records(reader: impl Read, day_first: bool) -> Result<RecordLoad, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    let mut stats = RecordLoadStats::default();

    for (line, result) in csv_reader.records().enumerate() {
        let row = result?;

        if row
            .iter()
            .take(SHEET_COLUMN_COUNT)
            .all(|field| field.trim().is_empty())
        {
            stats.empty_rows += 1;
            continue;
        }

        let region = layout.field(&row, SheetColumn::Regio);
        let unit = layout.field(&row, SheetColumn::Unitat);
        if region.is_empty() || unit.is_empty() {
            log::warn!("Row {}: missing unit or region, dropping", line + 2);
            stats.dropped_rows += 1;
            continue;
        }

        let raw_count = layout.field(&row, SheetColumn::NumArmes);
        let Some(weapon_count) = parse_weapon_count(raw_count) else {
            log::warn!(
                "Row {}: invalid weapon count '{raw_count}', dropping",
                line + 2
            );
            stats.dropped_rows += 1;
            continue;
        };

        let raw_date = layout.field(&row, SheetColumn::Dia);
        let date = parse_sheet_date(raw_date, day_first);
        if date.is_none() {
            log::trace!("Row {}: unparseable date '{raw_date}'", line + 2);
            stats.undated_rows += 1;
        }

        let extra = layout
            .extra
            .iter()
            .map(|idx| row.get(*idx).unwrap_or("").trim().to_string())
            .collect();

        records.push(SeizureRecord {
            date,
            region: region.to_string(),
            unit: unit.to_string(),
            weapon_count,
            extra,
        });
        stats.loaded += 1;
    }

    Ok(RecordLoad { records, stats })
}

/// Fetches the raw CSV text of the configured worksheet.
///
/// # Errors
///
/// Returns [`SourceError`] if the download or file read fails.
pub async fn fetch_worksheet(source: &RecordSourceConfig) -> Result<String, SourceError> {
    match source {
        RecordSourceConfig::GoogleSheet {
            spreadsheet_id,
            worksheet,
        } => {
            let url = google_sheet_csv_url(spreadsheet_id);
            let response = reqwest::Client::new()
                .get(&url)
                .query(&[("tqx", "out:csv"), ("sheet", worksheet.as_str())])
                .send()
                .await?
                .error_for_status()?;
            Ok(response.text().await?)
        }
        RecordSourceConfig::CsvUrl { url } => {
            let response = reqwest::get(url).await?.error_for_status()?;
            Ok(response.text().await?)
        }
        RecordSourceConfig::CsvFile { path } => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::File {
                    path: path.display().to_string(),
                    source: e,
                })
        }
    }
}

/// Fetches and parses the configured seizure worksheet.
///
/// # Errors
///
/// Returns [`SourceError`] if the worksheet cannot be fetched or parsed.
pub async fn load_records(config: &RecordsConfig) -> Result<RecordLoad, SourceError> {
    log::info!("Loading seizure records from {}", config.source.describe());

    let text = fetch_worksheet(&config.source).await?;
    log::debug!("Fetched {} bytes of worksheet data", text.len());

    let load = parse_records(text.as_bytes(), config.day_first)?;

    log::info!(
        "Loaded {} seizure records ({} empty rows skipped, {} dropped, {} without a valid date)",
        load.stats.loaded,
        load.stats.empty_rows,
        load.stats.dropped_rows,
        load.stats.undated_rows,
    );

    Ok(load)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const SHEET: &str = "\
dia,regio,unitat,num_armes,tipus,observacions,comentari_extra
2024-01-01,RP Metropolitana Nord,ABP Badalona,3,ganivet,,ignored
02/01/2024,RP Girona,ABP Girona,5,navalla,vigilancia,
,,,,,,
,,,,,,only-seventh-column
desconegut,RP Girona,ABP Figueres,1,,,
2024-01-03,,ABP Girona,2,,,
2024-01-03,RP Girona,ABP Girona,dos,,,
";

    #[test]
    fn parses_rows_and_counts_outcomes() {
        let load = parse_records(SHEET.as_bytes(), true).unwrap();

        assert_eq!(load.records.len(), 3);
        assert_eq!(
            load.stats,
            RecordLoadStats {
                loaded: 3,
                empty_rows: 2,
                dropped_rows: 2,
                undated_rows: 1,
            }
        );

        let first = &load.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(first.region, "RP Metropolitana Nord");
        assert_eq!(first.unit, "ABP Badalona");
        assert_eq!(first.weapon_count, 3);
        assert_eq!(first.extra, vec!["ganivet".to_string(), String::new()]);

        assert_eq!(load.records[1].date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn keeps_rows_with_unparseable_dates() {
        let load = parse_records(SHEET.as_bytes(), true).unwrap();
        let undated = &load.records[2];
        assert!(undated.date.is_none());
        assert_eq!(undated.unit, "ABP Figueres");
        assert_eq!(undated.weapon_count, 1);
    }

    #[test]
    fn two_digit_year_rows_stay_undated() {
        let csv = "dia,regio,unitat,num_armes,a,b\n05/03/24,A,U1,3,,\n2024-01-10,A,U1,2,,\n";
        let load = parse_records(csv.as_bytes(), true).unwrap();

        let dates: Vec<_> = load.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![None, NaiveDate::from_ymd_opt(2024, 1, 10)]);
        assert_eq!(load.stats.undated_rows, 1);
    }

    #[test]
    fn headers_match_case_insensitively_in_any_order() {
        let csv = "UNITAT,Num_Armes,Regio,Dia,a,b\nU1,4,A,2024-05-01,,\n";
        let load = parse_records(csv.as_bytes(), true).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].unit, "U1");
        assert_eq!(load.records[0].region, "A");
        assert_eq!(load.records[0].weapon_count, 4);
    }

    #[test]
    fn empty_weapon_count_is_zero() {
        let csv = "dia,regio,unitat,num_armes,a,b\n2024-05-01,A,U1,,,\n";
        let load = parse_records(csv.as_bytes(), true).unwrap();
        assert_eq!(load.records[0].weapon_count, 0);
    }

    #[test]
    fn missing_required_header_is_an_error() {
        let csv = "dia,regio,unitat,a,b,c\n2024-05-01,A,U1,,,\n";
        let err = parse_records(csv.as_bytes(), true).unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingColumn { ref column, .. } if column == "num_armes"
        ));
    }

    #[test]
    fn required_header_beyond_sixth_column_is_ignored() {
        let csv = "dia,regio,unitat,a,b,c,num_armes\n2024-05-01,A,U1,,,,3\n";
        assert!(parse_records(csv.as_bytes(), true).is_err());
    }
}
