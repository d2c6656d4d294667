//! Plain-text tables for terminal output.

use std::fmt::Write as _;

use seizure_map_analytics_models::{DashboardSummary, FilterOptions, FilterState, GroupTotal};
use seizure_map_server_models::{REGION_CHART_TITLE, UNIT_CHART_TITLE};

const KEY_WIDTH: usize = 40;

/// Renders the filter line, both totals tables and the unit positions.
pub fn render(filter: Option<&FilterState>, summary: &DashboardSummary) -> String {
    let mut out = String::new();

    match filter {
        Some(filter) => {
            let _ = writeln!(
                out,
                "{} .. {} | region: {}",
                filter.range.start, filter.range.end, filter.region
            );
        }
        None => {
            let _ = writeln!(out, "No dated records; nothing to summarize.");
        }
    }
    let _ = writeln!(
        out,
        "{} records, {} weapons",
        summary.record_count, summary.total_weapons
    );
    let _ = writeln!(out);

    render_totals(&mut out, REGION_CHART_TITLE, &summary.by_region);
    let _ = writeln!(out);
    render_totals(&mut out, UNIT_CHART_TITLE, &summary.by_unit);
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<KEY_WIDTH$} {:>10} {:>10}", "UNIT", "LAT", "LON");
    let _ = writeln!(out, "{}", "-".repeat(KEY_WIDTH + 22));
    for position in &summary.unit_positions {
        let _ = writeln!(
            out,
            "{:<KEY_WIDTH$} {:>10} {:>10}",
            position.unit,
            format_coordinate(position.latitude),
            format_coordinate(position.longitude),
        );
    }

    out
}

/// Renders the region selector options, `all` first.
pub fn render_regions(options: &FilterOptions) -> String {
    let mut out = String::new();

    if let Some(range) = options.date_range {
        let _ = writeln!(out, "Dates: {} .. {}", range.start, range.end);
    }
    let _ = writeln!(out, "{}", seizure_map_analytics_models::ALL_REGIONS);
    for region in &options.regions {
        let _ = writeln!(out, "{region}");
    }

    out
}

fn render_totals(out: &mut String, title: &str, totals: &[GroupTotal]) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{:<KEY_WIDTH$} {:>10}", "KEY", "WEAPONS");
    let _ = writeln!(out, "{}", "-".repeat(KEY_WIDTH + 11));
    for total in totals {
        let _ = writeln!(out, "{:<KEY_WIDTH$} {:>10}", total.key, total.total);
    }
}

fn format_coordinate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}
