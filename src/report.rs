//! Human-readable console report.
//!
//! Everything here only formats already computed results.

use crate::output::Output;
use crate::symbols::SymbolTables;
use itertools::Itertools;
use log::debug;
use std::fs;
use std::path::Path;

/// Side file with the countries ranked by an external process.
pub const TOP_COUNTRIES_FILE: &str = "top10_countries.txt";

fn magnitude_string(x: Option<f64>) -> String {
    match x {
        Some(x) => format!("{x:.2}"),
        None => "-".to_owned(),
    }
}

fn label(category: &str) -> &str {
    if category.is_empty() {
        "(unclassified)"
    } else {
        category
    }
}

/// Totals, then the `top` largest categories, days, and hotspots.
pub fn summary_lines(output: &Output, top: usize) -> Vec<String> {
    let d = &output.diagnostics;
    let mut lines = vec![
        format!("rows: {}", d.rows),
        format!("valid events: {}", d.valid),
        format!("malformed rows: {}", d.malformed),
        format!("unparsable fields: {}", d.unparsable_fields),
    ];
    if !d.unresolved_columns.is_empty() {
        lines.push(format!(
            "unresolved columns: {}",
            d.unresolved_columns.join(", ")
        ));
    }
    lines.push("categories:".to_owned());
    for t in output.types.iter().take(top) {
        lines.push(format!(
            "- {:<24} {:>8} events, avg magnitude {}, max {}",
            label(&t.category),
            t.events,
            magnitude_string(t.avg_magnitude),
            magnitude_string(t.max_magnitude),
        ));
    }
    if output.types.len() > top {
        lines.push(format!("- ... {} more", output.types.len() - top));
    }
    if let (Some(first), Some(last)) = (output.daily.first(), output.daily.last()) {
        let busiest = output
            .daily
            .iter()
            .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.date.cmp(&a.date)));
        lines.push(format!(
            "days: {} ({} to {})",
            output.daily.len(),
            first.date,
            last.date
        ));
        if let Some(b) = busiest {
            lines.push(format!("busiest day: {} ({} events)", b.date, b.count));
        }
    }
    if !output.hotspots.is_empty() {
        lines.push("hotspots:".to_owned());
        for h in output.hotspots.iter().take(top) {
            lines.push(format!("- {:>4},{:>5}  {:>8}", h.lat_bin, h.lon_bin, h.count));
        }
    }
    lines
}

/// Which color each rule gives.
pub fn legend_lines(tables: &SymbolTables) -> Vec<String> {
    let mut lines = tables
        .colors
        .iter()
        .map(|r| format!("{} {}", r.value, r.pattern))
        .collect_vec();
    lines.push(format!("{} (other)", tables.default_color));
    lines
}

/// Contents of the side file, if there is one.
pub fn side_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(target: "hazardmap", "{}: {e}", path.display());
            None
        }
    }
}
