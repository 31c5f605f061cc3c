//! Spreadsheet version of the summary.

use crate::errors::Result;
use crate::output::Output;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// File name of the summary workbook.
pub const WORKBOOK_FILE: &str = "summary.xlsx";

fn header(sheet: &mut Worksheet, names: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, bold)?;
    }
    Ok(())
}

fn row(i: usize) -> u32 {
    (i + 1) as u32
}

fn write_optional(sheet: &mut Worksheet, r: u32, c: u16, x: Option<f64>) -> Result<()> {
    if let Some(x) = x {
        sheet.write_number(r, c, x)?;
    }
    Ok(())
}

/// Build the workbook: one sheet each for categories, types, days, and hotspots.
pub fn build(output: &Output) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("categories")?;
    header(sheet, &["category", "events"], &bold)?;
    for (i, c) in output.categories.iter().enumerate() {
        sheet.write_string(row(i), 0, &c.category)?;
        sheet.write_number(row(i), 1, c.count as f64)?;
    }

    let sheet = workbook.add_worksheet().set_name("types")?;
    header(
        sheet,
        &["category", "events", "avg_magnitude", "max_magnitude"],
        &bold,
    )?;
    for (i, t) in output.types.iter().enumerate() {
        sheet.write_string(row(i), 0, &t.category)?;
        sheet.write_number(row(i), 1, t.events as f64)?;
        write_optional(sheet, row(i), 2, t.avg_magnitude)?;
        write_optional(sheet, row(i), 3, t.max_magnitude)?;
    }

    let sheet = workbook.add_worksheet().set_name("daily")?;
    header(sheet, &["date", "count"], &bold)?;
    for (i, d) in output.daily.iter().enumerate() {
        sheet.write_string(row(i), 0, &d.date)?;
        sheet.write_number(row(i), 1, d.count as f64)?;
    }

    let sheet = workbook.add_worksheet().set_name("hotspots")?;
    header(sheet, &["lat_bin", "lon_bin", "count"], &bold)?;
    for (i, h) in output.hotspots.iter().enumerate() {
        sheet.write_number(row(i), 0, h.lat_bin as f64)?;
        sheet.write_number(row(i), 1, h.lon_bin as f64)?;
        sheet.write_number(row(i), 2, h.count as f64)?;
    }

    Ok(workbook)
}

pub fn save(output: &Output, path: &Path) -> Result<()> {
    let mut workbook = build(output)?;
    workbook.save(path)?;
    Ok(())
}
