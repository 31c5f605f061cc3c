//! Main entry point for calculating everything.

use crate::columns::ColumnMapping;
use crate::engine;
use crate::errors::{self, Result};
use crate::export;
use crate::input::Source;
use crate::output::{self, Output};
use crate::record::{self, Event};
use crate::symbols::SymbolTables;
use crate::workbook;
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// What to calculate?
pub struct DriverArgs<'a> {
    /// Input feed.
    pub infile: &'a Path,

    /// Field delimiter of the feed.
    pub delimiter: char,

    /// Number of worker threads, at least 1.
    /// See [crate::parallelism::worker_count].
    pub threads: usize,
}

/// Events in input order, and the summary computed from them.
pub struct Calculated {
    pub events: Vec<Event>,
    pub output: Output,
}

impl Calculated {
    pub fn markers(&self) -> usize {
        self.events.iter().filter(|e| e.valid).count()
    }
}

/// Calculate everything for an already loaded feed.
pub fn calc_source(source: &Source, delimiter: char, threads: usize) -> Result<Calculated> {
    if delimiter == '"' {
        return Err(errors::invalid_argument(
            "the quote character cannot be the delimiter".to_owned(),
        ));
    }
    let header = record::split_fields(&source.header, delimiter);
    let columns = ColumnMapping::resolve(&header);
    let ingested = engine::ingest(&source.rows, &columns, delimiter, threads);
    let output = Output::new(columns, &ingested.profile, &ingested.events);
    info!(
        target: "hazardmap",
        "{} valid events out of {} rows, {} categories",
        output.diagnostics.valid,
        output.diagnostics.rows,
        output.categories.len()
    );
    Ok(Calculated {
        events: ingested.events,
        output,
    })
}

/// Calculate everything.
///
/// This is the main entry point for the library.
pub fn calc(args: &DriverArgs) -> Result<Calculated> {
    info!(target: "hazardmap", "read: {}", args.infile.display());
    let source = Source::read(args.infile)?;
    info!(target: "hazardmap", "threads: {}", args.threads);
    calc_source(&source, args.delimiter, args.threads)
}

/// Where to put the results?
pub struct ExportArgs<'a> {
    /// Results directory, created if missing.
    pub outdir: &'a Path,
    /// Document name in the KML file.
    pub name: &'a str,
    pub tables: &'a SymbolTables,
    /// Pretty print the JSON summary.
    pub pretty: bool,
    /// Also write a spreadsheet.
    pub xlsx: bool,
}

/// Write the marker file and the summaries, and return the paths written.
pub fn write_results(args: &ExportArgs, calculated: &Calculated) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(args.outdir)?;
    let mut written = vec![];

    let path = args.outdir.join(export::MARKERS_FILE);
    let mut writer = io::BufWriter::new(fs::File::create(&path)?);
    let n = export::write_kml(
        &mut writer,
        args.name,
        export::markers(&calculated.events, args.tables),
    )?;
    writer.flush()?;
    info!(target: "hazardmap", "write: {} ({n} markers)", path.display());
    written.push(path);

    let path = args.outdir.join(output::SUMMARY_FILE);
    let writer = io::BufWriter::new(fs::File::create(&path)?);
    if args.pretty {
        serde_json::to_writer_pretty(writer, &calculated.output)?;
    } else {
        serde_json::to_writer(writer, &calculated.output)?;
    }
    info!(target: "hazardmap", "write: {}", path.display());
    written.push(path);

    if args.xlsx {
        let path = args.outdir.join(workbook::WORKBOOK_FILE);
        workbook::save(&calculated.output, &path)?;
        info!(target: "hazardmap", "write: {}", path.display());
        written.push(path);
    }
    Ok(written)
}
