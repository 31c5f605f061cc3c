//! Loading the raw event feed.

use crate::errors::{self, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Default location of the event feed.
pub const DEFAULT_INFILE: &str = "data/events_12months.csv";

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// The whole feed, loaded up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// The first line of the feed.
    pub header: String,
    /// All remaining lines, in input order.
    pub rows: Vec<String>,
}

impl Source {
    /// Split text into a header and data rows.
    ///
    /// Fails if there is no header or no data row after it.
    /// A leading byte order mark is dropped.
    pub fn from_text(name: &str, text: &str) -> Result<Source> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines();
        let header = match lines.next() {
            Some(h) if !h.trim().is_empty() => h.to_owned(),
            _ => return Err(errors::source_unavailable(format!("{name}: empty input"))),
        };
        let rows: Vec<String> = lines.map(|l| l.to_owned()).collect();
        if rows.iter().all(|r| r.trim().is_empty()) {
            return Err(errors::source_unavailable(format!(
                "{name}: no data rows after the header"
            )));
        }
        Ok(Source { header, rows })
    }

    /// Read the feed from a file.
    pub fn read(path: &Path) -> Result<Source> {
        let name = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|e| errors::source_unavailable(format!("{name}: {e}")))?;
        let source = Source::from_text(&name, &text)?;
        debug!(target: "hazardmap", "{name}: {} data rows", source.rows.len());
        Ok(source)
    }
}
