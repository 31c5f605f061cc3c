//! Parallel parsing and aggregation of all data rows.

use crate::columns::ColumnMapping;
use crate::parallelism::compute_parallel;
use crate::profile::RawProfile;
use crate::record::{self, Event, Parsed};
use log::debug;

/// Everything computed from the rows.
#[derive(Debug)]
pub struct Ingested {
    /// One event per input row, at the row's index.
    /// Skipped rows leave an invalid default event.
    pub events: Vec<Event>,
    pub profile: RawProfile,
}

/// Parse and count all rows on `nthreads` workers.
///
/// The result is the same for every `nthreads`.
pub fn ingest(
    rows: &[String],
    mapping: &ColumnMapping,
    delimiter: char,
    nthreads: usize,
) -> Ingested {
    let mut events = vec![Event::default(); rows.len()];
    let profile = compute_parallel(
        RawProfile::new,
        |lines: &[String], out: &mut [Event], profile: &mut RawProfile| {
            for (line, slot) in lines.iter().zip(out.iter_mut()) {
                let parsed = record::parse_row(line, mapping, delimiter);
                profile.feed(&parsed);
                if let Parsed::Event { event, .. } = parsed {
                    *slot = event;
                }
            }
        },
        rows,
        &mut events,
        nthreads,
    );
    let d = &profile.diagnostics;
    debug!(
        target: "hazardmap",
        "rows: {}, valid: {}, malformed: {}, unparsable fields: {}",
        d.rows, d.valid, d.malformed, d.unparsable
    );
    Ingested { events, profile }
}
