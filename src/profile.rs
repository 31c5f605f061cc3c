//! Order-independent counts over a batch of events.

use crate::parallelism::RawResult;
use crate::record::{Event, Parsed};
use std::collections::HashMap;

/// Size of a hotspot cell in degrees.
pub const HOTSPOT_DEGREES: f64 = 5.0;

/// Number of valid events per category.
pub type CategoryHistogram = HashMap<String, u64>;

/// Hotspot cell, as multiples of [HOTSPOT_DEGREES] (south-west corner).
///
/// Coordinates are not range checked; cells beyond the `i64` range share the
/// outermost cell.
pub type HotspotBin = (i64, i64);

pub fn hotspot_bin(latitude: f64, longitude: f64) -> HotspotBin {
    (
        (latitude / HOTSPOT_DEGREES).floor() as i64,
        (longitude / HOTSPOT_DEGREES).floor() as i64,
    )
}

/// South-west corner of a cell in whole degrees.
pub fn hotspot_corner(bin: HotspotBin) -> (i64, i64) {
    let degrees = HOTSPOT_DEGREES as i64;
    (bin.0.saturating_mul(degrees), bin.1.saturating_mul(degrees))
}

/// What went wrong while reading the rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub rows: u64,
    pub valid: u64,
    pub malformed: u64,
    pub unparsable: u64,
}

impl Diagnostics {
    fn add(&mut self, other: Diagnostics) {
        self.rows += other.rows;
        self.valid += other.valid;
        self.malformed += other.malformed;
        self.unparsable += other.unparsable;
    }
}

/// Counts for one batch of rows.
///
/// Each worker builds its own, and they are summed once all workers are done.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub categories: CategoryHistogram,
    pub daily: HashMap<String, u64>,
    pub hotspots: HashMap<HotspotBin, u64>,
    pub diagnostics: Diagnostics,
}

fn merge_counts<K: Eq + std::hash::Hash>(into: &mut HashMap<K, u64>, from: HashMap<K, u64>) {
    for (k, v) in from {
        *into.entry(k).or_insert(0) += v;
    }
}

impl RawProfile {
    pub fn new() -> RawProfile {
        RawProfile::default()
    }

    /// Account for one parsed row.
    pub fn feed(&mut self, parsed: &Parsed) {
        self.diagnostics.rows += 1;
        match parsed {
            Parsed::Skip => self.diagnostics.malformed += 1,
            Parsed::Event { event, unparsable } => {
                self.diagnostics.unparsable += u64::from(*unparsable);
                self.feed_event(event);
            }
        }
    }

    fn feed_event(&mut self, event: &Event) {
        let Some((lat, lon)) = event.position() else {
            return;
        };
        self.diagnostics.valid += 1;
        *self.categories.entry(event.category.clone()).or_insert(0) += 1;
        *self.daily.entry(event.date.clone()).or_insert(0) += 1;
        *self.hotspots.entry(hotspot_bin(lat, lon)).or_insert(0) += 1;
    }
}

impl RawResult for RawProfile {
    fn add(&mut self, other: Self) {
        merge_counts(&mut self.categories, other.categories);
        merge_counts(&mut self.daily, other.daily);
        merge_counts(&mut self.hotspots, other.hotspots);
        self.diagnostics.add(other.diagnostics);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ev(date: &str, lat: Option<f64>, lon: Option<f64>, category: &str) -> Parsed {
        Parsed::Event {
            event: Event::new(date.to_owned(), lat, lon, None, category.to_owned()),
            unparsable: 0,
        }
    }

    #[test]
    fn bins() {
        assert_eq!(hotspot_bin(0.0, 0.0), (0, 0));
        assert_eq!(hotspot_bin(4.99, 5.0), (0, 1));
        assert_eq!(hotspot_bin(-0.1, -180.0), (-1, -36));
        assert_eq!(hotspot_bin(90.0, 179.9), (18, 35));
        assert_eq!(hotspot_bin(1e10, -1e10), (2_000_000_000, -2_000_000_000));
        assert_eq!(hotspot_bin(1e300, -1e300), (i64::MAX, i64::MIN));
    }

    #[test]
    fn corners() {
        assert_eq!(hotspot_corner((7, -16)), (35, -80));
        assert_eq!(hotspot_corner((2_000_000_000, 0)), (10_000_000_000, 0));
        assert_eq!(hotspot_corner((i64::MAX, i64::MIN)), (i64::MAX, i64::MIN));
    }

    #[test]
    fn only_valid_events_count() {
        let mut p = RawProfile::new();
        p.feed(&ev("2024-01-01", Some(1.0), Some(2.0), "flood"));
        p.feed(&ev("2024-01-01", None, Some(2.0), "flood"));
        p.feed(&ev("", Some(1.0), Some(2.0), "flood"));
        p.feed(&Parsed::Skip);
        p.feed(&Parsed::Event {
            event: Event::new("2024-01-02".to_owned(), Some(-1.0), Some(2.0), None, String::new()),
            unparsable: 2,
        });
        assert_eq!(p.categories.len(), 2);
        assert_eq!(p.categories["flood"], 1);
        assert_eq!(p.categories[""], 1);
        assert_eq!(p.daily["2024-01-01"], 1);
        assert_eq!(p.daily["2024-01-02"], 1);
        assert_eq!(p.hotspots[&(0, 0)], 1);
        assert_eq!(p.hotspots[&(-1, 0)], 1);
        assert_eq!(
            p.diagnostics,
            Diagnostics {
                rows: 5,
                valid: 2,
                malformed: 1,
                unparsable: 2,
            }
        );
    }

    #[test]
    fn merge_is_order_independent() {
        let rows = [
            ev("2024-01-01", Some(1.0), Some(2.0), "flood"),
            ev("2024-01-02", Some(11.0), Some(2.0), "earthquake"),
            ev("2024-01-02", Some(12.0), Some(3.0), "earthquake"),
            Parsed::Skip,
        ];
        let mut a = RawProfile::new();
        let mut b = RawProfile::new();
        for r in &rows[..2] {
            a.feed(r);
        }
        for r in &rows[2..] {
            b.feed(r);
        }
        let mut ab = a.clone();
        ab.add(b.clone());
        let mut ba = b;
        ba.add(a);
        assert_eq!(ab, ba);
        assert_eq!(ab.categories["earthquake"], 2);
        assert_eq!(ab.hotspots[&(2, 0)], 2);
        assert_eq!(ab.diagnostics.rows, 4);
    }
}
