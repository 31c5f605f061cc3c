//! Data structures for representing the output.

use crate::columns::ColumnMapping;
use crate::profile::{CategoryHistogram, Diagnostics, RawProfile, hotspot_corner};
use crate::record::Event;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// File name of the JSON summary.
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct OCount {
    pub category: String,
    pub count: u64,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct OType {
    pub category: String,
    pub events: u64,
    /// Mean of the known magnitudes.
    /// Events with an unknown magnitude count in `events` but not here.
    pub avg_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct ODay {
    pub date: String,
    pub count: u64,
}

/// Bins are named by their south-west corner in degrees.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct OHotspot {
    pub lat_bin: i64,
    pub lon_bin: i64,
    pub count: u64,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct ODiagnostics {
    pub rows: u64,
    pub valid: u64,
    pub malformed: u64,
    pub unparsable_fields: u64,
    pub unresolved_columns: Vec<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Output {
    pub columns: ColumnMapping,
    pub diagnostics: ODiagnostics,
    /// Most frequent first.
    pub categories: Vec<OCount>,
    pub types: Vec<OType>,
    /// Chronological.
    pub daily: Vec<ODay>,
    /// Busiest first.
    pub hotspots: Vec<OHotspot>,
}

#[derive(Serialize)]
pub struct OError {
    pub error: String,
}

/// Histogram as a list, most frequent first, ties by name.
pub fn sorted_counts(histogram: &CategoryHistogram) -> Vec<OCount> {
    histogram
        .iter()
        .map(|(category, &count)| OCount {
            category: category.clone(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)))
        .collect_vec()
}

struct RawType {
    events: u64,
    known: u64,
    sum: f64,
    max: Option<f64>,
}

/// Per-category magnitude statistics of the valid events.
///
/// Events are visited in input order, so the floating point sums do not
/// depend on how the rows were split between workers.
pub fn type_summary(events: &[Event]) -> Vec<OType> {
    let mut by_type: HashMap<&str, RawType> = HashMap::new();
    for e in events.iter().filter(|e| e.valid) {
        let t = by_type.entry(e.category.as_str()).or_insert(RawType {
            events: 0,
            known: 0,
            sum: 0.0,
            max: None,
        });
        t.events += 1;
        if let Some(m) = e.magnitude {
            t.known += 1;
            t.sum += m;
            t.max = Some(t.max.map_or(m, |x| x.max(m)));
        }
    }
    by_type
        .into_iter()
        .map(|(category, t)| OType {
            category: category.to_owned(),
            events: t.events,
            avg_magnitude: (t.known > 0).then(|| t.sum / t.known as f64),
            max_magnitude: t.max,
        })
        .sorted_by(|a, b| b.events.cmp(&a.events).then_with(|| a.category.cmp(&b.category)))
        .collect_vec()
}

impl Output {
    pub fn new(columns: ColumnMapping, profile: &RawProfile, events: &[Event]) -> Output {
        let Diagnostics {
            rows,
            valid,
            malformed,
            unparsable,
        } = profile.diagnostics;
        let diagnostics = ODiagnostics {
            rows,
            valid,
            malformed,
            unparsable_fields: unparsable,
            unresolved_columns: columns
                .unresolved()
                .iter()
                .map(|f| f.to_string())
                .collect_vec(),
        };
        let daily = profile
            .daily
            .iter()
            .map(|(date, &count)| ODay {
                date: date.clone(),
                count,
            })
            .sorted_by(|a, b| a.date.cmp(&b.date))
            .collect_vec();
        let hotspots = profile
            .hotspots
            .iter()
            .map(|(&bin, &count)| {
                let (lat_bin, lon_bin) = hotspot_corner(bin);
                OHotspot {
                    lat_bin,
                    lon_bin,
                    count,
                }
            })
            .sorted_by(|a, b| {
                b.count
                    .cmp(&a.count)
                    .then_with(|| (a.lat_bin, a.lon_bin).cmp(&(b.lat_bin, b.lon_bin)))
            })
            .collect_vec();
        Output {
            columns,
            diagnostics,
            categories: sorted_counts(&profile.categories),
            types: type_summary(events),
            daily,
            hotspots,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ev(category: &str, magnitude: Option<f64>) -> Event {
        Event::new(
            "2024-01-01".to_owned(),
            Some(1.0),
            Some(1.0),
            magnitude,
            category.to_owned(),
        )
    }

    #[test]
    fn counts_sorted() {
        let mut h = CategoryHistogram::new();
        h.insert("flood".to_owned(), 2);
        h.insert("earthquake".to_owned(), 5);
        h.insert("drought".to_owned(), 2);
        let c = sorted_counts(&h);
        let names = c.iter().map(|x| x.category.as_str()).collect_vec();
        assert_eq!(names, ["earthquake", "drought", "flood"]);
    }

    #[test]
    fn far_away_hotspots() {
        let mut p = RawProfile::new();
        let far = [(1e10, 20.0), (-1e300, 1e300), (10.0, 20.0)];
        for (lat, lon) in far {
            p.feed(&crate::record::Parsed::Event {
                event: Event::new(
                    "2024-01-01".to_owned(),
                    Some(lat),
                    Some(lon),
                    None,
                    "flood".to_owned(),
                ),
                unparsable: 0,
            });
        }
        let o = Output::new(ColumnMapping::default(), &p, &[]);
        let corners = o
            .hotspots
            .iter()
            .map(|h| (h.lat_bin, h.lon_bin))
            .collect_vec();
        assert_eq!(
            corners,
            [(i64::MIN, i64::MAX), (10, 20), (10_000_000_000, 20)]
        );
    }

    #[test]
    fn types() {
        let mut invalid = ev("flood", Some(100.0));
        invalid.valid = false;
        let events = [
            ev("earthquake", Some(5.0)),
            ev("earthquake", Some(6.0)),
            ev("earthquake", None),
            ev("flood", None),
            invalid,
        ];
        let t = type_summary(&events);
        assert_eq!(
            t,
            [
                OType {
                    category: "earthquake".to_owned(),
                    events: 3,
                    avg_magnitude: Some(5.5),
                    max_magnitude: Some(6.0),
                },
                OType {
                    category: "flood".to_owned(),
                    events: 1,
                    avg_magnitude: None,
                    max_magnitude: None,
                },
            ]
        );
    }
}
