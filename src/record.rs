//! Parsing one raw row into an [Event].

use crate::columns::ColumnMapping;
use serde::{Deserialize, Serialize};

/// Number of leading timestamp characters that form the date.
const DATE_PREFIX: usize = 10;

/// One disaster observation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Event {
    /// Time text as found in the row, unparsed.
    pub timestamp: String,
    /// The first 10 characters of the timestamp.
    pub date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub magnitude: Option<f64>,
    /// Lower-cased category label; may be empty.
    pub category: String,
    pub valid: bool,
}

impl Event {
    pub fn new(
        timestamp: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        magnitude: Option<f64>,
        category: String,
    ) -> Event {
        let date: String = timestamp.chars().take(DATE_PREFIX).collect();
        let valid = is_valid(latitude, longitude, &date);
        Event {
            timestamp,
            date,
            latitude,
            longitude,
            magnitude,
            category,
            valid,
        }
    }

    /// Coordinates of a valid event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.valid, self.latitude, self.longitude) {
            (true, Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

pub fn is_valid(latitude: Option<f64>, longitude: Option<f64>, date: &str) -> bool {
    latitude.is_some() && longitude.is_some() && !date.is_empty()
}

/// What came out of one row.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    Event {
        event: Event,
        /// Numeric fields that were present but not numbers.
        unparsable: u32,
    },
    /// Not enough fields for the resolved columns.
    Skip,
}

/// Split a row into trimmed fields.
///
/// A `"` toggles quoting and is dropped. The delimiter does not split inside quotes.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = vec![];
    let mut cur = String::new();
    let mut quoted = false;
    for c in line.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if c == delimiter && !quoted {
            fields.push(cur.trim().to_owned());
            cur.clear();
        } else {
            cur.push(c);
        }
    }
    fields.push(cur.trim().to_owned());
    fields
}

/// Empty fields count as absent, anything else that is not a finite number as unparsable.
fn numeric(fields: &[String], index: Option<usize>, unparsable: &mut u32) -> Option<f64> {
    let s = text(fields, index);
    if s.is_empty() {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            *unparsable += 1;
            None
        }
    }
}

fn text(fields: &[String], index: Option<usize>) -> &str {
    match index {
        Some(i) => fields.get(i).map(|s| s.as_str()).unwrap_or(""),
        None => "",
    }
}

/// Parse one data row.
pub fn parse_row(line: &str, mapping: &ColumnMapping, delimiter: char) -> Parsed {
    let fields = split_fields(line, delimiter);
    if let Some(max) = mapping.max_index() {
        if fields.len() <= max {
            return Parsed::Skip;
        }
    }
    let mut unparsable = 0;
    let latitude = numeric(&fields, mapping.latitude, &mut unparsable);
    let longitude = numeric(&fields, mapping.longitude, &mut unparsable);
    let magnitude = numeric(&fields, mapping.magnitude, &mut unparsable);
    let event = Event::new(
        text(&fields, mapping.time).to_owned(),
        latitude,
        longitude,
        magnitude,
        text(&fields, mapping.category).to_lowercase(),
    );
    Parsed::Event { event, unparsable }
}

#[cfg(test)]
mod test {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping::resolve(&["id", "time", "latitude", "longitude", "magnitude", "type"])
    }

    fn event(line: &str) -> (Event, u32) {
        match parse_row(line, &mapping(), ',') {
            Parsed::Event { event, unparsable } => (event, unparsable),
            Parsed::Skip => panic!("row skipped: {line}"),
        }
    }

    #[test]
    fn split_plain() {
        assert_eq!(split_fields("a, b ,c", ','), ["a", "b", "c"]);
        assert_eq!(split_fields("", ','), [""]);
        assert_eq!(split_fields("a,,", ','), ["a", "", ""]);
        assert_eq!(split_fields("a;b,c", ';'), ["a", "b,c"]);
    }

    #[test]
    fn split_quoted() {
        assert_eq!(
            split_fields(r#"1,"Honshu, Japan",x"#, ','),
            ["1", "Honshu, Japan", "x"]
        );
        // no escaped quotes: "" just toggles twice
        assert_eq!(split_fields(r#"a""b,c"#, ','), ["ab", "c"]);
        // an unterminated quote swallows the rest of the row
        assert_eq!(split_fields(r#""a,b,c"#, ','), ["a,b,c"]);
    }

    #[test]
    fn earthquake() {
        let (e, unparsable) = event("1,2024-03-01T00:00:00,10.0,20.0,6.0,Earthquake");
        assert_eq!(
            e,
            Event {
                timestamp: "2024-03-01T00:00:00".to_owned(),
                date: "2024-03-01".to_owned(),
                latitude: Some(10.0),
                longitude: Some(20.0),
                magnitude: Some(6.0),
                category: "earthquake".to_owned(),
                valid: true,
            }
        );
        assert_eq!(unparsable, 0);
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(parse_row("1,2024-03-01,10.0", &mapping(), ','), Parsed::Skip);
        assert_eq!(
            parse_row("1,2024-03-01,10.0,20.0,6.0", &mapping(), ','),
            Parsed::Skip
        );
    }

    #[test]
    fn unknown_magnitude_stays_valid() {
        let (e, unparsable) = event("1,2024-03-01,10.0,20.0,N/A,flood");
        assert_eq!(e.magnitude, None);
        assert!(e.valid);
        assert_eq!(unparsable, 1);
        let (e, unparsable) = event("1,2024-03-01,10.0,20.0,,flood");
        assert_eq!(e.magnitude, None);
        assert!(e.valid);
        assert_eq!(unparsable, 0);
    }

    #[test]
    fn bad_coordinates_invalidate() {
        let (e, unparsable) = event("1,2024-03-01,north,20.0,5,flood");
        assert_eq!(e.latitude, None);
        assert!(!e.valid);
        assert_eq!(unparsable, 1);
        let (e, _) = event("1,2024-03-01,NaN,inf,5,flood");
        assert_eq!((e.latitude, e.longitude), (None, None));
        assert!(!e.valid);
    }

    #[test]
    fn empty_time_invalidates() {
        let (e, _) = event("1,,10.0,20.0,5,flood");
        assert_eq!(e.date, "");
        assert!(!e.valid);
    }

    #[test]
    fn short_timestamp_is_its_own_date() {
        let (e, _) = event("1,2024,10.0,20.0,5,flood");
        assert_eq!(e.date, "2024");
        assert!(e.valid);
    }

    #[test]
    fn empty_category_is_valid() {
        let (e, _) = event("1,2024-03-01,10,20,5,");
        assert_eq!(e.category, "");
        assert!(e.valid);
    }

    #[test]
    fn unresolved_columns() {
        let m = ColumnMapping::resolve(&["lat", "lon", "when"]);
        match parse_row("1.5,2.5,2024-01-01", &m, ',') {
            Parsed::Event { event, .. } => {
                assert_eq!(event.latitude, Some(1.5));
                assert_eq!(event.timestamp, "");
                assert_eq!(event.magnitude, None);
                assert!(!event.valid);
            }
            Parsed::Skip => panic!("skipped"),
        }
    }
}
