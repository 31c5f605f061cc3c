//! Sniffing semantic columns from the header row.

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic field of an event record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Time,
    Latitude,
    Longitude,
    Magnitude,
    Category,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Time,
        Field::Latitude,
        Field::Longitude,
        Field::Magnitude,
        Field::Category,
    ];

    /// Which field a header cell names, if any.
    ///
    /// The checks are tried in priority order, so a cell names at most one field.
    fn sniff(cell: &str) -> Option<Field> {
        let cell = cell.to_lowercase();
        if cell.contains("time") || cell.contains("date") {
            Some(Field::Time)
        } else if cell.contains("lat") {
            Some(Field::Latitude)
        } else if cell.contains("lon") {
            Some(Field::Longitude)
        } else if cell.contains("mag") {
            Some(Field::Magnitude)
        } else if cell.contains("type") {
            Some(Field::Category)
        } else {
            None
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Time => write!(f, "time"),
            Field::Latitude => write!(f, "latitude"),
            Field::Longitude => write!(f, "longitude"),
            Field::Magnitude => write!(f, "magnitude"),
            Field::Category => write!(f, "category"),
        }
    }
}

/// Column positions of the semantic fields, `None` if unresolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnMapping {
    pub time: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub magnitude: Option<usize>,
    pub category: Option<usize>,
}

impl ColumnMapping {
    /// Resolve the mapping from header cells.
    ///
    /// Matching is case-insensitive and by substring. If several cells name
    /// the same field, the last one wins.
    pub fn resolve<S: AsRef<str>>(header: &[S]) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();
        for (i, cell) in header.iter().enumerate() {
            if let Some(field) = Field::sniff(cell.as_ref()) {
                *mapping.slot(field) = Some(i);
            }
        }
        debug!(target: "hazardmap", "columns: {mapping}");
        for field in mapping.unresolved() {
            warn!(target: "hazardmap", "no column found for {field}");
        }
        mapping
    }

    fn slot(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::Time => &mut self.time,
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
            Field::Magnitude => &mut self.magnitude,
            Field::Category => &mut self.category,
        }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Time => self.time,
            Field::Latitude => self.latitude,
            Field::Longitude => self.longitude,
            Field::Magnitude => self.magnitude,
            Field::Category => self.category,
        }
    }

    /// Highest resolved column index; a row needs a field at this position.
    pub fn max_index(&self) -> Option<usize> {
        Field::ALL.iter().filter_map(|&f| self.get(f)).max()
    }

    pub fn unresolved(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|&f| self.get(f).is_none())
            .collect_vec()
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts = Field::ALL
            .iter()
            .map(|&field| match self.get(field) {
                Some(i) => format!("{field}={i}"),
                None => format!("{field}=?"),
            })
            .join(", ");
        write!(f, "{parts}")
    }
}
