//! Mapping events to marker styles.
//!
//! Colors and boost factors are chosen by ordered substring rules: the first
//! rule whose pattern occurs in the event category wins. Put more specific
//! patterns first.

use crate::errors::{self, Result};
use crate::record::Event;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MIN_ICON_SCALE: f64 = 0.8;
pub const MAX_ICON_SCALE: f64 = 5.5;

/// Magnitude that maps to a base scale of 1.
const MAGNITUDE_PER_SCALE: f64 = 3.0;

/// Base scale when the magnitude is unknown.
const UNKNOWN_MAGNITUDE_SCALE: f64 = 1.0;

/// Boost for categories without a rule.
pub const DEFAULT_BOOST: f64 = 1.8;

/// KML color (aabbggrr) for categories without a rule.
pub const UNCLASSIFIED_COLOR: &str = "ff9e9e9e";

/// Visual attributes of one exported marker.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolStyle {
    pub color: String,
    pub scale: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Rule<T> {
    pub pattern: String,
    pub value: T,
}

fn rule<T>(pattern: &str, value: T) -> Rule<T> {
    Rule {
        pattern: pattern.to_owned(),
        value,
    }
}

/// The first rule whose pattern occurs in `category`.
pub fn lookup<'a, T>(rules: &'a [Rule<T>], category: &str) -> Option<&'a T> {
    rules
        .iter()
        .find(|r| category.contains(r.pattern.as_str()))
        .map(|r| &r.value)
}

/// Color and boost rules.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SymbolTables {
    pub colors: Vec<Rule<String>>,
    pub boosts: Vec<Rule<f64>>,
    #[serde(default = "default_color")]
    pub default_color: String,
    #[serde(default = "default_boost")]
    pub default_boost: f64,
}

fn default_color() -> String {
    UNCLASSIFIED_COLOR.to_owned()
}

fn default_boost() -> f64 {
    DEFAULT_BOOST
}

impl Default for SymbolTables {
    fn default() -> SymbolTables {
        SymbolTables {
            colors: vec![
                rule("earthquake", "ff0000ff".to_owned()),
                rule("volcan", "ff0045ff".to_owned()),
                rule("tsunami", "ffff0000".to_owned()),
                rule("cyclone", "ffff00ff".to_owned()),
                rule("hurricane", "ffff00ff".to_owned()),
                rule("typhoon", "ffff00ff".to_owned()),
                rule("storm", "ffffff00".to_owned()),
                rule("flood", "ffff8c00".to_owned()),
                rule("fire", "ff00a5ff".to_owned()),
                rule("drought", "ff00d7ff".to_owned()),
                rule("landslide", "ff13458b".to_owned()),
            ],
            boosts: vec![
                rule("earthquake", 1.0),
                rule("volcan", 1.4),
                rule("tsunami", 1.5),
                rule("cyclone", 1.5),
                rule("hurricane", 1.5),
                rule("typhoon", 1.5),
                rule("storm", 1.3),
                rule("flood", 1.2),
                rule("fire", 1.2),
                rule("drought", 1.1),
                rule("landslide", 1.1),
            ],
            default_color: default_color(),
            default_boost: default_boost(),
        }
    }
}

impl SymbolTables {
    /// Read rules from a JSON file.
    pub fn load(path: &Path) -> Result<SymbolTables> {
        let data = fs::read_to_string(path)?;
        SymbolTables::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<SymbolTables> {
        let tables: SymbolTables = serde_json::from_str(data)?;
        tables.validate()?;
        Ok(tables)
    }

    fn validate(&self) -> Result<()> {
        let patterns = self
            .colors
            .iter()
            .map(|r| &r.pattern)
            .chain(self.boosts.iter().map(|r| &r.pattern));
        for p in patterns {
            if p.is_empty() {
                return Err(errors::invalid_input_ref("empty rule pattern"));
            }
        }
        let boosts = self
            .boosts
            .iter()
            .map(|r| (r.pattern.as_str(), r.value))
            .chain([("default", self.default_boost)]);
        for (pattern, boost) in boosts {
            if !(boost.is_finite() && boost > 0.0) {
                return Err(errors::invalid_input(format!(
                    "boost for '{pattern}' must be a positive number, got {boost}"
                )));
            }
        }
        Ok(())
    }

    pub fn color(&self, category: &str) -> &str {
        lookup(&self.colors, category).unwrap_or(&self.default_color)
    }

    pub fn boost(&self, category: &str) -> f64 {
        lookup(&self.boosts, category)
            .copied()
            .unwrap_or(self.default_boost)
    }

    pub fn style(&self, event: &Event) -> SymbolStyle {
        SymbolStyle {
            color: self.color(&event.category).to_owned(),
            scale: icon_scale(event.magnitude, self.boost(&event.category)),
        }
    }
}

/// Scale before the category boost.
pub fn base_scale(magnitude: Option<f64>) -> f64 {
    match magnitude {
        None => UNKNOWN_MAGNITUDE_SCALE,
        Some(m) => (m / MAGNITUDE_PER_SCALE).clamp(MIN_ICON_SCALE, MAX_ICON_SCALE),
    }
}

/// Clamp, boost, clamp again.
///
/// The final clamp is into the full range so that boosts below 1 cannot
/// shrink a marker under [MIN_ICON_SCALE].
pub fn icon_scale(magnitude: Option<f64>, boost: f64) -> f64 {
    (base_scale(magnitude) * boost).clamp(MIN_ICON_SCALE, MAX_ICON_SCALE)
}
