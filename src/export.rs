//! KML export of event markers.

use crate::record::Event;
use crate::symbols::{SymbolStyle, SymbolTables};
use std::io::{self, Write};

/// File name of the marker export.
pub const MARKERS_FILE: &str = "disaster_markers.kml";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn label(event: &Event) -> &str {
    if event.category.is_empty() {
        "unclassified"
    } else {
        &event.category
    }
}

/// Valid events with their styles, in input order.
pub fn markers<'a>(
    events: &'a [Event],
    tables: &'a SymbolTables,
) -> impl Iterator<Item = (&'a Event, SymbolStyle)> + 'a {
    events
        .iter()
        .filter(|e| e.valid)
        .map(move |e| (e, tables.style(e)))
}

fn write_marker<W: Write>(w: &mut W, event: &Event, style: &SymbolStyle) -> io::Result<()> {
    let (lat, lon) = match event.position() {
        Some(p) => p,
        None => return Ok(()),
    };
    let magnitude = match event.magnitude {
        Some(m) => format!("{m}"),
        None => "unknown".to_owned(),
    };
    writeln!(w, "    <Placemark>")?;
    writeln!(w, "      <name>{}</name>", escape(label(event)))?;
    writeln!(
        w,
        "      <description>{}, magnitude {}</description>",
        escape(&event.timestamp),
        magnitude
    )?;
    writeln!(w, "      <Style>")?;
    writeln!(w, "        <IconStyle>")?;
    writeln!(w, "          <color>{}</color>", escape(&style.color))?;
    writeln!(w, "          <scale>{:.3}</scale>", style.scale)?;
    writeln!(w, "        </IconStyle>")?;
    writeln!(w, "      </Style>")?;
    writeln!(w, "      <Point>")?;
    writeln!(w, "        <coordinates>{lon},{lat},0</coordinates>")?;
    writeln!(w, "      </Point>")?;
    writeln!(w, "    </Placemark>")?;
    Ok(())
}

/// Write one placemark per marker and return the number written.
///
/// Markers for invalid events are dropped.
pub fn write_kml<'a, W, I>(w: &mut W, name: &str, markers: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a Event, SymbolStyle)>,
{
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(w, "  <Document>")?;
    writeln!(w, "    <name>{}</name>", escape(name))?;
    let mut n = 0;
    for (event, style) in markers {
        if event.valid {
            write_marker(w, event, &style)?;
            n += 1;
        }
    }
    writeln!(w, "  </Document>")?;
    writeln!(w, "</kml>")?;
    Ok(n)
}
