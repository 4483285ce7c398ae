//! Gazetteer store: the flat file of known places.
//!
//! The file is pipe-delimited UTF-8 text, one `name|lat|lng` record per
//! line, produced by the ingest binary. There is no header and no escaping;
//! a `|` inside a name corrupts the row into four fields and the row is
//! dropped like any other field-count mismatch.

use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::models::Place;

/// Gazetteer load failure. The request handler surfaces this as a generic
/// internal error; the detail stays in the server log.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read gazetteer file")]
    Io(#[from] std::io::Error),
    #[error("invalid coordinate on line {line}")]
    InvalidCoordinate { line: usize },
}

/// Load every well-formed record from the gazetteer file.
///
/// Rows with a field count other than three are skipped. A three-field row
/// whose coordinates do not parse fails the whole load. Rows whose
/// coordinates fall off the WGS84 grid are skipped with a warning.
pub fn load(path: &Path) -> Result<Vec<Place>, LoadError> {
    let content = std::fs::read_to_string(path)?;

    let mut places = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 3 {
            continue;
        }
        let lat: f64 = fields[1]
            .trim()
            .parse()
            .map_err(|_| LoadError::InvalidCoordinate { line: idx + 1 })?;
        let lng: f64 = fields[2]
            .trim()
            .parse()
            .map_err(|_| LoadError::InvalidCoordinate { line: idx + 1 })?;

        let place = Place {
            name: fields[0].to_string(),
            lat,
            lng,
        };
        if !place.point().in_range() {
            warn!("skipping gazetteer line {}: coordinate out of range", idx + 1);
            continue;
        }
        places.push(place);
    }

    Ok(places)
}
