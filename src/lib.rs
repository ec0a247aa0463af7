//! World Ocean Database station metadata to GPX waypoints.
//!
//! The pipeline is two passes over memory: [`wod_parser`] groups the text into
//! records, then [`gpx_writer`] maps each record to a waypoint and serializes
//! the document.

pub mod errors;
pub mod gpx_writer;
pub mod iso_time;
pub mod model;
pub mod wod_parser;

use crate::errors::AppError;
use crate::gpx_writer::GpxOptions;
use crate::wod_parser::Boundary;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertSummary {
    pub records: usize,
    pub waypoints: usize,
}

/// Parse `text` and write the GPX document to `out`.
pub fn convert<W: Write>(
    text: &str,
    boundary: &Boundary,
    opts: &GpxOptions,
    out: W,
) -> Result<ConvertSummary, AppError> {
    let records = wod_parser::parse_text(text, boundary);
    let waypoints = gpx_writer::write_gpx(&records, out, opts)?;
    Ok(ConvertSummary { records: records.len(), waypoints })
}
