use crate::errors::AppError;
use crate::iso_time::convert_to_iso;
use crate::model::{fields, Record, Waypoint};
use log::{debug, info};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const DEFAULT_SYMBOL: &str = "Symbol-X-Small-Red";
pub const DEFAULT_CREATOR: &str = "wod2gpx";
const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_TIME: &str = "0.0";

#[derive(Clone, Debug)]
pub struct GpxOptions {
    /// Prepended as the first line of every description when non-empty.
    pub comment: Option<String>,
    pub symbol: String,
    pub creator: String,
}

impl Default for GpxOptions {
    fn default() -> Self {
        Self {
            comment: None,
            symbol: DEFAULT_SYMBOL.into(),
            creator: DEFAULT_CREATOR.into(),
        }
    }
}

fn build_description(record: &Record, comment: Option<&str>) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(4);
    if let Some(c) = comment.filter(|c| !c.is_empty()) {
        lines.push(c.to_string());
    }
    for (label, key) in [
        ("CAST", fields::CAST),
        ("NODC Cruise ID", fields::NODC_CRUISE_ID),
        ("Originators Cruise ID", fields::ORIGINATORS_CRUISE_ID),
    ] {
        lines.push(format!("{}: {}", label, record.get(key).unwrap_or(NOT_AVAILABLE)));
    }
    lines.join("\n")
}

/// Map one record to a waypoint.
/// Returns `Ok(None)` when either coordinate is missing; a bad date is an error.
pub fn record_to_waypoint(record: &Record, opts: &GpxOptions) -> Result<Option<Waypoint>, AppError> {
    let (Some(lat), Some(lon)) = (record.get(fields::LATITUDE), record.get(fields::LONGITUDE)) else {
        return Ok(None);
    };

    let time = match (
        record.get(fields::YEAR),
        record.get(fields::MONTH),
        record.get(fields::DAY),
    ) {
        (Some(y), Some(m), Some(d)) => {
            let t = record.get(fields::TIME).unwrap_or(DEFAULT_TIME);
            Some(convert_to_iso(y, m, d, t)?)
        }
        _ => None,
    };

    Ok(Some(Waypoint {
        lat: lat.to_string(),
        lon: lon.to_string(),
        name: record.get(fields::STATION_ID).unwrap_or(NOT_AVAILABLE).to_string(),
        description: build_description(record, opts.comment.as_deref()),
        time,
        symbol: opts.symbol.clone(),
    }))
}

/// Convert every record that has coordinates, stopping at the first bad date.
pub fn records_to_waypoints(records: &[Record], opts: &GpxOptions) -> Result<Vec<Waypoint>, AppError> {
    let mut out = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        match record_to_waypoint(rec, opts)? {
            Some(wpt) => out.push(wpt),
            None => debug!("record #{} has no Latitude/Longitude; dropped", i + 1),
        }
    }
    Ok(out)
}

fn emit<W: Write>(w: &mut Writer<W>, ev: Event<'_>) -> Result<(), AppError> {
    w.write_event(ev).map_err(|e| AppError::IO(format!("xml write: {}", e)))
}

fn emit_text_element<W: Write>(w: &mut Writer<W>, tag: &str, text: &str) -> Result<(), AppError> {
    emit(w, Event::Start(BytesStart::new(tag)))?;
    emit(w, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    emit(w, Event::End(BytesEnd::new(tag)))
}

fn emit_waypoint<W: Write>(w: &mut Writer<W>, wpt: &Waypoint) -> Result<(), AppError> {
    let mut start = BytesStart::new("wpt");
    start.push_attribute(("lat", wpt.lat.as_str()));
    start.push_attribute(("lon", wpt.lon.as_str()));
    emit(w, Event::Start(start))?;

    emit_text_element(w, "name", &wpt.name)?;
    emit_text_element(w, "desc", &wpt.description)?;
    if let Some(t) = &wpt.time {
        emit_text_element(w, "time", t)?;
    }
    emit_text_element(w, "sym", &wpt.symbol)?;

    emit(w, Event::End(BytesEnd::new("wpt")))
}

/// Serialize waypoints as a GPX 1.1 document, two-space indented, with an XML
/// declaration on the first line.
pub fn write_waypoints<W: Write>(waypoints: &[Waypoint], out: W, opts: &GpxOptions) -> Result<(), AppError> {
    let mut w = Writer::new_with_indent(out, b' ', 2);

    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", opts.creator.as_str()));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    emit(&mut w, Event::Start(root))?;

    for wpt in waypoints {
        emit_waypoint(&mut w, wpt)?;
    }

    emit(&mut w, Event::End(BytesEnd::new("gpx")))?;
    w.into_inner().flush()?;
    Ok(())
}

/// Full emitter: map records, then write. Returns the number of waypoints written.
pub fn write_gpx<W: Write>(records: &[Record], out: W, opts: &GpxOptions) -> Result<usize, AppError> {
    let waypoints = records_to_waypoints(records, opts)?;
    write_waypoints(&waypoints, out, opts)?;
    info!("GPX wrote {} waypoints from {} records", waypoints.len(), records.len());
    Ok(waypoints.len())
}
