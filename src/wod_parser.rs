use crate::errors::AppError;
use crate::model::{fields, Record};
use log::{debug, trace, warn};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A `#` followed by 80 dashes, the section separator WOD exports put between casts.
pub const DEFAULT_SEPARATOR: &str = r"^#-{80}";
pub const DEFAULT_SENTINEL: &str = fields::CAST;

/// How the parser decides that one station's block has ended.
#[derive(Clone, Debug)]
pub enum Boundary {
    /// Lines matching the pattern close the current record and carry no data.
    Separator(Regex),
    /// A data line whose key equals the sentinel closes the current record
    /// and then becomes the first field of the next one.
    SentinelKey(String),
}

impl Boundary {
    pub fn separator(pattern: &str) -> Result<Self, AppError> {
        Regex::new(pattern)
            .map(Boundary::Separator)
            .map_err(|e| AppError::Parse(format!("separator pattern {:?}: {}", pattern, e)))
    }

    pub fn sentinel(key: impl Into<String>) -> Self {
        Boundary::SentinelKey(key.into())
    }

    fn classify<'a>(&self, raw: &'a str) -> LineKind<'a> {
        let line = strip_bom(raw).trim_end();
        if let Boundary::Separator(re) = self {
            if re.is_match(line) {
                return LineKind::Separator;
            }
        }
        let s = line.trim_start();
        if s.is_empty() {
            return LineKind::Blank;
        }
        if s.starts_with('#') {
            return LineKind::Comment;
        }
        let starts_record = match self {
            Boundary::SentinelKey(key) => s.split(',').next().map(str::trim) == Some(key.as_str()),
            Boundary::Separator(_) => false,
        };
        match split_data_line(s) {
            Some((key, value)) => LineKind::Data { key, value, starts_record },
            // A sentinel line with an empty value still ends the previous record.
            None if starts_record => LineKind::Separator,
            None => LineKind::Ignored,
        }
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::SentinelKey(DEFAULT_SENTINEL.to_string())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Comment,
    Separator,
    Data { key: &'a str, value: &'a str, starts_record: bool },
    Ignored,
}

#[inline]
fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

/// `key, unit?, value, rest...`: at least four comma fields, key first, value third.
fn split_data_line(s: &str) -> Option<(&str, &str)> {
    let mut it = s.splitn(4, ',');
    let key = it.next()?.trim();
    it.next()?;
    let value = it.next()?.trim();
    it.next()?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Accumulator threaded through the line fold.
#[derive(Debug, Default)]
struct ParseState {
    records: Vec<Record>,
    current: Record,
}

impl ParseState {
    fn close_record(mut self) -> Self {
        if !self.current.is_empty() {
            debug!("record #{} closed with {} fields", self.records.len() + 1, self.current.len());
            self.records.push(std::mem::take(&mut self.current));
        }
        self
    }

    fn step(self, boundary: &Boundary, line: &str) -> Self {
        match boundary.classify(line) {
            LineKind::Separator => self.close_record(),
            LineKind::Data { key, value, starts_record } => {
                let mut next = if starts_record { self.close_record() } else { self };
                trace!("field {:?} = {:?}", key, value);
                next.current.insert(key, value);
                next
            }
            kind => {
                trace!("skipped {:?} line", kind);
                self
            }
        }
    }

    fn finish(self) -> Vec<Record> {
        self.close_record().records
    }
}

/// Group lines into records. Empty input yields no records.
pub fn parse_lines<'a, I>(lines: I, boundary: &Boundary) -> Vec<Record>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .fold(ParseState::default(), |state, line| state.step(boundary, line))
        .finish()
}

pub fn parse_text(text: &str, boundary: &Boundary) -> Vec<Record> {
    let records = parse_lines(text.lines(), boundary);
    if records.is_empty() && !text.trim().is_empty() {
        warn!("parser produced 0 records; check the boundary mode or enable --log trace");
    }
    records
}

/// Reads the whole source into memory before parsing.
pub fn parse_reader<R: BufRead>(mut reader: R, boundary: &Boundary) -> Result<Vec<Record>, AppError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(parse_text(&text, boundary))
}

pub fn parse_file(path: &Path, boundary: &Boundary) -> Result<Vec<Record>, AppError> {
    let f = File::open(path).map_err(|e| AppError::IO(format!("open {}: {}", path.display(), e)))?;
    parse_reader(BufReader::new(f), boundary)
}
