use crate::errors::AppError;
use chrono::{SecondsFormat, TimeZone, Utc};
use std::str::FromStr;

fn parse_component<T: FromStr>(what: &str, s: &str) -> Result<T, AppError> {
    s.trim()
        .parse::<T>()
        .map_err(|_| AppError::InvalidDate(format!("{} {:?} is not a number", what, s)))
}

/// Split decimal hours into whole hours, minutes and seconds.
/// Every stage truncates, so rounding error only ever pulls the result earlier.
pub fn split_decimal_hours(decimal_hours: f64) -> (u32, u32, u32) {
    let hours = decimal_hours.trunc();
    let minutes_f = (decimal_hours - hours) * 60.0;
    let minutes = minutes_f.trunc();
    let seconds = ((minutes_f - minutes) * 60.0).trunc();
    (hours as u32, minutes as u32, seconds as u32)
}

/// Build an ISO-8601 UTC timestamp such as `1970-03-19T17:18:00+00:00` from the
/// WOD `Year`, `Month`, `Day` and decimal-hour `Time` values.
pub fn convert_to_iso(year: &str, month: &str, day: &str, decimal_hours: &str) -> Result<String, AppError> {
    let y: i32 = parse_component("year", year)?;
    let m: u32 = parse_component("month", month)?;
    let d: u32 = parse_component("day", day)?;
    let t: f64 = parse_component("time", decimal_hours)?;

    if !(1..=9999).contains(&y) {
        return Err(AppError::InvalidDate(format!("year {} out of range", y)));
    }
    if !t.is_finite() || t < 0.0 {
        return Err(AppError::InvalidDate(format!("time {:?} is not a time of day", decimal_hours)));
    }

    let (hh, mm, ss) = split_decimal_hours(t);
    Utc.with_ymd_and_hms(y, m, d, hh, mm, ss)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
        .ok_or_else(|| {
            AppError::InvalidDate(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} is not a calendar time",
                y, m, d, hh, mm, ss
            ))
        })
}
