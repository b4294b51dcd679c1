use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::gateway::store::{StoreError, StoreErrorKind, StoreResult};

/// Parse a strict 24-hour `HH:MM` string.
pub fn parse_hh_mm(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hours = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
    let minutes = u32::from(bytes[3] - b'0') * 10 + u32::from(bytes[4] - b'0');
    if hours > 23 || minutes > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Parse a strict `YYYY-MM-DD` calendar date: unsigned four-digit year,
/// two-digit month and day.
pub fn parse_ymd(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = [0, 1, 2, 3, 5, 6, 8, 9];
    if !digits.iter().all(|&i| bytes[i].is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Set hours and minutes on the date's calendar fields in `tz` and return
/// the absolute instant. Seconds and sub-seconds are zero.
pub fn combine_date_time<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: &str,
) -> StoreResult<DateTime<Utc>> {
    let time = parse_hh_mm(time).ok_or_else(|| {
        StoreError::new(
            StoreErrorKind::InvalidInput,
            format!("Invalid time of day '{}'", time),
        )
    })?;
    let local = date.and_time(time);

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(StoreError::new(
            StoreErrorKind::InvalidInput,
            format!("{} does not exist in the local time zone", local),
        )),
    }
}

/// `2024-05-01T12:30:00.000Z`
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
