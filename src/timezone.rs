//! Helpers for resolving the configured timezone and for reading the local
//! calendar date out of recorded date strings.
//!
//! Dates are recorded as ISO-like strings, usually a bare `YYYY-MM-DD` or a
//! local timestamp without a timezone offset. A bare date must be read as a
//! plain calendar date, never as UTC midnight, otherwise every user east of
//! UTC sees their transactions shifted a day. The app never writes
//! `Z`-terminated strings itself, but reads them correctly if supplied by
//! converting to the configured local offset.

use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use time_tz::{Offset, TimeZone};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const DAY_MONTH_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]");

/// Look up the current UTC offset for a canonical timezone name such as
/// `Pacific/Auckland`.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's calendar date in the timezone described by `local_offset`.
pub fn local_today(local_offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset).date()
}

/// Read the local calendar date encoded in `text`.
///
/// Accepts, in order of precedence:
/// - an offset or `Z`-terminated RFC 3339 timestamp, converted to
///   `local_offset` before taking the date,
/// - a bare `YYYY-MM-DD` date, taken as-is,
/// - a longer local timestamp without offset (`YYYY-MM-DDTHH:MM:SS` or with a
///   space separator), whose leading date is taken as-is.
///
/// # Errors
/// Returns an [Error::InvalidDateFormat] if `text` matches none of the above.
pub fn parse_local_date(text: &str, local_offset: UtcOffset) -> Result<Date, Error> {
    let text = text.trim();

    // Only timestamps that carry an offset may shift the calendar day.
    if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(instant.to_offset(local_offset).date());
    }

    if let Ok(date) = Date::parse(text, DATE_FORMAT) {
        return Ok(date);
    }

    // A local timestamp without offset: the leading ten characters hold the
    // calendar date, already in local time.
    if text.len() > 10
        && text.is_char_boundary(10)
        && let Ok(date) = Date::parse(&text[..10], DATE_FORMAT)
    {
        return Ok(date);
    }

    Err(Error::InvalidDateFormat(
        "expected an ISO-like date or timestamp".to_owned(),
        text.to_owned(),
    ))
}

/// Format a date as the `day/month` label used for per-day chart buckets,
/// e.g. `10/01` for January 10th.
pub fn format_day_month(date: Date) -> String {
    date.format(DAY_MONTH_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod timezone_tests {
    use time::{UtcOffset, macros::date};

    use super::{format_day_month, get_local_offset, parse_local_date};

    fn offset_hours(hours: i8) -> UtcOffset {
        UtcOffset::from_hms(hours, 0, 0).unwrap()
    }

    #[test]
    fn bare_date_is_never_shifted_by_the_local_offset() {
        for hours in [-11, 0, 13] {
            let date = parse_local_date("2026-02-15", offset_hours(hours)).unwrap();
            assert_eq!(date, date!(2026 - 02 - 15), "offset {hours:+}h shifted a bare date");
        }
    }

    #[test]
    fn local_timestamp_takes_its_leading_date() {
        let date = parse_local_date("2026-02-15T23:30:00", offset_hours(13)).unwrap();
        assert_eq!(date, date!(2026 - 02 - 15));

        let date = parse_local_date("2026-02-15 08:00:00", offset_hours(-11)).unwrap();
        assert_eq!(date, date!(2026 - 02 - 15));
    }

    #[test]
    fn utc_timestamp_is_converted_to_the_local_offset() {
        // 23:00 UTC on the 10th is already the 11th in UTC+13.
        let date = parse_local_date("2026-01-10T23:00:00Z", offset_hours(13)).unwrap();
        assert_eq!(date, date!(2026 - 01 - 11));

        let date = parse_local_date("2026-01-10T23:00:00Z", UtcOffset::UTC).unwrap();
        assert_eq!(date, date!(2026 - 01 - 10));
    }

    #[test]
    fn offset_timestamp_is_converted_to_the_local_offset() {
        // 01:00 +02:00 on the 10th is 23:00 UTC on the 9th.
        let date = parse_local_date("2026-01-10T01:00:00+02:00", UtcOffset::UTC).unwrap();
        assert_eq!(date, date!(2026 - 01 - 09));
    }

    #[test]
    fn unrecognized_text_is_an_error() {
        assert!(parse_local_date("not-a-date", UtcOffset::UTC).is_err());
        assert!(parse_local_date("", UtcOffset::UTC).is_err());
    }

    #[test]
    fn day_month_labels_are_zero_padded() {
        assert_eq!(format_day_month(date!(2026 - 01 - 10)), "10/01");
        assert_eq!(format_day_month(date!(2026 - 11 - 03)), "03/11");
    }

    #[test]
    fn known_canonical_timezones_resolve() {
        assert!(get_local_offset("Etc/UTC").is_some());
        assert!(get_local_offset("Pacific/Auckland").is_some());
        assert!(get_local_offset("Not/AZone").is_none());
    }
}
