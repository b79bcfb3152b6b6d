//! Value parsers for the schema types (RFC 5545 §3.3).
//!
//! Each parser is deterministic and total on its input domain: a given
//! string either produces a value or a [`ValueError`] naming the
//! property and source line.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::error::{ValueError, ValueErrorKind};
use crate::core::{
    DateTime, Duration, Frequency, Geo, Period, Recur, RequestStatus, Time, UtcOffset, Weekday,
    WeekdayNum, days_in_month,
};

type ValueResult<T> = Result<T, ValueError>;

fn err(kind: ValueErrorKind, prop: &str, line: usize) -> ValueError {
    ValueError::new(kind, prop, line)
}

/// Parses a DATE value: `YYYYMMDD` (RFC 5545 §3.3.4).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidDate`] for anything that is not an
/// eight-digit calendar date.
pub fn parse_date(s: &str, prop: &str, line: usize) -> ValueResult<DateTime> {
    let fail = || err(ValueErrorKind::InvalidDate, prop, line);

    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail());
    }
    let year: u16 = s[0..4].parse().map_err(|_| fail())?;
    let month: u8 = s[4..6].parse().map_err(|_| fail())?;
    let day: u8 = s[6..8].parse().map_err(|_| fail())?;

    if !(1..=12).contains(&month)
        || day == 0
        || u32::from(day) > days_in_month(i32::from(year), u32::from(month))
    {
        return Err(fail());
    }

    Ok(DateTime::date(year, month, day))
}

/// Parses a TIME value: `HHMMSS[Z]` (RFC 5545 §3.3.12).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidTime`] for malformed input.
pub fn parse_time(s: &str, prop: &str, line: usize) -> ValueResult<Time> {
    let fail = || err(ValueErrorKind::InvalidTime, prop, line);

    let (digits, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail());
    }
    let hour: u8 = digits[0..2].parse().map_err(|_| fail())?;
    let minute: u8 = digits[2..4].parse().map_err(|_| fail())?;
    let second: u8 = digits[4..6].parse().map_err(|_| fail())?;

    // Second 60 admitted for leap seconds.
    if hour > 23 || minute > 59 || second > 60 {
        return Err(fail());
    }

    Ok(Time::new(hour, minute, second, is_utc))
}

/// Parses a DATE-TIME value: `YYYYMMDD"T"HHMMSS[Z]` (RFC 5545 §3.3.5).
///
/// The zone comes from the trailing `Z` or the property's TZID
/// parameter; both together are contradictory.
///
/// ## Errors
/// [`ValueErrorKind::InvalidDateTime`] for malformed input,
/// [`ValueErrorKind::ConflictingZone`] for `Z` plus TZID.
pub fn parse_datetime(
    s: &str,
    tzid: Option<&str>,
    prop: &str,
    line: usize,
) -> ValueResult<DateTime> {
    let Some(t_pos) = s.find('T') else {
        return Err(err(ValueErrorKind::InvalidDateTime, prop, line));
    };

    let date = parse_date(&s[..t_pos], prop, line)
        .map_err(|_| err(ValueErrorKind::InvalidDateTime, prop, line))?;
    let time = parse_time(&s[t_pos + 1..], prop, line)
        .map_err(|_| err(ValueErrorKind::InvalidDateTime, prop, line))?;

    if time.is_utc && tzid.is_some() {
        return Err(err(ValueErrorKind::ConflictingZone, prop, line));
    }

    Ok(match (time.is_utc, tzid) {
        (true, _) => DateTime::utc(date.year, date.month, date.day, time.hour, time.minute, time.second),
        (false, Some(tz)) => DateTime::zoned(
            date.year, date.month, date.day, time.hour, time.minute, time.second, tz,
        ),
        (false, None) => DateTime::floating(
            date.year, date.month, date.day, time.hour, time.minute, time.second,
        ),
    })
}

/// Parses a comma-separated DATE/DATE-TIME list (RDATE, EXDATE).
///
/// Each element's shape picks its form, so a date list and a date-time
/// list both work without a VALUE parameter.
///
/// ## Errors
/// Fails on the first malformed element.
pub fn parse_datetime_list(
    s: &str,
    tzid: Option<&str>,
    prop: &str,
    line: usize,
) -> ValueResult<Vec<DateTime>> {
    s.split(',')
        .map(str::trim)
        .map(|part| {
            if part.contains('T') {
                parse_datetime(part, tzid, prop, line)
            } else {
                parse_date(part, prop, line)
            }
        })
        .collect()
}

/// Parses a UTC-OFFSET value: `(+|-)HHMM[SS]` (RFC 5545 §3.3.14).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidUtcOffset`] for malformed input.
pub fn parse_utc_offset(s: &str, prop: &str, line: usize) -> ValueResult<UtcOffset> {
    let fail = || err(ValueErrorKind::InvalidUtcOffset, prop, line);

    let (sign, digits) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(fail()),
    };
    if (digits.len() != 4 && digits.len() != 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail());
    }

    let hours: i32 = digits[0..2].parse().map_err(|_| fail())?;
    let minutes: i32 = digits[2..4].parse().map_err(|_| fail())?;
    let seconds: i32 = if digits.len() == 6 {
        digits[4..6].parse().map_err(|_| fail())?
    } else {
        0
    };
    if minutes > 59 || seconds > 59 {
        return Err(fail());
    }

    Ok(UtcOffset::from_seconds(
        sign * (hours * 3600 + minutes * 60 + seconds),
    ))
}

/// Parses a DURATION value: `[+|-]P(nW | [nD][T[nH][nM][nS]])`
/// (RFC 5545 §3.3.6).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidDuration`] for malformed input or a
/// week count mixed with day/time parts.
pub fn parse_duration(s: &str, prop: &str, line: usize) -> ValueResult<Duration> {
    let fail = || err(ValueErrorKind::InvalidDuration, prop, line);

    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let rest = rest.strip_prefix('P').ok_or_else(fail)?;

    let mut weeks = 0u32;
    let mut days = 0u32;
    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut seconds = 0u32;
    let mut in_time = false;
    let mut saw_component = false;
    let mut digits = String::new();

    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if c == 'T' {
            if !digits.is_empty() || in_time {
                return Err(fail());
            }
            in_time = true;
            continue;
        }
        let value: u32 = digits.parse().map_err(|_| fail())?;
        digits.clear();
        saw_component = true;
        match (c, in_time) {
            ('W', false) => weeks = value,
            ('D', false) => days = value,
            ('H', true) => hours = value,
            ('M', true) => minutes = value,
            ('S', true) => seconds = value,
            _ => return Err(fail()),
        }
    }
    if !digits.is_empty() || !saw_component {
        return Err(fail());
    }
    if weeks > 0 && (days > 0 || hours > 0 || minutes > 0 || seconds > 0) {
        return Err(fail());
    }

    Ok(Duration::new(negative, weeks, days, hours, minutes, seconds))
}

/// Parses a PERIOD value: `start "/" (end | duration)` (RFC 5545 §3.3.9).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidPeriod`] when either half fails.
pub fn parse_period(s: &str, tzid: Option<&str>, prop: &str, line: usize) -> ValueResult<Period> {
    let Some((start_str, end_str)) = s.split_once('/') else {
        return Err(err(ValueErrorKind::InvalidPeriod, prop, line));
    };

    let start = parse_datetime(start_str, tzid, prop, line)?;

    if end_str.starts_with('P') || end_str.starts_with('+') || end_str.starts_with('-') {
        let duration = parse_duration(end_str, prop, line)?;
        Ok(Period::from_duration(start, duration))
    } else {
        let end = parse_datetime(end_str, tzid, prop, line)?;
        Ok(Period::explicit(start, end))
    }
}

/// Parses a comma-separated PERIOD list (FREEBUSY).
///
/// ## Errors
/// Fails on the first malformed element.
pub fn parse_period_list(
    s: &str,
    tzid: Option<&str>,
    prop: &str,
    line: usize,
) -> ValueResult<Vec<Period>> {
    s.split(',')
        .map(str::trim)
        .map(|part| parse_period(part, tzid, prop, line))
        .collect()
}

/// Parses a RECUR value (RFC 5545 §3.3.10).
///
/// COUNT and UNTIL are both stored when both appear; their exclusivity
/// is checked at validation time, where the conflict is a semantic error
/// rather than a syntactic one. Unknown rule parts are ignored.
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidRecur`] for malformed parts.
pub fn parse_recur(s: &str, prop: &str, line: usize) -> ValueResult<Recur> {
    let fail = || err(ValueErrorKind::InvalidRecur, prop, line);
    let mut rule = Recur::new();

    for part in s.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            return Err(fail());
        };

        match key.to_ascii_uppercase().as_str() {
            "FREQ" => rule.freq = Some(Frequency::from_name(value).ok_or_else(fail)?),
            "INTERVAL" => rule.interval = Some(value.parse().map_err(|_| fail())?),
            "COUNT" => rule.count = Some(value.parse().map_err(|_| fail())?),
            "UNTIL" => {
                rule.until = Some(if value.contains('T') {
                    parse_datetime(value, None, prop, line)?
                } else {
                    parse_date(value, prop, line)?
                });
            }
            "WKST" => rule.wkst = Some(Weekday::from_name(value).ok_or_else(fail)?),
            "BYSECOND" => rule.by_second = parse_num_list(value).ok_or_else(fail)?,
            "BYMINUTE" => rule.by_minute = parse_num_list(value).ok_or_else(fail)?,
            "BYHOUR" => rule.by_hour = parse_num_list(value).ok_or_else(fail)?,
            "BYDAY" => {
                rule.by_day = value
                    .split(',')
                    .map(|v| parse_weekday_num(v.trim()))
                    .collect::<Option<_>>()
                    .ok_or_else(fail)?;
            }
            "BYMONTHDAY" => rule.by_monthday = parse_num_list(value).ok_or_else(fail)?,
            "BYYEARDAY" => rule.by_yearday = parse_num_list(value).ok_or_else(fail)?,
            "BYWEEKNO" => rule.by_weekno = parse_num_list(value).ok_or_else(fail)?,
            "BYMONTH" => rule.by_month = parse_num_list(value).ok_or_else(fail)?,
            "BYSETPOS" => rule.by_setpos = parse_num_list(value).ok_or_else(fail)?,
            _ => {}
        }
    }

    Ok(rule)
}

fn parse_num_list<T: std::str::FromStr>(s: &str) -> Option<Vec<T>> {
    s.split(',').map(|v| v.trim().parse().ok()).collect()
}

/// Parses a single BYDAY entry: optional signed ordinal plus a
/// two-letter weekday (e.g. `MO`, `1MO`, `-1FR`).
fn parse_weekday_num(s: &str) -> Option<WeekdayNum> {
    if s.len() < 2 {
        return None;
    }
    let split = s.len() - 2;
    let weekday = Weekday::from_name(&s[split..])?;
    let ordinal = if split == 0 {
        None
    } else {
        Some(s[..split].parse().ok()?)
    };
    Some(WeekdayNum { ordinal, weekday })
}

/// Parses a GEO value: `latitude ";" longitude` (RFC 5545 §3.8.1.6).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidGeo`] for malformed input.
pub fn parse_geo(s: &str, prop: &str, line: usize) -> ValueResult<Geo> {
    let fail = || err(ValueErrorKind::InvalidGeo, prop, line);
    let Some((lat, lon)) = s.split_once(';') else {
        return Err(fail());
    };
    let latitude: f64 = lat.trim().parse().map_err(|_| fail())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| fail())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(fail());
    }
    Ok(Geo {
        latitude,
        longitude,
    })
}

/// Parses a REQUEST-STATUS value: `code ";" description [";" data]`
/// (RFC 5545 §3.8.8.3). The parts are TEXT, so escaped semicolons do
/// not split.
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidRequestStatus`] when the code or
/// description is missing.
pub fn parse_request_status(s: &str, prop: &str, line: usize) -> ValueResult<RequestStatus> {
    let parts = split_unescaped(s, ';');
    if parts.len() < 2 || parts[0].is_empty() {
        return Err(err(ValueErrorKind::InvalidRequestStatus, prop, line));
    }
    Ok(RequestStatus {
        code: parts[0].clone(),
        description: unescape_text(&parts[1]),
        exception_data: parts.get(2).map(|p| unescape_text(p)),
    })
}

/// Decodes a BINARY value from base64 (RFC 5545 §3.3.1).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidBinary`] when decoding fails.
pub fn parse_binary(s: &str, prop: &str, line: usize) -> ValueResult<Vec<u8>> {
    BASE64
        .decode(s.trim())
        .map_err(|_| err(ValueErrorKind::InvalidBinary, prop, line))
}

/// Parses a BOOLEAN value (RFC 5545 §3.3.2).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidBoolean`] unless TRUE or FALSE.
pub fn parse_boolean(s: &str, prop: &str, line: usize) -> ValueResult<bool> {
    match s.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(err(ValueErrorKind::InvalidBoolean, prop, line)),
    }
}

/// Parses an INTEGER value (RFC 5545 §3.3.8).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidInteger`] for malformed input.
pub fn parse_integer(s: &str, prop: &str, line: usize) -> ValueResult<i32> {
    s.trim()
        .parse()
        .map_err(|_| err(ValueErrorKind::InvalidInteger, prop, line))
}

/// Parses a FLOAT value (RFC 5545 §3.3.7).
///
/// ## Errors
/// Returns [`ValueErrorKind::InvalidFloat`] for malformed input.
pub fn parse_float(s: &str, prop: &str, line: usize) -> ValueResult<f64> {
    s.trim()
        .parse()
        .map_err(|_| err(ValueErrorKind::InvalidFloat, prop, line))
}

/// Expands TEXT escapes (RFC 5545 §3.3.11): `\\`, `\;`, `\,`, `\n`/`\N`.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(',') => result.push(','),
                Some(';') => result.push(';'),
                Some('\\') | None => result.push('\\'),
                Some(other) => {
                    // Unrecognized escape: preserved verbatim.
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Splits a TEXT list on unescaped commas, unescaping each element.
#[must_use]
pub fn parse_text_list(s: &str) -> Vec<String> {
    split_unescaped(s, ',')
        .iter()
        .map(|part| unescape_text(part))
        .collect()
}

/// Splits on a separator, honoring backslash escapes.
fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            current.push('\\');
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoneRef;

    #[test]
    fn date_basic() {
        let d = parse_date("19970714", "DTSTART", 1).unwrap();
        assert_eq!((d.year, d.month, d.day), (1997, 7, 14));
        assert!(!d.has_time);
    }

    #[test]
    fn date_rejects_bad_input() {
        assert!(parse_date("1997071", "DTSTART", 1).is_err());
        assert!(parse_date("19971301", "DTSTART", 1).is_err());
        assert!(parse_date("19970230", "DTSTART", 1).is_err());
        assert!(parse_date("1997071A", "DTSTART", 1).is_err());
    }

    #[test]
    fn datetime_forms() {
        let utc = parse_datetime("19980119T070000Z", None, "DTSTART", 1).unwrap();
        assert!(utc.is_utc());

        let floating = parse_datetime("19980118T230000", None, "DTSTART", 1).unwrap();
        assert!(floating.is_floating());

        let zoned =
            parse_datetime("19980119T020000", Some("America/New_York"), "DTSTART", 1).unwrap();
        assert_eq!(zoned.tzid(), Some("America/New_York"));
    }

    #[test]
    fn datetime_z_with_tzid_conflicts() {
        let e = parse_datetime("19980119T070000Z", Some("America/New_York"), "DTSTART", 3)
            .unwrap_err();
        assert_eq!(e.kind, ValueErrorKind::ConflictingZone);
        assert_eq!(e.line, 3);
    }

    #[test]
    fn datetime_list_mixed_shapes() {
        let list = parse_datetime_list("19970101,19970120T090000Z", None, "EXDATE", 1).unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list[0].has_time);
        assert!(list[1].is_utc());
    }

    #[test]
    fn utc_offset_forms() {
        assert_eq!(
            parse_utc_offset("+0530", "TZOFFSETTO", 1).unwrap().as_seconds(),
            5 * 3600 + 30 * 60
        );
        assert_eq!(
            parse_utc_offset("-0800", "TZOFFSETTO", 1).unwrap().as_seconds(),
            -8 * 3600
        );
        assert_eq!(
            parse_utc_offset("-043015", "TZOFFSETTO", 1).unwrap().as_seconds(),
            -(4 * 3600 + 30 * 60 + 15)
        );
        assert!(parse_utc_offset("0530", "TZOFFSETTO", 1).is_err());
        assert!(parse_utc_offset("+05301", "TZOFFSETTO", 1).is_err());
    }

    #[test]
    fn duration_forms() {
        let d = parse_duration("P15DT5H0M20S", "DURATION", 1).unwrap();
        assert_eq!((d.days, d.hours, d.minutes, d.seconds), (15, 5, 0, 20));

        let w = parse_duration("P7W", "DURATION", 1).unwrap();
        assert_eq!(w.weeks, 7);

        let neg = parse_duration("-PT15M", "TRIGGER", 1).unwrap();
        assert!(neg.negative);
        assert_eq!(neg.minutes, 15);
    }

    #[test]
    fn duration_rejects_bad_input() {
        assert!(parse_duration("15D", "DURATION", 1).is_err());
        assert!(parse_duration("P", "DURATION", 1).is_err());
        assert!(parse_duration("PT", "DURATION", 1).is_err());
        assert!(parse_duration("P1H", "DURATION", 1).is_err()); // H outside T section
        assert!(parse_duration("P1W2D", "DURATION", 1).is_err());
    }

    #[test]
    fn period_explicit_and_duration() {
        let p = parse_period("19970101T180000Z/19970102T070000Z", None, "FREEBUSY", 1).unwrap();
        assert!(matches!(p, Period::Explicit { .. }));

        let p = parse_period("19970101T180000Z/PT5H30M", None, "FREEBUSY", 1).unwrap();
        assert!(matches!(p, Period::Duration { .. }));

        assert!(parse_period("19970101T180000Z", None, "FREEBUSY", 1).is_err());
    }

    #[test]
    fn recur_basic() {
        let r = parse_recur("FREQ=DAILY;COUNT=10", "RRULE", 1).unwrap();
        assert_eq!(r.freq, Some(Frequency::Daily));
        assert_eq!(r.count, Some(10));
    }

    #[test]
    fn recur_byday_ordinals() {
        let r = parse_recur("FREQ=MONTHLY;BYDAY=-1MO", "RRULE", 1).unwrap();
        assert_eq!(r.by_day, vec![WeekdayNum::nth(-1, Weekday::Monday)]);

        let r = parse_recur("FREQ=WEEKLY;BYDAY=TU,WE,TH", "RRULE", 1).unwrap();
        assert_eq!(r.by_day.len(), 3);
    }

    #[test]
    fn recur_until_forms() {
        let r = parse_recur("FREQ=DAILY;UNTIL=19971224T000000Z", "RRULE", 1).unwrap();
        assert!(r.until.as_ref().unwrap().is_utc());

        let r = parse_recur("FREQ=DAILY;UNTIL=19971224", "RRULE", 1).unwrap();
        assert!(!r.until.as_ref().unwrap().has_time);
    }

    #[test]
    fn recur_stores_count_and_until_for_later_validation() {
        let r = parse_recur("FREQ=DAILY;COUNT=10;UNTIL=19971224", "RRULE", 1).unwrap();
        assert!(r.count.is_some());
        assert!(r.until.is_some());
        assert!(r.validate().is_err());
    }

    #[test]
    fn recur_ignores_unknown_parts() {
        let r = parse_recur("FREQ=DAILY;X-EXTENSION=1", "RRULE", 1).unwrap();
        assert_eq!(r.freq, Some(Frequency::Daily));
    }

    #[test]
    fn geo_pair() {
        let g = parse_geo("37.386013;-122.082932", "GEO", 1).unwrap();
        assert!((g.latitude - 37.386_013).abs() < f64::EPSILON);
        assert!(parse_geo("91.0;0.0", "GEO", 1).is_err());
        assert!(parse_geo("37.0", "GEO", 1).is_err());
    }

    #[test]
    fn request_status_parts() {
        let rs = parse_request_status("2.0;Success", "REQUEST-STATUS", 1).unwrap();
        assert_eq!(rs.code, "2.0");
        assert_eq!(rs.description, "Success");
        assert!(rs.exception_data.is_none());

        let rs = parse_request_status(
            "3.1;Invalid property value;DTSTART:96-Apr-01",
            "REQUEST-STATUS",
            1,
        )
        .unwrap();
        assert_eq!(rs.exception_data.as_deref(), Some("DTSTART:96-Apr-01"));
    }

    #[test]
    fn request_status_escaped_semicolon_stays_in_text() {
        let rs = parse_request_status("2.8;Success\\; repeating event ignored", "REQUEST-STATUS", 1)
            .unwrap();
        assert_eq!(rs.description, "Success; repeating event ignored");
    }

    #[test]
    fn binary_decodes_base64() {
        assert_eq!(parse_binary("aGVsbG8=", "ATTACH", 1).unwrap(), b"hello");
        assert!(parse_binary("!!!", "ATTACH", 1).is_err());
    }

    #[test]
    fn unescape_escapes() {
        assert_eq!(unescape_text("hello\\, world"), "hello, world");
        assert_eq!(unescape_text("a\\nb"), "a\nb");
        assert_eq!(unescape_text("a\\Nb"), "a\nb");
        assert_eq!(unescape_text("back\\\\slash"), "back\\slash");
        assert_eq!(unescape_text("semi\\;colon"), "semi;colon");
    }

    #[test]
    fn text_list_split_honors_escapes() {
        let list = parse_text_list("APPOINTMENT,EDUCATION");
        assert_eq!(list, vec!["APPOINTMENT", "EDUCATION"]);

        let list = parse_text_list("One\\, with comma,Two");
        assert_eq!(list, vec!["One, with comma", "Two"]);
    }

    #[test]
    fn boolean_and_numbers() {
        assert_eq!(parse_boolean("TRUE", "RSVP", 1).unwrap(), true);
        assert_eq!(parse_boolean("false", "RSVP", 1).unwrap(), false);
        assert!(parse_boolean("YES", "RSVP", 1).is_err());
        assert_eq!(parse_integer("42", "PRIORITY", 1).unwrap(), 42);
        assert_eq!(parse_integer("-1", "PRIORITY", 1).unwrap(), -1);
        assert!(parse_float("1000000.0000001", "X", 1).is_ok());
    }

    #[test]
    fn leap_second_reading_is_admitted() {
        let zone = parse_datetime("19970630T235960Z", None, "DTSTART", 1).unwrap();
        assert_eq!(zone.second, 60);
        assert_eq!(zone.zone, ZoneRef::Utc);
    }
}
