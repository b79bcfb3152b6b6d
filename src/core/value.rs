//! The typed value union for iCalendar properties (RFC 5545 §3.3).

use std::fmt;

use super::{DateTime, Duration, Period, Recur, Time, UtcOffset};

/// GEO value: latitude/longitude in degrees (RFC 5545 §3.8.1.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl fmt::Display for Geo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.latitude, self.longitude)
    }
}

/// REQUEST-STATUS value (RFC 5545 §3.8.8.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStatus {
    /// Hierarchical status code, e.g. "2.0".
    pub code: String,
    /// Human-readable status description.
    pub description: String,
    /// Optional exception data related to the status.
    pub exception_data: Option<String>,
}

/// Value types (RFC 5545 §3.3).
///
/// One variant per RFC value type, plus list variants for properties
/// whose single value is a comma-separated sequence (RDATE, EXDATE,
/// FREEBUSY, CATEGORIES). The raw string is preserved separately on the
/// property for round-trip fidelity.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// BINARY value, decoded from base64.
    Binary(Vec<u8>),
    /// BOOLEAN value.
    Boolean(bool),
    /// CAL-ADDRESS value (typically a mailto: URI).
    CalAddress(String),
    /// DATE or DATE-TIME value (`has_time` distinguishes them).
    DateTime(DateTime),
    /// Comma-separated DATE/DATE-TIME list (RDATE, EXDATE).
    DateTimeList(Vec<DateTime>),
    /// DURATION value.
    Duration(Duration),
    /// FLOAT value.
    Float(f64),
    /// GEO latitude/longitude pair.
    Geo(Geo),
    /// INTEGER value.
    Integer(i32),
    /// PERIOD value.
    Period(Period),
    /// Comma-separated PERIOD list (FREEBUSY, RDATE;VALUE=PERIOD).
    PeriodList(Vec<Period>),
    /// RECUR value (recurrence rule).
    Recur(Box<Recur>),
    /// REQUEST-STATUS value.
    RequestStatus(RequestStatus),
    /// TEXT value (unescaped).
    Text(String),
    /// Comma-separated TEXT list (CATEGORIES, RESOURCES).
    TextList(Vec<String>),
    /// TIME value.
    Time(Time),
    /// URI value.
    Uri(String),
    /// UTC-OFFSET value.
    UtcOffset(UtcOffset),
    /// Unknown or unparsed value, preserved verbatim.
    Unknown(String),
}

impl Value {
    /// Returns this value as text, if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is an integer value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns this value as a date-time, if it is one.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the date-times carried by this value: one for a scalar,
    /// all of them for a list, the starts for period lists.
    #[must_use]
    pub fn datetimes(&self) -> Vec<&DateTime> {
        match self {
            Self::DateTime(dt) => vec![dt],
            Self::DateTimeList(list) => list.iter().collect(),
            Self::Period(p) => vec![p.start()],
            Self::PeriodList(list) => list.iter().map(Period::start).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns this value as a duration, if it is a duration value.
    #[must_use]
    pub fn as_duration(&self) -> Option<&Duration> {
        match self {
            Self::Duration(d) => Some(d),
            _ => None,
        }
    }

    /// Returns this value as a boolean, if it is a boolean value.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns this value as a recurrence rule, if it is one.
    #[must_use]
    pub fn as_recur(&self) -> Option<&Recur> {
        match self {
            Self::Recur(r) => Some(r),
            _ => None,
        }
    }

    /// Returns this value as a UTC offset, if it is one.
    #[must_use]
    pub fn as_utc_offset(&self) -> Option<UtcOffset> {
        match self {
            Self::UtcOffset(o) => Some(*o),
            _ => None,
        }
    }

    /// Returns whether this is an unknown/unparsed value.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}
