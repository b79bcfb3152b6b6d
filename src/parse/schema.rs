//! Value-type registry: maps (property name, VALUE parameter) to the
//! typed variant a property value parses into.
//!
//! The property-name default is consulted first; an explicit VALUE
//! parameter then overrides it. Neither lookup alone is sufficient:
//! most properties never carry VALUE, and VALUE=DATE must still reach
//! the date-time parser with the time component switched off.

use crate::core::{ContentLine, parameter_names as names};

/// The schema slot a property value is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// BINARY (base64).
    Binary,
    /// BOOLEAN.
    Boolean,
    /// CAL-ADDRESS.
    CalAddress,
    /// DATE: the DATE-TIME variant with `has_time == false`.
    Date,
    /// DATE-TIME.
    DateTime,
    /// DURATION.
    Duration,
    /// FLOAT.
    Float,
    /// GEO latitude/longitude pair.
    Geo,
    /// INTEGER.
    Integer,
    /// PERIOD.
    Period,
    /// RECUR.
    Recur,
    /// REQUEST-STATUS.
    RequestStatus,
    /// TEXT.
    Text,
    /// Comma-separated TEXT list.
    TextList,
    /// TIME.
    Time,
    /// URI.
    Uri,
    /// UTC-OFFSET.
    UtcOffset,
    /// No schema entry; the raw value is preserved.
    Unknown,
}

impl ValueType {
    /// Maps a VALUE parameter name to a type (RFC 5545 §3.2.20).
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "BINARY" => Self::Binary,
            "BOOLEAN" => Self::Boolean,
            "CAL-ADDRESS" => Self::CalAddress,
            "DATE" => Self::Date,
            "DATE-TIME" => Self::DateTime,
            "DURATION" => Self::Duration,
            "FLOAT" => Self::Float,
            "INTEGER" => Self::Integer,
            "PERIOD" => Self::Period,
            "RECUR" => Self::Recur,
            "TEXT" => Self::Text,
            "TIME" => Self::Time,
            "URI" => Self::Uri,
            "UTC-OFFSET" => Self::UtcOffset,
            _ => Self::Unknown,
        }
    }

    /// Returns the default type implied by a property name
    /// (RFC 5545 §3.7, §3.8).
    #[must_use]
    pub fn default_for(property: &str) -> Self {
        match property.to_ascii_uppercase().as_str() {
            "DTSTART" | "DTEND" | "DTSTAMP" | "DUE" | "COMPLETED" | "CREATED" | "LAST-MODIFIED"
            | "RECURRENCE-ID" | "EXDATE" | "RDATE" => Self::DateTime,

            "DURATION" | "TRIGGER" => Self::Duration,

            "RRULE" | "EXRULE" => Self::Recur,

            "FREEBUSY" => Self::Period,

            "TZOFFSETFROM" | "TZOFFSETTO" => Self::UtcOffset,

            "ATTENDEE" | "ORGANIZER" => Self::CalAddress,

            "URL" | "TZURL" | "SOURCE" | "ATTACH" | "CONFERENCE" | "IMAGE" => Self::Uri,

            "PERCENT-COMPLETE" | "PRIORITY" | "REPEAT" | "SEQUENCE" => Self::Integer,

            "GEO" => Self::Geo,

            "REQUEST-STATUS" => Self::RequestStatus,

            "CATEGORIES" | "RESOURCES" => Self::TextList,

            "CALSCALE" | "METHOD" | "PRODID" | "VERSION" | "CLASS" | "COMMENT" | "DESCRIPTION"
            | "LOCATION" | "STATUS" | "SUMMARY" | "TRANSP" | "TZID" | "TZNAME" | "CONTACT"
            | "RELATED-TO" | "UID" | "ACTION" | "COLOR" | "NAME" => Self::Text,

            _ => Self::Unknown,
        }
    }

    /// Resolves the type for a content line: property-name default,
    /// VALUE parameter override, then shape-based disambiguation for the
    /// properties whose default admits several forms (a TRIGGER may be an
    /// absolute date-time, an RDATE a period or date list).
    #[must_use]
    pub fn resolve(cl: &ContentLine) -> Self {
        let mut ty = Self::default_for(&cl.name);

        if let Some(param) = cl.value_type() {
            ty = Self::from_param(param);
        } else {
            match ty {
                Self::DateTime if !cl.raw_value.contains('T') && cl.raw_value.len() == 8 => {
                    ty = Self::Date;
                }
                Self::DateTime if cl.raw_value.contains('/') => {
                    ty = Self::Period;
                }
                Self::Duration
                    if !cl.raw_value.starts_with('P')
                        && !cl.raw_value.starts_with('-')
                        && !cl.raw_value.starts_with('+') =>
                {
                    // TRIGGER;VALUE omitted but the value is absolute.
                    ty = Self::DateTime;
                }
                _ => {}
            }
        }

        // ENCODING=BASE64 forces binary regardless of the default.
        if cl
            .param(names::ENCODING)
            .is_some_and(|p| p.has_value("BASE64"))
        {
            ty = Self::Binary;
        }

        ty
    }
}
