//! iCalendar DATE, DATE-TIME, TIME and UTC-OFFSET value types
//! (RFC 5545 §3.3.4, §3.3.5, §3.3.12, §3.3.14).

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// UTC offset representation (e.g., +0530, -0800).
///
/// Stored as total seconds from UTC. Valid range is roughly ±14 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    /// Total seconds from UTC (positive = east, negative = west).
    seconds: i32,
}

impl UtcOffset {
    /// UTC offset (zero).
    pub const UTC: Self = Self { seconds: 0 };

    /// Creates a UTC offset from total seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    /// Creates a UTC offset from signed hours, minutes and seconds.
    #[must_use]
    pub const fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self {
            seconds: hours * 3600 + minutes * 60 + seconds,
        }
    }

    /// Returns the offset as total seconds from UTC.
    #[must_use]
    pub const fn as_seconds(self) -> i32 {
        self.seconds
    }

    /// Returns the offset as a chrono duration.
    #[must_use]
    pub fn as_chrono(self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.seconds))
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds >= 0 { '+' } else { '-' };
        let total = self.seconds.abs();
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        if seconds == 0 {
            write!(f, "{sign}{hours:02}{minutes:02}")
        } else {
            write!(f, "{sign}{hours:02}{minutes:02}{seconds:02}")
        }
    }
}

/// TIME value (RFC 5545 §3.3.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-60, allowing for leap seconds).
    pub second: u8,
    /// Whether this time carries the 'Z' UTC designator.
    pub is_utc: bool,
}

impl Time {
    /// Creates a new time value.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8, is_utc: bool) -> Self {
        Self {
            hour,
            minute,
            second,
            is_utc,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.is_utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// The zone a DATE-TIME is anchored to.
///
/// iCalendar DATE-TIME values come in three mutually exclusive forms
/// (RFC 5545 §3.3.5): floating, UTC, or local time with a TZID reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneRef {
    /// Floating time: the same wall-clock reading in any zone.
    Floating,
    /// UTC time, written with a trailing 'Z'.
    Utc,
    /// Local time qualified by a TZID parameter.
    Zoned {
        /// The timezone identifier, resolved against the calendar's
        /// VTIMEZONE set.
        tzid: String,
    },
}

/// DATE or DATE-TIME value (RFC 5545 §3.3.4, §3.3.5).
///
/// A date-only value is represented with `has_time == false`; its time
/// fields are zero and its zone is floating. Equality is structural —
/// comparing two values as instants requires zone data and goes through
/// [`crate::expand::TzRegistry::instant`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    /// Year (e.g., 1997).
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
    /// Hour (0-23). Zero for date-only values.
    pub hour: u8,
    /// Minute (0-59). Zero for date-only values.
    pub minute: u8,
    /// Second (0-60). Zero for date-only values.
    pub second: u8,
    /// Whether this value carries a time component.
    pub has_time: bool,
    /// The zone this value is anchored to.
    pub zone: ZoneRef,
}

impl DateTime {
    /// Creates a date-only value (midnight, floating).
    #[must_use]
    pub const fn date(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            has_time: false,
            zone: ZoneRef::Floating,
        }
    }

    /// Creates a floating DATE-TIME.
    #[must_use]
    pub const fn floating(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            has_time: true,
            zone: ZoneRef::Floating,
        }
    }

    /// Creates a UTC DATE-TIME.
    #[must_use]
    pub const fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            has_time: true,
            zone: ZoneRef::Utc,
        }
    }

    /// Creates a zoned DATE-TIME.
    #[must_use]
    pub fn zoned(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        tzid: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            has_time: true,
            zone: ZoneRef::Zoned { tzid: tzid.into() },
        }
    }

    /// Returns whether this is a UTC time.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.zone == ZoneRef::Utc
    }

    /// Returns whether this is a floating time.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.zone == ZoneRef::Floating
    }

    /// Returns the timezone identifier if this is a zoned time.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.zone {
            ZoneRef::Zoned { tzid } => Some(tzid),
            _ => None,
        }
    }

    /// Returns the wall-clock reading as a chrono [`NaiveDateTime`].
    ///
    /// Returns `None` for impossible calendar dates (e.g. February 30)
    /// and for leap-second readings chrono cannot represent.
    #[must_use]
    pub fn naive(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second.min(59)),
        )?;
        Some(NaiveDateTime::new(date, time))
    }

    /// Rebuilds a value from a wall-clock reading, keeping `has_time`
    /// and the zone of `template`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "chrono date components are within u16/u8 range for Gregorian years"
    )]
    pub fn from_naive(naive: NaiveDateTime, template: &Self) -> Self {
        Self {
            year: naive.year() as u16,
            month: naive.month() as u8,
            day: naive.day() as u8,
            hour: naive.hour() as u8,
            minute: naive.minute() as u8,
            second: naive.second() as u8,
            has_time: template.has_time,
            zone: template.zone.clone(),
        }
    }

    /// Adds whole days, preserving `has_time` and zone.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        match self.naive() {
            Some(naive) => Self::from_naive(naive + chrono::Duration::days(days), self),
            None => self.clone(),
        }
    }

    /// Adds whole months, clamping to the last day of the resulting month
    /// (Jan 31 + 1 month = Feb 28/29). Preserves `has_time` and zone.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        reason = "month arithmetic stays within u16/u8 component ranges"
    )]
    pub fn add_months(&self, months: i32) -> Self {
        let zero_based = i32::from(self.year) * 12 + i32::from(self.month) - 1 + months;
        let year = zero_based.div_euclid(12);
        let month = (zero_based.rem_euclid(12) + 1) as u32;
        let day = u32::from(self.day).min(days_in_month(year, month));
        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            ..self.clone()
        }
    }

    /// Adds a signed number of seconds, preserving `has_time` and zone.
    #[must_use]
    pub fn add_seconds(&self, seconds: i64) -> Self {
        match self.naive() {
            Some(naive) => Self::from_naive(naive + chrono::Duration::seconds(seconds), self),
            None => self.clone(),
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)?;
        if self.has_time {
            write!(f, "T{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
            if self.is_utc() {
                write!(f, "Z")?;
            }
        }
        Ok(())
    }
}

/// Returns the number of days in a month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map_or(31, |d| d.day())
}
