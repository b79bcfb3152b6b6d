//! iCalendar DURATION value type (RFC 5545 §3.3.6).

use std::fmt;

/// Duration value (RFC 5545 §3.3.6).
///
/// A signed span of time. The grammar allows either a week count or a
/// day/time combination, never both; [`Duration::new`] enforces that.
/// iCalendar has no year/month designators because months vary in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    /// Whether this duration is negative.
    pub negative: bool,
    /// Number of weeks (exclusive with the day/time fields).
    pub weeks: u32,
    /// Number of days.
    pub days: u32,
    /// Number of hours.
    pub hours: u32,
    /// Number of minutes.
    pub minutes: u32,
    /// Number of seconds.
    pub seconds: u32,
}

impl Duration {
    /// Creates a zero duration.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Creates a normalized duration.
    ///
    /// A non-zero week count wins over the day/time fields, matching the
    /// RFC grammar where the two forms are alternatives.
    #[must_use]
    pub const fn new(
        negative: bool,
        weeks: u32,
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        if weeks > 0 {
            Self {
                negative,
                weeks,
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
            }
        } else {
            Self {
                negative,
                weeks: 0,
                days,
                hours,
                minutes,
                seconds,
            }
        }
    }

    /// Creates a duration of whole weeks.
    #[must_use]
    pub const fn weeks(weeks: u32) -> Self {
        Self::new(false, weeks, 0, 0, 0, 0)
    }

    /// Creates a duration of whole days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self::new(false, 0, days, 0, 0, 0)
    }

    /// Creates a duration of whole hours.
    #[must_use]
    pub const fn hours(hours: u32) -> Self {
        Self::new(false, 0, 0, hours, 0, 0)
    }

    /// Creates a duration of whole minutes.
    #[must_use]
    pub const fn minutes(minutes: u32) -> Self {
        Self::new(false, 0, 0, 0, minutes, 0)
    }

    /// Flips the sign.
    #[must_use]
    pub const fn negate(mut self) -> Self {
        self.negative = !self.negative;
        self
    }

    /// Returns the total span in seconds.
    #[must_use]
    pub const fn as_seconds(&self) -> i64 {
        let total = (self.weeks as i64 * 7 * 24 * 3600)
            + (self.days as i64 * 24 * 3600)
            + (self.hours as i64 * 3600)
            + (self.minutes as i64 * 60)
            + (self.seconds as i64);
        if self.negative { -total } else { total }
    }

    /// Returns the span as a chrono duration.
    #[must_use]
    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.as_seconds())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;

        if self.weeks > 0 {
            return write!(f, "{}W", self.weeks);
        }

        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        } else if self.days == 0 {
            write!(f, "0D")?;
        }
        Ok(())
    }
}
