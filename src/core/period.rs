//! iCalendar PERIOD value type (RFC 5545 §3.3.9).

use std::fmt;

use super::{DateTime, Duration};

/// PERIOD value (RFC 5545 §3.3.9).
///
/// A precise interval, defined by either an explicit start and end or a
/// start plus a duration. Both forms require DATE-TIME starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// Explicit start and end instants.
    Explicit {
        /// Start of the period.
        start: DateTime,
        /// End of the period (non-inclusive).
        end: DateTime,
    },
    /// Start instant plus a positive duration.
    Duration {
        /// Start of the period.
        start: DateTime,
        /// Length of the period.
        duration: Duration,
    },
}

impl Period {
    /// Creates an explicit period from start to end.
    #[must_use]
    pub fn explicit(start: DateTime, end: DateTime) -> Self {
        Self::Explicit { start, end }
    }

    /// Creates a period from a start and a duration.
    #[must_use]
    pub fn from_duration(start: DateTime, duration: Duration) -> Self {
        Self::Duration { start, duration }
    }

    /// Returns the start of the period.
    #[must_use]
    pub fn start(&self) -> &DateTime {
        match self {
            Self::Explicit { start, .. } | Self::Duration { start, .. } => start,
        }
    }

    /// Returns the end of the period, deriving it from the duration when
    /// the period was given in start+duration form.
    #[must_use]
    pub fn end(&self) -> DateTime {
        match self {
            Self::Explicit { end, .. } => end.clone(),
            Self::Duration { start, duration } => start.add_seconds(duration.as_seconds()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit { start, end } => write!(f, "{start}/{end}"),
            Self::Duration { start, duration } => write!(f, "{start}/{duration}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_display() {
        let period = Period::explicit(
            DateTime::utc(1997, 1, 1, 18, 0, 0),
            DateTime::utc(1997, 1, 2, 7, 0, 0),
        );
        assert_eq!(period.to_string(), "19970101T180000Z/19970102T070000Z");
    }

    #[test]
    fn duration_display() {
        let period = Period::from_duration(DateTime::utc(1997, 1, 1, 18, 0, 0), Duration::hours(5));
        assert_eq!(period.to_string(), "19970101T180000Z/PT5H");
    }

    #[test]
    fn end_derived_from_duration() {
        let period = Period::from_duration(DateTime::utc(1997, 1, 1, 18, 0, 0), Duration::hours(5));
        assert_eq!(period.end(), DateTime::utc(1997, 1, 1, 23, 0, 0));
    }
}
