//! iCalendar RECUR value type (RFC 5545 §3.3.10, §3.8.5.3).

use std::fmt;

use super::DateTime;

/// Recurrence frequency (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Every frequency, smallest period first.
    pub const ALL: [Self; 7] = [
        Self::Secondly,
        Self::Minutely,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
    ];

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Looks up a frequency by name, case-insensitively. [`Self::as_str`]
    /// is the single source of truth for the spellings.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Every weekday, Sunday first as the RFC lists them.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Looks up a weekday by its abbreviation, case-insensitively.
    /// [`Self::as_str`] is the single source of truth for the spellings.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str().eq_ignore_ascii_case(s))
    }

    /// Converts from a chrono weekday.
    #[must_use]
    pub const fn from_chrono(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }

    /// Days from Monday (0-6), matching chrono's numbering.
    #[must_use]
    pub const fn num_days_from_monday(self) -> u32 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weekday with optional occurrence ordinal, used in BYDAY.
///
/// `MO` matches every Monday, `1MO` the first Monday of the span,
/// `-1FR` the last Friday. An absent ordinal means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayNum {
    /// Optional occurrence number (-53 to 53, never 0).
    pub ordinal: Option<i8>,
    /// The day of the week.
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// Creates a weekday entry without an ordinal.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Creates a weekday entry with an ordinal.
    #[must_use]
    pub const fn nth(ordinal: i8, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

/// Error raised when a recurrence rule is semantically invalid.
///
/// Surfaces at evaluation time; strict parsing can request it eagerly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurError {
    /// A BY-rule value lies outside its RFC 5545 range.
    #[error("{part} value {value} out of range")]
    OutOfRange {
        /// The rule part name (e.g. "BYMONTH").
        part: &'static str,
        /// The offending value.
        value: i64,
    },

    /// COUNT and UNTIL were both supplied.
    #[error("COUNT and UNTIL are mutually exclusive")]
    ConflictingLimit,

    /// A component carries both DTEND and DURATION.
    #[error("DTEND and DURATION are mutually exclusive")]
    MutuallyExclusive,

    /// The rule has no FREQ part and cannot expand.
    #[error("recurrence rule has no FREQ part")]
    MissingFrequency,
}

/// Recurrence rule (RFC 5545 §3.3.10, §3.8.5.3).
///
/// COUNT and UNTIL are both storable; their exclusivity is a semantic
/// constraint checked by [`Recur::validate`], not a parse-level one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recur {
    /// Recurrence frequency (required for expansion).
    pub freq: Option<Frequency>,

    /// How many frequency periods between occurrences (default 1).
    pub interval: Option<u32>,

    /// Inclusive end of the recurrence. A date-only UNTIL bounds the
    /// whole final day.
    pub until: Option<DateTime>,

    /// Total number of occurrences, counting DTSTART as the first.
    pub count: Option<u32>,

    /// Week start day (default Monday).
    pub wkst: Option<Weekday>,

    /// BYSECOND list (0-60).
    pub by_second: Vec<u8>,

    /// BYMINUTE list (0-59).
    pub by_minute: Vec<u8>,

    /// BYHOUR list (0-23).
    pub by_hour: Vec<u8>,

    /// BYDAY list with optional ordinals.
    pub by_day: Vec<WeekdayNum>,

    /// BYMONTHDAY list (±1-31).
    pub by_monthday: Vec<i8>,

    /// BYYEARDAY list (±1-366).
    pub by_yearday: Vec<i16>,

    /// BYWEEKNO list (±1-53).
    pub by_weekno: Vec<i8>,

    /// BYMONTH list (1-12).
    pub by_month: Vec<u8>,

    /// BYSETPOS list (±1-366), applied per frequency period.
    pub by_setpos: Vec<i16>,
}

impl Recur {
    /// Creates an empty rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule with the given frequency.
    #[must_use]
    pub fn with_freq(freq: Frequency) -> Self {
        Self {
            freq: Some(freq),
            ..Self::default()
        }
    }

    /// Returns the effective interval (≥ 1).
    #[must_use]
    pub fn effective_interval(&self) -> u32 {
        self.interval.unwrap_or(1).max(1)
    }

    /// Returns the effective week start (default Monday).
    #[must_use]
    pub fn effective_wkst(&self) -> Weekday {
        self.wkst.unwrap_or(Weekday::Monday)
    }

    /// Checks the rule's semantic invariants: FREQ present, numeric
    /// ranges from RFC 5545 §3.3.10, at most one of COUNT/UNTIL.
    ///
    /// ## Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), RecurError> {
        if self.freq.is_none() {
            return Err(RecurError::MissingFrequency);
        }
        if self.count.is_some() && self.until.is_some() {
            return Err(RecurError::ConflictingLimit);
        }
        if let Some(interval) = self.interval
            && interval == 0
        {
            return Err(RecurError::OutOfRange {
                part: "INTERVAL",
                value: 0,
            });
        }

        check_range("BYSECOND", &self.by_second, 0, 60, false)?;
        check_range("BYMINUTE", &self.by_minute, 0, 59, false)?;
        check_range("BYHOUR", &self.by_hour, 0, 23, false)?;
        check_range("BYMONTH", &self.by_month, 1, 12, false)?;
        check_range("BYMONTHDAY", &self.by_monthday, -31, 31, true)?;
        check_range("BYYEARDAY", &self.by_yearday, -366, 366, true)?;
        check_range("BYWEEKNO", &self.by_weekno, -53, 53, true)?;
        check_range("BYSETPOS", &self.by_setpos, -366, 366, true)?;
        for day in &self.by_day {
            if let Some(ord) = day.ordinal
                && (ord == 0 || !(-53..=53).contains(&ord))
            {
                return Err(RecurError::OutOfRange {
                    part: "BYDAY",
                    value: i64::from(ord),
                });
            }
        }
        Ok(())
    }
}

fn check_range<T>(
    part: &'static str,
    values: &[T],
    min: i64,
    max: i64,
    nonzero: bool,
) -> Result<(), RecurError>
where
    T: Copy + Into<i64>,
{
    for &v in values {
        let v = v.into();
        if v < min || v > max || (nonzero && v == 0) {
            return Err(RecurError::OutOfRange { part, value: v });
        }
    }
    Ok(())
}

impl fmt::Display for Recur {
    /// Rule parts come out in the order the RFC 5545 §3.3.10 grammar
    /// lists them: FREQ, UNTIL, COUNT, INTERVAL, the BY-parts from
    /// BYSECOND through BYSETPOS, then WKST.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(freq) = self.freq {
            parts.push(format!("FREQ={freq}"));
        }
        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={until}"));
        }
        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }
        if let Some(interval) = self.interval
            && interval != 1
        {
            parts.push(format!("INTERVAL={interval}"));
        }

        push_list(&mut parts, "BYSECOND", &self.by_second);
        push_list(&mut parts, "BYMINUTE", &self.by_minute);
        push_list(&mut parts, "BYHOUR", &self.by_hour);
        push_list(&mut parts, "BYDAY", &self.by_day);
        push_list(&mut parts, "BYMONTHDAY", &self.by_monthday);
        push_list(&mut parts, "BYYEARDAY", &self.by_yearday);
        push_list(&mut parts, "BYWEEKNO", &self.by_weekno);
        push_list(&mut parts, "BYMONTH", &self.by_month);
        push_list(&mut parts, "BYSETPOS", &self.by_setpos);

        if let Some(wkst) = self.wkst {
            parts.push(format!("WKST={wkst}"));
        }

        write!(f, "{}", parts.join(";"))
    }
}

fn push_list<T: ToString>(parts: &mut Vec<String>, name: &str, values: &[T]) {
    if !values.is_empty() {
        let joined: Vec<_> = values.iter().map(ToString::to_string).collect();
        parts.push(format!("{name}={}", joined.join(",")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_basic() {
        let mut rule = Recur::with_freq(Frequency::Daily);
        rule.count = Some(10);
        assert_eq!(rule.to_string(), "FREQ=DAILY;COUNT=10");
    }

    #[test]
    fn display_weekly_byday() {
        let mut rule = Recur::with_freq(Frequency::Weekly);
        rule.by_day = vec![
            WeekdayNum::every(Weekday::Monday),
            WeekdayNum::every(Weekday::Wednesday),
            WeekdayNum::every(Weekday::Friday),
        ];
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;BYDAY=MO,WE,FR");
    }

    #[test]
    fn display_monthly_nth() {
        let mut rule = Recur::with_freq(Frequency::Monthly);
        rule.by_day = vec![WeekdayNum::nth(-1, Weekday::Monday)];
        assert_eq!(rule.to_string(), "FREQ=MONTHLY;BYDAY=-1MO");
    }

    #[test]
    fn display_wkst_comes_after_by_parts() {
        let mut rule = Recur::with_freq(Frequency::Weekly);
        rule.wkst = Some(Weekday::Sunday);
        rule.by_day = vec![
            WeekdayNum::every(Weekday::Tuesday),
            WeekdayNum::every(Weekday::Thursday),
        ];
        rule.interval = Some(2);
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;WKST=SU");
    }

    #[test]
    fn display_until_precedes_interval() {
        let mut rule = Recur::with_freq(Frequency::Daily);
        rule.until = Some(DateTime::date(1997, 12, 24));
        rule.interval = Some(2);
        assert_eq!(rule.to_string(), "FREQ=DAILY;UNTIL=19971224;INTERVAL=2");
    }

    #[test]
    fn display_default_interval_omitted() {
        let mut rule = Recur::with_freq(Frequency::Weekly);
        rule.interval = Some(1);
        assert_eq!(rule.to_string(), "FREQ=WEEKLY");
        rule.interval = Some(2);
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2");
    }

    #[test]
    fn validate_count_until_conflict() {
        let mut rule = Recur::with_freq(Frequency::Daily);
        rule.count = Some(10);
        rule.until = Some(DateTime::date(1997, 12, 24));
        assert_eq!(rule.validate(), Err(RecurError::ConflictingLimit));
    }

    #[test]
    fn validate_missing_freq() {
        assert_eq!(Recur::new().validate(), Err(RecurError::MissingFrequency));
    }

    #[test]
    fn validate_range_violations() {
        let mut rule = Recur::with_freq(Frequency::Monthly);
        rule.by_month = vec![13];
        assert_eq!(
            rule.validate(),
            Err(RecurError::OutOfRange {
                part: "BYMONTH",
                value: 13
            })
        );

        let mut rule = Recur::with_freq(Frequency::Monthly);
        rule.by_monthday = vec![0];
        assert!(rule.validate().is_err());

        let mut rule = Recur::with_freq(Frequency::Yearly);
        rule.by_day = vec![WeekdayNum::nth(54, Weekday::Monday)];
        assert!(rule.validate().is_err());
    }

    #[test]
    fn validate_accepts_rfc_examples() {
        let mut rule = Recur::with_freq(Frequency::Yearly);
        rule.by_month = vec![6, 7];
        rule.interval = Some(2);
        rule.count = Some(10);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn weekday_from_name() {
        assert_eq!(Weekday::from_name("MO"), Some(Weekday::Monday));
        assert_eq!(Weekday::from_name("fr"), Some(Weekday::Friday));
        assert_eq!(Weekday::from_name("XX"), None);
    }

    #[test]
    fn frequency_from_name() {
        assert_eq!(Frequency::from_name("DAILY"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_name("yearly"), Some(Frequency::Yearly));
        assert_eq!(Frequency::from_name("FORTNIGHTLY"), None);
    }
}
