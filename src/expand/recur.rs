//! Recurrence rule expansion (RFC 5545 §3.3.10).
//!
//! Expands one rule in the wall-clock domain of its DTSTART anchor. The
//! BY-rule parts either *expand* the candidate set or *limit* it,
//! depending on the frequency, per the table in §3.3.10; BYSETPOS then
//! selects positions within each frequency period. Zone conversion
//! happens a layer above, in the recurrence-set composition.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::core::{Frequency, Recur, RecurError, Weekday, days_in_month};

/// Safety cap on instances generated by a single rule.
const MAX_INSTANCES: usize = 10_000;

/// Safety cap on consecutive periods producing no candidate, so rules
/// that can never match (FREQ=YEARLY;BYMONTHDAY=30;BYMONTH=2) terminate.
const MAX_EMPTY_PERIODS: usize = 1_000;

/// Latest year representable in the value model.
const MAX_YEAR: i32 = 9999;

/// Expands a rule from its DTSTART anchor.
///
/// `until` is the rule's inclusive end, already converted to the DTSTART
/// wall clock by the caller; `scan_end` bounds the period scan for rules
/// with neither COUNT nor UNTIL (the requested window's end). Instances
/// come back sorted ascending. Candidates earlier than DTSTART are
/// dropped; the recurrence-set composition above this layer unions
/// DTSTART in whether or not the pattern reproduces it.
///
/// ## Errors
///
/// Returns a [`RecurError`] when the rule fails [`Recur::validate`].
pub fn expand_rule(
    rule: &Recur,
    dtstart: NaiveDateTime,
    until: Option<NaiveDateTime>,
    scan_end: Option<NaiveDateTime>,
) -> Result<Vec<NaiveDateTime>, RecurError> {
    rule.validate()?;
    let freq = rule.freq.ok_or(RecurError::MissingFrequency)?;
    let interval = i64::from(rule.effective_interval());
    let count_limit = rule.count.map(|c| c as usize);

    let mut out = Vec::new();
    if count_limit == Some(0) {
        return Ok(out);
    }

    // With a COUNT the scan must enumerate from DTSTART regardless of the
    // window; otherwise the period scan can stop at UNTIL or the window.
    let scan_cutoff = if count_limit.is_some() {
        until
    } else {
        match (until, scan_end) {
            (Some(u), Some(w)) => Some(u.min(w)),
            (u, w) => u.or(w),
        }
    };

    let mut empty_streak = 0usize;
    let mut k = 0i64;
    loop {
        let Some(period) = FreqPeriod::at(freq, rule, dtstart, k * interval) else {
            break;
        };
        if let Some(cutoff) = scan_cutoff
            && period.lower_bound() > cutoff
        {
            break;
        }

        let mut candidates = period.candidates(rule, dtstart);
        candidates.sort_unstable();
        candidates.dedup();
        let selected = apply_setpos(candidates, &rule.by_setpos);

        let mut produced = false;
        for cand in selected {
            produced = true;
            if cand < dtstart {
                continue;
            }
            if let Some(u) = until
                && cand > u
            {
                return Ok(out);
            }
            out.push(cand);
            if let Some(c) = count_limit
                && out.len() >= c
            {
                return Ok(out);
            }
            if out.len() >= MAX_INSTANCES {
                return Ok(out);
            }
        }

        empty_streak = if produced { 0 } else { empty_streak + 1 };
        if empty_streak >= MAX_EMPTY_PERIODS {
            break;
        }
        k += 1;
    }

    Ok(out)
}

/// One frequency period of the scan.
enum FreqPeriod {
    Year(i32),
    Month(i32, u32),
    /// Week identified by its WKST-aligned start date.
    Week(NaiveDate),
    Day(NaiveDate),
    /// Sub-day frequencies carry the full instant.
    Instant(NaiveDateTime, Frequency),
}

impl FreqPeriod {
    /// Builds the period `offset` frequency units after DTSTART.
    /// `None` once the scan leaves the representable year range.
    fn at(freq: Frequency, rule: &Recur, dtstart: NaiveDateTime, offset: i64) -> Option<Self> {
        let date = dtstart.date();
        match freq {
            Frequency::Yearly => {
                let year = i64::from(date.year()) + offset;
                if year > i64::from(MAX_YEAR) {
                    return None;
                }
                Some(Self::Year(i32::try_from(year).ok()?))
            }
            Frequency::Monthly => {
                let months = i64::from(date.year()) * 12 + i64::from(date.month0()) + offset;
                let year = months.div_euclid(12);
                let month = u32::try_from(months.rem_euclid(12)).ok()? + 1;
                (year <= i64::from(MAX_YEAR))
                    .then_some(Self::Month(i32::try_from(year).ok()?, month))
            }
            Frequency::Weekly => {
                let anchor = date.checked_add_signed(chrono::Duration::weeks(offset))?;
                let wkst = rule.effective_wkst();
                Some(Self::Week(week_start(anchor, wkst)))
            }
            Frequency::Daily => Some(Self::Day(
                date.checked_add_signed(chrono::Duration::days(offset))?,
            )),
            Frequency::Hourly => Some(Self::Instant(
                dtstart.checked_add_signed(chrono::Duration::hours(offset))?,
                freq,
            )),
            Frequency::Minutely => Some(Self::Instant(
                dtstart.checked_add_signed(chrono::Duration::minutes(offset))?,
                freq,
            )),
            Frequency::Secondly => Some(Self::Instant(
                dtstart.checked_add_signed(chrono::Duration::seconds(offset))?,
                freq,
            )),
        }
    }

    /// Earliest instant any candidate of this period can take; used to
    /// stop the scan once periods start past the cutoff.
    fn lower_bound(&self) -> NaiveDateTime {
        let midnight = NaiveTime::MIN;
        match self {
            Self::Year(y) => NaiveDate::from_ymd_opt(*y, 1, 1)
                .unwrap_or(NaiveDate::MAX)
                .and_time(midnight),
            Self::Month(y, m) => NaiveDate::from_ymd_opt(*y, *m, 1)
                .unwrap_or(NaiveDate::MAX)
                .and_time(midnight),
            Self::Week(start) => start.and_time(midnight),
            Self::Day(date) => date.and_time(midnight),
            Self::Instant(dt, _) => *dt,
        }
    }

    /// Generates the period's candidate instants, before BYSETPOS.
    fn candidates(&self, rule: &Recur, dtstart: NaiveDateTime) -> Vec<NaiveDateTime> {
        match self {
            Self::Year(y) => {
                let times = time_grid(rule, dtstart.time());
                cross(yearly_dates(rule, *y, dtstart.date()), &times)
            }
            Self::Month(y, m) => {
                let times = time_grid(rule, dtstart.time());
                cross(monthly_dates(rule, *y, *m, dtstart.date()), &times)
            }
            Self::Week(start) => {
                let times = time_grid(rule, dtstart.time());
                cross(weekly_dates(rule, *start, dtstart.date()), &times)
            }
            Self::Day(date) => {
                if date_passes_limits(rule, *date) {
                    let times = time_grid(rule, dtstart.time());
                    cross(vec![*date], &times)
                } else {
                    Vec::new()
                }
            }
            Self::Instant(dt, freq) => sub_day_candidates(rule, *dt, *freq),
        }
    }
}

/// YEARLY candidate dates within one year.
fn yearly_dates(rule: &Recur, year: i32, anchor: NaiveDate) -> Vec<NaiveDate> {
    let wkst = rule.effective_wkst();
    let has_weekno = !rule.by_weekno.is_empty();
    let has_yearday = !rule.by_yearday.is_empty();
    let has_monthday = !rule.by_monthday.is_empty();
    let has_day = !rule.by_day.is_empty();
    let has_month = !rule.by_month.is_empty();

    // Absent day-level parts fall back to the DTSTART anchor.
    if !has_weekno && !has_yearday && !has_monthday && !has_day {
        let months: Vec<u32> = if has_month {
            rule.by_month.iter().map(|&m| u32::from(m)).collect()
        } else {
            vec![anchor.month()]
        };
        return months
            .into_iter()
            .filter_map(|m| NaiveDate::from_ymd_opt(year, m, anchor.day()))
            .collect();
    }

    if has_weekno {
        // Days of the selected weeks, then weekday selection: BYDAY when
        // present, otherwise the anchor's weekday.
        let weekdays: Vec<Weekday> = if has_day {
            rule.by_day.iter().map(|d| d.weekday).collect()
        } else {
            vec![Weekday::from_chrono(anchor.weekday())]
        };
        let mut days = Vec::new();
        for &weekno in &rule.by_weekno {
            for day in week_days(year, weekno, wkst) {
                if weekdays.contains(&Weekday::from_chrono(day.weekday()))
                    && month_passes(rule, day)
                    && yearday_passes(rule, day)
                    && monthday_passes(rule, day)
                {
                    days.push(day);
                }
            }
        }
        return days;
    }

    if has_yearday || has_monthday {
        // Expand the listed days, then let the remaining parts limit.
        let mut days: Vec<NaiveDate> = if has_yearday {
            rule.by_yearday
                .iter()
                .filter_map(|&yd| yearday_date(year, yd))
                .collect()
        } else {
            let months: Vec<u32> = if has_month {
                rule.by_month.iter().map(|&m| u32::from(m)).collect()
            } else {
                (1..=12).collect()
            };
            months
                .into_iter()
                .flat_map(|m| {
                    rule.by_monthday
                        .iter()
                        .filter_map(move |&md| monthday_date(year, m, md))
                })
                .collect()
        };
        if has_yearday {
            days.retain(|d| month_passes(rule, *d) && monthday_passes(rule, *d));
        }
        if has_day {
            days.retain(|d| weekday_passes(rule, *d));
        }
        return days;
    }

    // BYDAY alone: ordinals within the BYMONTH months or the whole year.
    let mut days = Vec::new();
    if has_month {
        for &m in &rule.by_month {
            for entry in &rule.by_day {
                match entry.ordinal {
                    Some(ord) => {
                        days.extend(nth_weekday_in_month(year, u32::from(m), entry.weekday, ord));
                    }
                    None => {
                        days.extend(weekdays_in_month(year, u32::from(m), entry.weekday));
                    }
                }
            }
        }
    } else {
        for entry in &rule.by_day {
            match entry.ordinal {
                Some(ord) => days.extend(nth_weekday_in_year(year, entry.weekday, ord)),
                None => days.extend(weekdays_in_year(year, entry.weekday)),
            }
        }
    }
    days
}

/// MONTHLY candidate dates within one month.
fn monthly_dates(rule: &Recur, year: i32, month: u32, anchor: NaiveDate) -> Vec<NaiveDate> {
    if !rule.by_month.is_empty() && !month_in_list(rule, month) {
        return Vec::new();
    }

    let has_monthday = !rule.by_monthday.is_empty();
    let has_day = !rule.by_day.is_empty();

    if has_monthday {
        let mut days: Vec<NaiveDate> = rule
            .by_monthday
            .iter()
            .filter_map(|&md| monthday_date(year, month, md))
            .collect();
        if has_day {
            days.retain(|d| weekday_passes(rule, *d));
        }
        return days;
    }

    if has_day {
        let mut days = Vec::new();
        for entry in &rule.by_day {
            match entry.ordinal {
                Some(ord) => days.extend(nth_weekday_in_month(year, month, entry.weekday, ord)),
                None => days.extend(weekdays_in_month(year, month, entry.weekday)),
            }
        }
        return days;
    }

    // Months too short for the anchor day produce no instance.
    NaiveDate::from_ymd_opt(year, month, anchor.day())
        .into_iter()
        .collect()
}

/// WEEKLY candidate dates within one WKST-aligned week.
fn weekly_dates(rule: &Recur, week_start: NaiveDate, anchor: NaiveDate) -> Vec<NaiveDate> {
    let wkst = rule.effective_wkst();
    let weekdays: Vec<Weekday> = if rule.by_day.is_empty() {
        vec![Weekday::from_chrono(anchor.weekday())]
    } else {
        rule.by_day.iter().map(|d| d.weekday).collect()
    };

    let mut days: Vec<NaiveDate> = weekdays
        .into_iter()
        .filter_map(|wd| {
            let offset = i64::from((wd.num_days_from_monday() + 7 - wkst.num_days_from_monday()) % 7);
            week_start.checked_add_signed(chrono::Duration::days(offset))
        })
        .collect();
    if !rule.by_month.is_empty() {
        days.retain(|d| month_in_list(rule, d.month()));
    }
    days
}

/// Limit checks applied to DAILY periods and the date part of sub-day
/// periods.
fn date_passes_limits(rule: &Recur, date: NaiveDate) -> bool {
    month_passes(rule, date) && monthday_passes(rule, date) && weekday_passes(rule, date)
}

/// Sub-day candidate instants for HOURLY, MINUTELY, and SECONDLY.
fn sub_day_candidates(rule: &Recur, dt: NaiveDateTime, freq: Frequency) -> Vec<NaiveDateTime> {
    if !date_passes_limits(rule, dt.date()) || !yearday_passes(rule, dt.date()) {
        return Vec::new();
    }

    let hour_ok = rule.by_hour.is_empty() || rule.by_hour.contains(&hour_u8(dt));
    match freq {
        Frequency::Hourly => {
            if !hour_ok {
                return Vec::new();
            }
            let minutes = expand_or(&rule.by_minute, dt.minute());
            let seconds = expand_or(&rule.by_second, dt.second());
            let mut out = Vec::new();
            for &m in &minutes {
                for &s in &seconds {
                    if let Some(t) = NaiveTime::from_hms_opt(dt.hour(), m, s) {
                        out.push(dt.date().and_time(t));
                    }
                }
            }
            out
        }
        Frequency::Minutely => {
            let minute_ok = rule.by_minute.is_empty() || rule.by_minute.contains(&minute_u8(dt));
            if !hour_ok || !minute_ok {
                return Vec::new();
            }
            expand_or(&rule.by_second, dt.second())
                .into_iter()
                .filter_map(|s| NaiveTime::from_hms_opt(dt.hour(), dt.minute(), s))
                .map(|t| dt.date().and_time(t))
                .collect()
        }
        _ => {
            let minute_ok = rule.by_minute.is_empty() || rule.by_minute.contains(&minute_u8(dt));
            let second_ok = rule.by_second.is_empty() || rule.by_second.contains(&second_u8(dt));
            if hour_ok && minute_ok && second_ok {
                vec![dt]
            } else {
                Vec::new()
            }
        }
    }
}

/// The time-of-day grid for day-or-coarser frequencies: BYHOUR, BYMINUTE,
/// and BYSECOND expand; absent parts come from the DTSTART time.
fn time_grid(rule: &Recur, anchor: NaiveTime) -> Vec<NaiveTime> {
    let hours = expand_or(&rule.by_hour, anchor.hour());
    let minutes = expand_or(&rule.by_minute, anchor.minute());
    let seconds = expand_or(&rule.by_second, anchor.second());

    let mut times = Vec::with_capacity(hours.len() * minutes.len() * seconds.len());
    for &h in &hours {
        for &m in &minutes {
            for &s in &seconds {
                if let Some(t) = NaiveTime::from_hms_opt(h, m, s) {
                    times.push(t);
                }
            }
        }
    }
    times.sort_unstable();
    times
}

fn expand_or(list: &[u8], anchor: u32) -> Vec<u32> {
    if list.is_empty() {
        vec![anchor]
    } else {
        let mut values: Vec<u32> = list.iter().map(|&v| u32::from(v)).collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

fn cross(dates: Vec<NaiveDate>, times: &[NaiveTime]) -> Vec<NaiveDateTime> {
    let mut out = Vec::with_capacity(dates.len() * times.len());
    for date in dates {
        for &time in times {
            out.push(date.and_time(time));
        }
    }
    out
}

/// Selects BYSETPOS positions (1-based; negative from the end) from one
/// period's candidate set.
fn apply_setpos(candidates: Vec<NaiveDateTime>, setpos: &[i16]) -> Vec<NaiveDateTime> {
    if setpos.is_empty() || candidates.is_empty() {
        return candidates;
    }
    let len = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
    let mut selected: Vec<NaiveDateTime> = setpos
        .iter()
        .filter_map(|&pos| {
            let idx = if pos > 0 {
                i64::from(pos) - 1
            } else {
                len + i64::from(pos)
            };
            usize::try_from(idx).ok().and_then(|i| candidates.get(i)).copied()
        })
        .collect();
    selected.sort_unstable();
    selected.dedup();
    selected
}

fn month_in_list(rule: &Recur, month: u32) -> bool {
    rule.by_month.iter().any(|&m| u32::from(m) == month)
}

fn month_passes(rule: &Recur, date: NaiveDate) -> bool {
    rule.by_month.is_empty() || month_in_list(rule, date.month())
}

fn weekday_passes(rule: &Recur, date: NaiveDate) -> bool {
    rule.by_day.is_empty()
        || rule
            .by_day
            .iter()
            .any(|d| d.weekday == Weekday::from_chrono(date.weekday()))
}

fn monthday_passes(rule: &Recur, date: NaiveDate) -> bool {
    if rule.by_monthday.is_empty() {
        return true;
    }
    let day = i64::from(date.day());
    let len = i64::from(days_in_month(date.year(), date.month()));
    rule.by_monthday.iter().any(|&md| {
        let md = i64::from(md);
        if md > 0 { day == md } else { day == len + md + 1 }
    })
}

fn yearday_passes(rule: &Recur, date: NaiveDate) -> bool {
    if rule.by_yearday.is_empty() {
        return true;
    }
    let yd = i64::from(date.ordinal());
    let len = i64::from(days_in_year(date.year()));
    rule.by_yearday.iter().any(|&v| {
        let v = i64::from(v);
        if v > 0 { yd == v } else { yd == len + v + 1 }
    })
}

fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Resolves a ±yearday ordinal to a date.
fn yearday_date(year: i32, yearday: i16) -> Option<NaiveDate> {
    let len = i32::from(u16::try_from(days_in_year(year)).ok()?);
    let ordinal = if yearday > 0 {
        i32::from(yearday)
    } else {
        len + i32::from(yearday) + 1
    };
    u32::try_from(ordinal)
        .ok()
        .and_then(|o| NaiveDate::from_yo_opt(year, o))
}

/// Resolves a ±monthday ordinal to a date within a month.
fn monthday_date(year: i32, month: u32, monthday: i8) -> Option<NaiveDate> {
    let len = i32::try_from(days_in_month(year, month)).ok()?;
    let day = if monthday > 0 {
        i32::from(monthday)
    } else {
        len + i32::from(monthday) + 1
    };
    u32::try_from(day)
        .ok()
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
}

/// All dates of a weekday within a month, ascending.
fn weekdays_in_month(year: i32, month: u32, weekday: Weekday) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let offset = (weekday.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    let mut day = 1 + offset;
    let len = days_in_month(year, month);
    let mut out = Vec::new();
    while day <= len {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            out.push(date);
        }
        day += 7;
    }
    out
}

/// The nth (±) occurrence of a weekday within a month.
fn nth_weekday_in_month(year: i32, month: u32, weekday: Weekday, ordinal: i8) -> Option<NaiveDate> {
    let all = weekdays_in_month(year, month, weekday);
    pick_nth(&all, ordinal)
}

/// All dates of a weekday within a year, ascending.
fn weekdays_in_year(year: i32, weekday: Weekday) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    let offset = (weekday.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    let mut ordinal = 1 + offset;
    let len = days_in_year(year);
    let mut out = Vec::new();
    while ordinal <= len {
        if let Some(date) = NaiveDate::from_yo_opt(year, ordinal) {
            out.push(date);
        }
        ordinal += 7;
    }
    out
}

/// The nth (±) occurrence of a weekday within a year.
fn nth_weekday_in_year(year: i32, weekday: Weekday, ordinal: i8) -> Option<NaiveDate> {
    let all = weekdays_in_year(year, weekday);
    pick_nth(&all, ordinal)
}

fn pick_nth(dates: &[NaiveDate], ordinal: i8) -> Option<NaiveDate> {
    if ordinal > 0 {
        dates.get(usize::try_from(i32::from(ordinal) - 1).ok()?).copied()
    } else {
        let back = usize::try_from(-i32::from(ordinal)).ok()?;
        dates.len().checked_sub(back).and_then(|i| dates.get(i)).copied()
    }
}

/// The WKST-aligned start of the week containing `date`.
fn week_start(date: NaiveDate, wkst: Weekday) -> NaiveDate {
    let back = i64::from(
        (date.weekday().num_days_from_monday() + 7 - wkst.num_days_from_monday()) % 7,
    );
    date - chrono::Duration::days(back)
}

/// Start of week 1 of `year`: the first WKST-aligned week with at least
/// four days inside the year.
fn week_one_start(year: i32, wkst: Weekday) -> NaiveDate {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MAX);
    let aligned = week_start(jan1, wkst);
    let days_before_jan1 = (jan1 - aligned).num_days();
    if days_before_jan1 <= 3 {
        aligned
    } else {
        aligned + chrono::Duration::weeks(1)
    }
}

/// Number of WKST-relative weeks in `year`.
fn weeks_in_year(year: i32, wkst: Weekday) -> i64 {
    (week_one_start(year + 1, wkst) - week_one_start(year, wkst)).num_days() / 7
}

/// The seven days of week number `weekno` (±) of `year`.
fn week_days(year: i32, weekno: i8, wkst: Weekday) -> Vec<NaiveDate> {
    let total = weeks_in_year(year, wkst);
    let n = if weekno > 0 {
        i64::from(weekno)
    } else {
        total + i64::from(weekno) + 1
    };
    if n < 1 || n > total {
        return Vec::new();
    }
    let start = week_one_start(year, wkst) + chrono::Duration::weeks(n - 1);
    (0..7)
        .filter_map(|d| start.checked_add_signed(chrono::Duration::days(d)))
        .collect()
}

fn hour_u8(dt: NaiveDateTime) -> u8 {
    u8::try_from(dt.hour()).unwrap_or(u8::MAX)
}

fn minute_u8(dt: NaiveDateTime) -> u8 {
    u8::try_from(dt.minute()).unwrap_or(u8::MAX)
}

fn second_u8(dt: NaiveDateTime) -> u8 {
    u8::try_from(dt.second()).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WeekdayNum;
    use crate::parse::parse_recur;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn rule(s: &str) -> Recur {
        parse_recur(s, "RRULE", 1).unwrap()
    }

    fn expand(s: &str, start: NaiveDateTime) -> Vec<NaiveDateTime> {
        expand_rule(&rule(s), start, None, Some(dt(2030, 1, 1, 0, 0, 0))).unwrap()
    }

    #[test]
    fn daily_count_ten() {
        // RFC 5545: DTSTART 19970902T090000, FREQ=DAILY;COUNT=10.
        let got = expand("FREQ=DAILY;COUNT=10", dt(1997, 9, 2, 9, 0, 0));
        assert_eq!(got.len(), 10);
        assert_eq!(got[0], dt(1997, 9, 2, 9, 0, 0));
        assert_eq!(got[9], dt(1997, 9, 11, 9, 0, 0));
    }

    #[test]
    fn daily_until() {
        let until = dt(1997, 9, 5, 9, 0, 0);
        let got = expand_rule(
            &rule("FREQ=DAILY"),
            dt(1997, 9, 2, 9, 0, 0),
            Some(until),
            None,
        )
        .unwrap();
        assert_eq!(got.len(), 4);
        assert_eq!(*got.last().unwrap(), until);
    }

    #[test]
    fn every_other_day() {
        let got = expand("FREQ=DAILY;INTERVAL=2;COUNT=3", dt(1997, 9, 2, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 4, 9, 0, 0),
                dt(1997, 9, 6, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn weekly_count_five() {
        let got = expand("FREQ=WEEKLY;COUNT=5", dt(1997, 9, 2, 9, 0, 0));
        assert_eq!(got[4], dt(1997, 9, 30, 9, 0, 0));
    }

    #[test]
    fn weekly_byday_tu_th() {
        // RFC 5545: FREQ=WEEKLY;COUNT=6;BYDAY=TU,TH from 19970902 (a Tuesday).
        let got = expand("FREQ=WEEKLY;COUNT=6;BYDAY=TU,TH", dt(1997, 9, 2, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 4, 9, 0, 0),
                dt(1997, 9, 9, 9, 0, 0),
                dt(1997, 9, 11, 9, 0, 0),
                dt(1997, 9, 16, 9, 0, 0),
                dt(1997, 9, 18, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn biweekly_wkst_sunday() {
        // RFC 5545: FREQ=WEEKLY;INTERVAL=2;COUNT=8;WKST=SU;BYDAY=TU,TH.
        let got = expand(
            "FREQ=WEEKLY;INTERVAL=2;COUNT=8;WKST=SU;BYDAY=TU,TH",
            dt(1997, 9, 2, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 4, 9, 0, 0),
                dt(1997, 9, 16, 9, 0, 0),
                dt(1997, 9, 18, 9, 0, 0),
                dt(1997, 9, 30, 9, 0, 0),
                dt(1997, 10, 2, 9, 0, 0),
                dt(1997, 10, 14, 9, 0, 0),
                dt(1997, 10, 16, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_first_friday() {
        // RFC 5545: FREQ=MONTHLY;COUNT=10;BYDAY=1FR from 19970905.
        let got = expand("FREQ=MONTHLY;COUNT=10;BYDAY=1FR", dt(1997, 9, 5, 9, 0, 0));
        assert_eq!(got[0], dt(1997, 9, 5, 9, 0, 0));
        assert_eq!(got[1], dt(1997, 10, 3, 9, 0, 0));
        assert_eq!(got[2], dt(1997, 11, 7, 9, 0, 0));
        assert_eq!(got[3], dt(1997, 12, 5, 9, 0, 0));
    }

    #[test]
    fn monthly_last_monday() {
        // Spec scenario: DTSTART 19970929, FREQ=MONTHLY;BYDAY=-1MO.
        let got = expand("FREQ=MONTHLY;BYDAY=-1MO;COUNT=4", dt(1997, 9, 29, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 29, 9, 0, 0),
                dt(1997, 10, 27, 9, 0, 0),
                dt(1997, 11, 24, 9, 0, 0),
                dt(1997, 12, 29, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_negative_monthday() {
        // RFC 5545: FREQ=MONTHLY;BYMONTHDAY=-3 from 19970928.
        let got = expand("FREQ=MONTHLY;BYMONTHDAY=-3;COUNT=3", dt(1997, 9, 28, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 28, 9, 0, 0),
                dt(1997, 10, 29, 9, 0, 0),
                dt(1997, 11, 28, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let got = expand("FREQ=MONTHLY;COUNT=4", dt(1997, 1, 31, 9, 0, 0));
        // February, April, June have no day 31.
        assert_eq!(
            got,
            vec![
                dt(1997, 1, 31, 9, 0, 0),
                dt(1997, 3, 31, 9, 0, 0),
                dt(1997, 5, 31, 9, 0, 0),
                dt(1997, 7, 31, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_byday_with_setpos() {
        // Spec scenario: FREQ=MONTHLY;BYDAY=TU,WE,TH;BYSETPOS=3;COUNT=3
        // from 19970904 picks the third TU/WE/TH slot of each month.
        let got = expand(
            "FREQ=MONTHLY;BYDAY=TU,WE,TH;BYSETPOS=3;COUNT=3",
            dt(1997, 9, 4, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 4, 9, 0, 0),
                dt(1997, 10, 7, 9, 0, 0),
                dt(1997, 11, 6, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn setpos_negative_picks_from_end() {
        // RFC 5545: the last work day of the month.
        let got = expand(
            "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3",
            dt(1997, 9, 29, 8, 30, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 30, 8, 30, 0),
                dt(1997, 10, 31, 8, 30, 0),
                dt(1997, 11, 28, 8, 30, 0),
            ]
        );
    }

    #[test]
    fn yearly_bymonth_june_july() {
        // RFC 5545: FREQ=YEARLY;COUNT=10;BYMONTH=6,7 from 19970610.
        let got = expand("FREQ=YEARLY;COUNT=4;BYMONTH=6,7", dt(1997, 6, 10, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 6, 10, 9, 0, 0),
                dt(1997, 7, 10, 9, 0, 0),
                dt(1998, 6, 10, 9, 0, 0),
                dt(1998, 7, 10, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn yearly_byyearday() {
        // RFC 5545: FREQ=YEARLY;INTERVAL=3;COUNT=10;BYYEARDAY=1,100,200.
        let got = expand(
            "FREQ=YEARLY;INTERVAL=3;COUNT=6;BYYEARDAY=1,100,200",
            dt(1997, 1, 1, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 1, 1, 9, 0, 0),
                dt(1997, 4, 10, 9, 0, 0),
                dt(1997, 7, 19, 9, 0, 0),
                dt(2000, 1, 1, 9, 0, 0),
                dt(2000, 4, 9, 9, 0, 0),
                dt(2000, 7, 18, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn yearly_day_of_year_anchor_skips_non_leap() {
        let got = expand("FREQ=YEARLY;COUNT=3", dt(2000, 2, 29, 12, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(2000, 2, 29, 12, 0, 0),
                dt(2004, 2, 29, 12, 0, 0),
                dt(2008, 2, 29, 12, 0, 0),
            ]
        );
    }

    #[test]
    fn yearly_20th_monday() {
        // RFC 5545: FREQ=YEARLY;BYDAY=20MO from 19970519.
        let got = expand("FREQ=YEARLY;BYDAY=20MO;COUNT=3", dt(1997, 5, 19, 9, 0, 0));
        assert_eq!(
            got,
            vec![
                dt(1997, 5, 19, 9, 0, 0),
                dt(1998, 5, 18, 9, 0, 0),
                dt(1999, 5, 17, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn yearly_weekno_20_monday() {
        // RFC 5545: FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO from 19970512.
        let got = expand(
            "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3",
            dt(1997, 5, 12, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 5, 12, 9, 0, 0),
                dt(1998, 5, 11, 9, 0, 0),
                dt(1999, 5, 17, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn friday_the_thirteenth() {
        // RFC 5545: FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13.
        let got = expand(
            "FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13;COUNT=5",
            dt(1997, 9, 2, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1998, 2, 13, 9, 0, 0),
                dt(1998, 3, 13, 9, 0, 0),
                dt(1998, 11, 13, 9, 0, 0),
                dt(1999, 8, 13, 9, 0, 0),
                dt(2000, 10, 13, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn hourly_interval_three() {
        // RFC 5545: FREQ=HOURLY;INTERVAL=3;UNTIL=19970902T170000Z.
        let got = expand_rule(
            &rule("FREQ=HOURLY;INTERVAL=3"),
            dt(1997, 9, 2, 9, 0, 0),
            Some(dt(1997, 9, 2, 17, 0, 0)),
            None,
        )
        .unwrap();
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 2, 12, 0, 0),
                dt(1997, 9, 2, 15, 0, 0),
            ]
        );
    }

    #[test]
    fn minutely_byhour_limits() {
        // RFC 5545: every 20 minutes from 9:00 to 16:40 via MINUTELY.
        let got = expand(
            "FREQ=MINUTELY;INTERVAL=20;BYHOUR=9,10;COUNT=6",
            dt(1997, 9, 2, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 2, 9, 20, 0),
                dt(1997, 9, 2, 9, 40, 0),
                dt(1997, 9, 2, 10, 0, 0),
                dt(1997, 9, 2, 10, 20, 0),
                dt(1997, 9, 2, 10, 40, 0),
            ]
        );
    }

    #[test]
    fn daily_byhour_byminute_expand() {
        // RFC 5545: FREQ=DAILY;BYHOUR=9,10,11...: BYHOUR expands under DAILY.
        let got = expand(
            "FREQ=DAILY;BYHOUR=9,11;BYMINUTE=0,30;COUNT=5",
            dt(1997, 9, 2, 9, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                dt(1997, 9, 2, 9, 0, 0),
                dt(1997, 9, 2, 9, 30, 0),
                dt(1997, 9, 2, 11, 0, 0),
                dt(1997, 9, 2, 11, 30, 0),
                dt(1997, 9, 3, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn impossible_rule_terminates() {
        let got = expand("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30;COUNT=5", dt(1997, 2, 1, 9, 0, 0));
        // The pattern can never match; the scan must still terminate.
        assert!(got.is_empty());
    }

    #[test]
    fn out_of_range_by_value_is_rejected() {
        let mut bad = rule("FREQ=MONTHLY");
        bad.by_monthday = vec![32];
        let err = expand_rule(&bad, dt(1997, 9, 2, 9, 0, 0), None, None).unwrap_err();
        assert!(matches!(err, RecurError::OutOfRange { .. }));
    }

    #[test]
    fn conflicting_limits_rejected_at_expansion() {
        let mut bad = rule("FREQ=DAILY;COUNT=3");
        bad.until = Some(crate::core::DateTime::date(1997, 12, 24));
        let err = expand_rule(&bad, dt(1997, 9, 2, 9, 0, 0), None, None).unwrap_err();
        assert_eq!(err, RecurError::ConflictingLimit);
    }

    #[test]
    fn window_bound_stops_unbounded_scan() {
        let got = expand_rule(
            &rule("FREQ=DAILY"),
            dt(1997, 9, 2, 9, 0, 0),
            None,
            Some(dt(1997, 9, 10, 0, 0, 0)),
        )
        .unwrap();
        // The scan stops at the first period past the cutoff; the window
        // filter proper happens in the set composition.
        assert!(!got.is_empty());
        assert!(got.len() <= 9);
        assert!(got.iter().all(|t| *t < dt(1997, 9, 11, 0, 0, 0)));
    }

    #[test]
    fn week_numbering_iso_examples() {
        // ISO 8601 spot checks with Monday week start.
        assert_eq!(
            week_one_start(1998, Weekday::Monday),
            NaiveDate::from_ymd_opt(1997, 12, 29).unwrap()
        );
        assert_eq!(weeks_in_year(1998, Weekday::Monday), 53);
        assert_eq!(weeks_in_year(1999, Weekday::Monday), 52);
    }

    #[test]
    fn nth_weekday_helpers() {
        assert_eq!(
            nth_weekday_in_month(1997, 9, Weekday::Monday, -1),
            NaiveDate::from_ymd_opt(1997, 9, 29)
        );
        assert_eq!(
            nth_weekday_in_month(1997, 10, Weekday::Monday, 1),
            NaiveDate::from_ymd_opt(1997, 10, 6)
        );
        assert_eq!(nth_weekday_in_month(1997, 9, Weekday::Monday, 6), None);
    }

    #[test]
    fn unmatched_dtstart_is_not_a_rule_candidate() {
        let mut r = Recur::with_freq(Frequency::Monthly);
        r.by_day = vec![WeekdayNum::nth(1, Weekday::Friday)];
        r.count = Some(2);
        // DTSTART 1997-09-02 is a Tuesday, not the first Friday; the
        // set-level composition unions it back in.
        let got = expand_rule(&r, dt(1997, 9, 2, 9, 0, 0), None, None).unwrap();
        assert_eq!(got, vec![dt(1997, 9, 5, 9, 0, 0), dt(1997, 10, 3, 9, 0, 0)]);
    }
}
