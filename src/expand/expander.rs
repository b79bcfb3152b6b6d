//! Recurrence-set composition and windowed evaluation.
//!
//! The occurrence set of a component is the union of its RRULE
//! expansions and RDATE values, minus the union of its EXRULE expansions
//! and EXDATE values, intersected with the requested window, sorted, and
//! deduplicated by instant in the DTSTART zone.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime as ChronoDateTime, NaiveDateTime, Utc};

use super::recur::expand_rule;
use super::timezone::{TzRegistry, TzResolver};
use crate::core::{
    Calendar, Component, ComponentKind, DateTime, Duration, Period, Property, Recur, RecurError,
};

/// One materialized occurrence of a recurring component.
///
/// The start and end are wall-clock readings in the DTSTART zone; the
/// UTC instants are what the window intersection and deduplication were
/// computed on.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// Occurrence start, in the DTSTART zone.
    pub start: DateTime,
    /// Occurrence end, in the DTSTART zone.
    pub end: DateTime,
    /// Start as an absolute instant.
    pub start_utc: ChronoDateTime<Utc>,
    /// End as an absolute instant.
    pub end_utc: ChronoDateTime<Utc>,
}

impl Occurrence {
    /// Returns the occurrence as an explicit period.
    #[must_use]
    pub fn period(&self) -> Period {
        Period::explicit(self.start.clone(), self.end.clone())
    }
}

/// The occurrences of one calendar component over a window.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentOccurrences {
    /// The component's UID, when present.
    pub uid: Option<String>,
    /// The component kind (VEVENT, VTODO, VJOURNAL).
    pub kind: ComponentKind,
    /// Index of the component among the calendar's children.
    pub component_index: usize,
    /// Occurrences in ascending chronological order.
    pub occurrences: Vec<Occurrence>,
}

/// A component's recurrence inputs: DTSTART anchor, rules, explicit
/// inclusions and exclusions, and the occurrence span.
#[derive(Debug, Clone)]
pub struct RecurrenceSet {
    dtstart: DateTime,
    rrules: Vec<Recur>,
    exrules: Vec<Recur>,
    rdates: Vec<DateTime>,
    exdates: Vec<DateTime>,
    span: Span,
}

/// How each occurrence's end derives from its start.
#[derive(Debug, Clone)]
enum Span {
    /// Explicit DURATION: end = start + duration.
    Duration(Duration),
    /// DTEND/DUE: end = start + (end − DTSTART) of the defining pair.
    End(DateTime),
    /// Neither; occurrences are instantaneous.
    None,
}

impl RecurrenceSet {
    /// Collects the recurrence inputs of a component.
    ///
    /// Returns `None` for components without a DTSTART anchor.
    ///
    /// ## Errors
    ///
    /// [`RecurError::MutuallyExclusive`] when the component carries both
    /// DTEND (or DUE) and DURATION.
    pub fn from_component(component: &Component) -> Result<Option<Self>, RecurError> {
        let Some(dtstart) = component.dtstart().cloned() else {
            return Ok(None);
        };

        let end_property = component
            .property("DTEND")
            .or_else(|| component.property("DUE"));
        let duration = component.property("DURATION").and_then(Property::as_duration);
        let span = match (end_property.and_then(Property::as_datetime), duration) {
            (Some(_), Some(_)) => return Err(RecurError::MutuallyExclusive),
            (Some(end), None) => Span::End(end.clone()),
            (None, Some(d)) => Span::Duration(*d),
            (None, None) => Span::None,
        };

        let rules = |name: &str| -> Vec<Recur> {
            component
                .properties(name)
                .iter()
                .filter_map(|p| p.as_recur().cloned())
                .collect()
        };
        let dates = |name: &str| -> Vec<DateTime> {
            component
                .properties(name)
                .iter()
                .flat_map(|p| p.value.datetimes())
                .cloned()
                .collect()
        };

        Ok(Some(Self {
            dtstart,
            rrules: rules("RRULE"),
            exrules: rules("EXRULE"),
            rdates: dates("RDATE"),
            exdates: dates("EXDATE"),
            span,
        }))
    }

    /// Expands the set over the closed window `[from, to]`.
    ///
    /// ## Errors
    ///
    /// Returns a [`RecurError`] for a semantically invalid rule.
    pub fn expand(
        &self,
        from: &DateTime,
        to: &DateTime,
        registry: &mut TzRegistry<'_>,
    ) -> Result<Vec<Occurrence>, RecurError> {
        let Some(anchor_naive) = self.dtstart.naive() else {
            return Ok(Vec::new());
        };
        let Some(from_utc) = registry.instant(from) else {
            return Ok(Vec::new());
        };
        let Some(to_utc) = registry.instant(to) else {
            return Ok(Vec::new());
        };
        let scan_end = registry.local_in_zone(to_utc, &self.dtstart.zone);

        // Instant-keyed so duplicates across rules collapse; the DTSTART
        // instance anchors the set whether or not a rule reproduces it.
        let mut included: BTreeMap<i64, NaiveDateTime> = BTreeMap::new();
        let insert = |registry: &mut TzRegistry<'_>,
                          map: &mut BTreeMap<i64, NaiveDateTime>,
                          local: NaiveDateTime| {
            let probe = DateTime::from_naive(local, &self.dtstart);
            if let Some(instant) = registry.instant(&probe) {
                map.entry(instant.timestamp()).or_insert(local);
            }
        };

        insert(registry, &mut included, anchor_naive);
        for rule in &self.rrules {
            let until = self.until_in_anchor_zone(rule, registry);
            for local in expand_rule(rule, anchor_naive, until, Some(scan_end))? {
                insert(registry, &mut included, local);
            }
        }
        for rdate in &self.rdates {
            if let Some(instant) = registry.instant(rdate) {
                let local = registry.local_in_zone(instant, &self.dtstart.zone);
                included.entry(instant.timestamp()).or_insert(local);
            }
        }

        let mut excluded: HashSet<i64> = HashSet::new();
        for rule in &self.exrules {
            let until = self.until_in_anchor_zone(rule, registry);
            for local in expand_rule(rule, anchor_naive, until, Some(scan_end))? {
                let probe = DateTime::from_naive(local, &self.dtstart);
                if let Some(instant) = registry.instant(&probe) {
                    excluded.insert(instant.timestamp());
                }
            }
        }
        for exdate in &self.exdates {
            if let Some(instant) = registry.instant(exdate) {
                excluded.insert(instant.timestamp());
            }
        }

        let span_seconds = self.span_seconds(registry);
        let mut occurrences = Vec::new();
        for (ts, local) in included {
            if excluded.contains(&ts) {
                continue;
            }
            let Some(start_utc) = ChronoDateTime::from_timestamp(ts, 0) else {
                continue;
            };
            if start_utc < from_utc || start_utc > to_utc {
                continue;
            }
            let start = DateTime::from_naive(local, &self.dtstart);
            let end_utc = start_utc + chrono::Duration::seconds(span_seconds);
            let end_local = registry.local_in_zone(end_utc, &self.dtstart.zone);
            let end = DateTime::from_naive(end_local, &self.dtstart);
            occurrences.push(Occurrence {
                start,
                end,
                start_utc,
                end_utc,
            });
        }

        Ok(occurrences)
    }

    /// Converts a rule's UNTIL into the DTSTART wall clock. A date-only
    /// UNTIL is inclusive of its whole final day.
    fn until_in_anchor_zone(
        &self,
        rule: &Recur,
        registry: &mut TzRegistry<'_>,
    ) -> Option<NaiveDateTime> {
        let until = rule.until.as_ref()?;
        if !until.has_time {
            let end_of_day = DateTime {
                hour: 23,
                minute: 59,
                second: 59,
                ..until.clone()
            };
            return end_of_day.naive();
        }
        if until.is_floating() {
            return until.naive();
        }
        let instant = registry.instant(until)?;
        Some(registry.local_in_zone(instant, &self.dtstart.zone))
    }

    /// The length of each occurrence in seconds.
    fn span_seconds(&self, registry: &mut TzRegistry<'_>) -> i64 {
        match &self.span {
            Span::Duration(d) => d.as_seconds(),
            Span::End(end) => {
                let start = registry.instant(&self.dtstart);
                let end = registry.instant(end);
                match (start, end) {
                    (Some(s), Some(e)) => (e - s).num_seconds(),
                    _ => 0,
                }
            }
            Span::None => 0,
        }
    }
}

impl Calendar {
    /// Materializes occurrences for every recurring child intersecting
    /// the closed window `[from, to]`.
    ///
    /// RECURRENCE-ID overrides replace the base instance they name.
    /// Per component the occurrences are ascending; across components
    /// the collection follows document order.
    ///
    /// ## Errors
    ///
    /// Returns the first [`RecurError`] raised by a semantically invalid
    /// rule or a DTEND/DURATION conflict.
    pub fn evaluate(
        &self,
        from: &DateTime,
        to: &DateTime,
    ) -> Result<Vec<ComponentOccurrences>, RecurError> {
        self.evaluate_with(from, to, None)
    }

    /// As [`Calendar::evaluate`], with a host-injected zone resolver for
    /// TZIDs the document does not declare.
    ///
    /// ## Errors
    ///
    /// As [`Calendar::evaluate`].
    #[tracing::instrument(skip_all, fields(components = self.root.children.len()))]
    pub fn evaluate_with(
        &self,
        from: &DateTime,
        to: &DateTime,
        resolver: Option<&dyn TzResolver>,
    ) -> Result<Vec<ComponentOccurrences>, RecurError> {
        let mut registry = TzRegistry::with_resolver(self, resolver);
        let mut results = Vec::new();

        for (component_index, child) in self.root.children.iter().enumerate() {
            let Some(kind) = child.kind else { continue };
            if !kind.is_recurring_kind() {
                continue;
            }
            // Overrides are folded into their base component's set; an
            // orphan override evaluates standalone.
            if child.recurrence_id().is_some()
                && let Some(uid) = child.uid()
                && self.base_component(kind, uid).is_some()
            {
                continue;
            }

            let Some(set) = RecurrenceSet::from_component(child)? else {
                continue;
            };
            let mut occurrences = set.expand(from, to, &mut registry)?;

            if let Some(uid) = child.uid()
                && child.recurrence_id().is_none()
            {
                for ovr in self.overrides_of(kind, uid) {
                    let Some(rid) = ovr.recurrence_id() else {
                        continue;
                    };
                    let Some(rid_instant) = registry.instant(rid) else {
                        continue;
                    };
                    occurrences.retain(|o| o.start_utc != rid_instant);

                    if let Some(ovr_set) = RecurrenceSet::from_component(ovr)? {
                        occurrences.extend(ovr_set.expand(from, to, &mut registry)?);
                    }
                }
                occurrences.sort_by_key(|o| o.start_utc);
            }

            tracing::trace!(
                uid = child.uid().unwrap_or("<none>"),
                count = occurrences.len(),
                "component evaluated"
            );

            results.push(ComponentOccurrences {
                uid: child.uid().map(str::to_string),
                kind,
                component_index,
                occurrences,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn window() -> (DateTime, DateTime) {
        (DateTime::utc(1990, 1, 1, 0, 0, 0), DateTime::utc(2020, 1, 1, 0, 0, 0))
    }

    fn evaluate(input: &str) -> Vec<ComponentOccurrences> {
        let cal = parse(input).unwrap();
        let (from, to) = window();
        cal.evaluate(&from, &to).unwrap()
    }

    #[test]
    fn daily_count_scenario() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:daily@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=10\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let occs = &out[0].occurrences;
        assert_eq!(occs.len(), 10);
        assert_eq!(occs[0].start, DateTime::utc(1997, 9, 2, 9, 0, 0));
        assert_eq!(occs[9].start, DateTime::utc(1997, 9, 11, 9, 0, 0));
    }

    #[test]
    fn exdate_removes_instances() {
        // Spec scenario: DAILY COUNT=5 with the third day excluded.
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:exdate@example.com\r\n\
DTSTART;VALUE=DATE:20060101\r\n\
RRULE:FREQ=DAILY;COUNT=5\r\n\
EXDATE;VALUE=DATE:20060103\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let days: Vec<u8> = out[0].occurrences.iter().map(|o| o.start.day).collect();
        assert_eq!(days, vec![1, 2, 4, 5]);
    }

    #[test]
    fn rdate_unions_and_duplicates_collapse() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:rdate@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=3\r\n\
RDATE:19970903T090000Z,19970915T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let occs = &out[0].occurrences;
        // Sep 3 duplicates a rule instance and is yielded once.
        assert_eq!(occs.len(), 4);
        assert_eq!(occs[3].start, DateTime::utc(1997, 9, 15, 9, 0, 0));
    }

    #[test]
    fn exrule_subtracts_instances() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:exrule@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=7\r\n\
EXRULE:FREQ=WEEKLY;BYDAY=SA,SU;COUNT=10\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let occs = &out[0].occurrences;
        // Sep 6 and Sep 7 1997 fall on the weekend.
        assert_eq!(occs.len(), 5);
        assert!(occs.iter().all(|o| ![6, 7].contains(&o.start.day)));
    }

    #[test]
    fn dtend_span_carries_to_occurrences() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:span@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
DTEND:19970902T103000Z\r\n\
RRULE:FREQ=DAILY;COUNT=2\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let occs = &out[0].occurrences;
        assert_eq!(occs[1].start, DateTime::utc(1997, 9, 3, 9, 0, 0));
        assert_eq!(occs[1].end, DateTime::utc(1997, 9, 3, 10, 30, 0));
        assert_eq!(occs[1].period().start(), &occs[1].start);
    }

    #[test]
    fn duration_span_carries_to_occurrences() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:dur@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
DURATION:PT1H\r\n\
RRULE:FREQ=DAILY;COUNT=2\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        let occs = &out[0].occurrences;
        assert_eq!(occs[0].end, DateTime::utc(1997, 9, 2, 10, 0, 0));
    }

    #[test]
    fn dtend_and_duration_conflict() {
        let cal = parse(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:conflict@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
DTEND:19970902T100000Z\r\n\
DURATION:PT1H\r\n\
RRULE:FREQ=DAILY;COUNT=2\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        )
        .unwrap();
        let (from, to) = window();
        assert_eq!(
            cal.evaluate(&from, &to).unwrap_err(),
            RecurError::MutuallyExclusive
        );
    }

    #[test]
    fn window_is_closed_interval() {
        let cal = parse(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:window@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=10\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        )
        .unwrap();
        let from = DateTime::utc(1997, 9, 4, 9, 0, 0);
        let to = DateTime::utc(1997, 9, 6, 9, 0, 0);
        let out = cal.evaluate(&from, &to).unwrap();
        let days: Vec<u8> = out[0].occurrences.iter().map(|o| o.start.day).collect();
        assert_eq!(days, vec![4, 5, 6]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:det@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=WEEKLY;BYDAY=TU,TH;COUNT=20\r\n\
RDATE:19971225T090000Z\r\n\
EXDATE:19970909T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let cal = parse(input).unwrap();
        let (from, to) = window();
        let a = cal.evaluate(&from, &to).unwrap();
        let b = cal.evaluate(&from, &to).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn recurrence_override_replaces_base_instance() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:series@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=3\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:series@example.com\r\n\
RECURRENCE-ID:19970903T090000Z\r\n\
DTSTART:19970903T140000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        assert_eq!(out.len(), 1);
        let starts: Vec<&DateTime> = out[0].occurrences.iter().map(|o| &o.start).collect();
        assert_eq!(
            starts,
            vec![
                &DateTime::utc(1997, 9, 2, 9, 0, 0),
                &DateTime::utc(1997, 9, 3, 14, 0, 0),
                &DateTime::utc(1997, 9, 4, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn non_recurring_event_yields_single_occurrence() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:single@example.com\r\n\
DTSTART:19970902T090000Z\r\n\
DTEND:19970902T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        assert_eq!(out[0].occurrences.len(), 1);
    }

    #[test]
    fn component_without_dtstart_is_skipped() {
        let out = evaluate(
            "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:nostart@example.com\r\n\
SUMMARY:No anchor\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
        );
        assert!(out.is_empty());
    }

    #[test]
    fn dst_crossing_keeps_local_time_without_duplicates() {
        // Spec scenario: spring-forward 2006-04-02 02:00 in a document
        // VTIMEZONE; a DAILY 02:30 local rule keeps 02:30 wall clock,
        // shifting its UTC instant, with no duplicated occurrence.
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:America/New_York\r\n\
BEGIN:DAYLIGHT\r\n\
DTSTART:19870405T020000\r\n\
TZOFFSETFROM:-0500\r\n\
TZOFFSETTO:-0400\r\n\
RRULE:FREQ=YEARLY;BYMONTH=4;BYDAY=1SU\r\n\
END:DAYLIGHT\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19871025T020000\r\n\
TZOFFSETFROM:-0400\r\n\
TZOFFSETTO:-0500\r\n\
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:dst@example.com\r\n\
DTSTART;TZID=America/New_York:20060401T023000\r\n\
RRULE:FREQ=DAILY;COUNT=3\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let cal = parse(input).unwrap();
        let from = DateTime::utc(2006, 3, 31, 0, 0, 0);
        let to = DateTime::utc(2006, 4, 5, 0, 0, 0);
        let out = cal.evaluate(&from, &to).unwrap();
        let occs = &out[0].occurrences;
        assert_eq!(occs.len(), 3);

        // Wall clock stays 02:30 local on every day.
        assert!(occs.iter().all(|o| o.start.hour == 2 && o.start.minute == 30));
        // Apr 1 is EST (UTC-5): 07:30Z. Apr 2 onward is EDT (UTC-4): 06:30Z.
        assert_eq!(occs[0].start_utc.naive_utc().to_string(), "2006-04-01 07:30:00");
        assert_eq!(occs[1].start_utc.naive_utc().to_string(), "2006-04-02 06:30:00");
        assert_eq!(occs[2].start_utc.naive_utc().to_string(), "2006-04-03 06:30:00");
    }
}
