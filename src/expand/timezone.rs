//! Zone resolution against the document's VTIMEZONE components
//! (RFC 5545 §3.6.5).
//!
//! Zone data travels in the calendar itself; no external tz database is
//! consulted. A host can inject one through [`TzResolver`] for TZIDs the
//! document does not declare. Observance transitions are generated with
//! the same recurrence engine that expands event rules, and resolved
//! offsets are cached per TZID.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime as ChronoDateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::recur::expand_rule;
use crate::core::{Calendar, Component, ComponentKind, DateTime, Recur, UtcOffset, ZoneRef};

/// Zone resolution failure. Never fatal: an unresolved TZID degrades to
/// floating arithmetic with a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// No VTIMEZONE in the calendar declares this TZID and no injected
    /// resolver knows it.
    #[error("unresolved TZID {tzid}")]
    Unresolved {
        /// The unknown timezone identifier.
        tzid: String,
    },

    /// A VTIMEZONE is missing its TZID property.
    #[error("VTIMEZONE missing TZID")]
    MissingTzid,

    /// A VTIMEZONE has no STANDARD or DAYLIGHT sub-component.
    #[error("VTIMEZONE {tzid} has no observances")]
    NoObservances {
        /// The declared timezone identifier.
        tzid: String,
    },

    /// An observance is missing a required property.
    #[error("{observance} in VTIMEZONE {tzid} missing {property}")]
    MissingProperty {
        /// The declared timezone identifier.
        tzid: String,
        /// STANDARD or DAYLIGHT.
        observance: &'static str,
        /// The absent property name.
        property: &'static str,
    },
}

/// Host-injected fallback for TZIDs not declared in the document.
pub trait TzResolver {
    /// Returns the UTC offset in effect at a local wall-clock reading in
    /// the named zone, or `None` when the zone is unknown.
    fn utc_offset(&self, tzid: &str, local: NaiveDateTime) -> Option<UtcOffset>;
}

/// One STANDARD or DAYLIGHT observance rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Observance {
    /// Whether this is standard or daylight time.
    pub kind: ObservanceKind,
    /// Offset in effect before this observance's transitions.
    pub offset_from: UtcOffset,
    /// Offset this observance switches to.
    pub offset_to: UtcOffset,
    /// First transition, in the zone's local time.
    pub dtstart: NaiveDateTime,
    /// Recurrence of the transition, if any.
    pub rule: Option<Recur>,
    /// Explicit additional transitions.
    pub rdates: Vec<NaiveDateTime>,
}

/// Observance flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservanceKind {
    /// Standard time.
    Standard,
    /// Daylight saving time.
    Daylight,
}

/// A parsed VTIMEZONE: the TZID plus its observances.
#[derive(Debug, Clone, PartialEq)]
pub struct TzDefinition {
    /// The declared timezone identifier.
    pub tzid: String,
    /// Observances in document order.
    pub observances: Vec<Observance>,
}

impl TzDefinition {
    /// Extracts a zone definition from a VTIMEZONE component.
    ///
    /// ## Errors
    ///
    /// Returns a [`ZoneError`] when TZID, observances, or a required
    /// observance property is missing.
    pub fn from_component(component: &Component) -> Result<Self, ZoneError> {
        let tzid = component
            .property("TZID")
            .and_then(crate::core::Property::as_text)
            .ok_or(ZoneError::MissingTzid)?
            .to_string();

        let mut observances = Vec::new();
        for child in &component.children {
            let kind = match child.kind {
                Some(ComponentKind::Standard) => ObservanceKind::Standard,
                Some(ComponentKind::Daylight) => ObservanceKind::Daylight,
                _ => continue,
            };
            observances.push(parse_observance(child, kind, &tzid)?);
        }

        if observances.is_empty() {
            return Err(ZoneError::NoObservances { tzid });
        }

        Ok(Self { tzid, observances })
    }

    /// Returns the offset in effect at a local wall-clock reading:
    /// the OFFSETTO of the most recent transition at or before it, or
    /// the earliest observance's OFFSETFROM before any transition.
    #[must_use]
    pub fn offset_at(&self, local: NaiveDateTime, transitions: &[Transition]) -> UtcOffset {
        let latest = transitions.iter().rev().find(|t| t.effective <= local);
        match latest {
            Some(t) => t.offset_to,
            None => self
                .observances
                .iter()
                .min_by_key(|o| o.dtstart)
                .map_or(UtcOffset::UTC, |o| o.offset_from),
        }
    }

    /// Expands every observance's transitions up to the end of
    /// `horizon_year`, sorted ascending. Uses the same engine that
    /// expands event recurrences.
    #[must_use]
    pub fn transitions_until(&self, horizon_year: i32) -> Vec<Transition> {
        let horizon = NaiveDate::from_ymd_opt(horizon_year, 12, 31)
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN);

        let mut transitions = Vec::new();
        for obs in &self.observances {
            transitions.push(Transition {
                effective: obs.dtstart,
                offset_to: obs.offset_to,
            });
            for rdate in &obs.rdates {
                transitions.push(Transition {
                    effective: *rdate,
                    offset_to: obs.offset_to,
                });
            }
            if let Some(rule) = &obs.rule {
                let until = rule.until.as_ref().and_then(DateTime::naive);
                if let Ok(instants) = expand_rule(rule, obs.dtstart, until, Some(horizon)) {
                    transitions.extend(instants.into_iter().map(|effective| Transition {
                        effective,
                        offset_to: obs.offset_to,
                    }));
                }
            }
        }
        transitions.sort_by_key(|t| t.effective);
        transitions.dedup();
        transitions
    }
}

/// A resolved zone transition: local effective instant and the offset it
/// switches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Local wall-clock instant the offset takes effect.
    pub effective: NaiveDateTime,
    /// Offset in effect from this transition on.
    pub offset_to: UtcOffset,
}

fn parse_observance(
    component: &Component,
    kind: ObservanceKind,
    tzid: &str,
) -> Result<Observance, ZoneError> {
    let observance = match kind {
        ObservanceKind::Standard => "STANDARD",
        ObservanceKind::Daylight => "DAYLIGHT",
    };
    let missing = |property: &'static str| ZoneError::MissingProperty {
        tzid: tzid.to_string(),
        observance,
        property,
    };

    let dtstart = component
        .dtstart()
        .and_then(DateTime::naive)
        .ok_or_else(|| missing("DTSTART"))?;

    let offset_from = component
        .property("TZOFFSETFROM")
        .and_then(|p| p.value.as_utc_offset())
        .ok_or_else(|| missing("TZOFFSETFROM"))?;

    let offset_to = component
        .property("TZOFFSETTO")
        .and_then(|p| p.value.as_utc_offset())
        .ok_or_else(|| missing("TZOFFSETTO"))?;

    let rule = component
        .property("RRULE")
        .and_then(crate::core::Property::as_recur)
        .cloned();

    let rdates = component
        .properties("RDATE")
        .iter()
        .flat_map(|p| p.value.datetimes())
        .filter_map(DateTime::naive)
        .collect();

    Ok(Observance {
        kind,
        offset_from,
        offset_to,
        dtstart,
        rule,
        rdates,
    })
}

/// Per-TZID zone state: the parsed definition plus the transition cache.
struct ZoneState {
    definition: TzDefinition,
    transitions: Vec<Transition>,
    horizon_year: i32,
}

/// Zone registry for one calendar.
///
/// Built from the calendar's VTIMEZONE set before expansion; offset
/// lookups lazily extend and cache each zone's transition table.
pub struct TzRegistry<'a> {
    zones: HashMap<String, ZoneState>,
    resolver: Option<&'a dyn TzResolver>,
    unresolved: HashSet<String>,
}

impl<'a> TzRegistry<'a> {
    /// Builds a registry from the calendar's VTIMEZONE components.
    /// Malformed definitions are logged and skipped.
    #[must_use]
    pub fn from_calendar(calendar: &Calendar) -> Self {
        Self::with_resolver(calendar, None)
    }

    /// As [`TzRegistry::from_calendar`], with a host-injected fallback
    /// resolver for TZIDs the document does not declare.
    #[must_use]
    pub fn with_resolver(calendar: &Calendar, resolver: Option<&'a dyn TzResolver>) -> Self {
        let mut zones = HashMap::new();
        for component in calendar.timezones() {
            match TzDefinition::from_component(component) {
                Ok(definition) => {
                    zones.insert(
                        definition.tzid.clone(),
                        ZoneState {
                            definition,
                            transitions: Vec::new(),
                            horizon_year: 0,
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed VTIMEZONE");
                }
            }
        }
        Self {
            zones,
            resolver,
            unresolved: HashSet::new(),
        }
    }

    /// TZIDs that were referenced but could not be resolved.
    #[must_use]
    pub fn unresolved_tzids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.unresolved.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the offset in effect at a local reading in `tzid`, or
    /// `None` when the zone is unknown to both the document and the
    /// injected resolver.
    pub fn offset_at(&mut self, tzid: &str, local: NaiveDateTime) -> Option<UtcOffset> {
        if let Some(state) = self.zones.get_mut(tzid) {
            let wanted = local.year() + 1;
            if state.transitions.is_empty() || state.horizon_year < wanted {
                state.transitions = state.definition.transitions_until(wanted);
                state.horizon_year = wanted;
            }
            return Some(state.definition.offset_at(local, &state.transitions));
        }
        if let Some(resolver) = self.resolver
            && let Some(offset) = resolver.utc_offset(tzid, local)
        {
            return Some(offset);
        }
        if self.unresolved.insert(tzid.to_string()) {
            tracing::warn!(tzid, "unresolved TZID, treating as floating");
        }
        None
    }

    /// Resolves a date-time to an absolute UTC instant.
    ///
    /// Floating values (and zoned values whose TZID cannot be resolved)
    /// are read as UTC wall clock, which keeps evaluation deterministic.
    /// Returns `None` for impossible calendar dates.
    pub fn instant(&mut self, dt: &DateTime) -> Option<ChronoDateTime<Utc>> {
        let naive = dt.naive()?;
        let utc_naive = match &dt.zone {
            ZoneRef::Utc | ZoneRef::Floating => naive,
            ZoneRef::Zoned { tzid } => match self.offset_at(&tzid.clone(), naive) {
                Some(offset) => naive - offset.as_chrono(),
                None => naive,
            },
        };
        Some(ChronoDateTime::from_naive_utc_and_offset(utc_naive, Utc))
    }

    /// Converts a UTC instant back to a wall-clock reading in `zone`.
    ///
    /// The first approximation uses the offset at the UTC reading, then
    /// refines with the offset at the approximated local reading.
    pub fn local_in_zone(&mut self, utc: ChronoDateTime<Utc>, zone: &ZoneRef) -> NaiveDateTime {
        let naive = utc.naive_utc();
        match zone {
            ZoneRef::Utc | ZoneRef::Floating => naive,
            ZoneRef::Zoned { tzid } => {
                let tzid = tzid.clone();
                match self.offset_at(&tzid, naive) {
                    Some(first) => {
                        let approx = naive + first.as_chrono();
                        let offset = self.offset_at(&tzid, approx).unwrap_or(first);
                        naive + offset.as_chrono()
                    }
                    None => naive,
                }
            }
        }
    }
}
