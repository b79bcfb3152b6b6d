//! Recurrence expansion and zone resolution (RFC 5545 §3.3.10, §3.6.5).
//!
//! - `recur`: single-rule expansion in the DTSTART wall-clock domain
//! - `expander`: RRULE/RDATE/EXRULE/EXDATE composition over a window
//! - `timezone`: VTIMEZONE-backed zone resolution with per-TZID caching

mod expander;
mod recur;
mod timezone;

pub use expander::{ComponentOccurrences, Occurrence, RecurrenceSet};
pub use recur::expand_rule;
pub use timezone::{
    Observance, ObservanceKind, Transition, TzDefinition, TzRegistry, TzResolver, ZoneError,
};
