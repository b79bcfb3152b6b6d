//! Core data model for iCalendar content (RFC 5545).
//!
//! These types are designed for:
//! - Round-trip fidelity: original name casing, raw values, and unknown
//!   properties are preserved
//! - Type safety: one tagged union of value variants with an auditable
//!   schema instead of runtime type discovery
//! - Exclusive ownership: the calendar owns its components, components
//!   own their properties, properties own their values

mod component;
mod datetime;
mod duration;
mod parameter;
mod period;
mod property;
mod recur;
mod value;

pub use component::{Calendar, Component, ComponentKind};
pub use datetime::{DateTime, Time, UtcOffset, ZoneRef, days_in_month};
pub use duration::Duration;
pub use parameter::{Parameter, names as parameter_names};
pub use period::Period;
pub use property::{ContentLine, Property};
pub use recur::{Frequency, Recur, RecurError, Weekday, WeekdayNum};
pub use value::{Geo, RequestStatus, Value};
