//! koyomi: an RFC 5545 iCalendar core.
//!
//! Parses iCalendar byte streams into a typed calendar object model,
//! expands recurring components into concrete occurrences over a time
//! window, and serializes back to the wire format.
//!
//! - [`core`]: the data model (components, properties, typed values)
//! - [`parse`]: content-line lexing, the value-type schema, document
//!   parsing in lenient or strict mode
//! - [`expand`]: the recurrence engine and VTIMEZONE-backed zone
//!   resolution
//! - [`build`]: escaping, 75-octet folding, canonical serialization
//!
//! ## Example
//!
//! ```
//! use koyomi::core::DateTime;
//!
//! let input = "\
//! BEGIN:VCALENDAR\r\n\
//! VERSION:2.0\r\n\
//! PRODID:-//Example//Example//EN\r\n\
//! BEGIN:VEVENT\r\n\
//! UID:standup@example.com\r\n\
//! DTSTAMP:19970901T130000Z\r\n\
//! DTSTART:19970902T090000Z\r\n\
//! RRULE:FREQ=DAILY;COUNT=10\r\n\
//! SUMMARY:Morning standup\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n";
//!
//! let calendar = koyomi::parse(input)?;
//! let from = DateTime::utc(1997, 9, 1, 0, 0, 0);
//! let to = DateTime::utc(1997, 12, 31, 0, 0, 0);
//! let evaluated = calendar.evaluate(&from, &to)?;
//! assert_eq!(evaluated[0].occurrences.len(), 10);
//!
//! let wire = koyomi::serialize(&calendar);
//! assert!(wire.starts_with("BEGIN:VCALENDAR\r\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;

#[cfg(test)]
mod tests;

pub use build::serialize;
pub use core::{Calendar, Component, ComponentKind, DateTime, Parameter, Property, Value};
pub use expand::{ComponentOccurrences, Occurrence};
pub use parse::{ParseError, ParseMode, ParseOptions, parse, parse_strict, parse_with};
