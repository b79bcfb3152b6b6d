//! Serializer back to the wire format (RFC 5545).
//!
//! Mirrors the parse schema: typed text is re-escaped, every other value
//! uses its preserved raw form, and properties, parameters, and child
//! components are emitted in a canonical order so output is
//! deterministic.

use super::escape::escape_text;
use super::fold::fold_line;
use crate::core::{Calendar, Component, ComponentKind, Parameter, Property, Value};

/// Serializes a calendar to iCalendar text.
#[must_use]
pub fn serialize(calendar: &Calendar) -> String {
    serialize_component(&calendar.root)
}

/// Serializes a component, recursively.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = String::new();

    out.push_str(&fold_line(&format!("BEGIN:{}", component.name)));

    for prop in canonical_property_order(&component.properties, component.kind) {
        out.push_str(&serialize_property(prop));
    }

    for child in canonical_component_order(&component.children) {
        out.push_str(&serialize_component(child));
    }

    out.push_str(&fold_line(&format!("END:{}", component.name)));

    out
}

/// Serializes one property as a folded content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();

    for param in canonical_param_order(&prop.params) {
        line.push(';');
        line.push_str(&serialize_parameter(param));
    }

    line.push(':');
    line.push_str(&serialize_value(&prop.value, &prop.raw_value));

    fold_line(&line)
}

/// Serializes one parameter. Rendering lives on [`Parameter`]'s
/// `Display`, which applies the RFC 6868 wire encoding.
#[must_use]
pub fn serialize_parameter(param: &Parameter) -> String {
    param.to_string()
}

/// Renders a value. Text is re-escaped from the typed form; everything
/// else keeps its raw wire form, which the value parsers round-trip.
fn serialize_value(value: &Value, raw_value: &str) -> String {
    match value {
        Value::Text(s) => escape_text(s),
        Value::TextList(list) => list
            .iter()
            .map(|s| escape_text(s))
            .collect::<Vec<_>>()
            .join(","),
        _ => raw_value.to_string(),
    }
}

/// Property emission order per component kind, for deterministic output.
fn canonical_property_order(props: &[Property], kind: Option<ComponentKind>) -> Vec<&Property> {
    let order: &[&str] = match kind {
        Some(ComponentKind::Calendar) => &["VERSION", "PRODID", "CALSCALE", "METHOD"],
        Some(ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal) => &[
            "UID",
            "DTSTAMP",
            "DTSTART",
            "DTEND",
            "DUE",
            "DURATION",
            "RRULE",
            "EXRULE",
            "RDATE",
            "EXDATE",
            "RECURRENCE-ID",
            "SUMMARY",
            "DESCRIPTION",
            "LOCATION",
            "GEO",
            "CLASS",
            "STATUS",
            "PRIORITY",
            "PERCENT-COMPLETE",
            "COMPLETED",
            "TRANSP",
            "ORGANIZER",
            "ATTENDEE",
            "CATEGORIES",
            "RESOURCES",
            "COMMENT",
            "CONTACT",
            "RELATED-TO",
            "REQUEST-STATUS",
            "URL",
            "ATTACH",
            "CREATED",
            "LAST-MODIFIED",
            "SEQUENCE",
        ],
        Some(ComponentKind::Timezone) => &["TZID", "LAST-MODIFIED", "TZURL"],
        Some(ComponentKind::Standard | ComponentKind::Daylight) => &[
            "DTSTART",
            "TZOFFSETFROM",
            "TZOFFSETTO",
            "RRULE",
            "RDATE",
            "TZNAME",
            "COMMENT",
        ],
        Some(ComponentKind::Alarm) => &[
            "ACTION",
            "TRIGGER",
            "DESCRIPTION",
            "SUMMARY",
            "DURATION",
            "REPEAT",
            "ATTACH",
            "ATTENDEE",
        ],
        Some(ComponentKind::FreeBusy) => &[
            "UID",
            "DTSTAMP",
            "DTSTART",
            "DTEND",
            "ORGANIZER",
            "ATTENDEE",
            "FREEBUSY",
            "URL",
            "COMMENT",
        ],
        _ => &[],
    };

    let mut ordered: Vec<&Property> = Vec::with_capacity(props.len());
    for &name in order {
        for prop in props {
            if prop.is(name) {
                ordered.push(prop);
            }
        }
    }
    for prop in props {
        if !order.iter().any(|&n| prop.is(n)) {
            ordered.push(prop);
        }
    }
    ordered
}

/// Parameter emission order.
fn canonical_param_order(params: &[Parameter]) -> Vec<&Parameter> {
    const ORDER: [&str; 13] = [
        "VALUE", "TZID", "ENCODING", "FMTTYPE", "LANGUAGE", "ALTREP", "CN", "DIR", "ROLE",
        "PARTSTAT", "RSVP", "SENT-BY", "RELATED",
    ];

    let mut ordered: Vec<&Parameter> = Vec::with_capacity(params.len());
    for name in ORDER {
        for param in params {
            if param.is(name) {
                ordered.push(param);
            }
        }
    }
    for param in params {
        if !ORDER.iter().any(|&n| param.is(n)) {
            ordered.push(param);
        }
    }
    ordered
}

/// Child component emission order: timezones first so TZID references
/// resolve on a streaming read, then schedulable components by UID.
fn canonical_component_order(children: &[Component]) -> Vec<&Component> {
    let mut ordered: Vec<&Component> = Vec::with_capacity(children.len());
    let rank = |c: &Component| match c.kind {
        Some(ComponentKind::Timezone) => 0,
        Some(ComponentKind::Standard) => 1,
        Some(ComponentKind::Daylight) => 2,
        Some(ComponentKind::Event) => 3,
        Some(ComponentKind::Todo) => 4,
        Some(ComponentKind::Journal) => 5,
        Some(ComponentKind::FreeBusy) => 6,
        Some(ComponentKind::Alarm) => 7,
        _ => 8,
    };

    ordered.extend(children);
    ordered.sort_by(|a, b| {
        rank(a).cmp(&rank(b)).then_with(|| {
            let key = |c: &Component| {
                (
                    c.uid().unwrap_or("").to_string(),
                    c.property("RECURRENCE-ID")
                        .map(|p| p.raw_value.clone())
                        .unwrap_or_default(),
                )
            };
            key(a).cmp(&key(b))
        })
    });
    ordered
}
