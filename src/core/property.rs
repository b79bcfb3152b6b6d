//! Content lines and typed properties (RFC 5545 §3.1, §3.8).

use super::{Parameter, Value, parameter::names};

/// A raw content line after unfolding, before value typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name in its original case.
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value (everything after the first unescaped ':').
    pub raw_value: String,
    /// Physical line number the logical line started on (1-based).
    pub line: usize,
}

impl ContentLine {
    /// Creates a bare content line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            raw_value: value.into(),
            line: 0,
        }
    }

    /// Returns the parameter with the given name (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.is(name))
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.param(name)?.value()
    }

    /// Returns the VALUE parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.param_value(names::VALUE)
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.param_value(names::TZID)
    }
}

/// A fully parsed property: name, parameter bag, typed value.
///
/// The raw value string is kept alongside the typed value so unknown and
/// failed-to-parse properties round-trip byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name in its original case.
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Typed value.
    pub value: Value,
    /// Raw value string as it appeared on the wire.
    pub raw_value: String,
    /// Source line of the content line this property came from.
    pub line: usize,
}

impl Property {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            params: Vec::new(),
            value: Value::Text(value.clone()),
            raw_value: value,
            line: 0,
        }
    }

    /// Creates a property with a date-time value.
    #[must_use]
    pub fn datetime(name: impl Into<String>, dt: super::DateTime) -> Self {
        let raw = dt.to_string();
        let mut params = Vec::new();
        if !dt.has_time {
            params.push(Parameter::new(names::VALUE, "DATE"));
        }
        if let Some(tzid) = dt.tzid() {
            params.push(Parameter::new(names::TZID, tzid));
        }
        Self {
            name: name.into(),
            params,
            value: Value::DateTime(dt),
            raw_value: raw,
            line: 0,
        }
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            value: Value::Integer(value),
            raw_value: value.to_string(),
            line: 0,
        }
    }

    /// Creates a property with a recurrence rule value.
    #[must_use]
    pub fn recur(name: impl Into<String>, rule: super::Recur) -> Self {
        let raw = rule.to_string();
        Self {
            name: name.into(),
            params: Vec::new(),
            value: Value::Recur(Box::new(rule)),
            raw_value: raw,
            line: 0,
        }
    }

    /// Returns whether this property is named `name` (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the parameter with the given name (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.is(name))
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.param(name)?.value()
    }

    /// Adds a parameter.
    pub fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// Returns the value as an integer if it is an integer value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        self.value.as_integer()
    }

    /// Returns the value as a date-time if it is one.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&super::DateTime> {
        self.value.as_datetime()
    }

    /// Returns the value as a duration if it is one.
    #[must_use]
    pub fn as_duration(&self) -> Option<&super::Duration> {
        self.value.as_duration()
    }

    /// Returns the value as a recurrence rule if it is one.
    #[must_use]
    pub fn as_recur(&self) -> Option<&super::Recur> {
        self.value.as_recur()
    }
}
