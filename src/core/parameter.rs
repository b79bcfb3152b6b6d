//! iCalendar property parameters (RFC 5545 §3.2).

use std::fmt;

/// A single property parameter.
///
/// Parameters qualify a property value, as in
/// `DTSTART;TZID=America/New_York:19980119T020000`. Names are matched
/// case-insensitively but kept in their original spelling for round-trip
/// output. Most parameters carry one value; some (MEMBER, DELEGATED-TO)
/// carry a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name in its original case.
    pub name: String,
    /// Parameter values, unquoted.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the first (usually only) value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether this parameter is named `name` (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns whether any value equals `value` (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.values.is_empty() {
            return Ok(());
        }
        write!(f, "=")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            // Values travel caret-encoded: bare quoting cannot carry a
            // DQUOTE or newline (RFC 6868).
            write!(f, "{}", crate::build::EncodedParamValue(value))?;
        }
        Ok(())
    }
}

/// Parameter names known to the schema (RFC 5545 §3.2).
pub mod names {
    /// Alternate text representation.
    pub const ALTREP: &str = "ALTREP";
    /// Common name.
    pub const CN: &str = "CN";
    /// Directory entry reference.
    pub const DIR: &str = "DIR";
    /// Inline encoding (8BIT or BASE64).
    pub const ENCODING: &str = "ENCODING";
    /// Format type for ATTACH.
    pub const FMTTYPE: &str = "FMTTYPE";
    /// Language of a text value.
    pub const LANGUAGE: &str = "LANGUAGE";
    /// Participation status.
    pub const PARTSTAT: &str = "PARTSTAT";
    /// Alarm trigger relationship (START or END).
    pub const RELATED: &str = "RELATED";
    /// Participation role.
    pub const ROLE: &str = "ROLE";
    /// RSVP expectation.
    pub const RSVP: &str = "RSVP";
    /// Acting on behalf of.
    pub const SENT_BY: &str = "SENT-BY";
    /// Time zone identifier.
    pub const TZID: &str = "TZID";
    /// Value data type override.
    pub const VALUE: &str = "VALUE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_simple() {
        let param = Parameter::new("TZID", "America/New_York");
        assert_eq!(param.to_string(), "TZID=America/New_York");
    }

    #[test]
    fn display_quoted() {
        let param = Parameter::new("CN", "Doe; Jane");
        assert_eq!(param.to_string(), "CN=\"Doe; Jane\"");
    }

    #[test]
    fn display_multiple_values() {
        // cal-address values carry a ':' and so travel quoted.
        let param = Parameter::with_values(
            "MEMBER",
            vec![
                "mailto:a@example.com".to_string(),
                "mailto:b@example.com".to_string(),
            ],
        );
        assert_eq!(
            param.to_string(),
            "MEMBER=\"mailto:a@example.com\",\"mailto:b@example.com\""
        );
    }

    #[test]
    fn display_caret_encodes_dquote_and_newline() {
        let param = Parameter::new("X-NOTE", "line1\nline2");
        assert_eq!(param.to_string(), "X-NOTE=line1^nline2");

        let param = Parameter::new("CN", "Jane \"JD\" Doe");
        assert_eq!(param.to_string(), "CN=Jane ^'JD^' Doe");
    }

    #[test]
    fn case_preserved_but_matched_insensitively() {
        let param = Parameter::new("tzid", "Europe/London");
        assert_eq!(param.name, "tzid");
        assert!(param.is("TZID"));
    }

    #[test]
    fn has_value_case_insensitive() {
        let param = Parameter::new("PARTSTAT", "Accepted");
        assert!(param.has_value("ACCEPTED"));
        assert!(!param.has_value("DECLINED"));
    }
}
