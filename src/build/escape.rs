//! Text escaping for serialization (RFC 5545 §3.3.11, RFC 6868).
//!
//! Escaping is exposed as `Display` adapters so property lines and
//! parameter values stream straight into the output; the
//! `String`-returning helpers wrap them for callers that want owned
//! text.

use std::fmt::{self, Write};

/// A TEXT value printed with RFC 5545 §3.3.11 escapes applied.
pub struct EscapedText<'a>(pub &'a str);

impl fmt::Display for EscapedText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                ',' => f.write_str("\\,")?,
                ';' => f.write_str("\\;")?,
                '\n' => f.write_str("\\n")?,
                // CRLF collapses into the \n already emitted for LF.
                '\r' => {}
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// A parameter value printed in its wire encoding (RFC 6868).
///
/// Caret sequences carry the characters the wire format cannot hold in
/// a parameter (`^`, newline, DQUOTE); the DQUOTE delimiters themselves
/// are added only when the value contains a separator that would
/// otherwise end it early.
pub struct EncodedParamValue<'a>(pub &'a str);

impl fmt::Display for EncodedParamValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimited = self.0.chars().any(|c| matches!(c, ':' | ';' | ','));
        if delimited {
            f.write_char('"')?;
        }
        for c in self.0.chars() {
            match c {
                '^' => f.write_str("^^")?,
                '\n' => f.write_str("^n")?,
                '"' => f.write_str("^'")?,
                _ => f.write_char(c)?,
            }
        }
        if delimited {
            f.write_char('"')?;
        }
        Ok(())
    }
}

/// Escapes a TEXT value into an owned string.
#[must_use]
pub fn escape_text(s: &str) -> String {
    EscapedText(s).to_string()
}

/// Encodes a parameter value into an owned string.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    EncodedParamValue(s).to_string()
}
