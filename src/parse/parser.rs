//! Document parser (RFC 5545 §3.4): content lines to a typed calendar.

use super::error::{ParseError, ParseResult, ValueError};
use super::lexer::{split_lines, tokenize_line};
use super::schema::ValueType;
use super::values::{
    parse_binary, parse_boolean, parse_date, parse_datetime, parse_datetime_list, parse_duration,
    parse_float, parse_geo, parse_integer, parse_period, parse_period_list, parse_recur,
    parse_request_status, parse_text_list, parse_time, parse_utc_offset, unescape_text,
};
use crate::core::{Calendar, Component, ComponentKind, ContentLine, Property, Value};

/// How value-level failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Record [`ValueError`]s as diagnostics, keep the raw value, and
    /// continue. Recurrence rules are validated at evaluation time.
    #[default]
    Lenient,
    /// Fail the parse on the first value error and validate recurrence
    /// rules eagerly.
    Strict,
}

/// Options accepted at the parse entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Lenient or strict handling of value errors.
    pub mode: ParseMode,
}

/// Parses an iCalendar document leniently.
///
/// Value errors are recorded on the returned calendar's `diagnostics`
/// and the affected properties keep their raw value.
///
/// ## Errors
///
/// Returns an error if the input violates the physical format or the
/// component grammar.
pub fn parse(input: &str) -> ParseResult<Calendar> {
    parse_with(input, ParseOptions::default())
}

/// Parses an iCalendar document, failing on the first value error.
///
/// ## Errors
///
/// As [`parse`], plus [`ParseError::Value`] and [`ParseError::Recur`]
/// for property values that fail their schema type.
pub fn parse_strict(input: &str) -> ParseResult<Calendar> {
    parse_with(
        input,
        ParseOptions {
            mode: ParseMode::Strict,
        },
    )
}

/// Parses an iCalendar document with explicit options.
///
/// ## Errors
///
/// Returns an error if the input violates the physical format or the
/// component grammar; in strict mode also on the first value error.
pub fn parse_with(input: &str, options: ParseOptions) -> ParseResult<Calendar> {
    parse_bytes(input.as_bytes(), options)
}

/// Parses an iCalendar document from a byte buffer.
///
/// Unfolding happens before UTF-8 decoding, so documents folded in the
/// middle of a multi-byte sequence parse correctly.
///
/// ## Errors
///
/// As [`parse_with`]; a logical line that is not valid UTF-8 after
/// unfolding is a lex error.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_bytes(input: &[u8], options: ParseOptions) -> ParseResult<Calendar> {
    tracing::debug!("parsing iCalendar document");

    let lines = split_lines(input)?;
    if lines.is_empty() {
        return Err(ParseError::Empty);
    }
    tracing::trace!(count = lines.len(), "unfolded content lines");

    let content_lines: Vec<ContentLine> = lines
        .into_iter()
        .map(|(line_num, text)| tokenize_line(&text, line_num))
        .collect::<ParseResult<_>>()?;

    let mut diagnostics = Vec::new();
    let mut iter = content_lines.into_iter();

    let Some(begin) = iter.next() else {
        return Err(ParseError::Empty);
    };
    if !begin.name.eq_ignore_ascii_case("BEGIN")
        || !begin.raw_value.trim().eq_ignore_ascii_case("VCALENDAR")
    {
        return Err(ParseError::NotACalendar {
            found: format!("{}:{}", begin.name, begin.raw_value),
            line: begin.line,
        });
    }

    let root = parse_component(
        &mut iter,
        begin.raw_value.trim().to_string(),
        options,
        &mut diagnostics,
    )?;

    if let Some(extra) = iter.next() {
        return Err(ParseError::Unbalanced {
            expected: "nothing after END:VCALENDAR".to_string(),
            found: format!("{}:{}", extra.name, extra.raw_value),
            line: extra.line,
        });
    }

    tracing::debug!(
        components = root.children.len(),
        diagnostics = diagnostics.len(),
        "iCalendar document parsed"
    );

    Ok(Calendar { root, diagnostics })
}

/// Parses the body of a component whose BEGIN line was consumed.
fn parse_component(
    iter: &mut impl Iterator<Item = ContentLine>,
    name: String,
    options: ParseOptions,
    diagnostics: &mut Vec<ValueError>,
) -> ParseResult<Component> {
    let mut component = Component::named(name);

    loop {
        let Some(cl) = iter.next() else {
            return Err(ParseError::Truncated {
                component: component.name.clone(),
            });
        };

        if cl.name.eq_ignore_ascii_case("BEGIN") {
            let child_name = cl.raw_value.trim().to_string();
            let child = parse_component(iter, child_name, options, diagnostics)?;
            component.add_child(child);
        } else if cl.name.eq_ignore_ascii_case("END") {
            let end_name = cl.raw_value.trim();
            if !end_name.eq_ignore_ascii_case(&component.name) {
                return Err(ParseError::Unbalanced {
                    expected: component.name.clone(),
                    found: format!("END:{end_name}"),
                    line: cl.line,
                });
            }
            return Ok(component);
        } else {
            let property = parse_property(cl, options, diagnostics)?;
            component.add_property(property);
        }
    }
}

/// Resolves a content line against the schema and parses its value.
fn parse_property(
    cl: ContentLine,
    options: ParseOptions,
    diagnostics: &mut Vec<ValueError>,
) -> ParseResult<Property> {
    let value_type = ValueType::resolve(&cl);

    let value = match parse_value(&cl, value_type) {
        Ok(value) => value,
        Err(err) => match options.mode {
            ParseMode::Strict => return Err(err.into()),
            ParseMode::Lenient => {
                tracing::debug!(property = %cl.name, line = cl.line, error = %err, "value error recorded");
                diagnostics.push(err);
                Value::Unknown(cl.raw_value.clone())
            }
        },
    };

    if options.mode == ParseMode::Strict
        && let Value::Recur(rule) = &value
        && let Err(source) = rule.validate()
    {
        return Err(ParseError::Recur {
            line: cl.line,
            source,
        });
    }

    Ok(Property {
        name: cl.name,
        params: cl.params,
        value,
        raw_value: cl.raw_value,
        line: cl.line,
    })
}

/// Invokes the variant parser selected by the schema.
fn parse_value(cl: &ContentLine, value_type: ValueType) -> Result<Value, ValueError> {
    let raw = cl.raw_value.as_str();
    let prop = cl.name.as_str();
    let line = cl.line;
    let tzid = cl.tzid();

    Ok(match value_type {
        ValueType::Text => Value::Text(unescape_text(raw)),
        ValueType::TextList => Value::TextList(parse_text_list(raw)),
        ValueType::DateTime => {
            if raw.contains(',') {
                Value::DateTimeList(parse_datetime_list(raw, tzid, prop, line)?)
            } else {
                Value::DateTime(parse_datetime(raw, tzid, prop, line)?)
            }
        }
        ValueType::Date => {
            if raw.contains(',') {
                Value::DateTimeList(parse_datetime_list(raw, tzid, prop, line)?)
            } else {
                Value::DateTime(parse_date(raw, prop, line)?)
            }
        }
        ValueType::Duration => Value::Duration(parse_duration(raw, prop, line)?),
        ValueType::Period => {
            if raw.contains(',') {
                Value::PeriodList(parse_period_list(raw, tzid, prop, line)?)
            } else {
                Value::Period(parse_period(raw, tzid, prop, line)?)
            }
        }
        ValueType::Recur => Value::Recur(Box::new(parse_recur(raw, prop, line)?)),
        ValueType::Integer => Value::Integer(parse_integer(raw, prop, line)?),
        ValueType::Float => Value::Float(parse_float(raw, prop, line)?),
        ValueType::Boolean => Value::Boolean(parse_boolean(raw, prop, line)?),
        ValueType::UtcOffset => Value::UtcOffset(parse_utc_offset(raw, prop, line)?),
        ValueType::Uri => Value::Uri(raw.to_string()),
        ValueType::CalAddress => Value::CalAddress(raw.to_string()),
        ValueType::Geo => Value::Geo(parse_geo(raw, prop, line)?),
        ValueType::RequestStatus => Value::RequestStatus(parse_request_status(raw, prop, line)?),
        ValueType::Binary => Value::Binary(parse_binary(raw, prop, line)?),
        ValueType::Time => Value::Time(parse_time(raw, prop, line)?),
        ValueType::Unknown => Value::Unknown(raw.to_string()),
    })
}
