//! Content-line lexer (RFC 5545 §3.1).
//!
//! Rebuilds logical lines from the folded wire format and tokenizes each
//! into name, parameters, and raw value. Escape expansion for TEXT values
//! happens later, when the value is interpreted against the schema.

use super::error::{LexError, ParseError, ParseResult};
use crate::core::{ContentLine, Parameter};

/// Splits input into logical content lines, unfolding continuations.
///
/// A CRLF (or, tolerated, a bare LF) immediately followed by a single
/// space or horizontal tab joins the physical lines; the line break and
/// the one whitespace byte are consumed. Folding happens at octet
/// positions and may split a UTF-8 sequence across physical lines, so
/// lines are reassembled at the byte level and decoded only afterwards.
/// A leading BOM is stripped. Blank lines are skipped.
///
/// ## Errors
///
/// Returns [`LexError::Malformed`] on a CR without LF or when an
/// unfolded line is not valid UTF-8.
pub fn split_lines(input: &[u8]) -> Result<Vec<(usize, String)>, LexError> {
    let bytes = input.strip_prefix(b"\xef\xbb\xbf".as_slice()).unwrap_or(input);
    let len = bytes.len();

    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut buf_start_line = 1usize;
    let mut line_no = 1usize;
    let mut col = 1usize;
    let mut i = 0usize;

    let mut flush = |buf: &mut Vec<u8>, start: usize| -> Result<(), LexError> {
        if buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8(std::mem::take(buf))
            .map_err(|_| LexError::malformed(start, 1, "invalid UTF-8 in content line"))?;
        lines.push((start, text));
        Ok(())
    };

    while i < len {
        match bytes[i] {
            b'\r' => {
                if i + 1 < len && bytes[i + 1] == b'\n' {
                    if i + 2 < len && (bytes[i + 2] == b' ' || bytes[i + 2] == b'\t') {
                        // Fold: drop CRLF and the single whitespace byte.
                        i += 3;
                    } else {
                        flush(&mut buf, buf_start_line)?;
                        i += 2;
                        buf_start_line = line_no + 1;
                    }
                    line_no += 1;
                    col = 1;
                } else {
                    return Err(LexError::malformed(line_no, col, "CR without LF"));
                }
            }
            b'\n' => {
                // Bare LF tolerated as a line terminator.
                if i + 1 < len && (bytes[i + 1] == b' ' || bytes[i + 1] == b'\t') {
                    i += 2;
                } else {
                    flush(&mut buf, buf_start_line)?;
                    i += 1;
                    buf_start_line = line_no + 1;
                }
                line_no += 1;
                col = 1;
            }
            b => {
                buf.push(b);
                i += 1;
                col += 1;
            }
        }
    }
    flush(&mut buf, buf_start_line)?;

    Ok(lines)
}

/// Tokenizes one logical line: `name *(";" param "=" value) ":" value`.
///
/// Names keep their original case; matching elsewhere is
/// case-insensitive. The value is everything after the first `:` outside
/// a quoted string, taken verbatim.
///
/// ## Errors
///
/// [`LexError::Malformed`] on unexpected control characters or an
/// unterminated quoted string; [`ParseError::MissingColon`] when the
/// line has no value separator.
pub fn tokenize_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut chars = line.char_indices().peekable();

    // Property name runs to the first ';' or ':'.
    let mut name_end = line.len();
    let mut has_params = false;
    let mut found_colon = false;
    while let Some(&(i, c)) = chars.peek() {
        if c == ';' || c == ':' {
            name_end = i;
            has_params = c == ';';
            found_colon = c == ':';
            chars.next();
            break;
        }
        if !is_name_char(c) {
            return Err(LexError::malformed(
                line_num,
                i + 1,
                format!("unexpected character {c:?} in property name"),
            )
            .into());
        }
        chars.next();
    }

    if name_end == 0 || name_end == line.len() {
        return Err(ParseError::MissingColon { line: line_num });
    }
    let name = &line[..name_end];

    let mut params = Vec::new();
    if has_params {
        loop {
            let (param, next_is_colon) = tokenize_parameter(&mut chars, line, line_num)?;
            params.push(param);
            if next_is_colon {
                found_colon = true;
                break;
            }
        }
    }

    if !found_colon {
        return Err(ParseError::MissingColon { line: line_num });
    }

    // Value is the remainder of the line, verbatim.
    let value_start = chars.peek().map_or(line.len(), |&(i, _)| i);
    let raw_value = line[value_start..].to_string();

    Ok(ContentLine {
        name: name.to_string(),
        params,
        raw_value,
        line: line_num,
    })
}

/// Tokenizes one `name "=" value *("," value)` parameter.
///
/// Returns the parameter and whether it was terminated by ':' (end of
/// the parameter section) rather than ';'.
fn tokenize_parameter(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<(Parameter, bool)> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);

    let mut name_end = start;
    loop {
        match chars.peek() {
            Some(&(i, '=')) => {
                name_end = i;
                chars.next();
                break;
            }
            Some(&(i, c)) if !is_name_char(c) => {
                return Err(LexError::malformed(
                    line_num,
                    i + 1,
                    format!("unexpected character {c:?} in parameter name"),
                )
                .into());
            }
            Some(_) => {
                chars.next();
            }
            None => return Err(ParseError::MissingColon { line: line_num }),
        }
    }

    if name_end == start {
        return Err(LexError::malformed(line_num, start + 1, "empty parameter name").into());
    }
    let name = line[start..name_end].to_string();

    let mut values = Vec::new();
    loop {
        values.push(tokenize_param_value(chars, line, line_num)?);

        match chars.next() {
            Some((_, ',')) => {}
            Some((_, ';')) => return Ok((Parameter::with_values(name, values), false)),
            Some((_, ':')) => return Ok((Parameter::with_values(name, values), true)),
            Some((i, c)) => {
                return Err(LexError::malformed(
                    line_num,
                    i + 1,
                    format!("unexpected character {c:?} after parameter value"),
                )
                .into());
            }
            None => return Err(ParseError::MissingColon { line: line_num }),
        }
    }
}

/// Tokenizes a single parameter value, bare or quoted.
///
/// A quoted value admits any character except `"`, CR, LF, and other
/// control characters; RFC 6868 caret sequences are decoded. A bare
/// value runs to the next `,`, `;`, or `:`.
fn tokenize_param_value(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<String> {
    let Some(&(start, first)) = chars.peek() else {
        return Err(ParseError::MissingColon { line: line_num });
    };

    if first == '"' {
        chars.next();
        let mut value = String::new();
        loop {
            match chars.next() {
                Some((_, '"')) => return Ok(value),
                Some((i, c)) if is_ctl(c) => {
                    return Err(LexError::malformed(
                        line_num,
                        i + 1,
                        "control character in quoted string",
                    )
                    .into());
                }
                Some((_, '^')) => push_caret_decoded(chars, &mut value),
                Some((_, c)) => value.push(c),
                None => {
                    return Err(LexError::malformed(
                        line_num,
                        start + 1,
                        "unterminated quoted string",
                    )
                    .into());
                }
            }
        }
    } else {
        let mut value = String::new();
        while let Some(&(i, c)) = chars.peek() {
            if c == ',' || c == ';' || c == ':' {
                break;
            }
            if is_ctl(c) {
                return Err(LexError::malformed(
                    line_num,
                    i + 1,
                    "control character in parameter value",
                )
                .into());
            }
            chars.next();
            if c == '^' {
                push_caret_decoded(chars, &mut value);
            } else {
                value.push(c);
            }
        }
        Ok(value)
    }
}

/// Decodes one RFC 6868 caret sequence, the leading '^' already
/// consumed. Caret encoding applies to quoted and bare values alike.
fn push_caret_decoded(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    value: &mut String,
) {
    match chars.peek() {
        Some(&(_, '^')) => {
            value.push('^');
            chars.next();
        }
        Some(&(_, 'n')) => {
            value.push('\n');
            chars.next();
        }
        Some(&(_, '\'')) => {
            value.push('"');
            chars.next();
        }
        _ => value.push('^'),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_ctl(c: char) -> bool {
    (c.is_control() && c != '\t') || c == '\u{7f}'
}
