//! Parsing layers (RFC 5545 §3.1-3.4).
//!
//! - `lexer`: unfolding and content-line tokenization
//! - `schema`: the (property name, VALUE parameter) → value-type table
//! - `values`: parsers for each value type
//! - `parser`: document parsing into a [`crate::core::Calendar`]

mod error;
mod lexer;
mod parser;
mod schema;
mod values;

pub use error::{LexError, ParseError, ParseResult, ValueError, ValueErrorKind};
pub use lexer::{split_lines, tokenize_line};
pub use parser::{ParseMode, ParseOptions, parse, parse_bytes, parse_strict, parse_with};
pub use schema::ValueType;
pub use values::{
    parse_binary, parse_boolean, parse_date, parse_datetime, parse_datetime_list, parse_duration,
    parse_float, parse_geo, parse_integer, parse_period, parse_period_list, parse_recur,
    parse_request_status, parse_text_list, parse_time, parse_utc_offset, unescape_text,
};
