//! Error types for the parsing layers.
//!
//! The three layers fail differently and the caller needs to tell them
//! apart: [`LexError`] is a physical-format violation, [`ParseError`] a
//! structural one, [`ValueError`] a single property whose value did not
//! match its schema type. Lex and parse errors are fatal to the whole
//! document; value errors are recoverable in lenient mode.

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Physical-format violation in the byte stream. Fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// The input violates the content-line grammar at a specific spot.
    #[error("malformed input at line {line}, column {column}: {reason}")]
    Malformed {
        /// 1-based physical line number.
        line: usize,
        /// 1-based column number.
        column: usize,
        /// What was wrong.
        reason: String,
    },
}

impl LexError {
    /// Creates a malformed-input error.
    #[must_use]
    pub fn malformed(line: usize, column: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            column,
            reason: reason.into(),
        }
    }
}

/// Structural violation in the component grammar. Fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A content line could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// BEGIN/END names do not match.
    #[error("unbalanced component at line {line}: expected END:{expected}, found {found}")]
    Unbalanced {
        /// The component awaiting its END line.
        expected: String,
        /// What was found instead.
        found: String,
        /// 1-based line number of the offending line.
        line: usize,
    },

    /// The stream did not start with BEGIN:VCALENDAR.
    #[error("expected BEGIN:VCALENDAR at line {line}, found {found}")]
    NotACalendar {
        /// What the first content line was.
        found: String,
        /// 1-based line number.
        line: usize,
    },

    /// The stream ended inside an open component.
    #[error("truncated stream: missing END:{component}")]
    Truncated {
        /// The component left open.
        component: String,
    },

    /// A content line has no colon separating name from value.
    #[error("missing ':' on line {line}")]
    MissingColon {
        /// 1-based line number.
        line: usize,
    },

    /// The input contains no content lines at all.
    #[error("empty input")]
    Empty,

    /// A property value failed its schema type (strict mode only).
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A recurrence rule failed eager validation (strict mode only).
    #[error("invalid recurrence rule on line {line}: {source}")]
    Recur {
        /// 1-based line number of the RRULE/EXRULE property.
        line: usize,
        /// The underlying rule violation.
        source: crate::core::RecurError,
    },
}

/// A single property value that failed variant parsing.
///
/// Carries enough source location to point at the offending input. In
/// lenient mode these are recorded on the calendar and parsing continues
/// with the raw value preserved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} in {property} on line {line}")]
pub struct ValueError {
    /// What failed.
    pub kind: ValueErrorKind,
    /// The property name the value belonged to.
    pub property: String,
    /// 1-based line number of the content line.
    pub line: usize,
}

impl ValueError {
    /// Creates a value error for a property at a source line.
    #[must_use]
    pub fn new(kind: ValueErrorKind, property: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            property: property.into(),
            line,
        }
    }
}

/// Kinds of value parsing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueErrorKind {
    /// Not a valid DATE.
    #[error("invalid date")]
    InvalidDate,
    /// Not a valid TIME.
    #[error("invalid time")]
    InvalidTime,
    /// Not a valid DATE-TIME.
    #[error("invalid date-time")]
    InvalidDateTime,
    /// Not a valid DURATION.
    #[error("invalid duration")]
    InvalidDuration,
    /// Not a valid PERIOD.
    #[error("invalid period")]
    InvalidPeriod,
    /// Not a valid INTEGER.
    #[error("invalid integer")]
    InvalidInteger,
    /// Not a valid FLOAT.
    #[error("invalid float")]
    InvalidFloat,
    /// Not TRUE or FALSE.
    #[error("invalid boolean")]
    InvalidBoolean,
    /// Not a valid UTC-OFFSET.
    #[error("invalid UTC offset")]
    InvalidUtcOffset,
    /// Not a valid RECUR rule string.
    #[error("invalid recurrence rule")]
    InvalidRecur,
    /// Not a valid GEO pair.
    #[error("invalid geographic position")]
    InvalidGeo,
    /// Not a valid REQUEST-STATUS.
    #[error("invalid request status")]
    InvalidRequestStatus,
    /// Not valid base64 BINARY data.
    #[error("invalid binary data")]
    InvalidBinary,
    /// A 'Z' UTC designator together with a TZID parameter.
    #[error("conflicting zone: UTC designator with TZID parameter")]
    ConflictingZone,
}
