//! Line codec for the pipe-delimited data files.
//!
//! # Responsibility
//! - Map one text line to one `Book`/`Loan` and back.
//! - Detect the loan schema generation by field count and normalize both
//!   generations into one in-memory shape.
//!
//! # Invariants
//! - Decoding never panics; malformed fields become `CodecError`.
//! - Blank lines and rows with too few fields decode to `None` (skipped).
//! - Encoding refuses fields that would break the line structure; it does
//!   not rewrite them.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

mod book_line;
mod loan_line;

pub use book_line::{decode_book_line, encode_book_line, BOOK_FIELD_COUNT};
pub use loan_line::{
    decode_loan_line, encode_loan_line, LoanSchema, LEGACY_LOAN_FIELD_COUNT, LOAN_FIELD_COUNT,
};

/// Field separator shared by both files.
pub const FIELD_DELIMITER: char = '|';

/// Placeholder some older files use for "no date".
const EMPTY_DATE_MARKER: &str = "-";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type CodecResult<T> = Result<T, CodecError>;

/// Line-level encode/decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    InvalidNumber { field: &'static str, value: String },
    InvalidDate { field: &'static str, value: String },
    InvalidStatus(String),
    /// A text field holds the delimiter or a line break.
    UnsafeField { field: &'static str },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { field, value } => {
                write!(f, "invalid number `{value}` in field `{field}`")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "invalid date `{value}` in field `{field}`; expected YYYY-MM-DD")
            }
            Self::InvalidStatus(value) => {
                write!(f, "invalid loan status `{value}`; expected BORROWED|RETURNED")
            }
            Self::UnsafeField { field } => {
                write!(f, "field `{field}` contains a delimiter or line break")
            }
        }
    }
}

impl Error for CodecError {}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).collect()
}

fn parse_number<T: FromStr>(value: &str, field: &'static str) -> CodecResult<T> {
    value.parse::<T>().map_err(|_| CodecError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_date(value: &str, field: &'static str) -> CodecResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CodecError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

fn parse_optional_date(
    value: &str,
    field: &'static str,
) -> CodecResult<Option<chrono::NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == EMPTY_DATE_MARKER {
        return Ok(None);
    }
    parse_date(trimmed, field).map(Some)
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn ensure_plain<'a>(value: &'a str, field: &'static str) -> CodecResult<&'a str> {
    if value.contains([FIELD_DELIMITER, '\n', '\r']) {
        return Err(CodecError::UnsafeField { field });
    }
    Ok(value)
}
