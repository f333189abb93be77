//! Loan rows in two schema generations.
//!
//! - Current: `trxId|bookId|bookTitle|borrower|borrowDate|dueDate|returnDate|status|fine`
//! - Legacy:  `trxId|bookId|bookTitle|borrower|borrowDate|returnDate|status`

use super::{
    ensure_plain, format_date, parse_date, parse_number, parse_optional_date, split_fields,
    CodecError, CodecResult, FIELD_DELIMITER,
};
use crate::model::loan::{due_date_for, Loan, LoanStatus};

/// Field count written by the current schema.
pub const LOAN_FIELD_COUNT: usize = 9;
/// Minimum field count of a legacy row.
pub const LEGACY_LOAN_FIELD_COUNT: usize = 7;

/// Loan row layout, detected from the field count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanSchema {
    /// Nine or more fields; carries due date and fine.
    Current,
    /// Seven or eight fields; due date is derived, fine is zero.
    Legacy,
}

impl LoanSchema {
    /// Returns `None` when the row is too short for either layout.
    pub fn detect(field_count: usize) -> Option<Self> {
        if field_count >= LOAN_FIELD_COUNT {
            Some(Self::Current)
        } else if field_count >= LEGACY_LOAN_FIELD_COUNT {
            Some(Self::Legacy)
        } else {
            None
        }
    }
}

/// Decodes one loans-file line in either schema.
///
/// Returns `Ok(None)` for blank lines and rows too short for either schema.
pub fn decode_loan_line(line: &str) -> CodecResult<Option<Loan>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let fields = split_fields(line);
    match LoanSchema::detect(fields.len()) {
        Some(LoanSchema::Current) => decode_current(&fields).map(Some),
        Some(LoanSchema::Legacy) => decode_legacy(&fields).map(Some),
        None => Ok(None),
    }
}

fn decode_current(fields: &[&str]) -> CodecResult<Loan> {
    let fine_text = fields[8].trim();
    let fine = if fine_text.is_empty() {
        0
    } else {
        parse_number(fine_text, "fine")?
    };

    Ok(Loan {
        trx_id: fields[0].to_string(),
        book_id: fields[1].to_string(),
        book_title: fields[2].to_string(),
        borrower: fields[3].to_string(),
        borrow_date: parse_date(fields[4], "borrow_date")?,
        due_date: parse_date(fields[5], "due_date")?,
        return_date: parse_optional_date(fields[6], "return_date")?,
        status: parse_status(fields[7])?,
        fine,
    })
}

fn decode_legacy(fields: &[&str]) -> CodecResult<Loan> {
    let borrow_date = parse_date(fields[4], "borrow_date")?;

    Ok(Loan {
        trx_id: fields[0].to_string(),
        book_id: fields[1].to_string(),
        book_title: fields[2].to_string(),
        borrower: fields[3].to_string(),
        borrow_date,
        due_date: due_date_for(borrow_date),
        return_date: parse_optional_date(fields[5], "return_date")?,
        status: parse_status(fields[6])?,
        fine: 0,
    })
}

fn parse_status(value: &str) -> CodecResult<LoanStatus> {
    LoanStatus::parse(value).ok_or_else(|| CodecError::InvalidStatus(value.to_string()))
}

/// Encodes one loan in the current schema (without line terminator).
pub fn encode_loan_line(loan: &Loan) -> CodecResult<String> {
    let delimiter = FIELD_DELIMITER.to_string();
    let fields = [
        ensure_plain(&loan.trx_id, "trx_id")?.to_string(),
        ensure_plain(&loan.book_id, "book_id")?.to_string(),
        ensure_plain(&loan.book_title, "book_title")?.to_string(),
        ensure_plain(&loan.borrower, "borrower")?.to_string(),
        format_date(loan.borrow_date),
        format_date(loan.due_date),
        loan.return_date.map(format_date).unwrap_or_default(),
        loan.status.as_str().to_string(),
        loan.fine.to_string(),
    ];
    Ok(fields.join(&delimiter))
}
