//! Loan transaction record and its two-state lifecycle.
//!
//! # Invariants
//! - `due_date = borrow_date + LOAN_DAYS`, fixed at creation.
//! - `return_date` is `None` exactly while the loan is `Borrowed`.
//! - `Borrowed -> Returned` is the only transition and it is terminal.
//! - `book_title` is a copy taken at borrow time, never refreshed.

use crate::model::book::Book;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lending period in days.
pub const LOAN_DAYS: u64 = 7;

/// Loan lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// Copy is out with the borrower.
    Borrowed,
    /// Copy came back; fine is final.
    Returned,
}

impl LoanStatus {
    /// Storage/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Borrowed => "BORROWED",
            Self::Returned => "RETURNED",
        }
    }

    /// Parses a stored label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("BORROWED") {
            Some(Self::Borrowed)
        } else if value.eq_ignore_ascii_case("RETURNED") {
            Some(Self::Returned)
        } else {
            None
        }
    }
}

/// One borrow transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Sequence id in `T#####` form.
    pub trx_id: String,
    pub book_id: String,
    /// Title as it was when the copy was lent.
    pub book_title: String,
    pub borrower: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    /// Final fine once returned; always 0 while borrowed.
    pub fine: u64,
}

impl Loan {
    /// Opens a new loan on `book`, snapshotting its current title.
    pub fn open(
        trx_id: impl Into<String>,
        book: &Book,
        borrower: impl Into<String>,
        borrow_date: NaiveDate,
    ) -> Self {
        Self {
            trx_id: trx_id.into(),
            book_id: book.id.clone(),
            book_title: book.title.clone(),
            borrower: borrower.into(),
            borrow_date,
            due_date: due_date_for(borrow_date),
            return_date: None,
            status: LoanStatus::Borrowed,
            fine: 0,
        }
    }

    /// Returns whether the copy is still out.
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Borrowed
    }

    /// Returns whether the loan is still out past its due date on `as_of`.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.is_active() && as_of > self.due_date
    }

    /// Case-insensitive transaction id comparison.
    pub fn has_trx_id(&self, trx_id: &str) -> bool {
        self.trx_id.eq_ignore_ascii_case(trx_id)
    }

    /// Returns whether this loan was drawn against `book_id`.
    pub fn is_for_book(&self, book_id: &str) -> bool {
        self.book_id.eq_ignore_ascii_case(book_id)
    }

    pub(crate) fn close(&mut self, return_date: NaiveDate, fine: u64) {
        self.status = LoanStatus::Returned;
        self.return_date = Some(return_date);
        self.fine = fine;
    }
}

/// Due date for a loan opened on `borrow_date`.
///
/// Saturates at `NaiveDate::MAX` instead of overflowing.
pub fn due_date_for(borrow_date: NaiveDate) -> NaiveDate {
    borrow_date
        .checked_add_days(Days::new(LOAN_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Status filter for loan history views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoanFilter {
    #[default]
    All,
    Borrowed,
    Returned,
}

impl LoanFilter {
    pub fn matches(self, loan: &Loan) -> bool {
        match self {
            Self::All => true,
            Self::Borrowed => loan.status == LoanStatus::Borrowed,
            Self::Returned => loan.status == LoanStatus::Returned,
        }
    }
}
