//! In-process store that still round-trips through the line codec.

use super::{book_key, decode_lines, encode_lines, loan_key, RecordStore, StorageResult};
use crate::codec::{decode_book_line, decode_loan_line, encode_book_line, encode_loan_line};
use crate::model::book::Book;
use crate::model::loan::Loan;

const BOOKS_LOCATION: &str = "memory:books";
const LOANS_LOCATION: &str = "memory:loans";

/// Keeps encoded lines in memory; nothing touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    book_lines: Vec<String>,
    loan_lines: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw lines, as if read from files.
    pub fn with_lines<B, L>(book_lines: B, loan_lines: L) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            book_lines: book_lines.into_iter().map(Into::into).collect(),
            loan_lines: loan_lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn book_lines(&self) -> &[String] {
        &self.book_lines
    }

    pub fn loan_lines(&self) -> &[String] {
        &self.loan_lines
    }
}

impl RecordStore for MemoryStore {
    fn read_books(&self) -> StorageResult<Vec<Book>> {
        decode_lines(
            &self.book_lines.join("\n"),
            BOOKS_LOCATION,
            decode_book_line,
            book_key,
        )
    }

    fn read_loans(&self) -> StorageResult<Vec<Loan>> {
        decode_lines(
            &self.loan_lines.join("\n"),
            LOANS_LOCATION,
            decode_loan_line,
            loan_key,
        )
    }

    fn write_books(&mut self, books: &[Book]) -> StorageResult<()> {
        self.book_lines = encode_lines(books, book_key, encode_book_line)?;
        Ok(())
    }

    fn write_loans(&mut self, loans: &[Loan]) -> StorageResult<()> {
        self.loan_lines = encode_lines(loans, loan_key, encode_loan_line)?;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
