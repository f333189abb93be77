//! Case-insensitive substring filter across a book's displayed columns.

use crate::model::book::Book;
use regex::{Regex, RegexBuilder};

/// Compiled book filter. An empty query matches everything.
#[derive(Debug, Clone)]
pub struct BookFilter {
    pattern: Option<Regex>,
}

impl BookFilter {
    /// Compiles `query` as a literal, case-insensitive pattern.
    ///
    /// # Errors
    /// Fails only when the escaped pattern exceeds the regex size limit.
    pub fn new(query: &str) -> Result<Self, regex::Error> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Matches id, title, author, year, total and available copies.
    pub fn matches(&self, book: &Book) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        pattern.is_match(&book.id)
            || pattern.is_match(&book.title)
            || pattern.is_match(&book.author)
            || pattern.is_match(&book.year.to_string())
            || pattern.is_match(&book.stock_total.to_string())
            || pattern.is_match(&book.stock_avail.to_string())
    }
}

/// Books matching `query`, in their original order.
pub fn filter_books(books: &[Book], query: &str) -> Result<Vec<Book>, regex::Error> {
    let filter = BookFilter::new(query)?;
    Ok(books
        .iter()
        .filter(|book| filter.matches(book))
        .cloned()
        .collect())
}
