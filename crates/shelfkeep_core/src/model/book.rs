//! Book inventory record.
//!
//! # Invariants
//! - `stock_avail <= stock_total`.
//! - `stock_total - stock_avail` equals the number of active loans on the book.

use serde::{Deserialize, Serialize};

/// Catalogue entry with its copy counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Sequence id in `B####` form.
    pub id: String,
    pub title: String,
    pub author: String,
    /// Publication year. Not range-checked.
    pub year: i32,
    /// Number of copies owned by the library.
    pub stock_total: u32,
    /// Copies currently on the shelf.
    pub stock_avail: u32,
}

impl Book {
    /// Creates a book with every copy on the shelf.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        stock_total: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            year,
            stock_total,
            stock_avail: stock_total,
        }
    }

    /// Copies currently out on loan.
    pub fn borrowed_count(&self) -> u32 {
        self.stock_total.saturating_sub(self.stock_avail)
    }

    /// Returns whether at least one copy can be lent out.
    pub fn is_available(&self) -> bool {
        self.stock_avail > 0
    }

    /// Case-insensitive id comparison used by every lookup path.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

/// Caller input for both the add and the edit form.
///
/// `total` stays signed so non-positive input can be reported as a
/// validation failure instead of being unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub total: i64,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32, total: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            total,
        }
    }
}
