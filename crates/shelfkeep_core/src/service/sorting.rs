//! Book list orderings.

use crate::model::book::Book;

/// Ordering applied to a copy of the book list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookSortMode {
    /// Insertion order.
    #[default]
    Natural,
    /// Title, case-insensitive, A to Z.
    TitleAsc,
    /// Newest publication year first.
    YearDesc,
    /// Most copies on the shelf first.
    AvailableDesc,
}

impl BookSortMode {
    /// Resolves a mode key; unknown keys fall back to `Natural`.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "title-asc" => Self::TitleAsc,
            "year-desc" => Self::YearDesc,
            "available-desc" => Self::AvailableDesc,
            _ => Self::Natural,
        }
    }

    /// Canonical key accepted by `from_key`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::TitleAsc => "title-asc",
            Self::YearDesc => "year-desc",
            Self::AvailableDesc => "available-desc",
        }
    }

    /// Stable in-place sort; ties keep their relative order.
    pub fn apply(self, books: &mut [Book]) {
        match self {
            Self::Natural => {}
            Self::TitleAsc => {
                books.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
            Self::YearDesc => books.sort_by(|a, b| b.year.cmp(&a.year)),
            Self::AvailableDesc => books.sort_by(|a, b| b.stock_avail.cmp(&a.stock_avail)),
        }
    }
}

/// Returns a sorted copy; `books` is left as is.
pub fn sorted_books(books: &[Book], mode: BookSortMode) -> Vec<Book> {
    let mut copy = books.to_vec();
    mode.apply(&mut copy);
    copy
}
