//! Lending service: catalogue CRUD, borrow/return and read views.
//!
//! # Responsibility
//! - Validate caller input and enforce stock/loan invariants.
//! - Drive the loan state machine (`Borrowed` -> `Returned`).
//! - Serve sorted, filtered and summarized views without mutating state.
//!
//! # Invariants
//! - Every check runs before the first mutation, so a rejected call leaves
//!   books and loans exactly as they were.
//! - Ids come from the repository's max-scan generators at call time.
//! - Text input is trimmed and `|`/line breaks are replaced before storage.

use crate::clock::{Clock, SystemClock};
use crate::model::book::{Book, BookDraft};
use crate::model::loan::{Loan, LoanFilter, LOAN_DAYS};
use crate::repo::library_repo::LibraryRepository;
use crate::search::book_filter::filter_books;
use crate::service::error::{ConflictError, ServiceError, ServiceResult, ValidationError};
use crate::service::fine::{calculate_fine, projected_fine, FINE_PER_DAY};
use crate::service::sorting::{sorted_books, BookSortMode};
use crate::service::views::{LibrarySummary, LoanListing};
use crate::storage::RecordStore;
use chrono::NaiveDate;
use log::{error, info, warn};

/// Lending use-case facade. Exclusively owns its repository.
pub struct LendingService<S: RecordStore, C: Clock = SystemClock> {
    repo: LibraryRepository<S>,
    clock: C,
}

impl<S: RecordStore> LendingService<S, SystemClock> {
    /// Creates a service over `store` using the local calendar date.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> LendingService<S, C> {
    /// Creates a service with an explicit date source.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            repo: LibraryRepository::new(store),
            clock,
        }
    }

    pub fn repository(&self) -> &LibraryRepository<S> {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Reloads all records from storage. Prior state survives a failure.
    pub fn load_all(&mut self) -> ServiceResult<()> {
        self.repo.load().map_err(ServiceError::from)
    }

    /// Persists all records.
    pub fn save_all(&mut self) -> ServiceResult<()> {
        self.repo.save().map_err(ServiceError::from)
    }

    /// Adds a catalogue entry with every copy available.
    pub fn add_book(&mut self, draft: &BookDraft) -> ServiceResult<Book> {
        let result = self.try_add_book(draft);
        log_outcome("book_add", &result, |book| {
            format!("book_id={} stock_total={}", book.id, book.stock_total)
        });
        result
    }

    /// Edits a catalogue entry, keeping the borrowed count unchanged.
    pub fn update_book(&mut self, id: &str, draft: &BookDraft) -> ServiceResult<Book> {
        let result = self.try_update_book(id, draft);
        log_outcome("book_update", &result, |book| {
            format!(
                "book_id={} stock_total={} stock_avail={}",
                book.id, book.stock_total, book.stock_avail
            )
        });
        result
    }

    /// Removes a book that has no copies out. Returned loans keep their
    /// reference to it.
    pub fn delete_book(&mut self, id: &str) -> ServiceResult<Book> {
        let result = self.try_delete_book(id);
        log_outcome("book_delete", &result, |book| format!("book_id={}", book.id));
        result
    }

    /// Lends one copy of `book_id` to `borrower` as of today.
    pub fn borrow_book(&mut self, book_id: &str, borrower: &str) -> ServiceResult<Loan> {
        let result = self.try_borrow_book(book_id, borrower);
        log_outcome("book_borrow", &result, |loan| {
            format!(
                "trx_id={} book_id={} due_date={}",
                loan.trx_id, loan.book_id, loan.due_date
            )
        });
        result
    }

    /// Closes loan `trx_id` as of today and settles its fine.
    pub fn return_book(&mut self, trx_id: &str) -> ServiceResult<Loan> {
        let result = self.try_return_book(trx_id);
        log_outcome("book_return", &result, |loan| {
            format!(
                "trx_id={} book_id={} fine={}",
                loan.trx_id, loan.book_id, loan.fine
            )
        });
        result
    }

    pub fn find_book(&self, id: &str) -> Option<&Book> {
        self.repo.find_book(id)
    }

    pub fn find_loan(&self, trx_id: &str) -> Option<&Loan> {
        self.repo.find_loan(trx_id)
    }

    /// Sorted copy of the catalogue.
    pub fn sorted_books(&self, mode: BookSortMode) -> Vec<Book> {
        sorted_books(self.repo.books(), mode)
    }

    /// Sorted copy of the catalogue by mode key (`title-asc`, `year-desc`,
    /// `available-desc`; anything else keeps insertion order).
    pub fn list_books_sorted(&self, mode: &str) -> Vec<Book> {
        self.sorted_books(BookSortMode::from_key(mode))
    }

    /// Books whose displayed columns contain `query`, ignoring case.
    pub fn search_books(&self, query: &str) -> ServiceResult<Vec<Book>> {
        filter_books(self.repo.books(), query)
            .map_err(|err| ValidationError::InvalidQuery(err.to_string()).into())
    }

    /// Loans in insertion order, narrowed by status.
    pub fn list_loans(&self, filter: LoanFilter) -> Vec<Loan> {
        self.repo
            .loans()
            .iter()
            .filter(|loan| filter.matches(loan))
            .cloned()
            .collect()
    }

    /// Loans paired with the fine to display as of `as_of`.
    pub fn loan_listing(&self, filter: LoanFilter, as_of: NaiveDate) -> Vec<LoanListing> {
        self.repo
            .loans()
            .iter()
            .filter(|loan| filter.matches(loan))
            .map(|loan| LoanListing {
                loan: loan.clone(),
                displayed_fine: projected_fine(loan, as_of),
                overdue: loan.is_overdue(as_of),
            })
            .collect()
    }

    /// Display fine for `loan` as of `as_of`; never stored.
    pub fn projected_fine(&self, loan: &Loan, as_of: NaiveDate) -> u64 {
        projected_fine(loan, as_of)
    }

    /// Fine owed for a return on `return_date` against `due_date`.
    pub fn calculate_fine(&self, due_date: NaiveDate, return_date: NaiveDate) -> u64 {
        calculate_fine(due_date, return_date)
    }

    /// Sum of `stock_total` over the catalogue.
    pub fn total_copies(&self) -> u64 {
        self.repo
            .books()
            .iter()
            .map(|book| u64::from(book.stock_total))
            .sum()
    }

    /// Number of loans still out.
    pub fn borrowed_count(&self) -> usize {
        self.repo.loans().iter().filter(|loan| loan.is_active()).count()
    }

    /// Id the next `add_book` would assign. Allocates nothing.
    pub fn next_book_id_preview(&self) -> String {
        self.repo.next_book_id()
    }

    pub fn summary(&self) -> LibrarySummary {
        LibrarySummary {
            title_count: self.repo.books().len(),
            total_copies: self.total_copies(),
            borrowed_count: self.borrowed_count(),
            loan_days: LOAN_DAYS,
            fine_per_day: FINE_PER_DAY,
            storage_location: self.repo.store().location(),
        }
    }

    fn try_add_book(&mut self, draft: &BookDraft) -> ServiceResult<Book> {
        let clean = CleanDraft::from_draft(draft)?;
        let book = Book::new(
            self.repo.next_book_id(),
            clean.title,
            clean.author,
            draft.year,
            clean.total,
        );
        self.repo.insert_book(book.clone());
        Ok(book)
    }

    fn try_update_book(&mut self, id: &str, draft: &BookDraft) -> ServiceResult<Book> {
        let borrowed = self.require_book(id)?.borrowed_count();
        let clean = CleanDraft::from_draft(draft)?;
        if clean.total < borrowed {
            return Err(ValidationError::TotalBelowBorrowed {
                total: draft.total,
                borrowed,
            }
            .into());
        }

        let book = self
            .repo
            .find_book_mut(id)
            .ok_or_else(|| ServiceError::BookNotFound(id.to_string()))?;
        book.title = clean.title;
        book.author = clean.author;
        book.year = draft.year;
        book.stock_total = clean.total;
        book.stock_avail = clean.total - borrowed;
        Ok(book.clone())
    }

    fn try_delete_book(&mut self, id: &str) -> ServiceResult<Book> {
        let active_loans = self
            .repo
            .loans()
            .iter()
            .filter(|loan| loan.is_active() && loan.is_for_book(id))
            .count();
        if active_loans > 0 {
            return Err(ConflictError::BookOnLoan {
                book_id: id.to_string(),
                active_loans,
            }
            .into());
        }

        self.repo
            .remove_book(id)
            .ok_or_else(|| ServiceError::BookNotFound(id.to_string()))
    }

    fn try_borrow_book(&mut self, book_id: &str, borrower: &str) -> ServiceResult<Loan> {
        let book = self.require_book(book_id)?;
        let borrower = required_text(borrower, "borrower")?;
        if !book.is_available() {
            return Err(ConflictError::OutOfStock {
                book_id: book.id.clone(),
            }
            .into());
        }

        let loan = Loan::open(
            self.repo.next_loan_id(),
            book,
            borrower,
            self.clock.today(),
        );
        let book = self
            .repo
            .find_book_mut(&loan.book_id)
            .ok_or_else(|| ServiceError::BookNotFound(book_id.to_string()))?;
        book.stock_avail -= 1;
        self.repo.insert_loan(loan.clone());
        Ok(loan)
    }

    fn try_return_book(&mut self, trx_id: &str) -> ServiceResult<Loan> {
        let loan = self
            .repo
            .find_loan(trx_id)
            .ok_or_else(|| ServiceError::LoanNotFound(trx_id.to_string()))?;
        if !loan.is_active() {
            return Err(ConflictError::AlreadyReturned {
                trx_id: loan.trx_id.clone(),
            }
            .into());
        }
        let trx_id = loan.trx_id.clone();
        let book_id = loan.book_id.clone();
        let due_date = loan.due_date;

        let book = self.require_book(&book_id)?;
        if book.stock_avail >= book.stock_total {
            return Err(ConflictError::StockInconsistent {
                book_id: book.id.clone(),
            }
            .into());
        }

        let today = self.clock.today();
        let fine = calculate_fine(due_date, today);
        let (book, loan) = self
            .repo
            .book_and_loan_mut(&book_id, &trx_id)
            .ok_or_else(|| ServiceError::BookNotFound(book_id.clone()))?;
        book.stock_avail += 1;
        loan.close(today, fine);
        Ok(loan.clone())
    }

    fn require_book(&self, id: &str) -> ServiceResult<&Book> {
        self.repo
            .find_book(id)
            .ok_or_else(|| ServiceError::BookNotFound(id.to_string()))
    }
}

/// Sanitized, validated form of a `BookDraft`.
struct CleanDraft {
    title: String,
    author: String,
    total: u32,
}

impl CleanDraft {
    fn from_draft(draft: &BookDraft) -> ServiceResult<Self> {
        let title = required_text(&draft.title, "title")?;
        let author = required_text(&draft.author, "author")?;
        let total = u32::try_from(draft.total)
            .ok()
            .filter(|total| *total > 0)
            .ok_or(ValidationError::InvalidStock(draft.total))?;
        Ok(Self {
            title,
            author,
            total,
        })
    }
}

fn required_text(value: &str, field: &'static str) -> ServiceResult<String> {
    let cleaned = sanitize_text(value);
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyField(field).into());
    }
    Ok(cleaned)
}

/// Trims and replaces characters the line format reserves.
pub fn sanitize_text(value: &str) -> String {
    value.trim().replace('|', "/").replace(['\n', '\r'], " ")
}

fn log_outcome<T>(event: &str, result: &ServiceResult<T>, describe: impl FnOnce(&T) -> String) {
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok {}",
            describe(value)
        ),
        Err(err @ ServiceError::Storage(_)) => error!(
            "event={event} module=service status=error error_kind={} error={err}",
            err.kind().as_str()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected error_kind={} error={err}",
            err.kind().as_str()
        ),
    }
}
