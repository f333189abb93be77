//! Core domain logic for Shelfkeep, a small library lending ledger.
//! This crate is the single source of truth for lending invariants; shells
//! call into `LendingService` and render what it returns.

pub mod clock;
pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{CodecError, LoanSchema};
pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookDraft};
pub use model::loan::{Loan, LoanFilter, LoanStatus, LOAN_DAYS};
pub use repo::library_repo::LibraryRepository;
pub use search::book_filter::BookFilter;
pub use service::error::{ConflictError, ErrorKind, ServiceError, ServiceResult, ValidationError};
pub use service::fine::{calculate_fine, projected_fine, FINE_PER_DAY};
pub use service::lending_service::LendingService;
pub use service::sorting::BookSortMode;
pub use service::views::{LibrarySummary, LoanListing};
pub use storage::{MemoryStore, RecordStore, StorageError, StorageResult, TextFileStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
