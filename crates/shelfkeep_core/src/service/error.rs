//! Error taxonomy for lending operations.

use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller input that cannot be accepted as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty after trimming.
    EmptyField(&'static str),
    /// Stock total outside `1..=u32::MAX`.
    InvalidStock(i64),
    /// New total would be lower than the copies currently lent out.
    TotalBelowBorrowed { total: i64, borrowed: u32 },
    /// Search text could not be compiled into a matcher.
    InvalidQuery(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidStock(total) => write!(f, "total stock must be > 0, got {total}"),
            Self::TotalBelowBorrowed { total, borrowed } => write!(
                f,
                "total stock {total} is below the {borrowed} copies currently borrowed"
            ),
            Self::InvalidQuery(details) => write!(f, "invalid search query: {details}"),
        }
    }
}

impl Error for ValidationError {}

/// Valid input that would break a lending invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    BookOnLoan { book_id: String, active_loans: usize },
    OutOfStock { book_id: String },
    AlreadyReturned { trx_id: String },
    /// Returning would push available stock above total.
    StockInconsistent { book_id: String },
}

impl Display for ConflictError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookOnLoan {
                book_id,
                active_loans,
            } => write!(
                f,
                "book {book_id} cannot be deleted: {active_loans} copy(ies) still borrowed"
            ),
            Self::OutOfStock { book_id } => write!(f, "book {book_id} has no copies available"),
            Self::AlreadyReturned { trx_id } => {
                write!(f, "transaction {trx_id} is already RETURNED")
            }
            Self::StockInconsistent { book_id } => write!(
                f,
                "book {book_id} already has every copy on the shelf (inconsistent data)"
            ),
        }
    }
}

impl Error for ConflictError {}

/// Coarse error category for shells that only need to branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

/// Failure of a lending service operation. State is unchanged when returned.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    BookNotFound(String),
    LoanNotFound(String),
    Conflict(ConflictError),
    Storage(StorageError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::BookNotFound(_) | Self::LoanNotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::LoanNotFound(trx_id) => write!(f, "transaction not found: {trx_id}"),
            Self::Conflict(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Conflict(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::BookNotFound(_) | Self::LoanNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ConflictError> for ServiceError {
    fn from(value: ConflictError) -> Self {
        Self::Conflict(value)
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
