//! Record storage backends.
//!
//! # Responsibility
//! - Move whole collections between memory and a backing medium.
//! - Turn codec failures into located `StorageError`s.
//!
//! # Invariants
//! - Reads are all-or-nothing: one malformed row fails the whole read.
//! - Ids are unique per collection (case-insensitive); a repeated id fails the read.
//! - Writes replace the previous contents entirely.
//! - A backend that has never been written reads as empty.

use crate::codec::{CodecError, CodecResult};
use crate::model::book::Book;
use crate::model::loan::Loan;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod memory;
mod text_file;

pub use memory::MemoryStore;
pub use text_file::TextFileStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure surfaced by load/save.
#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Row `line` (1-based) of `location` could not be decoded.
    Malformed {
        location: String,
        line: usize,
        source: CodecError,
    },
    /// Row `line` (1-based) of `location` repeats an id seen earlier.
    DuplicateId {
        location: String,
        line: usize,
        id: String,
    },
    /// A record could not be encoded for writing.
    Unencodable {
        record_id: String,
        source: CodecError,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::Malformed {
                location,
                line,
                source,
            } => write!(f, "malformed record at {location}:{line}: {source}"),
            Self::DuplicateId { location, line, id } => {
                write!(f, "duplicate id `{id}` at {location}:{line}")
            }
            Self::Unencodable { record_id, source } => {
                write!(f, "cannot encode record `{record_id}`: {source}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Unencodable { source, .. } => Some(source),
            Self::DuplicateId { .. } => None,
        }
    }
}

/// Whole-collection persistence contract.
pub trait RecordStore {
    fn read_books(&self) -> StorageResult<Vec<Book>>;
    fn read_loans(&self) -> StorageResult<Vec<Loan>>;
    fn write_books(&mut self, books: &[Book]) -> StorageResult<()>;
    fn write_loans(&mut self, loans: &[Loan]) -> StorageResult<()>;
    /// Human-readable description of where records live.
    fn location(&self) -> String;
}

fn decode_lines<T>(
    text: &str,
    location: &str,
    decode: fn(&str) -> CodecResult<Option<T>>,
    record_id: fn(&T) -> &str,
) -> StorageResult<Vec<T>> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (index, line) in text.lines().enumerate() {
        match decode(line) {
            Ok(Some(record)) => {
                let id = record_id(&record);
                if !seen.insert(id.to_ascii_uppercase()) {
                    return Err(StorageError::DuplicateId {
                        location: location.to_string(),
                        line: index + 1,
                        id: id.to_string(),
                    });
                }
                records.push(record);
            }
            Ok(None) => {}
            Err(source) => {
                return Err(StorageError::Malformed {
                    location: location.to_string(),
                    line: index + 1,
                    source,
                });
            }
        }
    }
    Ok(records)
}

fn encode_lines<T>(
    records: &[T],
    record_id: fn(&T) -> &str,
    encode: fn(&T) -> CodecResult<String>,
) -> StorageResult<Vec<String>> {
    records
        .iter()
        .map(|record| {
            encode(record).map_err(|source| StorageError::Unencodable {
                record_id: record_id(record).to_string(),
                source,
            })
        })
        .collect()
}

fn book_key(book: &Book) -> &str {
    &book.id
}

fn loan_key(loan: &Loan) -> &str {
    &loan.trx_id
}

#[cfg(test)]
mod tests {
    use super::{book_key, decode_lines, StorageError};
    use crate::codec::decode_book_line;

    #[test]
    fn decode_lines_reports_one_based_line_number() {
        let text = "B0001|A|B|2000|1|1\n\nB0002|C|D|year|1|1\n";
        let err = decode_lines(text, "books.txt", decode_book_line, book_key).unwrap_err();
        match err {
            StorageError::Malformed { location, line, .. } => {
                assert_eq!(location, "books.txt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
