//! Pipe-delimited text file pair (`books.txt`, `loans.txt`).

use super::{
    book_key, decode_lines, encode_lines, loan_key, RecordStore, StorageError, StorageResult,
};
use crate::codec::{decode_book_line, decode_loan_line, encode_book_line, encode_loan_line};
use crate::config::StoreConfig;
use crate::model::book::Book;
use crate::model::loan::Loan;
use log::{debug, error};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// File-backed store over the two record files named by `StoreConfig`.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    config: StoreConfig,
}

impl TextFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl RecordStore for TextFileStore {
    fn read_books(&self) -> StorageResult<Vec<Book>> {
        read_records(&self.config.books_file, "books", decode_book_line, book_key)
    }

    fn read_loans(&self) -> StorageResult<Vec<Loan>> {
        read_records(&self.config.loans_file, "loans", decode_loan_line, loan_key)
    }

    fn write_books(&mut self, books: &[Book]) -> StorageResult<()> {
        let lines = encode_lines(books, book_key, encode_book_line)?;
        write_records(&self.config.books_file, "books", &lines)
    }

    fn write_loans(&mut self, loans: &[Loan]) -> StorageResult<()> {
        let lines = encode_lines(loans, loan_key, encode_loan_line)?;
        write_records(&self.config.loans_file, "loans", &lines)
    }

    fn location(&self) -> String {
        format!(
            "books={} loans={}",
            self.config.books_file.display(),
            self.config.loans_file.display()
        )
    }
}

fn read_records<T>(
    path: &Path,
    kind: &str,
    decode: fn(&str) -> crate::codec::CodecResult<Option<T>>,
    record_id: fn(&T) -> &str,
) -> StorageResult<Vec<T>> {
    let started_at = Instant::now();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("event=store_read module=storage status=ok kind={kind} records=0 missing=true");
            return Ok(Vec::new());
        }
        Err(source) => {
            error!(
                "event=store_read module=storage status=error kind={kind} error_code=io error={source}"
            );
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let location = path.display().to_string();
    match decode_lines(&text, &location, decode, record_id) {
        Ok(records) => {
            debug!(
                "event=store_read module=storage status=ok kind={kind} records={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            );
            Ok(records)
        }
        Err(err) => {
            error!(
                "event=store_read module=storage status=error kind={kind} error_code=malformed error={err}"
            );
            Err(err)
        }
    }
}

fn write_records(path: &Path, kind: &str, lines: &[String]) -> StorageResult<()> {
    let started_at = Instant::now();
    let io_error = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    std::fs::write(path, body).map_err(io_error)?;

    debug!(
        "event=store_write module=storage status=ok kind={kind} records={} duration_ms={}",
        lines.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}
