//! Repository over a `RecordStore` backend.

use crate::model::book::Book;
use crate::model::loan::Loan;
use crate::storage::{RecordStore, StorageResult};
use log::{error, info};
use std::time::Instant;

const BOOK_ID_PREFIX: char = 'B';
const BOOK_ID_WIDTH: usize = 4;
const LOAN_ID_PREFIX: char = 'T';
const LOAN_ID_WIDTH: usize = 5;

/// Book and loan collections plus their storage backend.
#[derive(Debug)]
pub struct LibraryRepository<S: RecordStore> {
    store: S,
    books: Vec<Book>,
    loans: Vec<Loan>,
}

impl<S: RecordStore> LibraryRepository<S> {
    /// Creates an empty repository. Call `load()` to pull persisted state.
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: Vec::new(),
            loans: Vec::new(),
        }
    }

    /// Replaces in-memory state with the backend's contents.
    ///
    /// Both collections are decoded before either is swapped in.
    pub fn load(&mut self) -> StorageResult<()> {
        let started_at = Instant::now();
        match self.read_all() {
            Ok((books, loans)) => {
                self.books = books;
                self.loans = loans;
                info!(
                    "event=repo_load module=repo status=ok books={} loans={} duration_ms={}",
                    self.books.len(),
                    self.loans.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=repo_load module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Writes both collections to the backend, books first.
    pub fn save(&mut self) -> StorageResult<()> {
        let started_at = Instant::now();
        let result = self
            .store
            .write_books(&self.books)
            .and_then(|()| self.store.write_loans(&self.loans));

        match &result {
            Ok(()) => info!(
                "event=repo_save module=repo status=ok books={} loans={} duration_ms={}",
                self.books.len(),
                self.loans.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=repo_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn read_all(&self) -> StorageResult<(Vec<Book>, Vec<Loan>)> {
        Ok((self.store.read_books()?, self.store.read_loans()?))
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Case-insensitive exact id match.
    pub fn find_book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.has_id(id))
    }

    /// Case-insensitive exact transaction id match.
    pub fn find_loan(&self, trx_id: &str) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.has_trx_id(trx_id))
    }

    /// Next free `B####` id: one past the highest parsable `B` id.
    pub fn next_book_id(&self) -> String {
        next_sequence_id(
            self.books.iter().map(|book| book.id.as_str()),
            BOOK_ID_PREFIX,
            BOOK_ID_WIDTH,
        )
    }

    /// Next free `T#####` id: one past the highest parsable `T` id.
    pub fn next_loan_id(&self) -> String {
        next_sequence_id(
            self.loans.iter().map(|loan| loan.trx_id.as_str()),
            LOAN_ID_PREFIX,
            LOAN_ID_WIDTH,
        )
    }

    pub(crate) fn find_book_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.has_id(id))
    }

    /// Both sides of a return, borrowed together.
    pub(crate) fn book_and_loan_mut(
        &mut self,
        book_id: &str,
        trx_id: &str,
    ) -> Option<(&mut Book, &mut Loan)> {
        let book = self.books.iter_mut().find(|book| book.has_id(book_id))?;
        let loan = self.loans.iter_mut().find(|loan| loan.has_trx_id(trx_id))?;
        Some((book, loan))
    }

    pub(crate) fn insert_book(&mut self, book: Book) {
        self.books.push(book);
    }

    pub(crate) fn insert_loan(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    pub(crate) fn remove_book(&mut self, id: &str) -> Option<Book> {
        let index = self.books.iter().position(|book| book.has_id(id))?;
        Some(self.books.remove(index))
    }
}

fn next_sequence_id<'a>(ids: impl Iterator<Item = &'a str>, prefix: char, width: usize) -> String {
    // Suffixes with no representable successor are ignored like unparsable ones.
    let next = ids
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .filter_map(|number| number.checked_add(1))
        .max()
        .unwrap_or(1);
    format!("{prefix}{next:0width$}")
}

#[cfg(test)]
mod tests {
    use super::{next_sequence_id, LibraryRepository};
    use crate::storage::{MemoryStore, StorageError};

    #[test]
    fn sequence_starts_at_one() {
        assert_eq!(next_sequence_id(std::iter::empty(), 'B', 4), "B0001");
        assert_eq!(next_sequence_id(std::iter::empty(), 'T', 5), "T00001");
    }

    #[test]
    fn sequence_ignores_unparsable_and_foreign_ids() {
        let ids = ["B0002", "BX12", "legacy-7", "b0009", "B", "B0005"];
        assert_eq!(next_sequence_id(ids.into_iter(), 'B', 4), "B0006");
    }

    #[test]
    fn sequence_grows_past_width() {
        assert_eq!(next_sequence_id(["B9999"].into_iter(), 'B', 4), "B10000");
    }

    #[test]
    fn sequence_skips_suffix_without_successor() {
        let ids = ["B0003", "B18446744073709551615"];
        assert_eq!(next_sequence_id(ids.into_iter(), 'B', 4), "B0004");
        assert_eq!(
            next_sequence_id(["T18446744073709551615"].into_iter(), 'T', 5),
            "T00001"
        );
    }

    #[test]
    fn imported_max_suffix_does_not_repeat_an_id() {
        let store =
            MemoryStore::with_lines(["B18446744073709551615|Imported|A|2000|1|1"], [""; 0]);
        let mut repo = LibraryRepository::new(store);
        repo.load().unwrap();

        let next = repo.next_book_id();
        assert_eq!(next, "B0001");
        assert!(repo.find_book(&next).is_none());
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let store = MemoryStore::with_lines(
            ["B0001|Dune|Herbert|1965|1|1", "b0001|Copy|Someone|1999|1|1"],
            [""; 0],
        );
        let mut repo = LibraryRepository::new(store);
        let err = repo.load().unwrap_err();
        assert!(matches!(
            err,
            StorageError::DuplicateId { line: 2, ref id, .. } if id == "b0001"
        ));
        assert!(repo.books().is_empty());
    }

    #[test]
    fn lookups_ignore_case() {
        let store = MemoryStore::with_lines(
            ["B0001|Dune|Herbert|1965|1|1"],
            ["T00001|B0001|Dune|Ann|2024-01-01|2024-01-08|2024-01-02|RETURNED|0"],
        );
        let mut repo = LibraryRepository::new(store);
        repo.load().unwrap();

        assert!(repo.find_book("b0001").is_some());
        assert!(repo.find_loan("t00001").is_some());
        assert!(repo.find_book("B0002").is_none());
    }
}
