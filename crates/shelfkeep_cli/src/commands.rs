//! Command handlers and plain-text rendering.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use shelfkeep_core::{
    Book, BookDraft, BookSortMode, Clock, LendingService, LibrarySummary, LoanFilter, LoanListing,
    RecordStore,
};

/// Whether a command changed records and needs a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

pub fn list_books<S: RecordStore, C: Clock>(
    service: &LendingService<S, C>,
    sort: &str,
    search: Option<&str>,
) -> Result<Outcome> {
    let mode = sort_mode(sort);
    let books = match search {
        Some(query) => {
            let mut hits = service
                .search_books(query)
                .with_context(|| format!("invalid search `{query}`"))?;
            mode.apply(&mut hits);
            hits
        }
        None => service.sorted_books(mode),
    };
    if books.is_empty() {
        println!("No books. Use `shelfkeep add` to catalogue one.");
    } else {
        print!("{}", render_books(&books));
    }
    Ok(Outcome::Unchanged)
}

/// Resolves `--sort`, warning when the key falls back to natural order.
fn sort_mode(sort: &str) -> BookSortMode {
    let mode = BookSortMode::from_key(sort);
    if !mode.key().eq_ignore_ascii_case(sort.trim()) {
        eprintln!(
            "warning: unknown sort `{sort}`; using `{}` order",
            mode.key()
        );
    }
    mode
}

pub fn add_book<S: RecordStore, C: Clock>(
    service: &mut LendingService<S, C>,
    draft: &BookDraft,
) -> Result<Outcome> {
    let book = service.add_book(draft).context("cannot add book")?;
    println!("Added {} ({} copies)", book.id, book.stock_total);
    Ok(Outcome::Changed)
}

pub fn update_book<S: RecordStore, C: Clock>(
    service: &mut LendingService<S, C>,
    id: &str,
    draft: &BookDraft,
) -> Result<Outcome> {
    let book = service
        .update_book(id, draft)
        .with_context(|| format!("cannot update {id}"))?;
    println!(
        "Updated {}: {}/{} copies available",
        book.id, book.stock_avail, book.stock_total
    );
    Ok(Outcome::Changed)
}

pub fn delete_book<S: RecordStore, C: Clock>(
    service: &mut LendingService<S, C>,
    id: &str,
) -> Result<Outcome> {
    let book = service
        .delete_book(id)
        .with_context(|| format!("cannot delete {id}"))?;
    println!("Deleted {}", book.id);
    Ok(Outcome::Changed)
}

pub fn borrow_book<S: RecordStore, C: Clock>(
    service: &mut LendingService<S, C>,
    book_id: &str,
    borrower: &str,
) -> Result<Outcome> {
    let loan = service
        .borrow_book(book_id, borrower)
        .with_context(|| format!("cannot lend {book_id}"))?;
    println!(
        "Lent {} as {}, due {}",
        loan.book_id, loan.trx_id, loan.due_date
    );
    Ok(Outcome::Changed)
}

pub fn return_book<S: RecordStore, C: Clock>(
    service: &mut LendingService<S, C>,
    trx_id: &str,
) -> Result<Outcome> {
    let loan = service
        .return_book(trx_id)
        .with_context(|| format!("cannot return {trx_id}"))?;
    if loan.fine > 0 {
        println!("Returned {}; fine {}", loan.trx_id, loan.fine);
    } else {
        println!("Returned {} on time", loan.trx_id);
    }
    Ok(Outcome::Changed)
}

pub fn list_loans<S: RecordStore, C: Clock>(
    service: &LendingService<S, C>,
    filter: LoanFilter,
    as_of: NaiveDate,
) -> Result<Outcome> {
    let listing = service.loan_listing(filter, as_of);
    if listing.is_empty() {
        println!("No loans.");
    } else {
        print!("{}", render_loans(&listing));
    }
    Ok(Outcome::Unchanged)
}

pub fn show_stats<S: RecordStore, C: Clock>(service: &LendingService<S, C>) -> Result<Outcome> {
    print!("{}", render_summary(&service.summary()));
    Ok(Outcome::Unchanged)
}

pub fn render_books(books: &[Book]) -> String {
    let mut out = format!(
        "{:<6} {:<32} {:<24} {:>6} {:>5} {:>5}\n",
        "ID", "TITLE", "AUTHOR", "YEAR", "TOTAL", "AVAIL"
    );
    for book in books {
        out.push_str(&format!(
            "{:<6} {:<32} {:<24} {:>6} {:>5} {:>5}\n",
            book.id,
            clip(&book.title, 32),
            clip(&book.author, 24),
            book.year,
            book.stock_total,
            book.stock_avail
        ));
    }
    out
}

pub fn render_loans(listing: &[LoanListing]) -> String {
    let mut out = format!(
        "{:<7} {:<6} {:<24} {:<16} {:<10} {:<10} {:<10} {:<8} {:>8}\n",
        "TRX", "BOOK", "TITLE", "BORROWER", "BORROWED", "DUE", "RETURNED", "STATUS", "FINE"
    );
    for row in listing {
        let loan = &row.loan;
        let returned = loan
            .return_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if row.overdue { "*" } else { "" };
        out.push_str(&format!(
            "{:<7} {:<6} {:<24} {:<16} {:<10} {:<10} {:<10} {:<8} {:>8}{marker}\n",
            loan.trx_id,
            loan.book_id,
            clip(&loan.book_title, 24),
            clip(&loan.borrower, 16),
            loan.borrow_date,
            loan.due_date,
            returned,
            loan.status.as_str(),
            row.displayed_fine
        ));
    }
    out
}

pub fn render_summary(summary: &LibrarySummary) -> String {
    format!(
        "titles:        {}\n\
         copies:        {}\n\
         on loan:       {}\n\
         loan period:   {} days\n\
         fine per day:  {}\n\
         storage:       {}\n",
        summary.title_count,
        summary.total_copies,
        summary.borrowed_count,
        summary.loan_days,
        summary.fine_per_day,
        summary.storage_location
    )
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}
