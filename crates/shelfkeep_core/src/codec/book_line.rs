//! `id|title|author|year|stockTotal|stockAvail`

use super::{ensure_plain, parse_number, split_fields, CodecResult, FIELD_DELIMITER};
use crate::model::book::Book;

/// Minimum field count of a usable book row.
pub const BOOK_FIELD_COUNT: usize = 6;

/// Decodes one books-file line.
///
/// Returns `Ok(None)` for blank lines and rows with fewer than
/// `BOOK_FIELD_COUNT` fields. Extra trailing fields are ignored.
pub fn decode_book_line(line: &str) -> CodecResult<Option<Book>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let fields = split_fields(line);
    if fields.len() < BOOK_FIELD_COUNT {
        return Ok(None);
    }

    Ok(Some(Book {
        id: fields[0].to_string(),
        title: fields[1].to_string(),
        author: fields[2].to_string(),
        year: parse_number(fields[3], "year")?,
        stock_total: parse_number(fields[4], "stock_total")?,
        stock_avail: parse_number(fields[5], "stock_avail")?,
    }))
}

/// Encodes one book as a books-file line (without line terminator).
pub fn encode_book_line(book: &Book) -> CodecResult<String> {
    let delimiter = FIELD_DELIMITER.to_string();
    let fields = [
        ensure_plain(&book.id, "id")?.to_string(),
        ensure_plain(&book.title, "title")?.to_string(),
        ensure_plain(&book.author, "author")?.to_string(),
        book.year.to_string(),
        book.stock_total.to_string(),
        book.stock_avail.to_string(),
    ];
    Ok(fields.join(&delimiter))
}
