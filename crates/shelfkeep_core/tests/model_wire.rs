use chrono::NaiveDate;
use serde_json::json;
use shelfkeep_core::{Book, Loan, LoanListing, LoanStatus, StoreConfig};

#[test]
fn book_serializes_with_field_names() {
    let book = Book::new("B0001", "Dune", "Herbert", 1965, 3);
    let value = serde_json::to_value(&book).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "B0001",
            "title": "Dune",
            "author": "Herbert",
            "year": 1965,
            "stock_total": 3,
            "stock_avail": 3
        })
    );
}

#[test]
fn loan_serializes_dates_as_iso_and_status_as_upper_case() {
    let book = Book::new("B0001", "Dune", "Herbert", 1965, 3);
    let loan = Loan::open(
        "T00001",
        &book,
        "Ann",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    let value = serde_json::to_value(&loan).unwrap();
    assert_eq!(value["borrow_date"], "2024-01-01");
    assert_eq!(value["due_date"], "2024-01-08");
    assert_eq!(value["return_date"], serde_json::Value::Null);
    assert_eq!(value["status"], "BORROWED");
    assert_eq!(value["fine"], 0);

    let decoded: Loan = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, loan);
    assert_eq!(decoded.status, LoanStatus::Borrowed);
}

#[test]
fn loan_listing_nests_loan_beside_display_fields() {
    let book = Book::new("B0001", "Dune", "Herbert", 1965, 3);
    let loan = Loan::open(
        "T00001",
        &book,
        "Ann",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    let listing = LoanListing {
        loan,
        displayed_fine: 4000,
        overdue: true,
    };
    let value = serde_json::to_value(&listing).unwrap();
    assert_eq!(value["displayed_fine"], 4000);
    assert_eq!(value["overdue"], true);
    assert_eq!(value["loan"]["trx_id"], "T00001");
}

#[test]
fn store_config_round_trips_through_json() {
    let config = StoreConfig::in_dir("/srv/library");
    let text = serde_json::to_string(&config).unwrap();
    let decoded: StoreConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, config);
}
