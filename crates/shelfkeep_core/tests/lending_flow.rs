use chrono::NaiveDate;
use shelfkeep_core::{
    BookDraft, Clock, ConflictError, ErrorKind, FixedClock, LendingService, LoanFilter,
    LoanStatus, MemoryStore, RecordStore, ServiceError, ValidationError, FINE_PER_DAY,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service_on(today: NaiveDate) -> LendingService<MemoryStore, FixedClock> {
    LendingService::with_clock(MemoryStore::new(), FixedClock::new(today))
}

fn assert_stock_matches_loans<S: RecordStore, C: Clock>(service: &LendingService<S, C>) {
    let repo = service.repository();
    for book in repo.books() {
        let active = repo
            .loans()
            .iter()
            .filter(|loan| loan.is_active() && loan.is_for_book(&book.id))
            .count();
        assert_eq!(
            book.borrowed_count() as usize,
            active,
            "stock out of sync for {}",
            book.id
        );
    }
}

#[test]
fn borrow_opens_loan_and_takes_one_copy() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Laskar Pelangi", "Andrea Hirata", 2005, 2))
        .unwrap();

    let loan = service.borrow_book(&book.id, "  Alice  ").unwrap();
    assert_eq!(loan.trx_id, "T00001");
    assert_eq!(loan.book_id, "B0001");
    assert_eq!(loan.book_title, "Laskar Pelangi");
    assert_eq!(loan.borrower, "Alice");
    assert_eq!(loan.borrow_date, date(2024, 1, 1));
    assert_eq!(loan.due_date, date(2024, 1, 8));
    assert_eq!(loan.return_date, None);
    assert_eq!(loan.status, LoanStatus::Borrowed);
    assert_eq!(loan.fine, 0);

    assert_eq!(service.find_book("b0001").unwrap().stock_avail, 1);
    assert_eq!(service.borrowed_count(), 1);
    assert_stock_matches_loans(&service);
}

#[test]
fn on_time_return_has_no_fine() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Bumi", "Tere Liye", 2014, 1))
        .unwrap();
    let loan = service.borrow_book(&book.id, "Bob").unwrap();

    service.clock().set(date(2024, 1, 8));
    let returned = service.return_book(&loan.trx_id).unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    assert_eq!(returned.return_date, Some(date(2024, 1, 8)));
    assert_eq!(returned.fine, 0);
    assert_eq!(service.find_book(&book.id).unwrap().stock_avail, 1);
    assert_stock_matches_loans(&service);
}

#[test]
fn late_return_charges_per_day() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Bumi", "Tere Liye", 2014, 1))
        .unwrap();
    let loan = service.borrow_book(&book.id, "Bob").unwrap();

    service.clock().advance_days(9);
    let returned = service.return_book("t00001").unwrap();
    assert_eq!(returned.trx_id, loan.trx_id);
    assert_eq!(returned.return_date, Some(date(2024, 1, 10)));
    assert_eq!(returned.fine, 2 * FINE_PER_DAY);
    assert_eq!(service.find_loan(&loan.trx_id).unwrap().fine, 4000);
}

#[test]
fn borrowing_with_no_copies_left_is_a_conflict() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Solo", "Writer", 2020, 1))
        .unwrap();
    service.borrow_book(&book.id, "Ann").unwrap();

    let err = service.borrow_book(&book.id, "Ben").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictError::OutOfStock { ref book_id }) if book_id == "B0001"
    ));
    assert_eq!(service.find_book(&book.id).unwrap().stock_avail, 0);
    assert_eq!(service.repository().loans().len(), 1);
    assert_stock_matches_loans(&service);
}

#[test]
fn borrow_reports_missing_book_before_blank_borrower() {
    let mut service = service_on(date(2024, 1, 1));
    let err = service.borrow_book("B0404", "   ").unwrap_err();
    assert!(matches!(err, ServiceError::BookNotFound(ref id) if id == "B0404"));

    service
        .add_book(&BookDraft::new("Solo", "Writer", 2020, 1))
        .unwrap();
    let err = service.borrow_book("B0001", " \t ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyField("borrower"))
    ));
    assert!(service.repository().loans().is_empty());
    assert_eq!(service.find_book("B0001").unwrap().stock_avail, 1);
}

#[test]
fn second_return_is_rejected_and_keeps_first_settlement() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Dune", "Herbert", 1965, 2))
        .unwrap();
    let loan = service.borrow_book(&book.id, "Ann").unwrap();

    service.clock().set(date(2024, 1, 12));
    let first = service.return_book(&loan.trx_id).unwrap();
    assert_eq!(first.fine, 4 * FINE_PER_DAY);

    service.clock().set(date(2024, 2, 1));
    let err = service.return_book(&loan.trx_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictError::AlreadyReturned { .. })
    ));

    let stored = service.find_loan(&loan.trx_id).unwrap();
    assert_eq!(stored.fine, first.fine);
    assert_eq!(stored.return_date, Some(date(2024, 1, 12)));
    assert_eq!(service.find_book(&book.id).unwrap().stock_avail, 2);
}

#[test]
fn unknown_transaction_is_not_found() {
    let mut service = service_on(date(2024, 1, 1));
    let err = service.return_book("T99999").unwrap_err();
    assert!(matches!(err, ServiceError::LoanNotFound(ref id) if id == "T99999"));
}

#[test]
fn return_refuses_when_every_copy_is_already_shelved() {
    let store = MemoryStore::with_lines(
        ["B0001|Dune|Herbert|1965|1|1"],
        ["T00001|B0001|Dune|Ann|2024-01-01|2024-01-08||BORROWED|0"],
    );
    let mut service = LendingService::with_clock(store, FixedClock::new(date(2024, 1, 3)));
    service.load_all().unwrap();

    let err = service.return_book("T00001").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictError::StockInconsistent { .. })
    ));
    let loan = service.find_loan("T00001").unwrap();
    assert_eq!(loan.status, LoanStatus::Borrowed);
    assert_eq!(loan.return_date, None);
    assert_eq!(service.find_book("B0001").unwrap().stock_avail, 1);
}

#[test]
fn book_on_loan_cannot_be_deleted_until_returned() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Dune", "Herbert", 1965, 3))
        .unwrap();
    let loan = service.borrow_book(&book.id, "Ann").unwrap();

    let err = service.delete_book(&book.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictError::BookOnLoan { active_loans: 1, .. })
    ));
    assert!(service.find_book(&book.id).is_some());

    service.return_book(&loan.trx_id).unwrap();
    let removed = service.delete_book(&book.id).unwrap();
    assert_eq!(removed.id, "B0001");
    assert!(service.find_book(&book.id).is_none());

    let history = service.list_loans(LoanFilter::All);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].book_id, "B0001");
    assert_eq!(history[0].book_title, "Dune");
}

#[test]
fn title_snapshot_survives_book_edits() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Old Title", "Someone", 2000, 2))
        .unwrap();
    let loan = service.borrow_book(&book.id, "Ann").unwrap();

    service
        .update_book(&book.id, &BookDraft::new("New Title", "Someone", 2001, 2))
        .unwrap();
    assert_eq!(
        service.find_loan(&loan.trx_id).unwrap().book_title,
        "Old Title"
    );
    let second = service.borrow_book(&book.id, "Ben").unwrap();
    assert_eq!(second.book_title, "New Title");
}

#[test]
fn projected_fine_is_display_only() {
    let mut service = service_on(date(2024, 1, 1));
    let book = service
        .add_book(&BookDraft::new("Dune", "Herbert", 1965, 2))
        .unwrap();
    let late = service.borrow_book(&book.id, "Ann").unwrap();
    let settled = service.borrow_book(&book.id, "Ben").unwrap();
    service.clock().set(date(2024, 1, 9));
    service.return_book(&settled.trx_id).unwrap();

    let as_of = date(2024, 1, 13);
    let stored = service.find_loan(&late.trx_id).unwrap().clone();
    assert_eq!(service.projected_fine(&stored, as_of), 5 * FINE_PER_DAY);
    assert_eq!(stored.fine, 0);

    let listing = service.loan_listing(LoanFilter::All, as_of);
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].displayed_fine, 10_000);
    assert!(listing[0].overdue);
    assert_eq!(listing[1].displayed_fine, FINE_PER_DAY);
    assert!(!listing[1].overdue);
    assert_eq!(service.find_loan(&late.trx_id).unwrap().fine, 0);
}

#[test]
fn loan_filters_and_counters() {
    let mut service = service_on(date(2024, 1, 1));
    let first = service
        .add_book(&BookDraft::new("One", "A", 2001, 2))
        .unwrap();
    let second = service
        .add_book(&BookDraft::new("Two", "B", 2002, 3))
        .unwrap();
    let a = service.borrow_book(&first.id, "Ann").unwrap();
    service.borrow_book(&second.id, "Ben").unwrap();
    service.borrow_book(&second.id, "Cid").unwrap();
    service.return_book(&a.trx_id).unwrap();

    assert_eq!(service.total_copies(), 5);
    assert_eq!(service.borrowed_count(), 2);
    assert_eq!(service.list_loans(LoanFilter::Borrowed).len(), 2);
    let returned = service.list_loans(LoanFilter::Returned);
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].trx_id, "T00001");

    let summary = service.summary();
    assert_eq!(summary.title_count, 2);
    assert_eq!(summary.total_copies, 5);
    assert_eq!(summary.borrowed_count, 2);
    assert_eq!(summary.loan_days, 7);
    assert_eq!(summary.fine_per_day, FINE_PER_DAY);
    assert_eq!(summary.storage_location, "memory");
}

#[test]
fn stock_tracks_active_loans_through_mixed_operations() {
    let mut service = service_on(date(2024, 3, 1));
    let a = service
        .add_book(&BookDraft::new("Alpha", "X", 1990, 3))
        .unwrap();
    let b = service
        .add_book(&BookDraft::new("Beta", "Y", 1991, 1))
        .unwrap();
    assert_stock_matches_loans(&service);

    let mut open = Vec::new();
    for borrower in ["p1", "p2", "p3", "p4"] {
        if let Ok(loan) = service.borrow_book(&a.id, borrower) {
            open.push(loan.trx_id);
        }
        assert_stock_matches_loans(&service);
    }
    assert_eq!(open.len(), 3);

    service
        .update_book(&a.id, &BookDraft::new("Alpha", "X", 1990, 5))
        .unwrap();
    assert_eq!(service.find_book(&a.id).unwrap().stock_avail, 2);
    assert_stock_matches_loans(&service);

    assert!(service
        .update_book(&a.id, &BookDraft::new("Alpha", "X", 1990, 2))
        .is_err());
    assert_stock_matches_loans(&service);

    service.borrow_book(&b.id, "p5").unwrap();
    assert!(service.borrow_book(&b.id, "p6").is_err());
    assert_stock_matches_loans(&service);

    service.clock().advance_days(3);
    for trx_id in &open {
        service.return_book(trx_id).unwrap();
        assert_stock_matches_loans(&service);
    }
    assert_eq!(service.find_book(&a.id).unwrap().stock_avail, 5);
    assert_eq!(service.borrowed_count(), 1);
}
