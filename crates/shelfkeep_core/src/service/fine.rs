//! Overdue fine policy.

use crate::model::loan::Loan;
use chrono::NaiveDate;

/// Fine charged per day past the due date, in minor currency units.
pub const FINE_PER_DAY: u64 = 2000;

/// Whole days `on` lies past `due_date`; zero when on time or early.
pub fn days_late(due_date: NaiveDate, on: NaiveDate) -> u64 {
    u64::try_from(on.signed_duration_since(due_date).num_days()).unwrap_or(0)
}

/// Fine for a copy returned on `return_date`. Never negative.
pub fn calculate_fine(due_date: NaiveDate, return_date: NaiveDate) -> u64 {
    days_late(due_date, return_date).saturating_mul(FINE_PER_DAY)
}

/// Fine to display for `loan` as of `as_of`.
///
/// Returned loans report their stored fine. Borrowed loans report what the
/// fine would be if returned on `as_of`; the loan itself is not touched.
pub fn projected_fine(loan: &Loan, as_of: NaiveDate) -> u64 {
    if loan.is_active() {
        calculate_fine(loan.due_date, as_of)
    } else {
        loan.fine
    }
}
