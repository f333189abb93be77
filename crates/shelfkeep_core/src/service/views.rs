//! Read-only projections handed to presentation shells.

use crate::model::loan::Loan;
use serde::Serialize;

/// Loan row with the fine a history view should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanListing {
    pub loan: Loan,
    /// Stored fine for returned loans, live projection for borrowed ones.
    pub displayed_fine: u64,
    pub overdue: bool,
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    pub title_count: usize,
    pub total_copies: u64,
    pub borrowed_count: usize,
    pub loan_days: u64,
    pub fine_per_day: u64,
    pub storage_location: String,
}
