//! Lending use-cases.
//!
//! # Responsibility
//! - Own every business rule: validation, stock bookkeeping, loan lifecycle
//!   and fines.
//! - Expose the operation set presentation shells call into.
//!
//! # Invariants
//! - Operations either apply completely or return an error with no mutation.
//! - `stock_total - stock_avail` equals the active loan count of each book.

pub mod error;
pub mod fine;
pub mod lending_service;
pub mod sorting;
pub mod views;
