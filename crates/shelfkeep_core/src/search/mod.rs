//! Quick-filter search over in-memory records.
//!
//! # Invariants
//! - Query text is matched literally (regex metacharacters are escaped).
//! - Matching is case-insensitive and never reorders results.

pub mod book_filter;
