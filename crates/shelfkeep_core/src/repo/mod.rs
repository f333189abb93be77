//! In-memory record repository.
//!
//! # Responsibility
//! - Hold the authoritative book and loan collections for the process.
//! - Generate sequence ids and answer identity lookups.
//! - Orchestrate whole-state load/save through a `RecordStore`.
//!
//! # Invariants
//! - Collections keep insertion order; that order is the "natural" view order.
//! - A failed `load()` leaves the previous in-memory state untouched.
//! - Only the lending service mutates the collections.

pub mod library_repo;
