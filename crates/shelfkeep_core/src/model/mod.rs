//! Library domain model: books on the shelf and the loans drawn against them.
//!
//! # Responsibility
//! - Define the canonical records shared by codec, repository and service.
//! - Keep the loan lifecycle (`Borrowed` -> `Returned`) explicit in types.
//!
//! # Invariants
//! - Book ids (`B####`) and loan ids (`T#####`) are immutable once assigned.
//! - A loan references its book by id only and keeps its own title snapshot.

pub mod book;
pub mod loan;
