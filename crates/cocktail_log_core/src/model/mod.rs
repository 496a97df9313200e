//! Domain model for reviews, recipes and rating bands.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own record invariants so every write path validates the same way.
//!
//! # Invariants
//! - Every review is identified by a stable `ReviewId`.
//! - Rating thresholds live only in `rating`; views never re-derive them.

pub mod rating;
pub mod recipe;
pub mod review;
pub mod validation;
