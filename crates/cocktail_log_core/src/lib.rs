//! Core domain logic for the cocktail review log.
//! This crate is the single source of truth for rating bands and review
//! invariants; front ends only collect input and present results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::rating::{classify, format_rating, rating_scale, RatingBand, RatingClass};
pub use model::recipe::{Recipe, RecipeId};
pub use model::review::{Review, ReviewDraft, ReviewId, ReviewImportRecord};
pub use model::validation::{ValidationError, ValidationReason};
pub use repo::recipe_repo::{RecipeListQuery, RecipeRepository, SqliteRecipeRepository};
pub use repo::review_repo::{
    RepoError, RepoResult, ReviewListQuery, ReviewRepository, ReviewSort, SqliteReviewRepository,
};
pub use service::recipe_service::RecipeService;
pub use service::review_service::ReviewService;
pub use service::status::{database_status, DatabaseStatus};
pub use service::{local_today, Clock, ImportRejection, ImportReport};
pub use transfer::{BackupDocument, BackupImportReport, TransferError, TransferResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
