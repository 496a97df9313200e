//! Record counts per collection.

use crate::repo::recipe_repo::{RecipeRepository, SqliteRecipeRepository};
use crate::repo::review_repo::{RepoResult, ReviewRepository, SqliteReviewRepository};
use rusqlite::Connection;

/// Snapshot of how much data the local database holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStatus {
    pub recipes: u64,
    pub reviews: u64,
}

/// Counts recipes and reviews on a migrated connection.
pub fn database_status(conn: &mut Connection) -> RepoResult<DatabaseStatus> {
    let recipes = SqliteRecipeRepository::try_new(conn)?.count_recipes()?;
    let reviews = SqliteReviewRepository::try_new(conn)?.count_reviews()?;
    Ok(DatabaseStatus { recipes, reviews })
}
