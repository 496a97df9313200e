//! Recipe use-case service.
//!
//! # Responsibility
//! - Import/export the recipe dataset and clear it.
//! - Serve recipe-name autocomplete for the logging form.
//!
//! # Invariants
//! - Recipes have no create path; import is the only way in.

use crate::model::recipe::Recipe;
use crate::repo::recipe_repo::{RecipeListQuery, RecipeRepository};
use crate::repo::review_repo::RepoResult;
use crate::service::{last_wins_by_id, ImportRejection, ImportReport};
use log::{info, warn};
use serde_json::Value;
use std::time::Instant;

const SUGGEST_DEFAULT_LIMIT: usize = 8;
const SUGGEST_LIMIT_MAX: usize = 50;

/// Use-case service wrapper for recipe operations.
pub struct RecipeService<R: RecipeRepository> {
    repo: R,
}

impl<R: RecipeRepository> RecipeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>> {
        self.repo.list_recipes(query)
    }

    /// Imports recipe-like JSON objects, merging by id.
    ///
    /// Same per-record contract as review import; fields other than `id` and
    /// `name` are stored untouched.
    pub fn bulk_import(&mut self, records: &[Value]) -> RepoResult<ImportReport> {
        let started_at = Instant::now();
        let mut accepted = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match Recipe::from_import_json(record) {
                Ok(recipe) => accepted.push(recipe),
                Err(reason) => rejected.push(ImportRejection {
                    index,
                    record: record.clone(),
                    reason,
                }),
            }
        }

        let accepted = last_wins_by_id(accepted, |recipe| recipe.id.as_str());
        let imported = self.repo.upsert_recipes(&accepted)?;
        info!(
            "event=recipe_import module=recipe status=ok imported={} rejected={} duration_ms={}",
            imported,
            rejected.len(),
            started_at.elapsed().as_millis()
        );
        Ok(ImportReport { imported, rejected })
    }

    pub fn bulk_export(&self) -> RepoResult<Vec<Recipe>> {
        let recipes = self.repo.list_recipes(&RecipeListQuery::default())?;
        info!(
            "event=recipe_export module=recipe status=ok count={}",
            recipes.len()
        );
        Ok(recipes)
    }

    /// Irreversibly removes every recipe and returns the removed count.
    pub fn clear_all(&mut self) -> RepoResult<usize> {
        let removed = self.repo.clear_recipes()?;
        warn!(
            "event=recipe_clear_all module=recipe status=ok removed={}",
            removed
        );
        Ok(removed)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_recipes()
    }

    /// Autocomplete names for `prefix`.
    ///
    /// `limit` defaults to 8 and clamps to 50. A blank prefix yields nothing.
    pub fn suggest_names(&self, prefix: &str, limit: Option<usize>) -> RepoResult<Vec<String>> {
        let limit = limit
            .unwrap_or(SUGGEST_DEFAULT_LIMIT)
            .min(SUGGEST_LIMIT_MAX);
        self.repo.suggest_recipe_names(prefix, limit)
    }
}
