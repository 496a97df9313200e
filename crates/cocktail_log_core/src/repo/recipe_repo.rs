//! Recipe repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist imported recipes with their opaque extra fields.
//! - Serve name listings and autocomplete lookups.
//!
//! # Invariants
//! - Recipes only enter storage through `upsert_recipes` (merge-by-id).
//! - `extra_json` always holds a JSON object.

use crate::model::recipe::Recipe;
use crate::repo::review_repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde_json::Value;

const RECIPE_COLUMNS: &[&str] = &["id", "name", "extra_json"];

/// Query options for listing recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    /// Case-insensitive substring over the recipe name. Empty matches all.
    pub text: String,
}

/// Repository interface for recipe persistence.
pub trait RecipeRepository {
    /// Inserts or replaces recipes by id, all in one transaction.
    fn upsert_recipes(&mut self, recipes: &[Recipe]) -> RepoResult<usize>;
    /// Returns matching recipes ordered by name, then id.
    fn list_recipes(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>>;
    /// Returns distinct names starting with `prefix` (case-insensitive).
    fn suggest_recipe_names(&self, prefix: &str, limit: usize) -> RepoResult<Vec<String>>;
    fn clear_recipes(&mut self) -> RepoResult<usize>;
    fn count_recipes(&self) -> RepoResult<u64>;
}

/// SQLite-backed recipe repository.
pub struct SqliteRecipeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecipeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "recipes", RECIPE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl RecipeRepository for SqliteRecipeRepository<'_> {
    fn upsert_recipes(&mut self, recipes: &[Recipe]) -> RepoResult<usize> {
        let mut rows = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            recipe.validate()?;
            let extra_json = serde_json::to_string(&recipe.extra).map_err(|err| {
                RepoError::InvalidData(format!("recipe `{}` extra fields: {err}", recipe.id))
            })?;
            rows.push((recipe, extra_json));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO recipes (id, name, extra_json)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    extra_json = excluded.extra_json;",
            )?;
            for (recipe, extra_json) in &rows {
                stmt.execute(params![
                    recipe.id.as_str(),
                    recipe.name.as_str(),
                    extra_json.as_str()
                ])?;
            }
        }
        tx.commit()?;

        Ok(rows.len())
    }

    fn list_recipes(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>> {
        let needle = query.text.to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT id, name, extra_json
             FROM recipes
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut recipes = Vec::new();

        while let Some(row) = rows.next()? {
            let recipe = parse_recipe_row(row)?;
            if needle.is_empty() || recipe.name.to_lowercase().contains(&needle) {
                recipes.push(recipe);
            }
        }

        Ok(recipes)
    }

    fn suggest_recipe_names(&self, prefix: &str, limit: usize) -> RepoResult<Vec<String>> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT name
             FROM recipes
             ORDER BY name COLLATE NOCASE ASC, name ASC;",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .take(limit)
            .collect())
    }

    fn clear_recipes(&mut self) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM recipes;", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn count_recipes(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative recipe count `{count}`")))
    }
}

fn parse_recipe_row(row: &Row<'_>) -> RepoResult<Recipe> {
    let id: String = row.get("id")?;
    let extra_text: String = row.get("extra_json")?;
    let extra = match serde_json::from_str::<Value>(&extra_text) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            return Err(RepoError::InvalidData(format!(
                "recipes.extra_json for `{id}` is not a JSON object"
            )));
        }
    };

    let recipe = Recipe {
        id,
        name: row.get("name")?,
        extra,
    };
    recipe
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("recipe `{}`: {err}", recipe.id)))?;
    Ok(recipe)
}
