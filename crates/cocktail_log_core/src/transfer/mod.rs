//! JSON import/export documents.
//!
//! # Responsibility
//! - Parse review/recipe array files and the combined backup document.
//! - Produce export documents that `import_*` accepts unchanged.
//!
//! # Invariants
//! - Document-level shape errors are `TransferError::Malformed`; per-record
//!   problems are reported in `ImportReport::rejected`.
//! - Backup import writes recipes before reviews; each half is its own
//!   transaction.

use crate::model::recipe::Recipe;
use crate::model::review::Review;
use crate::model::validation::json_kind;
use crate::repo::recipe_repo::SqliteRecipeRepository;
use crate::repo::review_repo::{RepoError, SqliteReviewRepository};
use crate::service::recipe_service::RecipeService;
use crate::service::review_service::ReviewService;
use crate::service::ImportReport;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BACKUP_RECIPES_KEY: &str = "recipes";
const BACKUP_REVIEWS_KEY: &str = "reviews";

pub type TransferResult<T> = Result<T, TransferError>;

/// Error for whole-document transfer operations.
#[derive(Debug)]
pub enum TransferError {
    /// Input is not valid JSON or not the expected top-level shape.
    Malformed(String),
    /// Output could not be serialized.
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed import document: {message}"),
            Self::Encode(err) => write!(f, "failed to encode export document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(_) => None,
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Combined backup of every collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupDocument {
    pub recipes: Vec<Recipe>,
    pub reviews: Vec<Review>,
}

/// Per-collection reports for a backup import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupImportReport {
    pub recipes: ImportReport,
    pub reviews: ImportReport,
}

/// Parses a top-level JSON array of records.
pub fn parse_record_array(text: &str) -> TransferResult<Vec<Value>> {
    match parse_json(text)? {
        Value::Array(records) => Ok(records),
        other => Err(TransferError::Malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Imports a review array document.
pub fn import_reviews_document(conn: &mut Connection, text: &str) -> TransferResult<ImportReport> {
    let records = parse_record_array(text)?;
    let mut service = ReviewService::new(SqliteReviewRepository::try_new(conn)?);
    Ok(service.bulk_import(&records)?)
}

/// Imports a recipe array document.
pub fn import_recipes_document(conn: &mut Connection, text: &str) -> TransferResult<ImportReport> {
    let records = parse_record_array(text)?;
    let mut service = RecipeService::new(SqliteRecipeRepository::try_new(conn)?);
    Ok(service.bulk_import(&records)?)
}

/// Imports a `{ "recipes": [...], "reviews": [...] }` backup.
///
/// A missing key counts as an empty array.
pub fn import_backup_document(
    conn: &mut Connection,
    text: &str,
) -> TransferResult<BackupImportReport> {
    let Value::Object(mut object) = parse_json(text)? else {
        return Err(TransferError::Malformed(
            "expected a JSON object with `recipes` and `reviews`".to_string(),
        ));
    };
    let recipes = take_array(&mut object, BACKUP_RECIPES_KEY)?;
    let reviews = take_array(&mut object, BACKUP_REVIEWS_KEY)?;

    let recipe_report = {
        let mut service = RecipeService::new(SqliteRecipeRepository::try_new(conn)?);
        service.bulk_import(&recipes)?
    };
    let review_report = {
        let mut service = ReviewService::new(SqliteReviewRepository::try_new(conn)?);
        service.bulk_import(&reviews)?
    };

    Ok(BackupImportReport {
        recipes: recipe_report,
        reviews: review_report,
    })
}

/// Snapshot of every collection.
pub fn export_backup(conn: &mut Connection) -> TransferResult<BackupDocument> {
    let recipes = RecipeService::new(SqliteRecipeRepository::try_new(conn)?).bulk_export()?;
    let reviews = ReviewService::new(SqliteReviewRepository::try_new(conn)?).bulk_export()?;
    Ok(BackupDocument { recipes, reviews })
}

/// Pretty-printed review array.
pub fn export_reviews_document(conn: &mut Connection) -> TransferResult<String> {
    let reviews = ReviewService::new(SqliteReviewRepository::try_new(conn)?).bulk_export()?;
    to_document(&reviews)
}

/// Pretty-printed recipe array.
pub fn export_recipes_document(conn: &mut Connection) -> TransferResult<String> {
    let recipes = RecipeService::new(SqliteRecipeRepository::try_new(conn)?).bulk_export()?;
    to_document(&recipes)
}

/// Pretty-printed backup object.
pub fn export_backup_document(conn: &mut Connection) -> TransferResult<String> {
    to_document(&export_backup(conn)?)
}

fn to_document<T: Serialize + ?Sized>(value: &T) -> TransferResult<String> {
    serde_json::to_string_pretty(value).map_err(TransferError::Encode)
}

fn parse_json(text: &str) -> TransferResult<Value> {
    serde_json::from_str(text).map_err(|err| TransferError::Malformed(err.to_string()))
}

fn take_array(
    object: &mut serde_json::Map<String, Value>,
    key: &'static str,
) -> TransferResult<Vec<Value>> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(TransferError::Malformed(format!(
            "`{key}` must be an array, got {}",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_record_array, TransferError};

    #[test]
    fn record_array_rejects_non_arrays_and_bad_json() {
        assert!(parse_record_array("[]").unwrap().is_empty());
        assert!(matches!(
            parse_record_array("{\"reviews\": []}"),
            Err(TransferError::Malformed(message)) if message.contains("object")
        ));
        assert!(matches!(
            parse_record_array("[{"),
            Err(TransferError::Malformed(_))
        ));
    }
}
