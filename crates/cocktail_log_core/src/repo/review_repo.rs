//! Review repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable create/list/delete/bulk APIs over `reviews` storage.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Review::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Bulk upserts run in one `IMMEDIATE` transaction; readers never see a
//!   partially applied batch.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::review::{Review, ReviewId};
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    recipe_name,
    rating,
    date_made,
    notes,
    venue,
    occasion,
    modifications,
    date_created
FROM reviews";

const REVIEW_COLUMNS: &[&str] = &[
    "id",
    "recipe_name",
    "rating",
    "date_made",
    "notes",
    "venue",
    "occasion",
    "modifications",
    "date_created",
];

pub(crate) const DB_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for review and recipe persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Reserved for lookups by id; `delete` is idempotent and never returns it.
    NotFound(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort order for review listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewSort {
    /// Newest `date_created` first.
    #[default]
    DateAdded,
    /// Newest `date_made` first.
    DateMade,
    /// Highest rating first.
    Rating,
    /// Recipe name A-Z, case-insensitive.
    Name,
}

impl ReviewSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateAdded => "dateAdded",
            Self::DateMade => "dateMade",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }

    fn order_by_sql(self) -> &'static str {
        match self {
            Self::DateAdded => "date_created DESC, id ASC",
            Self::DateMade => "date_made DESC, id ASC",
            Self::Rating => "rating DESC, id ASC",
            Self::Name => "recipe_name COLLATE NOCASE ASC, id ASC",
        }
    }
}

impl FromStr for ReviewSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "dateAdded" | "date-added" | "date_added" => Ok(Self::DateAdded),
            "dateMade" | "date-made" | "date_made" => Ok(Self::DateMade),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            other => Err(format!(
                "unsupported sort `{other}`; expected dateAdded|dateMade|rating|name"
            )),
        }
    }
}

/// Query options for listing reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewListQuery {
    /// Case-insensitive substring over name, notes, venue and occasion.
    /// Empty matches everything.
    pub text: String,
    pub sort: ReviewSort,
}

impl ReviewListQuery {
    pub fn new(text: impl Into<String>, sort: ReviewSort) -> Self {
        Self {
            text: text.into(),
            sort,
        }
    }
}

/// Repository interface for review persistence.
pub trait ReviewRepository {
    /// Inserts one new review. Fails on duplicate id.
    fn insert_review(&mut self, review: &Review) -> RepoResult<ReviewId>;
    /// Inserts or replaces reviews by id, all in one transaction.
    fn upsert_reviews(&mut self, reviews: &[Review]) -> RepoResult<usize>;
    /// Returns a filtered, ordered snapshot.
    fn list_reviews(&self, query: &ReviewListQuery) -> RepoResult<Vec<Review>>;
    /// Removes one review; `false` when it did not exist.
    fn delete_review(&mut self, id: &str) -> RepoResult<bool>;
    /// Removes every review and returns how many were removed.
    fn clear_reviews(&mut self) -> RepoResult<usize>;
    fn count_reviews(&self) -> RepoResult<u64>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that did not go through `open_db*`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "reviews", REVIEW_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn insert_review(&mut self, review: &Review) -> RepoResult<ReviewId> {
        review.validate()?;

        self.conn.execute(
            "INSERT INTO reviews (
                id,
                recipe_name,
                rating,
                date_made,
                notes,
                venue,
                occasion,
                modifications,
                date_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                review.id.as_str(),
                review.recipe_name.as_str(),
                review.rating,
                date_to_db(review.date_made),
                review.notes.as_str(),
                review.venue.as_str(),
                review.occasion.as_str(),
                review.modifications.as_str(),
                date_to_db(review.date_created),
            ],
        )?;

        Ok(review.id.clone())
    }

    fn upsert_reviews(&mut self, reviews: &[Review]) -> RepoResult<usize> {
        for review in reviews {
            review.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO reviews (
                    id,
                    recipe_name,
                    rating,
                    date_made,
                    notes,
                    venue,
                    occasion,
                    modifications,
                    date_created
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(id) DO UPDATE SET
                    recipe_name = excluded.recipe_name,
                    rating = excluded.rating,
                    date_made = excluded.date_made,
                    notes = excluded.notes,
                    venue = excluded.venue,
                    occasion = excluded.occasion,
                    modifications = excluded.modifications,
                    date_created = excluded.date_created;",
            )?;
            for review in reviews {
                stmt.execute(params![
                    review.id.as_str(),
                    review.recipe_name.as_str(),
                    review.rating,
                    date_to_db(review.date_made),
                    review.notes.as_str(),
                    review.venue.as_str(),
                    review.occasion.as_str(),
                    review.modifications.as_str(),
                    date_to_db(review.date_created),
                ])?;
            }
        }
        tx.commit()?;

        Ok(reviews.len())
    }

    fn list_reviews(&self, query: &ReviewListQuery) -> RepoResult<Vec<Review>> {
        let sql = format!(
            "{REVIEW_SELECT_SQL} ORDER BY {};",
            query.sort.order_by_sql()
        );
        let needle = query.text.to_lowercase();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut reviews = Vec::new();

        while let Some(row) = rows.next()? {
            let review = parse_review_row(row)?;
            // Unicode-aware matching; SQLite LIKE folds ASCII only.
            if review.matches_lowercase(&needle) {
                reviews.push(review);
            }
        }

        Ok(reviews)
    }

    fn delete_review(&mut self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn clear_reviews(&mut self) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM reviews;", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn count_reviews(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM reviews;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative review count `{count}`")))
    }
}

/// Verifies schema version, table and columns before a repository uses `conn`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version > expected_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }
        .into());
    }

    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    for column in columns {
        if !existing.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let review = Review {
        id: row.get("id")?,
        recipe_name: row.get("recipe_name")?,
        rating: row.get("rating")?,
        date_made: parse_db_date(row, "date_made")?,
        notes: row.get("notes")?,
        venue: row.get("venue")?,
        occasion: row.get("occasion")?,
        modifications: row.get("modifications")?,
        date_created: parse_db_date(row, "date_created")?,
    };
    review.validate().map_err(|err| {
        RepoError::InvalidData(format!("review `{}` violates invariants: {err}", review.id))
    })?;
    Ok(review)
}

fn parse_db_date(row: &Row<'_>, column: &'static str) -> RepoResult<NaiveDate> {
    let text: String = row.get(column)?;
    NaiveDate::parse_from_str(&text, DB_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{text}` in reviews.{column}"))
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DB_DATE_FORMAT).to_string()
}
