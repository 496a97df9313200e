//! Review domain model.
//!
//! # Responsibility
//! - Define the canonical review record and the form draft it is built from.
//! - Decode loosely shaped import records into validated reviews.
//!
//! # Invariants
//! - `id` is non-empty text and, like `date_created`, never changes.
//! - `recipe_name` is stored trimmed and is never empty.
//! - `rating` is finite, within `[1.0, 10.0]` and a multiple of `0.5`.

use crate::model::rating::check_rating;
use crate::model::validation::{import_id, json_kind, ValidationError, ValidationReason};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable review identifier.
///
/// New reviews get a v4 UUID string; imported files may carry any
/// non-empty text or integer id (`"1"`, `42`).
pub type ReviewId = String;

/// Fresh id for a review created in this app.
pub fn new_review_id() -> ReviewId {
    Uuid::new_v4().to_string()
}

/// Rating preselected by the logging form.
pub const DEFAULT_DRAFT_RATING: f64 = 7.0;

/// Date formats accepted on import, tried in order.
const IMPORT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One logged tasting of a cocktail.
///
/// Serialized with camelCase keys; this is also the export file shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub recipe_name: String,
    pub rating: f64,
    pub date_made: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub modifications: String,
    /// Set once at creation; default sort key ("date added").
    pub date_created: NaiveDate,
}

impl Review {
    /// Builds a validated review from form input.
    ///
    /// The draft is borrowed so callers keep their entered values when
    /// validation fails.
    pub fn from_draft(
        draft: &ReviewDraft,
        id: ReviewId,
        date_created: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let review = Self {
            id,
            recipe_name: draft.recipe_name.trim().to_string(),
            rating: draft.rating,
            date_made: draft.date_made.unwrap_or(date_created),
            notes: draft.notes.clone(),
            venue: draft.venue.clone(),
            occasion: draft.occasion.clone(),
            modifications: draft.modifications.clone(),
            date_created,
        };
        review.validate()?;
        Ok(review)
    }

    /// Checks record invariants.
    ///
    /// Name is checked before rating so form errors surface top-down.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("id", ValidationReason::Empty));
        }
        validate_recipe_name(&self.recipe_name)?;
        validate_rating(self.rating)
    }

    /// Returns whether `query` (already lowercased) occurs in any searchable
    /// text field.
    pub(crate) fn matches_lowercase(&self, query: &str) -> bool {
        query.is_empty()
            || [
                self.recipe_name.as_str(),
                self.notes.as_str(),
                self.venue.as_str(),
                self.occasion.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}

/// Form input for creating a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub recipe_name: String,
    pub rating: f64,
    /// `None` means "same day as created".
    pub date_made: Option<NaiveDate>,
    pub notes: String,
    pub venue: String,
    pub occasion: String,
    pub modifications: String,
}

impl ReviewDraft {
    pub fn new(recipe_name: impl Into<String>, rating: f64) -> Self {
        Self {
            recipe_name: recipe_name.into(),
            rating,
            ..Self::default()
        }
    }
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            recipe_name: String::new(),
            rating: DEFAULT_DRAFT_RATING,
            date_made: None,
            notes: String::new(),
            venue: String::new(),
            occasion: String::new(),
            modifications: String::new(),
        }
    }
}

/// Review-like record as found in import files.
///
/// Every field is optional at decode time; [`ReviewImportRecord::into_review`]
/// applies defaults and invariants. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewImportRecord {
    /// Decoded by [`ReviewImportRecord::from_json`], which accepts text or
    /// integer ids.
    #[serde(skip)]
    pub id: Option<ReviewId>,
    pub recipe_name: Option<String>,
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_import_date")]
    pub date_made: Option<NaiveDate>,
    pub notes: Option<String>,
    pub venue: Option<String>,
    pub occasion: Option<String>,
    pub modifications: Option<String>,
    #[serde(default, deserialize_with = "deserialize_import_date")]
    pub date_created: Option<NaiveDate>,
}

impl ReviewImportRecord {
    /// Decodes one JSON value, mapping shape errors to a `record` rejection.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(object) = value else {
            return Err(ValidationError::malformed(
                "record",
                format!("expected a JSON object, got {}", json_kind(value)),
            ));
        };
        let mut fields = object.clone();
        let id = import_id(fields.remove("id"))?;

        let mut record: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|err| ValidationError::malformed("record", err.to_string()))?;
        record.id = id;
        Ok(record)
    }

    /// Applies import defaults and validates.
    ///
    /// - missing `id` gets a fresh v4 id
    /// - missing `dateCreated` becomes `today`
    /// - missing `dateMade` becomes `dateCreated`
    pub fn into_review(self, today: NaiveDate) -> Result<Review, ValidationError> {
        let recipe_name = self
            .recipe_name
            .ok_or_else(|| ValidationError::new("recipeName", ValidationReason::Missing))?;
        let rating = self
            .rating
            .ok_or_else(|| ValidationError::new("rating", ValidationReason::Missing))?;
        let date_created = self.date_created.unwrap_or(today);

        let review = Review {
            id: self.id.unwrap_or_else(new_review_id),
            recipe_name: recipe_name.trim().to_string(),
            rating,
            date_made: self.date_made.unwrap_or(date_created),
            notes: self.notes.unwrap_or_default(),
            venue: self.venue.unwrap_or_default(),
            occasion: self.occasion.unwrap_or_default(),
            modifications: self.modifications.unwrap_or_default(),
            date_created,
        };
        review.validate()?;
        Ok(review)
    }
}

pub(crate) fn validate_recipe_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("recipeName", ValidationReason::Empty));
    }
    Ok(())
}

pub(crate) fn validate_rating(value: f64) -> Result<(), ValidationError> {
    check_rating(value).map_err(|reason| ValidationError::new("rating", reason))
}

/// Parses a calendar date in any of [`IMPORT_DATE_FORMATS`].
pub fn parse_import_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    IMPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn deserialize_import_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_import_date(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{text}`"))),
    }
}
