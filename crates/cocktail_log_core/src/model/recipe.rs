//! Recipe domain model.
//!
//! # Responsibility
//! - Represent imported cocktail definitions used for name autocomplete.
//! - Carry recipe fields this crate does not interpret (ingredients,
//!   instructions, ...) through import/export unchanged.
//!
//! # Invariants
//! - `id` is non-empty text; numeric ids in import files are stored as text.
//! - `name` is stored trimmed and is never empty.

use crate::model::validation::{import_id, json_kind, ValidationError, ValidationReason};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Recipe identifier as it appears in the source dataset.
pub type RecipeId = String;

/// Imported cocktail definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Opaque fields, flattened back into the object on export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("id", ValidationReason::Empty));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", ValidationReason::Empty));
        }
        Ok(())
    }

    /// Decodes one import value.
    ///
    /// Accepts string or integer ids and generates one when absent. Every key
    /// other than `id` and `name` is kept in `extra`.
    pub fn from_import_json(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(object) = value else {
            return Err(ValidationError::malformed(
                "record",
                "expected a JSON object",
            ));
        };

        let mut extra = object.clone();
        let id = import_id(extra.remove("id"))?.unwrap_or_else(|| Uuid::new_v4().to_string());
        let name = match extra.remove("name") {
            None | Some(Value::Null) => {
                return Err(ValidationError::new("name", ValidationReason::Missing));
            }
            Some(Value::String(text)) => text.trim().to_string(),
            Some(other) => {
                return Err(ValidationError::malformed(
                    "name",
                    format!("expected string, got {}", json_kind(&other)),
                ));
            }
        };

        let recipe = Self { id, name, extra };
        recipe.validate()?;
        Ok(recipe)
    }
}
