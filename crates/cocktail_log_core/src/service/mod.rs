//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep front ends decoupled from storage details.
//! - Return structured outcomes; formatting user-facing text is the caller's job.

pub mod recipe_service;
pub mod review_service;
pub mod status;

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

use crate::model::validation::ValidationError;

/// Source of "today" for creation and import defaults.
pub type Clock = fn() -> NaiveDate;

/// Current date in the local timezone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Outcome of a bulk import.
///
/// Rejections are per record and never abort the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Distinct ids written (inserted or replaced). A batch repeating an id
    /// counts it once.
    pub imported: usize,
    pub rejected: Vec<ImportRejection>,
}

/// One record that failed decoding or validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRejection {
    /// Position in the input array.
    pub index: usize,
    /// The record as it appeared in the input.
    pub record: Value,
    pub reason: ValidationError,
}

/// Collapses records that share an id.
///
/// The last record for an id wins and takes the slot of the first one, so
/// the result holds each id once.
pub(crate) fn last_wins_by_id<T>(records: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<T> = Vec::with_capacity(records.len());
    for record in records {
        let existing = slots.get(id(&record)).copied();
        match existing {
            Some(slot) => unique[slot] = record,
            None => {
                slots.insert(id(&record).to_string(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}
