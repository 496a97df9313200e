//! Outcome notifications.
//!
//! Every command ends with exactly one human-readable line. The core only
//! returns structured results; all wording lives here.

use cocktail_log_core::{
    BackupImportReport, DatabaseStatus, ImportReport, ValidationError, ValidationReason,
};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// One-line outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

pub fn review_logged() -> Notice {
    Notice::success("Review logged successfully!")
}

pub fn validation_failed(err: &ValidationError) -> Notice {
    let message = match (err.field, &err.reason) {
        ("recipeName", _) => "Please enter a cocktail name".to_string(),
        ("rating", ValidationReason::NotHalfStep) => {
            "Rating must be a multiple of 0.5".to_string()
        }
        ("rating", _) => "Rating must be between 1.0 and 10.0".to_string(),
        (field, reason) => format!("Invalid {field}: {reason}"),
    };
    Notice::error(message)
}

pub fn reviews_listed(count: usize) -> Notice {
    if count == 0 {
        Notice::info("No reviews found")
    } else {
        Notice::info(format!("{count} {}", plural(count, "review", "reviews")))
    }
}

pub fn review_deleted(id: &str, existed: bool) -> Notice {
    if existed {
        Notice::success("Review deleted")
    } else {
        Notice::info(format!("No review with id {id}"))
    }
}

pub fn imported(collection: &str, report: &ImportReport) -> Notice {
    let message = format!(
        "Imported {} {collection}{}",
        report.imported,
        rejected_suffix(report)
    );
    if report.imported == 0 && !report.rejected.is_empty() {
        Notice::error(message)
    } else {
        Notice::success(message)
    }
}

pub fn backup_imported(report: &BackupImportReport) -> Notice {
    let rejected = report.recipes.rejected.len() + report.reviews.rejected.len();
    let mut message = format!(
        "Imported {} recipes and {} reviews",
        report.recipes.imported, report.reviews.imported
    );
    if rejected > 0 {
        message.push_str(&format!(", rejected {rejected}"));
    }
    Notice::success(message)
}

pub fn exported(label: &str) -> Notice {
    Notice::success(format!("{label} exported"))
}

pub fn clear_needs_confirmation() -> Notice {
    Notice::error("Data clearing requires confirmation; rerun with --yes")
}

pub fn cleared(recipes: usize, reviews: usize) -> Notice {
    Notice::success(format!(
        "Deleted {recipes} {} and {reviews} {}",
        plural(recipes, "recipe", "recipes"),
        plural(reviews, "review", "reviews")
    ))
}

pub fn status(status: &DatabaseStatus) -> Notice {
    Notice::info(format!(
        "{} recipes, {} reviews",
        status.recipes, status.reviews
    ))
}

pub fn suggestions(count: usize) -> Notice {
    Notice::info(format!("{count} {}", plural(count, "suggestion", "suggestions")))
}

fn rejected_suffix(report: &ImportReport) -> String {
    match report.rejected.first() {
        None => String::new(),
        Some(first) => format!(
            ", rejected {} (first: record {} {})",
            report.rejected.len(),
            first.index,
            first.reason
        ),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
