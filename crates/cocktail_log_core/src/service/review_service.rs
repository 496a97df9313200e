//! Review use-case service.
//!
//! # Responsibility
//! - Create reviews from form drafts, assigning id and creation date.
//! - Run bulk import/export and the destructive clear-all.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - `clear_all` is only reachable under its own name.
//! - Logged events carry counts and ids, never review text.

use crate::model::review::{new_review_id, Review, ReviewDraft, ReviewImportRecord};
use crate::repo::review_repo::{RepoResult, ReviewListQuery, ReviewRepository};
use crate::service::{last_wins_by_id, local_today, Clock, ImportRejection, ImportReport};
use log::{info, warn};
use serde_json::Value;
use std::time::Instant;

/// Use-case service wrapper for review operations.
pub struct ReviewService<R: ReviewRepository> {
    repo: R,
    clock: Clock,
}

impl<R: ReviewRepository> ReviewService<R> {
    /// Creates a service dated by the local clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, local_today)
    }

    /// Creates a service with an explicit date source.
    pub fn with_clock(repo: R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Validates and stores a new review.
    ///
    /// # Contract
    /// - Assigns a fresh v4 id and `date_created = today`.
    /// - `date_made` defaults to `date_created`.
    /// - Returns `RepoError::Validation` without touching storage when the
    ///   draft is invalid; the draft itself is left unchanged.
    pub fn create(&mut self, draft: &ReviewDraft) -> RepoResult<Review> {
        let started_at = Instant::now();
        let review = match Review::from_draft(draft, new_review_id(), (self.clock)()) {
            Ok(review) => review,
            Err(err) => {
                warn!(
                    "event=review_create module=review status=rejected field={}",
                    err.field
                );
                return Err(err.into());
            }
        };

        self.repo.insert_review(&review)?;
        info!(
            "event=review_create module=review status=ok review_id={} duration_ms={}",
            review.id,
            started_at.elapsed().as_millis()
        );
        Ok(review)
    }

    /// Lists reviews matching `query`, as an owned snapshot.
    pub fn list(&self, query: &ReviewListQuery) -> RepoResult<Vec<Review>> {
        self.repo.list_reviews(query)
    }

    /// Deletes one review. Missing ids return `false`.
    pub fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let existed = self.repo.delete_review(id)?;
        info!(
            "event=review_delete module=review status=ok review_id={} existed={}",
            id, existed
        );
        Ok(existed)
    }

    /// Imports review-like JSON records, merging by id.
    ///
    /// # Contract
    /// - Each record is decoded and validated on its own; failures are
    ///   reported in `rejected` and do not stop the batch.
    /// - Accepted records are written in one transaction; a storage error
    ///   rolls back every accepted record and is returned as-is.
    /// - When several records share an id the last one is kept and
    ///   `imported` counts the id once.
    /// - Unknown keys are dropped.
    pub fn bulk_import(&mut self, records: &[Value]) -> RepoResult<ImportReport> {
        let started_at = Instant::now();
        let today = (self.clock)();
        let mut accepted = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match ReviewImportRecord::from_json(record).and_then(|parsed| parsed.into_review(today))
            {
                Ok(review) => accepted.push(review),
                Err(reason) => rejected.push(ImportRejection {
                    index,
                    record: record.clone(),
                    reason,
                }),
            }
        }

        let accepted = last_wins_by_id(accepted, |review| review.id.as_str());
        let imported = self.repo.upsert_reviews(&accepted)?;
        info!(
            "event=review_import module=review status=ok imported={} rejected={} duration_ms={}",
            imported,
            rejected.len(),
            started_at.elapsed().as_millis()
        );
        Ok(ImportReport { imported, rejected })
    }

    /// Full snapshot in "date added" order; feeds back into `bulk_import`.
    pub fn bulk_export(&self) -> RepoResult<Vec<Review>> {
        let reviews = self.repo.list_reviews(&ReviewListQuery::default())?;
        info!(
            "event=review_export module=review status=ok count={}",
            reviews.len()
        );
        Ok(reviews)
    }

    /// Irreversibly removes every review and returns the removed count.
    ///
    /// Callers are expected to obtain explicit user confirmation first.
    pub fn clear_all(&mut self) -> RepoResult<usize> {
        let removed = self.repo.clear_reviews()?;
        warn!(
            "event=review_clear_all module=review status=ok removed={}",
            removed
        );
        Ok(removed)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_reviews()
    }
}
