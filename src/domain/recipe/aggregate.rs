//! Recipe aggregate entity.
//!
//! A recipe owns its validated content, its rating ledger and the derived
//! rating summary, plus the view and favorite counters.
//!
//! # Invariants
//!
//! - `author` never changes after creation
//! - `summary` always equals `RatingSummary::from_scores(ledger)`; the
//!   only ledger mutator is [`Recipe::submit_rating`], which recalculates
//! - `views` only grows; `favorites` never drops below zero
//! - `version` increases by one on every content update

use serde::{Deserialize, Serialize};

use super::draft::{RecipeContent, RecipePatch};
use super::errors::RecipeError;
use super::ledger::{LedgerChange, RatingLedger, RatingSubmission};
use super::rating_summary::RatingSummary;
use crate::domain::foundation::{RecipeId, Timestamp, UserId};

/// Recipe aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    id: RecipeId,
    author: UserId,
    content: RecipeContent,
    ratings: RatingLedger,
    summary: RatingSummary,
    views: u64,
    favorites: u64,
    version: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Recipe {
    /// Creates a recipe with an empty ledger and zeroed counters.
    pub fn new(id: RecipeId, author: UserId, content: RecipeContent, now: Timestamp) -> Self {
        Self {
            id,
            author,
            content,
            ratings: RatingLedger::new(),
            summary: RatingSummary::default(),
            views: 0,
            favorites: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a recipe from persistence (no validation).
    ///
    /// The summary is recomputed from the ledger rather than trusted.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: RecipeId,
        author: UserId,
        content: RecipeContent,
        ratings: RatingLedger,
        views: u64,
        favorites: u64,
        version: i64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        let summary = RatingSummary::from_scores(ratings.scores());
        Self {
            id,
            author,
            content,
            ratings,
            summary,
            views,
            favorites,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }

    pub fn content(&self) -> &RecipeContent {
        &self.content
    }

    pub fn ratings(&self) -> &RatingLedger {
        &self.ratings
    }

    pub fn summary(&self) -> RatingSummary {
        self.summary
    }

    pub fn average_rating(&self) -> f64 {
        self.summary.average_rating()
    }

    pub fn total_ratings(&self) -> u32 {
        self.summary.total_ratings()
    }

    /// Cooking plus preparation time, computed on read.
    pub fn total_time(&self) -> u64 {
        u64::from(self.content.cooking_time) + u64::from(self.content.prep_time)
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn favorites(&self) -> u64 {
        self.favorites
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn is_public(&self) -> bool {
        self.content.is_public
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_author(&self, user_id: &UserId) -> bool {
        &self.author == user_id
    }

    /// Validates that the actor may modify or delete this recipe.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not the author
    pub fn authorize(&self, actor: &UserId) -> Result<(), RecipeError> {
        if self.is_author(actor) {
            Ok(())
        } else {
            Err(RecipeError::forbidden())
        }
    }

    /// Public recipes are visible to everyone, private ones to their author.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        self.content.is_public || viewer.is_some_and(|v| self.is_author(v))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Merges a partial update into the content.
    ///
    /// Derived fields cannot be expressed by a patch, so they stay as
    /// computed.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not the author
    /// - `Validation` with every violation of the merged content
    pub fn apply_patch(
        &mut self,
        actor: &UserId,
        patch: RecipePatch,
        now: Timestamp,
    ) -> Result<(), RecipeError> {
        self.authorize(actor)?;
        let content = patch.overlay(&self.content).validate()?;

        self.content = content;
        self.version += 1;
        self.updated_at = now;
        Ok(())
    }

    /// Upserts the user's rating and recalculates the summary in the same
    /// step.
    pub fn submit_rating(
        &mut self,
        user_id: &UserId,
        submission: &RatingSubmission,
        now: Timestamp,
    ) -> LedgerChange {
        let change = self.ratings.upsert(user_id, submission, now);
        self.summary = RatingSummary::from_scores(self.ratings.scores());
        self.updated_at = now;
        change
    }

    /// Counts one view.
    pub fn record_view(&mut self) -> u64 {
        self.views = self.views.saturating_add(1);
        self.views
    }

    /// Adjusts the favorite counter by one in either direction, flooring at
    /// zero.
    pub fn adjust_favorites(&mut self, favorited: bool) -> u64 {
        self.favorites = if favorited {
            self.favorites.saturating_add(1)
        } else {
            self.favorites.saturating_sub(1)
        };
        self.favorites
    }
}
