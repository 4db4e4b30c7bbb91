//! Rating ledger: the ordered, one-entry-per-user collection of ratings
//! attached to a recipe.
//!
//! # Invariants
//!
//! - At most one entry per user. A second submission from the same user
//!   replaces the first in place (same position, same `created_at`).
//! - Entries are only added or replaced through [`RatingLedger::upsert`],
//!   which is crate-private; the public way in is `Recipe::submit_rating`,
//!   which recalculates the aggregate in the same call.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

/// Maximum length of a rating comment.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// A star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(ValidationError::out_of_range(
                "rating",
                i64::from(Self::MIN),
                i64::from(Self::MAX),
                value,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// A validated rating request: score plus normalized comment.
///
/// An absent comment becomes the empty string, so re-rating without a
/// comment clears the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSubmission {
    score: Score,
    comment: String,
}

impl RatingSubmission {
    /// Validates a raw rating; reports every violation.
    pub fn new(rating: i64, comment: Option<&str>) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let score = Score::new(rating).map_err(|e| errors.push(e)).ok();

        let comment = comment.map(str::trim).unwrap_or_default().to_string();
        let length = comment.chars().count();
        if length > MAX_COMMENT_LENGTH {
            errors.push(ValidationError::too_long("comment", MAX_COMMENT_LENGTH, length));
        }

        match score {
            Some(score) if errors.is_empty() => Ok(Self { score, comment }),
            _ => Err(errors),
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// One user's rating of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub user_id: UserId,
    pub score: Score,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What an upsert did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
    /// A new entry was appended at the end.
    Appended,
    /// The user's existing entry at this index was overwritten.
    Replaced { index: usize },
}

/// Ordered collection of rating entries, unique by user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingLedger {
    entries: Vec<RatingEntry>,
}

impl RatingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored entries, collapsing duplicate users
    /// onto their first position (last write wins on the values).
    pub fn from_entries(entries: Vec<RatingEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            match ledger.position_of(&entry.user_id) {
                Some(index) => {
                    let existing = &mut ledger.entries[index];
                    existing.score = entry.score;
                    existing.comment = entry.comment;
                    existing.updated_at = entry.updated_at;
                }
                None => ledger.entries.push(entry),
            }
        }
        ledger
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for(&self, user_id: &UserId) -> Option<&RatingEntry> {
        self.entries.iter().find(|e| &e.user_id == user_id)
    }

    pub fn scores(&self) -> impl Iterator<Item = Score> + '_ {
        self.entries.iter().map(|e| e.score)
    }

    /// Insert-or-replace keyed by user.
    pub(crate) fn upsert(
        &mut self,
        user_id: &UserId,
        submission: &RatingSubmission,
        now: Timestamp,
    ) -> LedgerChange {
        match self.position_of(user_id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.score = submission.score();
                entry.comment = submission.comment().to_string();
                entry.updated_at = now;
                LedgerChange::Replaced { index }
            }
            None => {
                self.entries.push(RatingEntry {
                    user_id: user_id.clone(),
                    score: submission.score(),
                    comment: submission.comment().to_string(),
                    created_at: now,
                    updated_at: now,
                });
                LedgerChange::Appended
            }
        }
    }

    fn position_of(&self, user_id: &UserId) -> Option<usize> {
        self.entries.iter().position(|e| &e.user_id == user_id)
    }
}
