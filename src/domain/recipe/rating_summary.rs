//! Aggregate recalculation: the derived (average, count) pair of a ledger.

use serde::{Deserialize, Serialize};

use super::ledger::Score;

/// Derived rating aggregate.
///
/// Only ever produced by [`RatingSummary::from_scores`]; there is no setter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    average_rating: f64,
    total_ratings: u32,
}

impl RatingSummary {
    /// Recomputes the aggregate from the full sequence of scores.
    ///
    /// The mean is rounded half-up to one decimal place using integer
    /// arithmetic, so `[4, 5]` gives exactly `4.5` and `[1, 1, 2]` gives
    /// `1.3`. An empty ledger yields `0.0` and `0`.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Score>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s.value()), count + 1));

        if count == 0 {
            return Self::default();
        }

        // round(sum / count, 1) == floor((20 * sum + count) / (2 * count)) / 10
        let tenths = (20 * sum + count) / (2 * count);
        Self {
            average_rating: tenths as f64 / 10.0,
            total_ratings: count as u32,
        }
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn total_ratings(&self) -> u32 {
        self.total_ratings
    }
}
