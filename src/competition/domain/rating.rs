//! Rating values and their exact arithmetic mean.

use super::{CompetitionDomainError, TeamId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Integer rating score in the inclusive range `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Score(u8);

impl Score {
    /// Lowest accepted score.
    pub const MIN: u8 = 0;
    /// Highest accepted score.
    pub const MAX: u8 = 10;

    /// Creates a validated score.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::ScoreOutOfRange`] when the value is
    /// below zero or above ten.
    pub fn new(value: i32) -> Result<Self, CompetitionDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|score| (Self::MIN..=Self::MAX).contains(score))
            .map(Self)
            .ok_or(CompetitionDomainError::ScoreOutOfRange(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Score {
    type Error = CompetitionDomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i32 {
    fn from(score: Score) -> Self {
        Self::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rater's current score for one team.
///
/// Keyed by `(rater_id, team_id)`; resubmission replaces the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    rater_id: UserId,
    team_id: TeamId,
    score: Score,
    updated_at: DateTime<Utc>,
}

impl Rating {
    /// Creates a rating stamped with the current clock time.
    #[must_use]
    pub fn new(rater_id: UserId, team_id: TeamId, score: Score, clock: &impl Clock) -> Self {
        Self::from_persisted(rater_id, team_id, score, clock.utc())
    }

    /// Reconstructs a rating from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        rater_id: UserId,
        team_id: TeamId,
        score: Score,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rater_id,
            team_id,
            score,
            updated_at,
        }
    }

    /// Returns the rater.
    #[must_use]
    pub const fn rater_id(&self) -> UserId {
        self.rater_id
    }

    /// Returns the rated team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the score.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Returns the time of the latest submission.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Exact arithmetic mean of one or more scores.
///
/// Kept as `total / count` so ranking comparisons never suffer float
/// rounding; `8/1` and `16/2` compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreAverage {
    total: u32,
    count: u32,
}

impl ScoreAverage {
    /// Averages `scores`, returning `None` when there are none.
    #[must_use]
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Option<Self> {
        let (total, count) = scores.into_iter().fold((0_u32, 0_u32), |(total, count), score| {
            (
                total.saturating_add(u32::from(score.value())),
                count.saturating_add(1),
            )
        });
        (count > 0).then_some(Self { total, count })
    }

    /// Returns the sum of the averaged scores.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.total
    }

    /// Returns how many scores were averaged.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Returns the mean as a float for display.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "display value only; comparisons use exact integer arithmetic"
    )]
    pub fn value(self) -> f64 {
        f64::from(self.total) / f64::from(self.count)
    }
}

impl PartialEq for ScoreAverage {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoreAverage {}

impl PartialOrd for ScoreAverage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreAverage {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.total) * u64::from(other.count);
        let rhs = u64::from(other.total) * u64::from(self.count);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for ScoreAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}
