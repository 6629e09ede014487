//! Frozen team ranking computed when judging completes.

use super::{ProjectId, ScoreAverage, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ranking input for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingCandidate {
    /// Team being ranked.
    pub team_id: TeamId,
    /// Team creation time; earlier teams win ties.
    pub created_at: DateTime<Utc>,
    /// Current average, or `None` when the team has no ratings.
    pub average: Option<ScoreAverage>,
}

impl RankingCandidate {
    /// Orders candidates best-first.
    ///
    /// `None < Some(_)` for `Option`, so comparing averages in reverse puts
    /// unrated teams last without changing their displayed value.
    fn ranking_order(&self, other: &Self) -> Ordering {
        other
            .average
            .cmp(&self.average)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.team_id.cmp(&other.team_id))
    }
}

/// One team's position in a ranking snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    team_id: TeamId,
    rank: u32,
}

impl RankingEntry {
    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(team_id: TeamId, rank: u32) -> Self {
        Self { team_id, rank }
    }

    /// Returns the ranked team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the 1-based rank.
    #[must_use]
    pub const fn rank(&self) -> u32 {
        self.rank
    }
}

/// Orders teams and assigns dense ranks `1..=N`.
///
/// Ordering is total: average descending (unrated last), then creation time
/// ascending, then team identifier ascending. No two entries share a rank.
#[must_use]
pub fn compute_ranking(mut candidates: Vec<RankingCandidate>) -> Vec<RankingEntry> {
    candidates.sort_by(RankingCandidate::ranking_order);
    (1_u32..)
        .zip(candidates)
        .map(|(rank, candidate)| RankingEntry {
            team_id: candidate.team_id,
            rank,
        })
        .collect()
}

/// Immutable ranking recorded for a completed project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    project_id: ProjectId,
    entries: Vec<RankingEntry>,
    frozen_at: DateTime<Utc>,
}

impl RankingSnapshot {
    /// Computes and freezes the ranking for `project_id`.
    #[must_use]
    pub fn freeze(
        project_id: ProjectId,
        candidates: Vec<RankingCandidate>,
        frozen_at: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id,
            entries: compute_ranking(candidates),
            frozen_at,
        }
    }

    /// Reconstructs a snapshot from persisted entries.
    ///
    /// Entries are re-sorted by rank.
    #[must_use]
    pub fn from_persisted(
        project_id: ProjectId,
        mut entries: Vec<RankingEntry>,
        frozen_at: DateTime<Utc>,
    ) -> Self {
        entries.sort_by_key(RankingEntry::rank);
        Self {
            project_id,
            entries,
            frozen_at,
        }
    }

    /// Returns the ranked project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns entries ordered by rank.
    #[must_use]
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// Returns the rank of `team_id`, if the team is ranked.
    #[must_use]
    pub fn rank_of(&self, team_id: TeamId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.team_id == team_id)
            .map(RankingEntry::rank)
    }

    /// Returns when the ranking was frozen.
    #[must_use]
    pub const fn frozen_at(&self) -> DateTime<Utc> {
        self.frozen_at
    }
}
