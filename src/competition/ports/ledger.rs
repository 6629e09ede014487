//! Atomic unit of work that closes judging and freezes the ranking.

use super::CompetitionRepositoryResult;
use crate::competition::domain::{
    CompetitionDomainError, Project, ProjectId, ProjectStatus, RankingSnapshot, Rating, Team,
};
use async_trait::async_trait;

/// Consistent view of a project handed to the finalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgingSnapshot {
    /// Project as persisted when the unit of work began.
    pub project: Project,
    /// Every committed team of the project.
    pub teams: Vec<Team>,
    /// Every current rating for those teams.
    pub ratings: Vec<Rating>,
}

/// Result of a successful judging close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedJudging {
    /// Project after the status change.
    pub project: Project,
    /// Ranking recorded with the status change.
    pub ranking: RankingSnapshot,
}

/// Pure computation run inside the ledger's atomic unit.
pub type FinalizeJudging =
    Box<dyn FnOnce(JudgingSnapshot) -> Result<CompletedJudging, CompetitionDomainError> + Send>;

/// Persistence contract for the `judging -> completed` transition.
#[async_trait]
pub trait JudgingLedger: Send + Sync {
    /// Runs `finalize` over a consistent snapshot and records its output.
    ///
    /// Implementations must, as one atomic unit: verify the persisted status
    /// equals `observed`, read the project's teams and ratings, run
    /// `finalize`, insert the ranking and store the updated project. No
    /// rating write may be partially visible to `finalize`.
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::StatusConflict`] when the
    /// status moved, [`super::CompetitionRepositoryError::RankingAlreadyFrozen`]
    /// when a ranking exists, or
    /// [`super::CompetitionRepositoryError::Rejected`] when `finalize` fails.
    async fn finalize(
        &self,
        project_id: ProjectId,
        observed: ProjectStatus,
        finalize: FinalizeJudging,
    ) -> CompetitionRepositoryResult<CompletedJudging>;
}
