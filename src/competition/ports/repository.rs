//! Repository ports for projects, teams, ratings and ranking snapshots.
//!
//! Each entity gets the narrow set of operations the services use:
//! read-by-key, read-many-by-project, keyed upsert and insert-once.

use super::CompetitionRepositoryResult;
use crate::competition::domain::{
    Project, ProjectId, ProjectStatus, RankingSnapshot, Rating, Team, TeamId, UserId,
};
use async_trait::async_trait;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::DuplicateProject`] when
    /// the identifier already exists.
    async fn store(&self, project: &Project) -> CompetitionRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> CompetitionRepositoryResult<Option<Project>>;

    /// Persists `project` only if the stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::StatusConflict`] when
    /// another caller changed the status first, or
    /// [`super::CompetitionRepositoryError::ProjectNotFound`].
    async fn compare_and_set_status(
        &self,
        project: &Project,
        expected: ProjectStatus,
    ) -> CompetitionRepositoryResult<()>;
}

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Inserts the full team set for a project exactly once.
    ///
    /// The project must still be in [`ProjectStatus::Created`], checked in
    /// the same atomic unit as the insert.
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::TeamsAlreadyCommitted`]
    /// for a second commit,
    /// [`super::CompetitionRepositoryError::ProjectNotOpen`] once the
    /// project has left `created`, or
    /// [`super::CompetitionRepositoryError::ProjectNotFound`].
    async fn commit(&self, project_id: ProjectId, teams: &[Team])
    -> CompetitionRepositoryResult<()>;

    /// Persists changes to an existing team (submission reference).
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::TeamNotFound`] when the
    /// team does not exist.
    async fn update(&self, team: &Team) -> CompetitionRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_team(&self, id: TeamId) -> CompetitionRepositoryResult<Option<Team>>;

    /// Returns a project's teams ordered by creation time.
    async fn find_by_project(&self, project_id: ProjectId) -> CompetitionRepositoryResult<Vec<Team>>;
}

/// Rating persistence contract.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Inserts or replaces the `(rater, team)` row.
    ///
    /// The team's project must be in [`ProjectStatus::Judging`], checked in
    /// the same atomic unit as the write.
    ///
    /// # Errors
    ///
    /// Returns [`super::CompetitionRepositoryError::ProjectNotOpen`] outside
    /// the judging phase or
    /// [`super::CompetitionRepositoryError::TeamNotFound`].
    async fn upsert(&self, rating: &Rating) -> CompetitionRepositoryResult<()>;

    /// Returns the rater's current rating for a team.
    async fn find_rating(
        &self,
        rater_id: UserId,
        team_id: TeamId,
    ) -> CompetitionRepositoryResult<Option<Rating>>;

    /// Returns every current rating for a team.
    async fn find_by_team(&self, team_id: TeamId) -> CompetitionRepositoryResult<Vec<Rating>>;
}

/// Ranking snapshot read contract.
///
/// Snapshots are written only through [`super::JudgingLedger::finalize`].
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// Returns the frozen ranking for a project, if judging has completed.
    async fn find_ranking(
        &self,
        project_id: ProjectId,
    ) -> CompetitionRepositoryResult<Option<RankingSnapshot>>;
}
