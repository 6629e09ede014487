//! Service layer for project creation and phase transitions.

use super::error::{CompetitionServiceError, CompetitionServiceResult, ensure_operator};
use crate::competition::{
    domain::{
        Caller, CompetitionDomainError, JudgingCriterion, Project, ProjectId, ProjectStatus,
        RankingCandidate, RankingSnapshot, Rating, ScoreAverage, TeamSize, ensure_transition,
    },
    ports::{
        CompetitionRepositoryError, CompletedJudging, FinalizeJudging, JudgingLedger,
        JudgingSnapshot, ProjectRepository, RankingRepository, TeamRepository,
    },
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    team_size: u32,
    criteria: Vec<(String, u32)>,
}

impl CreateProjectRequest {
    /// Creates a request with required project fields.
    #[must_use]
    pub fn new(name: impl Into<String>, team_size: u32) -> Self {
        Self {
            name: name.into(),
            team_size,
            criteria: Vec::new(),
        }
    }

    /// Appends a weighted judging criterion.
    #[must_use]
    pub fn with_criterion(mut self, name: impl Into<String>, weight: u32) -> Self {
        self.criteria.push((name.into(), weight));
        self
    }
}

/// Request payload for a phase transition.
///
/// `from` is the status the caller last observed; the transition fails with
/// a conflict if the persisted status has moved since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceStatusRequest {
    project_id: ProjectId,
    from: ProjectStatus,
    to: ProjectStatus,
}

impl AdvanceStatusRequest {
    /// Creates a transition request.
    #[must_use]
    pub const fn new(project_id: ProjectId, from: ProjectStatus, to: ProjectStatus) -> Self {
        Self {
            project_id,
            from,
            to,
        }
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Project lifecycle orchestration service.
#[derive(Clone)]
pub struct ProjectLifecycleService<S, C>
where
    S: ProjectRepository + TeamRepository + RankingRepository + JudgingLedger,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectLifecycleService<S, C>
where
    S: ProjectRepository + TeamRepository + RankingRepository + JudgingLedger,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    async fn find_project_or_error(
        &self,
        project_id: ProjectId,
    ) -> CompetitionServiceResult<Project> {
        self.store
            .find_by_id(project_id)
            .await?
            .ok_or(CompetitionServiceError::ProjectNotFound(project_id))
    }

    /// Creates a project owned by the calling operator.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::Forbidden`] for non-operators or
    /// domain errors for an invalid name, team size or criteria.
    #[instrument(skip_all)]
    pub async fn create_project(
        &self,
        caller: &Caller,
        request: CreateProjectRequest,
    ) -> CompetitionServiceResult<Project> {
        ensure_operator(caller, "create projects")?;
        let team_size = TeamSize::new(request.team_size)?;
        let criteria = request
            .criteria
            .into_iter()
            .map(|(name, weight)| JudgingCriterion::new(name, weight))
            .collect::<Result<Vec<_>, _>>()?;
        let project = Project::new(
            request.name,
            caller.user_id(),
            team_size,
            criteria,
            &*self.clock,
        )?;
        self.store.store(&project).await?;
        info!(project_id = %project.id(), "created project");
        Ok(project)
    }

    /// Returns a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::ProjectNotFound`] or persistence
    /// errors.
    pub async fn get_project(&self, project_id: ProjectId) -> CompetitionServiceResult<Project> {
        self.find_project_or_error(project_id).await
    }

    /// Advances a project along `created -> judging -> completed`.
    ///
    /// Completing judging freezes the ranking in the same atomic unit as
    /// the status change.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::Forbidden`] for non-operators,
    /// [`CompetitionServiceError::ProjectNotFound`] for unknown projects,
    /// [`CompetitionDomainError::InvalidStatusTransition`] for any edge other
    /// than the two forward ones,
    /// [`CompetitionRepositoryError::StatusConflict`] when `from` is stale,
    /// and [`CompetitionServiceError::NoTeamsCommitted`] when judging would
    /// start without teams.
    #[instrument(skip_all, fields(project_id = %request.project_id(), from = %request.from, to = %request.to))]
    pub async fn advance_status(
        &self,
        caller: &Caller,
        request: AdvanceStatusRequest,
    ) -> CompetitionServiceResult<Project> {
        ensure_operator(caller, "advance project status")?;
        let project = self.find_project_or_error(request.project_id).await?;
        ensure_transition(project.id(), request.from, request.to)?;
        if project.status() != request.from {
            warn!(actual = %project.status(), "stale status observed");
            return Err(CompetitionRepositoryError::StatusConflict {
                project_id: project.id(),
                expected: request.from,
                actual: project.status(),
            }
            .into());
        }

        // Only created -> judging and judging -> completed survive
        // ensure_transition.
        let result = if request.to == ProjectStatus::Judging {
            self.start_judging(project).await
        } else {
            self.complete_judging(project.id()).await
        };
        if let Err(CompetitionServiceError::Repository(
            CompetitionRepositoryError::StatusConflict { actual, .. },
        )) = &result
        {
            warn!(%actual, "lost status race");
        }
        result
    }

    async fn start_judging(&self, mut project: Project) -> CompetitionServiceResult<Project> {
        let teams = self.store.find_by_project(project.id()).await?;
        if teams.is_empty() {
            return Err(CompetitionServiceError::NoTeamsCommitted(project.id()));
        }

        project.transition_to(ProjectStatus::Judging, &*self.clock)?;
        self.store
            .compare_and_set_status(&project, ProjectStatus::Created)
            .await?;
        info!(teams = teams.len(), "judging started");
        Ok(project)
    }

    async fn complete_judging(&self, project_id: ProjectId) -> CompetitionServiceResult<Project> {
        let clock = Arc::clone(&self.clock);
        let finalize: FinalizeJudging = Box::new(move |snapshot| close_judging(snapshot, &*clock));
        let completed = self
            .store
            .finalize(project_id, ProjectStatus::Judging, finalize)
            .await?;
        info!(
            teams = completed.ranking.entries().len(),
            "judging completed and ranking frozen"
        );
        Ok(completed.project)
    }

    /// Returns the frozen ranking of a completed project.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::ProjectNotFound`] for unknown
    /// projects and [`CompetitionServiceError::RankingNotFound`] until
    /// judging has completed.
    pub async fn get_ranking(
        &self,
        project_id: ProjectId,
    ) -> CompetitionServiceResult<RankingSnapshot> {
        let project = self.find_project_or_error(project_id).await?;
        self.store
            .find_ranking(project.id())
            .await?
            .ok_or(CompetitionServiceError::RankingNotFound(project_id))
    }
}

/// Flips the snapshot's project to `completed` and ranks its teams.
fn close_judging(
    snapshot: JudgingSnapshot,
    clock: &impl Clock,
) -> Result<CompletedJudging, CompetitionDomainError> {
    let JudgingSnapshot {
        mut project,
        teams,
        ratings,
    } = snapshot;
    project.transition_to(ProjectStatus::Completed, clock)?;

    let candidates = teams
        .iter()
        .map(|team| RankingCandidate {
            team_id: team.id(),
            created_at: team.created_at(),
            average: ScoreAverage::from_scores(
                ratings
                    .iter()
                    .filter(|rating| rating.team_id() == team.id())
                    .map(Rating::score),
            ),
        })
        .collect();
    let ranking = RankingSnapshot::freeze(project.id(), candidates, project.updated_at());
    Ok(CompletedJudging { project, ranking })
}
