//! Service layer for proposing and committing team groupings.

use super::error::{CompetitionServiceError, CompetitionServiceResult, ensure_operator};
use crate::competition::{
    config::CompetitionConfig,
    domain::{
        Caller, CompetitionDomainError, FormationPlan, Project, ProjectId, ProposedTeam,
        SubmissionRef, Team, TeamId, TeamName, TeamSize, ensure_disjoint_members, form_teams,
        stagger_creation_times,
    },
    ports::{CandidatePoolProvider, ProjectRepository, TeamRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, instrument};

/// Request payload for proposing a team grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposeTeamsRequest {
    project_id: ProjectId,
    team_size: Option<u32>,
}

impl ProposeTeamsRequest {
    /// Creates a request that uses the project's configured team size.
    #[must_use]
    pub const fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            team_size: None,
        }
    }

    /// Overrides the project's team size for this proposal.
    #[must_use]
    pub const fn with_team_size(mut self, team_size: u32) -> Self {
        self.team_size = Some(team_size);
        self
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Request payload for committing a reviewed grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTeamsRequest {
    project_id: ProjectId,
    teams: Vec<ProposedTeam>,
    names: Vec<String>,
}

impl CommitTeamsRequest {
    /// Creates a commit request; `names[i]` names `teams[i]`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        teams: impl IntoIterator<Item = ProposedTeam>,
        names: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            project_id,
            teams: teams.into_iter().collect(),
            names: names.into_iter().collect(),
        }
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Team formation orchestration service.
#[derive(Clone)]
pub struct TeamFormationService<S, P, C>
where
    S: ProjectRepository + TeamRepository,
    P: CandidatePoolProvider,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    candidates: Arc<P>,
    clock: Arc<C>,
    config: CompetitionConfig,
}

impl<S, P, C> TeamFormationService<S, P, C>
where
    S: ProjectRepository + TeamRepository,
    P: CandidatePoolProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new formation service with default configuration.
    #[must_use]
    pub fn new(store: Arc<S>, candidates: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            candidates,
            clock,
            config: CompetitionConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: CompetitionConfig) -> Self {
        self.config = config;
        self
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

    /// Proposes a deterministic grouping of the project's eligible
    /// candidates. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::Forbidden`] for non-operators,
    /// [`CompetitionServiceError::ProjectNotFound`], candidate provider
    /// errors, or domain errors for an invalid team size or pool.
    #[instrument(skip_all, fields(project_id = %request.project_id()))]
    pub async fn propose_teams(
        &self,
        caller: &Caller,
        request: ProposeTeamsRequest,
    ) -> CompetitionServiceResult<FormationPlan> {
        ensure_operator(caller, "propose teams")?;
        let project = self.find_project_or_error(request.project_id).await?;
        let team_size = match request.team_size {
            Some(value) => TeamSize::new(value)?,
            None => project.team_size(),
        };
        self.config.check_team_size(team_size)?;

        let pool = self.candidates.eligible_candidates(project.id()).await?;
        let plan = form_teams(&pool, team_size)?;
        info!(
            candidates = pool.len(),
            team_size = team_size.value(),
            teams = plan.teams().len(),
            "proposed team grouping"
        );
        Ok(plan)
    }

    /// Persists a reviewed grouping as the project's teams.
    ///
    /// Teams are created in request order. Creation timestamps are strictly
    /// increasing in that order, even when the clock does not advance.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::Forbidden`] for non-operators,
    /// domain errors for empty teams, blank names, mismatched name counts or
    /// members assigned twice, and repository conflicts when teams already
    /// exist or the project has left `created`.
    #[instrument(skip_all, fields(project_id = %request.project_id()))]
    pub async fn commit_teams(
        &self,
        caller: &Caller,
        request: CommitTeamsRequest,
    ) -> CompetitionServiceResult<Vec<Team>> {
        ensure_operator(caller, "commit teams")?;
        let project = self.find_project_or_error(request.project_id).await?;
        if request.teams.is_empty() {
            return Err(CompetitionDomainError::NoTeamsToCommit.into());
        }
        if request.teams.len() != request.names.len() {
            return Err(CompetitionDomainError::TeamNameCountMismatch {
                teams: request.teams.len(),
                names: request.names.len(),
            }
            .into());
        }

        let mut teams = request
            .teams
            .into_iter()
            .zip(request.names)
            .map(|(proposed, name)| {
                Team::new(
                    project.id(),
                    TeamName::new(name)?,
                    proposed.into_member_ids(),
                    &*self.clock,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        ensure_disjoint_members(&teams)?;
        stagger_creation_times(&mut teams);

        self.store.commit(project.id(), &teams).await?;
        info!(teams = teams.len(), "committed teams");
        Ok(teams)
    }

    /// Lists a project's committed teams ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::ProjectNotFound`] or persistence
    /// errors.
    pub async fn list_teams(&self, project_id: ProjectId) -> CompetitionServiceResult<Vec<Team>> {
        let project = self.find_project_or_error(project_id).await?;
        Ok(self.store.find_by_project(project.id()).await?)
    }

    /// Records a team's submission reference.
    ///
    /// Operators and members of the team may attach submissions.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::TeamNotFound`],
    /// [`CompetitionServiceError::Forbidden`] for other callers, or a domain
    /// error for a blank reference.
    #[instrument(skip_all, fields(team_id = %team_id))]
    pub async fn attach_submission(
        &self,
        caller: &Caller,
        team_id: TeamId,
        reference: impl Into<String> + Send,
    ) -> CompetitionServiceResult<Team> {
        let submission = SubmissionRef::new(reference)?;
        let mut team = self
            .store
            .find_team(team_id)
            .await?
            .ok_or(CompetitionServiceError::TeamNotFound(team_id))?;
        if !caller.is_operator() && !team.has_member(caller.user_id()) {
            return Err(CompetitionServiceError::forbidden(
                caller,
                "attach a submission to another team",
            ));
        }

        team.attach_submission(submission);
        self.store.update(&team).await?;
        info!("attached submission");
        Ok(team)
    }
}
