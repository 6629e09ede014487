//! In-memory competition store implementing every persistence port.
//!
//! One `RwLock` guards all tables, so each port call is a single atomic unit
//! and [`JudgingLedger::finalize`] sees ratings exactly as of the status flip.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::competition::{
    domain::{Project, ProjectId, ProjectStatus, RankingSnapshot, Rating, Team, TeamId, UserId},
    ports::{
        CompetitionRepositoryError, CompetitionRepositoryResult, CompletedJudging,
        FinalizeJudging, JudgingLedger, JudgingSnapshot, ProjectRepository, RankingRepository,
        RatingRepository, TeamRepository,
    },
};

/// Thread-safe in-memory competition store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompetitionStore {
    state: Arc<RwLock<InMemoryCompetitionState>>,
}

#[derive(Debug, Default)]
struct InMemoryCompetitionState {
    projects: HashMap<ProjectId, Project>,
    teams: HashMap<TeamId, Team>,
    project_teams: HashMap<ProjectId, Vec<TeamId>>,
    ratings: HashMap<(UserId, TeamId), Rating>,
    rankings: HashMap<ProjectId, RankingSnapshot>,
}

impl InMemoryCompetitionStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CompetitionRepositoryResult<RwLockReadGuard<'_, InMemoryCompetitionState>> {
        self.state.read().map_err(|err| {
            CompetitionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> CompetitionRepositoryResult<RwLockWriteGuard<'_, InMemoryCompetitionState>> {
        self.state.write().map_err(|err| {
            CompetitionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryCompetitionState {
    fn project(&self, project_id: ProjectId) -> CompetitionRepositoryResult<&Project> {
        self.projects
            .get(&project_id)
            .ok_or(CompetitionRepositoryError::ProjectNotFound(project_id))
    }

    fn teams_of(&self, project_id: ProjectId) -> Vec<Team> {
        self.project_teams
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.teams.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ratings_of(&self, teams: &[Team]) -> Vec<Rating> {
        self.ratings
            .values()
            .filter(|rating| teams.iter().any(|team| team.id() == rating.team_id()))
            .cloned()
            .collect()
    }
}

/// Fails with [`CompetitionRepositoryError::ProjectNotOpen`] unless `project`
/// is in `required`.
fn ensure_open(project: &Project, required: ProjectStatus) -> CompetitionRepositoryResult<()> {
    if project.status() == required {
        return Ok(());
    }
    Err(CompetitionRepositoryError::ProjectNotOpen {
        project_id: project.id(),
        status: project.status(),
    })
}

/// Fails with [`CompetitionRepositoryError::StatusConflict`] unless the
/// persisted status equals `expected`.
fn ensure_status(project: &Project, expected: ProjectStatus) -> CompetitionRepositoryResult<()> {
    if project.status() == expected {
        return Ok(());
    }
    Err(CompetitionRepositoryError::StatusConflict {
        project_id: project.id(),
        expected,
        actual: project.status(),
    })
}

#[async_trait]
impl ProjectRepository for InMemoryCompetitionStore {
    async fn store(&self, project: &Project) -> CompetitionRepositoryResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id()) {
            return Err(CompetitionRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> CompetitionRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn compare_and_set_status(
        &self,
        project: &Project,
        expected: ProjectStatus,
    ) -> CompetitionRepositoryResult<()> {
        let mut state = self.write()?;
        ensure_status(state.project(project.id())?, expected)?;
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for InMemoryCompetitionStore {
    async fn commit(
        &self,
        project_id: ProjectId,
        teams: &[Team],
    ) -> CompetitionRepositoryResult<()> {
        let mut state = self.write()?;
        ensure_open(state.project(project_id)?, ProjectStatus::Created)?;
        if state.project_teams.contains_key(&project_id) {
            return Err(CompetitionRepositoryError::TeamsAlreadyCommitted(project_id));
        }

        let ids = teams.iter().map(Team::id).collect();
        for team in teams {
            state.teams.insert(team.id(), team.clone());
        }
        state.project_teams.insert(project_id, ids);
        Ok(())
    }

    async fn update(&self, team: &Team) -> CompetitionRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .teams
            .get_mut(&team.id())
            .ok_or(CompetitionRepositoryError::TeamNotFound(team.id()))?;
        *stored = team.clone();
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> CompetitionRepositoryResult<Option<Team>> {
        let state = self.read()?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> CompetitionRepositoryResult<Vec<Team>> {
        let state = self.read()?;
        let mut teams = state.teams_of(project_id);
        teams.sort_by_key(Team::created_at);
        Ok(teams)
    }
}

#[async_trait]
impl RatingRepository for InMemoryCompetitionStore {
    async fn upsert(&self, rating: &Rating) -> CompetitionRepositoryResult<()> {
        let mut state = self.write()?;
        let project_id = state
            .teams
            .get(&rating.team_id())
            .ok_or(CompetitionRepositoryError::TeamNotFound(rating.team_id()))?
            .project_id();
        ensure_open(state.project(project_id)?, ProjectStatus::Judging)?;
        state
            .ratings
            .insert((rating.rater_id(), rating.team_id()), rating.clone());
        Ok(())
    }

    async fn find_rating(
        &self,
        rater_id: UserId,
        team_id: TeamId,
    ) -> CompetitionRepositoryResult<Option<Rating>> {
        let state = self.read()?;
        Ok(state.ratings.get(&(rater_id, team_id)).cloned())
    }

    async fn find_by_team(&self, team_id: TeamId) -> CompetitionRepositoryResult<Vec<Rating>> {
        let state = self.read()?;
        Ok(state
            .ratings
            .values()
            .filter(|rating| rating.team_id() == team_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RankingRepository for InMemoryCompetitionStore {
    async fn find_ranking(
        &self,
        project_id: ProjectId,
    ) -> CompetitionRepositoryResult<Option<RankingSnapshot>> {
        let state = self.read()?;
        Ok(state.rankings.get(&project_id).cloned())
    }
}

#[async_trait]
impl JudgingLedger for InMemoryCompetitionStore {
    async fn finalize(
        &self,
        project_id: ProjectId,
        observed: ProjectStatus,
        finalize: FinalizeJudging,
    ) -> CompetitionRepositoryResult<CompletedJudging> {
        let mut state = self.write()?;
        let project = state.project(project_id)?.clone();
        ensure_status(&project, observed)?;
        if state.rankings.contains_key(&project_id) {
            return Err(CompetitionRepositoryError::RankingAlreadyFrozen(project_id));
        }

        let teams = state.teams_of(project_id);
        let ratings = state.ratings_of(&teams);
        let completed = finalize(JudgingSnapshot {
            project,
            teams,
            ratings,
        })?;

        state
            .rankings
            .insert(project_id, completed.ranking.clone());
        state
            .projects
            .insert(project_id, completed.project.clone());
        Ok(completed)
    }
}
