//! Shared test helpers for in-memory competition integration tests.

pub use crate::test_helpers::TickingClock;
use jamboree::competition::{
    adapters::memory::{InMemoryCompetitionStore, StaticCandidatePool},
    domain::{CandidatePool, Caller, Project, ProjectStatus, Team, UserId},
    services::{
        AdvanceStatusRequest, CommitTeamsRequest, CompetitionServiceResult, CreateProjectRequest,
        ProjectLifecycleService, ProposeTeamsRequest, RatingService, TeamFormationService,
    },
};
use rstest::fixture;
use std::sync::Arc;

/// Formation service used by the integration tests.
pub type Formation = TeamFormationService<InMemoryCompetitionStore, StaticCandidatePool, TickingClock>;
/// Lifecycle service used by the integration tests.
pub type Lifecycle = ProjectLifecycleService<InMemoryCompetitionStore, TickingClock>;
/// Rating service used by the integration tests.
pub type Ratings = RatingService<InMemoryCompetitionStore, TickingClock>;

/// Services wired to one shared in-memory store.
pub struct Competition {
    pub candidates: Arc<StaticCandidatePool>,
    pub formation: Arc<Formation>,
    pub lifecycle: Arc<Lifecycle>,
    pub ratings: Arc<Ratings>,
    pub operator: Caller,
}

impl Competition {
    /// Creates a project and registers `count` fresh candidates for it.
    ///
    /// # Errors
    ///
    /// Returns an error if project creation or pool registration fails.
    pub async fn open_project(
        &self,
        team_size: u32,
        count: usize,
    ) -> Result<(Project, Vec<UserId>), eyre::Report> {
        let project = self
            .lifecycle
            .create_project(
                &self.operator,
                CreateProjectRequest::new("Harvest Jam", team_size)
                    .with_criterion("Theme", 2)
                    .with_criterion("Fun", 1),
            )
            .await?;
        let ids: Vec<UserId> = (0..count).map(|_| UserId::new()).collect();
        self.candidates
            .set_pool(project.id(), CandidatePool::new(ids.clone()))?;
        Ok((project, ids))
    }

    /// Proposes and commits the default grouping, naming teams `Team N`.
    ///
    /// # Errors
    ///
    /// Returns an error if proposal or commit fails.
    pub async fn commit_default_teams(&self, project: &Project) -> Result<Vec<Team>, eyre::Report> {
        let plan = self
            .formation
            .propose_teams(&self.operator, ProposeTeamsRequest::new(project.id()))
            .await?;
        let names: Vec<String> = (1..=plan.teams().len())
            .map(|index| format!("Team {index}"))
            .collect();
        let teams = self
            .formation
            .commit_teams(
                &self.operator,
                CommitTeamsRequest::new(project.id(), plan.into_teams(), names),
            )
            .await?;
        Ok(teams)
    }

    /// Requests a status change as the operator.
    pub async fn advance(
        &self,
        project: &Project,
        from: ProjectStatus,
        to: ProjectStatus,
    ) -> CompetitionServiceResult<Project> {
        self.lifecycle
            .advance_status(
                &self.operator,
                AdvanceStatusRequest::new(project.id(), from, to),
            )
            .await
    }
}

/// Provides services over a fresh store for each test.
#[fixture]
pub fn competition() -> Competition {
    let store = Arc::new(InMemoryCompetitionStore::new());
    let candidates = Arc::new(StaticCandidatePool::new());
    let clock = Arc::new(TickingClock::default());
    Competition {
        formation: Arc::new(TeamFormationService::new(
            Arc::clone(&store),
            Arc::clone(&candidates),
            Arc::clone(&clock),
        )),
        lifecycle: Arc::new(ProjectLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        )),
        ratings: Arc::new(RatingService::new(store, clock)),
        candidates,
        operator: Caller::operator(UserId::new()),
    }
}
