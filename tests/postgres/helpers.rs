//! Services wired to a `PostgreSQL` competition store.

use super::cluster::TemporaryDatabase;
use crate::test_helpers::TickingClock;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use jamboree::competition::{
    adapters::{
        memory::StaticCandidatePool,
        postgres::{CompetitionPgPool, PostgresCompetitionStore},
    },
    domain::{CandidatePool, Caller, Project, ProjectStatus, Team, UserId},
    services::{
        AdvanceStatusRequest, CommitTeamsRequest, CompetitionServiceResult, CreateProjectRequest,
        ProjectLifecycleService, ProposeTeamsRequest, RatingService, TeamFormationService,
    },
};
use pg_embedded_setup_unpriv::TestCluster;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Connections available to racing tasks.
const POOL_SIZE: u32 = 8;

/// Formation service over the `PostgreSQL` store.
pub type Formation =
    TeamFormationService<PostgresCompetitionStore, StaticCandidatePool, TickingClock>;
/// Lifecycle service over the `PostgreSQL` store.
pub type Lifecycle = ProjectLifecycleService<PostgresCompetitionStore, TickingClock>;
/// Rating service over the `PostgreSQL` store.
pub type Ratings = RatingService<PostgresCompetitionStore, TickingClock>;

/// Services and store sharing one temporary database.
///
/// Fields drop in declaration order, so the pool closes before the database
/// is dropped.
pub struct PgCompetition {
    pub store: Arc<PostgresCompetitionStore>,
    pub candidates: Arc<StaticCandidatePool>,
    pub formation: Arc<Formation>,
    pub lifecycle: Arc<Lifecycle>,
    pub ratings: Arc<Ratings>,
    pub operator: Caller,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgCompetition {
    /// Creates a fresh database from the template and wires services to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database, pool or runtime cannot be built.
    pub fn new(cluster: &'static TestCluster) -> eyre::Result<Self> {
        let database = TemporaryDatabase::create(cluster, "jamboree")?;
        let pool: CompetitionPgPool = Pool::builder()
            .max_size(POOL_SIZE)
            .build(ConnectionManager::<PgConnection>::new(database.url()))?;
        let store = Arc::new(PostgresCompetitionStore::new(pool));
        let candidates = Arc::new(StaticCandidatePool::new());
        let clock = Arc::new(TickingClock::default());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()?;
        Ok(Self {
            formation: Arc::new(TeamFormationService::new(
                Arc::clone(&store),
                Arc::clone(&candidates),
                Arc::clone(&clock),
            )),
            lifecycle: Arc::new(ProjectLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
            )),
            ratings: Arc::new(RatingService::new(Arc::clone(&store), clock)),
            store,
            candidates,
            operator: Caller::operator(UserId::new()),
            runtime,
            _database: database,
        })
    }

    /// Runs `future` to completion on the test runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Spawns `future` on the test runtime.
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Creates a project and registers `count` fresh candidates for it.
    ///
    /// # Errors
    ///
    /// Returns an error if project creation or pool registration fails.
    pub async fn open_project(
        &self,
        team_size: u32,
        count: usize,
    ) -> eyre::Result<(Project, Vec<UserId>)> {
        let project = self
            .lifecycle
            .create_project(
                &self.operator,
                CreateProjectRequest::new("Harbour Jam", team_size).with_criterion("Craft", 1),
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
    pub async fn commit_default_teams(&self, project: &Project) -> eyre::Result<Vec<Team>> {
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
