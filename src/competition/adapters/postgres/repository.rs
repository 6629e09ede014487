//! `PostgreSQL` store implementing every competition persistence port.

use super::{
    conversion::{
        parse_status, row_to_project, row_to_rating, row_to_team, rows_to_ranking,
        to_new_project_row, to_new_team_row, to_ranking_rows, to_rating_row,
    },
    models::{ProjectRow, RankingEntryRow, RatingRow, TeamRow},
    schema::{projects, ranking_entries, ratings, teams},
};
use crate::competition::{
    domain::{Project, ProjectId, ProjectStatus, RankingSnapshot, Rating, Team, TeamId, UserId},
    ports::{
        CompetitionRepositoryError, CompetitionRepositoryResult, CompletedJudging,
        FinalizeJudging, JudgingLedger, JudgingSnapshot, ProjectRepository, RankingRepository,
        RatingRepository, TeamRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by competition adapters.
pub type CompetitionPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed competition store.
///
/// Status-sensitive writes lock the project row: `FOR UPDATE` for commits
/// and judging close, `FOR SHARE` for rating upserts, so a rating is either
/// wholly before or wholly after the ranking freeze.
#[derive(Debug, Clone)]
pub struct PostgresCompetitionStore {
    pool: CompetitionPgPool,
}

impl PostgresCompetitionStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CompetitionPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CompetitionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CompetitionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(CompetitionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CompetitionRepositoryError::persistence)?
    }
}

impl From<DieselError> for CompetitionRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn lock_project(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> CompetitionRepositoryResult<Project> {
    let row = projects::table
        .find(project_id.into_inner())
        .select(ProjectRow::as_select())
        .for_update()
        .first::<ProjectRow>(connection)
        .optional()?
        .ok_or(CompetitionRepositoryError::ProjectNotFound(project_id))?;
    row_to_project(row)
}

fn share_lock_status(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> CompetitionRepositoryResult<ProjectStatus> {
    let status = projects::table
        .find(project_id.into_inner())
        .select(projects::status)
        .for_share()
        .first::<String>(connection)
        .optional()?
        .ok_or(CompetitionRepositoryError::ProjectNotFound(project_id))?;
    parse_status(&status)
}

fn load_project_teams(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> CompetitionRepositoryResult<Vec<Team>> {
    teams::table
        .filter(teams::project_id.eq(project_id.into_inner()))
        .order((teams::created_at.asc(), teams::id.asc()))
        .select(TeamRow::as_select())
        .load::<TeamRow>(connection)?
        .into_iter()
        .map(row_to_team)
        .collect()
}

#[async_trait]
impl ProjectRepository for PostgresCompetitionStore {
    async fn store(&self, project: &Project) -> CompetitionRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_project_row(project)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CompetitionRepositoryError::DuplicateProject(project_id)
                    }
                    _ => CompetitionRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> CompetitionRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn compare_and_set_status(
        &self,
        project: &Project,
        expected: ProjectStatus,
    ) -> CompetitionRepositoryResult<()> {
        let project_id = project.id();
        let status = project.status().as_str();
        let updated_at = project.updated_at();
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                projects::table
                    .filter(projects::id.eq(project_id.into_inner()))
                    .filter(projects::status.eq(expected.as_str())),
            )
            .set((
                projects::status.eq(status),
                projects::updated_at.eq(updated_at),
            ))
            .execute(connection)?;
            if updated == 1 {
                return Ok(());
            }

            let actual = projects::table
                .find(project_id.into_inner())
                .select(projects::status)
                .first::<String>(connection)
                .optional()?
                .ok_or(CompetitionRepositoryError::ProjectNotFound(project_id))?;
            Err(CompetitionRepositoryError::StatusConflict {
                project_id,
                expected,
                actual: parse_status(&actual)?,
            })
        })
        .await
    }
}

#[async_trait]
impl TeamRepository for PostgresCompetitionStore {
    async fn commit(
        &self,
        project_id: ProjectId,
        teams: &[Team],
    ) -> CompetitionRepositoryResult<()> {
        let rows = teams
            .iter()
            .map(to_new_team_row)
            .collect::<CompetitionRepositoryResult<Vec<_>>>()?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, CompetitionRepositoryError, _>(|tx| {
                let project = lock_project(tx, project_id)?;
                if project.status() != ProjectStatus::Created {
                    return Err(CompetitionRepositoryError::ProjectNotOpen {
                        project_id,
                        status: project.status(),
                    });
                }
                let existing = teams::table
                    .filter(teams::project_id.eq(project_id.into_inner()))
                    .count()
                    .get_result::<i64>(tx)?;
                if existing > 0 {
                    return Err(CompetitionRepositoryError::TeamsAlreadyCommitted(project_id));
                }
                diesel::insert_into(teams::table)
                    .values(&rows)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, team: &Team) -> CompetitionRepositoryResult<()> {
        let team_id = team.id();
        let submission_ref = team
            .submission()
            .map(|reference| reference.as_str().to_owned());
        self.run_blocking(move |connection| {
            let updated = diesel::update(teams::table.find(team_id.into_inner()))
                .set(teams::submission_ref.eq(submission_ref))
                .execute(connection)?;
            if updated == 0 {
                return Err(CompetitionRepositoryError::TeamNotFound(team_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_team(&self, id: TeamId) -> CompetitionRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .find(id.into_inner())
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> CompetitionRepositoryResult<Vec<Team>> {
        self.run_blocking(move |connection| load_project_teams(connection, project_id))
            .await
    }
}

#[async_trait]
impl RatingRepository for PostgresCompetitionStore {
    async fn upsert(&self, rating: &Rating) -> CompetitionRepositoryResult<()> {
        let team_id = rating.team_id();
        let row = to_rating_row(rating);
        self.run_blocking(move |connection| {
            connection.transaction::<_, CompetitionRepositoryError, _>(|tx| {
                let project_uuid = teams::table
                    .find(team_id.into_inner())
                    .select(teams::project_id)
                    .first::<uuid::Uuid>(tx)
                    .optional()?
                    .ok_or(CompetitionRepositoryError::TeamNotFound(team_id))?;
                let project_id = ProjectId::from_uuid(project_uuid);
                let status = share_lock_status(tx, project_id)?;
                if status != ProjectStatus::Judging {
                    return Err(CompetitionRepositoryError::ProjectNotOpen { project_id, status });
                }

                diesel::insert_into(ratings::table)
                    .values(&row)
                    .on_conflict((ratings::rater_id, ratings::team_id))
                    .do_update()
                    .set((
                        ratings::score.eq(excluded(ratings::score)),
                        ratings::updated_at.eq(excluded(ratings::updated_at)),
                    ))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_rating(
        &self,
        rater_id: UserId,
        team_id: TeamId,
    ) -> CompetitionRepositoryResult<Option<Rating>> {
        self.run_blocking(move |connection| {
            let row = ratings::table
                .find((rater_id.into_inner(), team_id.into_inner()))
                .select(RatingRow::as_select())
                .first::<RatingRow>(connection)
                .optional()?;
            row.map(row_to_rating).transpose()
        })
        .await
    }

    async fn find_by_team(&self, team_id: TeamId) -> CompetitionRepositoryResult<Vec<Rating>> {
        self.run_blocking(move |connection| {
            ratings::table
                .filter(ratings::team_id.eq(team_id.into_inner()))
                .select(RatingRow::as_select())
                .load::<RatingRow>(connection)?
                .into_iter()
                .map(row_to_rating)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl RankingRepository for PostgresCompetitionStore {
    async fn find_ranking(
        &self,
        project_id: ProjectId,
    ) -> CompetitionRepositoryResult<Option<RankingSnapshot>> {
        self.run_blocking(move |connection| {
            let rows = ranking_entries::table
                .filter(ranking_entries::project_id.eq(project_id.into_inner()))
                .order(ranking_entries::rank.asc())
                .select(RankingEntryRow::as_select())
                .load::<RankingEntryRow>(connection)?;
            rows_to_ranking(project_id, rows)
        })
        .await
    }
}

#[async_trait]
impl JudgingLedger for PostgresCompetitionStore {
    async fn finalize(
        &self,
        project_id: ProjectId,
        observed: ProjectStatus,
        finalize: FinalizeJudging,
    ) -> CompetitionRepositoryResult<CompletedJudging> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, CompetitionRepositoryError, _>(|tx| {
                let project = lock_project(tx, project_id)?;
                if project.status() != observed {
                    return Err(CompetitionRepositoryError::StatusConflict {
                        project_id,
                        expected: observed,
                        actual: project.status(),
                    });
                }
                let frozen = ranking_entries::table
                    .filter(ranking_entries::project_id.eq(project_id.into_inner()))
                    .count()
                    .get_result::<i64>(tx)?;
                if frozen > 0 {
                    return Err(CompetitionRepositoryError::RankingAlreadyFrozen(project_id));
                }

                let teams = load_project_teams(tx, project_id)?;
                let ratings = ratings::table
                    .inner_join(teams::table)
                    .filter(teams::project_id.eq(project_id.into_inner()))
                    .select(RatingRow::as_select())
                    .load::<RatingRow>(tx)?
                    .into_iter()
                    .map(row_to_rating)
                    .collect::<CompetitionRepositoryResult<Vec<_>>>()?;

                let completed = finalize(JudgingSnapshot {
                    project,
                    teams,
                    ratings,
                })?;

                diesel::insert_into(ranking_entries::table)
                    .values(&to_ranking_rows(&completed.ranking)?)
                    .execute(tx)?;
                diesel::update(projects::table.find(project_id.into_inner()))
                    .set((
                        projects::status.eq(completed.project.status().as_str()),
                        projects::updated_at.eq(completed.project.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(completed)
            })
        })
        .await
    }
}
