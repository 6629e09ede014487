//! Competition flows persisted through `PostgresCompetitionStore`.

use super::helpers::PgCompetition;
use eyre::{OptionExt, bail, ensure};
use jamboree::competition::{
    domain::{Caller, CompetitionDomainError, ProjectStatus, Team, TeamId, UserId},
    ports::{
        CompetitionRepositoryError, FinalizeJudging, JudgingLedger, ProjectRepository,
        RankingRepository,
    },
    services::{CommitTeamsRequest, CompetitionServiceError, ErrorKind, ProposeTeamsRequest},
};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn resubmitted_rating_replaces_the_earlier_score(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(2, 4).await?;
        let teams = competition.commit_default_teams(&project).await?;
        let team_id = teams.first().map(Team::id).ok_or_eyre("no team committed")?;
        competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await?;

        let judge = Caller::judge(UserId::new());
        for score in [8, 2] {
            competition
                .ratings
                .submit_rating(&judge, team_id, score)
                .await?;
        }

        let average = competition
            .ratings
            .get_average(team_id)
            .await?
            .ok_or_eyre("team should be rated")?;
        ensure!(
            average.count() == 1 && average.total() == 2,
            "expected one score of 2, got {average} over {} ratings",
            average.count()
        );
        let mine = competition.ratings.get_mine(&judge, team_id).await?;
        ensure!(mine.map(|score| score.value()) == Some(2));
        Ok(())
    })
}

#[rstest]
fn frozen_ranking_orders_by_average_then_creation_time(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(1, 4).await?;
        let teams = competition.commit_default_teams(&project).await?;
        let [seven, first_nine, second_nine, unrated] = teams.as_slice() else {
            bail!("expected four single-member teams, got {}", teams.len());
        };
        competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await?;

        for (team, score) in [(seven, 7), (first_nine, 9), (second_nine, 9)] {
            competition
                .ratings
                .submit_rating(&Caller::judge(UserId::new()), team.id(), score)
                .await?;
        }
        let completed = competition
            .advance(&project, ProjectStatus::Judging, ProjectStatus::Completed)
            .await?;

        let ranking = competition.lifecycle.get_ranking(project.id()).await?;
        let ranked: Vec<(TeamId, u32)> = ranking
            .entries()
            .iter()
            .map(|entry| (entry.team_id(), entry.rank()))
            .collect();
        ensure!(
            ranked
                == vec![
                    (first_nine.id(), 1),
                    (second_nine.id(), 2),
                    (seven.id(), 3),
                    (unrated.id(), 4),
                ],
            "unexpected ranking {ranked:?}"
        );
        ensure!(ranking.frozen_at() == completed.updated_at());
        let stored = competition.lifecycle.get_project(project.id()).await?;
        ensure!(stored.status() == ProjectStatus::Completed);
        Ok(())
    })
}

#[rstest]
fn stale_from_status_is_a_conflict(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(2, 4).await?;
        competition.commit_default_teams(&project).await?;
        let judging = competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await?;

        let Err(err) = competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await
        else {
            bail!("a repeated start should conflict");
        };
        ensure!(err.kind() == ErrorKind::Conflict, "unexpected error {err}");

        let stale_write = competition
            .store
            .compare_and_set_status(&judging, ProjectStatus::Created)
            .await;
        ensure!(
            matches!(
                stale_write,
                Err(CompetitionRepositoryError::StatusConflict {
                    actual: ProjectStatus::Judging,
                    ..
                })
            ),
            "compare-and-set must report the persisted status, got {stale_write:?}"
        );

        let never_called: FinalizeJudging = Box::new(|_| Err(CompetitionDomainError::EmptyTeam));
        let stale_close = competition
            .store
            .finalize(project.id(), ProjectStatus::Created, never_called)
            .await;
        ensure!(
            matches!(
                stale_close,
                Err(CompetitionRepositoryError::StatusConflict {
                    actual: ProjectStatus::Judging,
                    ..
                })
            ),
            "finalize must check the observed status, got {stale_close:?}"
        );
        Ok(())
    })
}

#[rstest]
fn failed_finalizer_leaves_judging_open(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(2, 4).await?;
        competition.commit_default_teams(&project).await?;
        competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await?;

        let failing: FinalizeJudging = Box::new(|_| Err(CompetitionDomainError::EmptyTeam));
        let result = competition
            .store
            .finalize(project.id(), ProjectStatus::Judging, failing)
            .await;
        ensure!(
            matches!(result, Err(CompetitionRepositoryError::Rejected(_))),
            "finalizer failure should be rejected, got {result:?}"
        );

        let stored = competition
            .store
            .find_by_id(project.id())
            .await?
            .ok_or_eyre("project should persist")?;
        ensure!(stored.status() == ProjectStatus::Judging);
        ensure!(competition.store.find_ranking(project.id()).await?.is_none());

        competition
            .advance(&project, ProjectStatus::Judging, ProjectStatus::Completed)
            .await?;
        ensure!(competition.store.find_ranking(project.id()).await?.is_some());
        Ok(())
    })
}

#[rstest]
fn teams_commit_only_once(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(2, 4).await?;
        let committed = competition.commit_default_teams(&project).await?;

        let plan = competition
            .formation
            .propose_teams(&competition.operator, ProposeTeamsRequest::new(project.id()))
            .await?;
        let names = (1..=plan.teams().len()).map(|index| format!("Again {index}"));
        let Err(err) = competition
            .formation
            .commit_teams(
                &competition.operator,
                CommitTeamsRequest::new(project.id(), plan.into_teams(), names),
            )
            .await
        else {
            bail!("a second commit should be refused");
        };
        ensure!(
            matches!(
                err,
                CompetitionServiceError::Repository(
                    CompetitionRepositoryError::TeamsAlreadyCommitted(id)
                ) if id == project.id()
            ),
            "unexpected error {err}"
        );
        ensure!(err.kind() == ErrorKind::Conflict);

        let listed = competition.formation.list_teams(project.id()).await?;
        ensure!(listed == committed, "stored teams must match the first commit");
        Ok(())
    })
}

#[rstest]
fn ratings_are_refused_once_judging_closes(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let competition = PgCompetition::new(shared_test_cluster)?;
    competition.block_on(async {
        let (project, _) = competition.open_project(2, 4).await?;
        let teams = competition.commit_default_teams(&project).await?;
        let team_id = teams.first().map(Team::id).ok_or_eyre("no team committed")?;
        let judge = Caller::judge(UserId::new());

        let Err(early) = competition.ratings.submit_rating(&judge, team_id, 5).await else {
            bail!("ratings before judging should be refused");
        };
        ensure!(early.kind() == ErrorKind::PreconditionFailed, "unexpected error {early}");

        competition
            .advance(&project, ProjectStatus::Created, ProjectStatus::Judging)
            .await?;
        competition.ratings.submit_rating(&judge, team_id, 6).await?;
        competition
            .advance(&project, ProjectStatus::Judging, ProjectStatus::Completed)
            .await?;
        let frozen = competition.lifecycle.get_ranking(project.id()).await?;

        let Err(late) = competition.ratings.submit_rating(&judge, team_id, 10).await else {
            bail!("ratings after completion should be refused");
        };
        ensure!(late.kind() == ErrorKind::PreconditionFailed, "unexpected error {late}");
        let mine = competition.ratings.get_mine(&judge, team_id).await?;
        ensure!(mine.map(|score| score.value()) == Some(6));
        ensure!(competition.lifecycle.get_ranking(project.id()).await? == frozen);
        Ok(())
    })
}
