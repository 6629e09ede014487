//! Then steps for project lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::{WrapErr, ensure, eyre};
use jamboree::competition::domain::ProjectStatus;
use rstest_bdd_macros::then;

#[then(r#"the committed team sizes are "{sizes}""#)]
fn committed_team_sizes(world: &LifecycleWorld, sizes: String) -> Result<(), eyre::Report> {
    let expected = sizes
        .split(',')
        .map(|size| size.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("parse expected team sizes")?;
    let actual: Vec<usize> = world
        .teams
        .iter()
        .map(|team| team.member_ids().len())
        .collect();
    ensure!(actual == expected, "expected sizes {expected:?}, found {actual:?}");
    Ok(())
}

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ProjectStatus::try_from(status.as_str())?;
    let project_id = world.project()?.id();
    let stored = run_async(world.lifecycle.get_project(project_id))
        .wrap_err("reload project")?;
    ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("team {position:usize} is ranked {rank:u32}")]
fn team_is_ranked(world: &LifecycleWorld, position: usize, rank: u32) -> Result<(), eyre::Report> {
    let team_id = world.team_at(position)?;
    let project_id = world.project()?.id();
    let ranking = run_async(world.lifecycle.get_ranking(project_id))
        .wrap_err("load frozen ranking")?;
    let actual = ranking
        .rank_of(team_id)
        .ok_or_else(|| eyre!("team {position} is missing from the ranking"))?;
    ensure!(actual == rank, "expected rank {rank}, found {actual}");
    Ok(())
}

#[then(r#"the request fails with kind "{kind}""#)]
fn request_fails_with_kind(world: &LifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre!("expected a failed request"))?;
    ensure!(
        err.kind().as_str() == kind,
        "expected {kind}, got {} ({err})",
        err.kind()
    );
    Ok(())
}
