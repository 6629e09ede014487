//! When steps for project lifecycle BDD scenarios.

use super::given::commit_proposed_teams;
use super::world::{LifecycleWorld, run_async};
use jamboree::competition::{domain::ProjectStatus, services::AdvanceStatusRequest};
use rstest_bdd_macros::when;

#[when("the operator commits the proposed teams")]
fn operator_commits_teams(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    commit_proposed_teams(world)
}

#[when(r#"the operator advances the project from "{from}" to "{to}""#)]
fn operator_advances_project(
    world: &mut LifecycleWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let request = AdvanceStatusRequest::new(
        project_id,
        ProjectStatus::try_from(from.as_str())?,
        ProjectStatus::try_from(to.as_str())?,
    );
    match run_async(world.lifecycle.advance_status(&world.operator, request)) {
        Ok(project) => world.project = Some(project),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#"judge "{name}" rates team {position:usize} with {score:i32}"#)]
fn judge_rates_team(
    world: &mut LifecycleWorld,
    name: String,
    position: usize,
    score: i32,
) -> Result<(), eyre::Report> {
    let judge = world.judge(name);
    let team_id = world.team_at(position)?;
    if let Err(err) = run_async(world.ratings.submit_rating(&judge, team_id, score)) {
        world.last_error = Some(err);
    }
    Ok(())
}
