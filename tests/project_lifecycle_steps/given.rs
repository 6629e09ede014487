//! Given steps for project lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use jamboree::competition::{
    domain::{CandidatePool, ProjectStatus, UserId},
    services::{
        AdvanceStatusRequest, CommitTeamsRequest, CreateProjectRequest, ProposeTeamsRequest,
    },
};
use rstest_bdd_macros::given;

#[given(r#"a project "{name}" with team size {team_size:u32}"#)]
fn project_with_team_size(
    world: &mut LifecycleWorld,
    name: String,
    team_size: u32,
) -> Result<(), eyre::Report> {
    let project = run_async(world.lifecycle.create_project(
        &world.operator,
        CreateProjectRequest::new(name, team_size).with_criterion("Overall", 1),
    ))
    .wrap_err("create project for lifecycle scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given("{count:usize} eligible candidates")]
fn eligible_candidates(world: &mut LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let pool: CandidatePool = (0..count).map(|_| UserId::new()).collect();
    world
        .candidates
        .set_pool(project_id, pool)
        .wrap_err("register eligible candidates")?;
    Ok(())
}

#[given("teams have been committed")]
fn teams_committed(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    commit_proposed_teams(world)
}

#[given(r#"the project has advanced from "{from}" to "{to}""#)]
fn project_has_advanced(
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
    let advanced = run_async(world.lifecycle.advance_status(&world.operator, request))
        .wrap_err("advance project in scenario setup")?;
    world.project = Some(advanced);
    Ok(())
}

/// Proposes the default grouping and commits it with generated names.
///
/// # Errors
///
/// Returns an error if proposal or commit fails.
pub(super) fn commit_proposed_teams(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let plan = run_async(
        world
            .formation
            .propose_teams(&world.operator, ProposeTeamsRequest::new(project_id)),
    )
    .wrap_err("propose teams")?;
    let names: Vec<String> = (1..=plan.teams().len())
        .map(|index| format!("Team {index}"))
        .collect();
    let teams = run_async(world.formation.commit_teams(
        &world.operator,
        CommitTeamsRequest::new(project_id, plan.into_teams(), names),
    ))
    .wrap_err("commit teams")?;
    world.teams = teams;
    Ok(())
}
