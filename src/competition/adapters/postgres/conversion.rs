//! Conversions between domain aggregates and Diesel rows.

use super::models::{NewProjectRow, NewTeamRow, ProjectRow, RankingEntryRow, RatingRow, TeamRow};
use crate::competition::{
    domain::{
        JudgingCriterion, PersistedProjectData, PersistedTeamData, Project, ProjectId,
        ProjectStatus, RankingEntry, RankingSnapshot, Rating, Score, SubmissionRef, Team, TeamId,
        TeamName, TeamSize, UserId,
    },
    ports::{CompetitionRepositoryError, CompetitionRepositoryResult},
};

pub(super) fn to_new_project_row(project: &Project) -> CompetitionRepositoryResult<NewProjectRow> {
    let criteria =
        serde_json::to_value(project.criteria()).map_err(CompetitionRepositoryError::persistence)?;
    let team_size = i32::try_from(project.team_size().value())
        .map_err(CompetitionRepositoryError::persistence)?;

    Ok(NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        owner_id: project.owner_id().into_inner(),
        team_size,
        criteria,
        status: project.status().as_str().to_owned(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

pub(super) fn parse_status(raw: &str) -> CompetitionRepositoryResult<ProjectStatus> {
    ProjectStatus::try_from(raw).map_err(CompetitionRepositoryError::invalid_data)
}

pub(super) fn row_to_project(row: ProjectRow) -> CompetitionRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        owner_id,
        team_size: persisted_team_size,
        criteria: persisted_criteria,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let raw_team_size =
        u32::try_from(persisted_team_size).map_err(CompetitionRepositoryError::invalid_data)?;
    let team_size = TeamSize::new(raw_team_size).map_err(CompetitionRepositoryError::invalid_data)?;
    let criteria = serde_json::from_value::<Vec<JudgingCriterion>>(persisted_criteria)
        .map_err(CompetitionRepositoryError::invalid_data)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name,
        owner_id: UserId::from_uuid(owner_id),
        team_size,
        criteria,
        status: parse_status(&persisted_status)?,
        created_at,
        updated_at,
    }))
}

pub(super) fn to_new_team_row(team: &Team) -> CompetitionRepositoryResult<NewTeamRow> {
    let member_ids =
        serde_json::to_value(team.member_ids()).map_err(CompetitionRepositoryError::persistence)?;

    Ok(NewTeamRow {
        id: team.id().into_inner(),
        project_id: team.project_id().into_inner(),
        name: team.name().as_str().to_owned(),
        member_ids,
        submission_ref: team.submission().map(|reference| reference.as_str().to_owned()),
        created_at: team.created_at(),
    })
}

pub(super) fn row_to_team(row: TeamRow) -> CompetitionRepositoryResult<Team> {
    let TeamRow {
        id,
        project_id,
        name: persisted_name,
        member_ids: persisted_members,
        submission_ref,
        created_at,
    } = row;

    let name = TeamName::new(persisted_name).map_err(CompetitionRepositoryError::invalid_data)?;
    let member_ids = serde_json::from_value::<Vec<UserId>>(persisted_members)
        .map_err(CompetitionRepositoryError::invalid_data)?;
    let submission = submission_ref
        .map(SubmissionRef::new)
        .transpose()
        .map_err(CompetitionRepositoryError::invalid_data)?;

    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        name,
        member_ids,
        submission,
        created_at,
    }))
}

pub(super) fn to_rating_row(rating: &Rating) -> RatingRow {
    RatingRow {
        rater_id: rating.rater_id().into_inner(),
        team_id: rating.team_id().into_inner(),
        score: i16::from(rating.score().value()),
        updated_at: rating.updated_at(),
    }
}

pub(super) fn row_to_rating(row: RatingRow) -> CompetitionRepositoryResult<Rating> {
    let score =
        Score::new(i32::from(row.score)).map_err(CompetitionRepositoryError::invalid_data)?;
    Ok(Rating::from_persisted(
        UserId::from_uuid(row.rater_id),
        TeamId::from_uuid(row.team_id),
        score,
        row.updated_at,
    ))
}

pub(super) fn to_ranking_rows(
    snapshot: &RankingSnapshot,
) -> CompetitionRepositoryResult<Vec<RankingEntryRow>> {
    snapshot
        .entries()
        .iter()
        .map(|entry| {
            let rank = i32::try_from(entry.rank()).map_err(CompetitionRepositoryError::persistence)?;
            Ok(RankingEntryRow {
                project_id: snapshot.project_id().into_inner(),
                team_id: entry.team_id().into_inner(),
                rank,
                frozen_at: snapshot.frozen_at(),
            })
        })
        .collect()
}

/// Rebuilds a snapshot from its rows; `None` when no rows exist.
pub(super) fn rows_to_ranking(
    project_id: ProjectId,
    rows: Vec<RankingEntryRow>,
) -> CompetitionRepositoryResult<Option<RankingSnapshot>> {
    let Some(frozen_at) = rows.first().map(|row| row.frozen_at) else {
        return Ok(None);
    };
    let entries = rows
        .into_iter()
        .map(|row| {
            let rank = u32::try_from(row.rank).map_err(CompetitionRepositoryError::invalid_data)?;
            Ok(RankingEntry::from_persisted(TeamId::from_uuid(row.team_id), rank))
        })
        .collect::<CompetitionRepositoryResult<Vec<_>>>()?;
    Ok(Some(RankingSnapshot::from_persisted(
        project_id, entries, frozen_at,
    )))
}
