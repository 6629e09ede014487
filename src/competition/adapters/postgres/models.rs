//! Diesel row models for competition persistence.

use super::schema::{projects, ranking_entries, ratings, teams};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Owning operator.
    pub owner_id: uuid::Uuid,
    /// Target members per team.
    pub team_size: i32,
    /// Judging criteria JSON array.
    pub criteria: Value,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Owning operator.
    pub owner_id: uuid::Uuid,
    /// Target members per team.
    pub team_size: i32,
    /// Judging criteria JSON array.
    pub criteria: Value,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for teams.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Member identifiers JSON array.
    pub member_ids: Value,
    /// Optional submission reference.
    pub submission_ref: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for teams.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Member identifiers JSON array.
    pub member_ids: Value,
    /// Optional submission reference.
    pub submission_ref: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Rating row, used for both reads and upserts.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RatingRow {
    /// Rating identity.
    pub rater_id: uuid::Uuid,
    /// Rated team.
    pub team_id: uuid::Uuid,
    /// Score in `0..=10`.
    pub score: i16,
    /// Latest submission time.
    pub updated_at: DateTime<Utc>,
}

/// Ranking row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ranking_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RankingEntryRow {
    /// Ranked project.
    pub project_id: uuid::Uuid,
    /// Ranked team.
    pub team_id: uuid::Uuid,
    /// Dense 1-based rank.
    pub rank: i32,
    /// Freeze timestamp.
    pub frozen_at: DateTime<Utc>,
}
