//! Error types for competition domain validation and parsing.

use super::{ProjectId, ProjectStatus, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating competition domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompetitionDomainError {
    /// The team size is not a positive integer.
    #[error("invalid team size {0}, expected a positive integer")]
    InvalidTeamSize(u32),

    /// The requested team size is above the configured limit.
    #[error("team size {requested} exceeds the configured maximum of {max}")]
    TeamSizeExceedsLimit {
        /// Requested team size.
        requested: u32,
        /// Configured maximum.
        max: u32,
    },

    /// The candidate pool supplied for formation is empty.
    #[error("candidate pool must not be empty")]
    EmptyCandidatePool,

    /// The candidate pool lists the same candidate more than once.
    #[error("candidate {0} appears more than once in the pool")]
    DuplicateCandidate(UserId),

    /// A rating score is outside the inclusive `0..=10` range.
    #[error("score {0} is outside the allowed range 0..=10")]
    ScoreOutOfRange(i32),

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// A judging criterion name is empty after trimming.
    #[error("judging criterion name must not be empty")]
    EmptyCriterionName,

    /// A judging criterion weight is zero.
    #[error("judging criterion '{0}' must have a positive weight")]
    InvalidCriterionWeight(String),

    /// Two judging criteria share a name.
    #[error("duplicate judging criterion '{0}'")]
    DuplicateCriterion(String),

    /// A team has no members.
    #[error("team must have at least one member")]
    EmptyTeam,

    /// A member is listed twice, within one team or across a project's teams.
    #[error("member {0} is assigned more than once")]
    DuplicateMember(UserId),

    /// A team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// No teams were supplied for commit.
    #[error("at least one team must be committed")]
    NoTeamsToCommit,

    /// The number of team names does not match the number of teams.
    #[error("expected {teams} team names, got {names}")]
    TeamNameCountMismatch {
        /// Number of proposed teams.
        teams: usize,
        /// Number of supplied names.
        names: usize,
    },

    /// The submission reference is empty after trimming.
    #[error("submission reference must not be empty")]
    EmptySubmissionReference,

    /// The requested status change is not one of the forward edges.
    #[error("invalid status transition for project {project_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Project identifier.
        project_id: ProjectId,
        /// Status the change starts from.
        from: ProjectStatus,
        /// Requested target status.
        to: ProjectStatus,
    },
}

/// Error returned while parsing project status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);
