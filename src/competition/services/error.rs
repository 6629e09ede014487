//! Service-level errors and their transport-agnostic classification.

use crate::competition::{
    domain::{Caller, CallerRole, CompetitionDomainError, ProjectId, TeamId, UserId},
    ports::{CandidatePoolError, CompetitionRepositoryError},
};
use std::fmt;
use thiserror::Error;

/// Coarse error taxonomy surfaced to callers of the engine.
///
/// Only [`ErrorKind::Conflict`] is meant to be retried, and only by the
/// caller after re-reading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request values (team size, score, empty pool...).
    InvalidInput,
    /// The project is not in a state that allows the operation.
    PreconditionFailed,
    /// The requested status change is not a forward edge.
    InvalidTransition,
    /// Optimistic-concurrency loss or duplicate insert-once write.
    Conflict,
    /// The caller's capability does not cover the operation.
    Forbidden,
    /// An addressed project, team or ranking does not exist.
    NotFound,
    /// Infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::PreconditionFailed => "precondition_failed",
            Self::InvalidTransition => "invalid_transition",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Service-level errors for competition operations.
#[derive(Debug, Error)]
pub enum CompetitionServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CompetitionDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CompetitionRepositoryError),
    /// Candidate pool lookup failed.
    #[error(transparent)]
    Candidates(#[from] CandidatePoolError),
    /// The caller may not perform the operation.
    #[error("{role} {user_id} may not {action}")]
    Forbidden {
        /// Calling identity.
        user_id: UserId,
        /// Role the caller acted in.
        role: CallerRole,
        /// Operation that was refused.
        action: &'static str,
    },
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// No team exists with the given identifier.
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    /// Judging has not completed, so no ranking exists yet.
    #[error("project {0} has no frozen ranking")]
    RankingNotFound(ProjectId),
    /// Judging cannot start before teams are committed.
    #[error("project {0} has no committed teams")]
    NoTeamsCommitted(ProjectId),
}

impl CompetitionServiceError {
    /// Builds a [`CompetitionServiceError::Forbidden`] for `caller`.
    #[must_use]
    pub const fn forbidden(caller: &Caller, action: &'static str) -> Self {
        Self::Forbidden {
            user_id: caller.user_id(),
            role: caller.role(),
            action,
        }
    }

    /// Classifies the error for the transport layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => domain_kind(err),
            Self::Repository(err) => repository_kind(err),
            Self::Candidates(CandidatePoolError::UnknownProject(_))
            | Self::ProjectNotFound(_)
            | Self::TeamNotFound(_)
            | Self::RankingNotFound(_) => ErrorKind::NotFound,
            Self::Candidates(CandidatePoolError::Unavailable(_)) => ErrorKind::Internal,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NoTeamsCommitted(_) => ErrorKind::PreconditionFailed,
        }
    }
}

const fn domain_kind(err: &CompetitionDomainError) -> ErrorKind {
    match err {
        CompetitionDomainError::InvalidStatusTransition { .. } => ErrorKind::InvalidTransition,
        _ => ErrorKind::InvalidInput,
    }
}

const fn repository_kind(err: &CompetitionRepositoryError) -> ErrorKind {
    match err {
        CompetitionRepositoryError::DuplicateProject(_)
        | CompetitionRepositoryError::StatusConflict { .. }
        | CompetitionRepositoryError::TeamsAlreadyCommitted(_)
        | CompetitionRepositoryError::RankingAlreadyFrozen(_) => ErrorKind::Conflict,
        CompetitionRepositoryError::ProjectNotFound(_)
        | CompetitionRepositoryError::TeamNotFound(_) => ErrorKind::NotFound,
        CompetitionRepositoryError::ProjectNotOpen { .. } => ErrorKind::PreconditionFailed,
        CompetitionRepositoryError::Rejected(domain) => domain_kind(domain),
        CompetitionRepositoryError::InvalidPersistedData(_)
        | CompetitionRepositoryError::Persistence(_) => ErrorKind::Internal,
    }
}

/// Result type for competition service operations.
pub type CompetitionServiceResult<T> = Result<T, CompetitionServiceError>;

/// Refuses callers that are not operators.
///
/// # Errors
///
/// Returns [`CompetitionServiceError::Forbidden`] for judges and
/// participants.
pub const fn ensure_operator(
    caller: &Caller,
    action: &'static str,
) -> CompetitionServiceResult<()> {
    if caller.is_operator() {
        Ok(())
    } else {
        Err(CompetitionServiceError::forbidden(caller, action))
    }
}
