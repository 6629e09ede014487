//! Error type shared by the competition persistence ports.

use crate::competition::domain::{CompetitionDomainError, ProjectId, ProjectStatus, TeamId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for competition repository operations.
pub type CompetitionRepositoryResult<T> = Result<T, CompetitionRepositoryError>;

/// Errors returned by competition repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CompetitionRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The persisted status no longer matches the status the caller observed.
    #[error("project {project_id} status is {actual}, caller observed {expected}")]
    StatusConflict {
        /// Project identifier.
        project_id: ProjectId,
        /// Status the caller last observed.
        expected: ProjectStatus,
        /// Status currently persisted.
        actual: ProjectStatus,
    },

    /// Teams have already been committed for the project.
    #[error("teams already committed for project {0}")]
    TeamsAlreadyCommitted(ProjectId),

    /// A ranking has already been frozen for the project.
    #[error("ranking already frozen for project {0}")]
    RankingAlreadyFrozen(ProjectId),

    /// The project's status does not admit the requested write.
    #[error("project {project_id} does not accept this change while {status}")]
    ProjectNotOpen {
        /// Project identifier.
        project_id: ProjectId,
        /// Status currently persisted.
        status: ProjectStatus,
    },

    /// The unit of work rejected the snapshot it was handed.
    #[error(transparent)]
    Rejected(#[from] CompetitionDomainError),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CompetitionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }
}
