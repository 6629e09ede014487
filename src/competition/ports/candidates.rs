//! Port for the external eligibility list consulted during team formation.

use crate::competition::domain::{CandidatePool, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for candidate pool lookups.
pub type CandidatePoolResult<T> = Result<T, CandidatePoolError>;

/// Supplies the ordered list of candidates eligible for a project.
///
/// Who is eligible is decided outside the engine.
#[async_trait]
pub trait CandidatePoolProvider: Send + Sync {
    /// Returns the eligible candidates for `project_id` in a stable order.
    async fn eligible_candidates(&self, project_id: ProjectId)
    -> CandidatePoolResult<CandidatePool>;
}

/// Errors returned by candidate pool providers.
#[derive(Debug, Clone, Error)]
pub enum CandidatePoolError {
    /// The provider does not know the project.
    #[error("no eligibility list for project {0}")]
    UnknownProject(ProjectId),

    /// The eligibility source failed.
    #[error("candidate source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl CandidatePoolError {
    /// Wraps an eligibility source error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
