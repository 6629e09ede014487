//! In-memory eligibility lists for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::competition::{
    domain::{CandidatePool, ProjectId},
    ports::{CandidatePoolError, CandidatePoolProvider, CandidatePoolResult},
};

/// Candidate pool provider backed by explicitly registered lists.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidatePool {
    pools: Arc<RwLock<HashMap<ProjectId, CandidatePool>>>,
}

impl StaticCandidatePool {
    /// Creates a provider with no registered pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the eligible candidates for a project.
    ///
    /// # Errors
    ///
    /// Returns [`CandidatePoolError::Unavailable`] when the lock is poisoned.
    pub fn set_pool(&self, project_id: ProjectId, pool: CandidatePool) -> CandidatePoolResult<()> {
        let mut pools = self.pools.write().map_err(|err| {
            CandidatePoolError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        pools.insert(project_id, pool);
        Ok(())
    }
}

#[async_trait]
impl CandidatePoolProvider for StaticCandidatePool {
    async fn eligible_candidates(
        &self,
        project_id: ProjectId,
    ) -> CandidatePoolResult<CandidatePool> {
        let pools = self.pools.read().map_err(|err| {
            CandidatePoolError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        pools
            .get(&project_id)
            .cloned()
            .ok_or(CandidatePoolError::UnknownProject(project_id))
    }
}
