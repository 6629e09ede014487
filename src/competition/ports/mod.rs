//! Port contracts for the competition lifecycle engine.
//!
//! Ports define infrastructure-agnostic interfaces used by competition
//! services.

pub mod candidates;
pub mod error;
pub mod ledger;
pub mod repository;

pub use candidates::{CandidatePoolError, CandidatePoolProvider, CandidatePoolResult};
pub use error::{CompetitionRepositoryError, CompetitionRepositoryResult};
pub use ledger::{CompletedJudging, FinalizeJudging, JudgingLedger, JudgingSnapshot};
pub use repository::{ProjectRepository, RankingRepository, RatingRepository, TeamRepository};
