//! In-memory adapters for tests and single-process embedding.

mod candidates;
mod store;

pub use candidates::StaticCandidatePool;
pub use store::InMemoryCompetitionStore;
