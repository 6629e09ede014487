//! `PostgreSQL` adapters for competition persistence.

mod conversion;
mod models;
mod repository;
mod schema;

pub use repository::{CompetitionPgPool, PostgresCompetitionStore};
