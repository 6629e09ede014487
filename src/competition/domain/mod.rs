//! Domain model for the competition lifecycle.
//!
//! Covers team formation, the project phase state machine, rating
//! aggregation and ranking. Everything here is pure: persistence and
//! authorization wiring stay outside the domain boundary.

mod caller;
mod error;
mod formation;
mod ids;
mod project;
mod ranking;
mod rating;
mod team;

pub use caller::{Caller, CallerRole};
pub use error::{CompetitionDomainError, ParseProjectStatusError};
pub use formation::{CandidatePool, FormationPlan, ProposedTeam, form_teams};
pub use ids::{ProjectId, TeamId, UserId};
pub use project::{
    JudgingCriterion, PersistedProjectData, Project, ProjectStatus, TeamSize, ensure_transition,
};
pub use ranking::{RankingCandidate, RankingEntry, RankingSnapshot, compute_ranking};
pub use rating::{Rating, Score, ScoreAverage};
pub use team::{
    PersistedTeamData, SubmissionRef, Team, TeamName, ensure_disjoint_members,
    stagger_creation_times,
};
