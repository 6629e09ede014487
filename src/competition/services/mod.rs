//! Application services for the competition lifecycle.

mod error;
mod formation;
mod lifecycle;
mod rating;

pub use error::{CompetitionServiceError, CompetitionServiceResult, ErrorKind, ensure_operator};
pub use formation::{CommitTeamsRequest, ProposeTeamsRequest, TeamFormationService};
pub use lifecycle::{AdvanceStatusRequest, CreateProjectRequest, ProjectLifecycleService};
pub use rating::RatingService;
