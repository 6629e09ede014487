//! Engine configuration.

use crate::competition::domain::{CompetitionDomainError, TeamSize};
use serde::{Deserialize, Serialize};

/// Tunables for formation limits and rating scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitionConfig {
    /// Whether participants may rate the team they belong to.
    pub allow_self_rating: bool,
    /// Largest team size formation accepts; unlimited when `None`.
    pub max_team_size: Option<u32>,
}

impl CompetitionConfig {
    /// Creates a lenient configuration that allows self-rating.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            allow_self_rating: true,
            max_team_size: None,
        }
    }

    /// Parses a configuration from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Validates a requested team size against the configured limit.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::TeamSizeExceedsLimit`] when
    /// `team_size` is above `max_team_size`.
    pub const fn check_team_size(&self, team_size: TeamSize) -> Result<(), CompetitionDomainError> {
        match self.max_team_size {
            Some(max) if team_size.value() > max => {
                Err(CompetitionDomainError::TeamSizeExceedsLimit {
                    requested: team_size.value(),
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}
