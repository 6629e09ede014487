//! Project aggregate root and its lifecycle state machine.

use super::{CompetitionDomainError, ParseProjectStatusError, ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;

/// Lifecycle status of a competition project.
///
/// The only legal edges are `Created -> Judging` and `Judging -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Teams are being formed; ratings are not yet accepted.
    Created,
    /// Teams are being rated.
    Judging,
    /// The ranking has been frozen.
    Completed,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Judging => "judging",
            Self::Completed => "completed",
        }
    }

    /// Returns the single status this one may advance to, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Judging),
            Self::Judging => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Judging) | (Self::Judging, Self::Completed)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "judging" => Ok(Self::Judging),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Validates that `from -> to` is one of the two forward edges.
///
/// # Errors
///
/// Returns [`CompetitionDomainError::InvalidStatusTransition`] for same-state,
/// skipping, or backward moves.
pub const fn ensure_transition(
    project_id: ProjectId,
    from: ProjectStatus,
    to: ProjectStatus,
) -> Result<(), CompetitionDomainError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CompetitionDomainError::InvalidStatusTransition {
            project_id,
            from,
            to,
        })
    }
}

/// Positive target number of members per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamSize(NonZeroU32);

impl TeamSize {
    /// Creates a validated team size.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::InvalidTeamSize`] when the value is
    /// zero.
    pub const fn new(value: u32) -> Result<Self, CompetitionDomainError> {
        match NonZeroU32::new(value) {
            Some(size) => Ok(Self(size)),
            None => Err(CompetitionDomainError::InvalidTeamSize(value)),
        }
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named, weighted judging criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JudgingCriterion {
    name: String,
    weight: u32,
}

impl JudgingCriterion {
    /// Creates a validated criterion.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::EmptyCriterionName`] for blank names
    /// or [`CompetitionDomainError::InvalidCriterionWeight`] for a zero weight.
    pub fn new(name: impl Into<String>, weight: u32) -> Result<Self, CompetitionDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CompetitionDomainError::EmptyCriterionName);
        }
        if weight == 0 {
            return Err(CompetitionDomainError::InvalidCriterionWeight(
                trimmed.to_owned(),
            ));
        }
        Ok(Self {
            name: trimmed.to_owned(),
            weight,
        })
    }

    /// Returns the criterion name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the criterion weight.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    owner_id: UserId,
    team_size: TeamSize,
    criteria: Vec<JudgingCriterion>,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: String,
    /// Persisted owning operator.
    pub owner_id: UserId,
    /// Persisted team size.
    pub team_size: TeamSize,
    /// Persisted judging criteria in display order.
    pub criteria: Vec<JudgingCriterion>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project in [`ProjectStatus::Created`].
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::EmptyProjectName`] for a blank name
    /// or [`CompetitionDomainError::DuplicateCriterion`] when two criteria
    /// share a name.
    pub fn new(
        name: impl Into<String>,
        owner_id: UserId,
        team_size: TeamSize,
        criteria: Vec<JudgingCriterion>,
        clock: &impl Clock,
    ) -> Result<Self, CompetitionDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(CompetitionDomainError::EmptyProjectName);
        }

        let mut seen = HashSet::new();
        for criterion in &criteria {
            if !seen.insert(criterion.name()) {
                return Err(CompetitionDomainError::DuplicateCriterion(
                    criterion.name().to_owned(),
                ));
            }
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name: trimmed.to_owned(),
            owner_id,
            team_size,
            criteria,
            status: ProjectStatus::Created,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            owner_id: data.owner_id,
            team_size: data.team_size,
            criteria: data.criteria,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning operator.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the target team size.
    #[must_use]
    pub const fn team_size(&self) -> TeamSize {
        self.team_size
    }

    /// Returns the judging criteria in display order.
    #[must_use]
    pub fn criteria(&self) -> &[JudgingCriterion] {
        &self.criteria
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the project to `target` when the edge is legal.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::InvalidStatusTransition`] and leaves
    /// the project unchanged for any other edge.
    pub fn transition_to(
        &mut self,
        target: ProjectStatus,
        clock: &impl Clock,
    ) -> Result<(), CompetitionDomainError> {
        ensure_transition(self.id, self.status, target)?;
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }
}
