//! Committed team aggregate.

use super::{CompetitionDomainError, ProjectId, TeamId, UserId};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Non-empty display name for a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::EmptyTeamName`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CompetitionDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CompetitionDomainError::EmptyTeamName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque pointer to a team's submission (repository URL, upload key...).
///
/// The engine stores it but never validates or dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionRef(String);

impl SubmissionRef {
    /// Creates a submission reference.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::EmptySubmissionReference`] when the
    /// value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CompetitionDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CompetitionDomainError::EmptySubmissionReference);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team aggregate: a committed group of candidates in one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    project_id: ProjectId,
    name: TeamName,
    member_ids: Vec<UserId>,
    submission: Option<SubmissionRef>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Persisted team identifier.
    pub id: TeamId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted display name.
    pub name: TeamName,
    /// Persisted members in formation order.
    pub member_ids: Vec<UserId>,
    /// Persisted submission reference, if any.
    pub submission: Option<SubmissionRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionDomainError::EmptyTeam`] when `member_ids` is
    /// empty or [`CompetitionDomainError::DuplicateMember`] when a member is
    /// listed twice.
    pub fn new(
        project_id: ProjectId,
        name: TeamName,
        member_ids: Vec<UserId>,
        clock: &impl Clock,
    ) -> Result<Self, CompetitionDomainError> {
        if member_ids.is_empty() {
            return Err(CompetitionDomainError::EmptyTeam);
        }
        let mut seen = HashSet::with_capacity(member_ids.len());
        if let Some(duplicate) = member_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(CompetitionDomainError::DuplicateMember(*duplicate));
        }

        Ok(Self {
            id: TeamId::new(),
            project_id,
            name,
            member_ids,
            submission: None,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            member_ids: data.member_ids,
            submission: data.submission,
            created_at: data.created_at,
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns members in formation order.
    #[must_use]
    pub fn member_ids(&self) -> &[UserId] {
        &self.member_ids
    }

    /// Returns whether `user_id` is a member of this team.
    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Returns the submission reference, if any.
    #[must_use]
    pub const fn submission(&self) -> Option<&SubmissionRef> {
        self.submission.as_ref()
    }

    /// Returns the creation timestamp used for ranking tie-breaks.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the submission reference.
    pub fn attach_submission(&mut self, submission: SubmissionRef) {
        self.submission = Some(submission);
    }
}

/// Verifies that no member appears in more than one of `teams`.
///
/// # Errors
///
/// Returns [`CompetitionDomainError::DuplicateMember`] naming the first
/// member found twice.
pub fn ensure_disjoint_members(teams: &[Team]) -> Result<(), CompetitionDomainError> {
    let mut seen = HashSet::new();
    for member in teams.iter().flat_map(Team::member_ids) {
        if !seen.insert(*member) {
            return Err(CompetitionDomainError::DuplicateMember(*member));
        }
    }
    Ok(())
}

/// Truncates creation stamps to microseconds and spaces them so each team is
/// strictly later than the one before it.
///
/// Teams committed together keep their request order under any clock
/// resolution and after a round trip through a microsecond-precision store.
pub fn stagger_creation_times(teams: &mut [Team]) {
    let step = TimeDelta::microseconds(1);
    let mut previous: Option<DateTime<Utc>> = None;
    for team in teams {
        let stamped = team.created_at.trunc_subsecs(6);
        let created_at = match previous {
            Some(earlier) if stamped <= earlier => {
                earlier.checked_add_signed(step).unwrap_or(stamped)
            }
            _ => stamped,
        };
        team.created_at = created_at;
        previous = Some(created_at);
    }
}
