//! Deterministic partitioning of a candidate pool into teams.
//!
//! Formation only proposes a grouping. Persisting it is a separate commit
//! step so an operator can review and adjust the proposal first.

use super::{CompetitionDomainError, TeamSize, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered candidate identifiers eligible for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidatePool(Vec<UserId>);

impl CandidatePool {
    /// Wraps an ordered candidate list.
    #[must_use]
    pub const fn new(candidates: Vec<UserId>) -> Self {
        Self(candidates)
    }

    /// Returns candidates in pool order.
    #[must_use]
    pub fn as_slice(&self) -> &[UserId] {
        &self.0
    }

    /// Returns the number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the pool is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<UserId> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One proposed group of candidates, not yet committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTeam {
    member_ids: Vec<UserId>,
}

impl ProposedTeam {
    /// Creates a proposal from explicit members, e.g. after operator edits.
    #[must_use]
    pub const fn new(member_ids: Vec<UserId>) -> Self {
        Self { member_ids }
    }

    /// Returns members in pool order.
    #[must_use]
    pub fn member_ids(&self) -> &[UserId] {
        &self.member_ids
    }

    /// Returns the number of members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.member_ids.len()
    }

    /// Returns whether the proposal has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    /// Consumes the proposal and returns its members.
    #[must_use]
    pub fn into_member_ids(self) -> Vec<UserId> {
        self.member_ids
    }
}

/// Ordered grouping produced by [`form_teams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationPlan {
    teams: Vec<ProposedTeam>,
}

impl FormationPlan {
    /// Returns proposed teams in formation order.
    #[must_use]
    pub fn teams(&self) -> &[ProposedTeam] {
        &self.teams
    }

    /// Returns each team's size in formation order.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.teams.iter().map(ProposedTeam::len).collect()
    }

    /// Consumes the plan and returns its teams.
    #[must_use]
    pub fn into_teams(self) -> Vec<ProposedTeam> {
        self.teams
    }
}

/// Partitions `candidates` into teams of roughly `team_size` members.
///
/// The team count is `max(N / k, 1)`. Members are spread so team sizes
/// differ by at most one, with the surplus going to the earliest teams;
/// a short trailing team is never produced. Candidates keep pool order.
///
/// # Errors
///
/// Returns [`CompetitionDomainError::EmptyCandidatePool`] for an empty pool
/// or [`CompetitionDomainError::DuplicateCandidate`] when a candidate is
/// listed twice.
pub fn form_teams(
    candidates: &CandidatePool,
    team_size: TeamSize,
) -> Result<FormationPlan, CompetitionDomainError> {
    if candidates.is_empty() {
        return Err(CompetitionDomainError::EmptyCandidatePool);
    }
    let mut seen = HashSet::with_capacity(candidates.len());
    if let Some(duplicate) = candidates.as_slice().iter().find(|id| !seen.insert(**id)) {
        return Err(CompetitionDomainError::DuplicateCandidate(*duplicate));
    }

    let total = candidates.len();
    let size = usize::try_from(team_size.value()).unwrap_or(usize::MAX);
    let team_count = total.checked_div(size).unwrap_or_default().max(1);
    let base = total.checked_div(team_count).unwrap_or(total);
    let surplus = total.checked_rem(team_count).unwrap_or_default();

    let mut teams = Vec::with_capacity(team_count);
    let mut rest = candidates.as_slice();
    for position in 0..team_count {
        let take = if position < surplus { base + 1 } else { base };
        let Some((members, tail)) = rest.split_at_checked(take) else {
            break;
        };
        teams.push(ProposedTeam::new(members.to_vec()));
        rest = tail;
    }

    Ok(FormationPlan { teams })
}
