//! Explicit caller capability passed into every engine operation.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role the authenticated caller acts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    /// Runs projects: forms teams and drives the lifecycle.
    Operator,
    /// Scores teams without taking part in them.
    Judge,
    /// Competes in teams and rates peers.
    Participant,
}

impl CallerRole {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Judge => "judge",
            Self::Participant => "participant",
        }
    }
}

impl fmt::Display for CallerRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Capability token identifying who is calling and in which role.
///
/// Session handling lives outside the engine; the transport layer resolves
/// the session and hands the engine one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    user_id: UserId,
    role: CallerRole,
}

impl Caller {
    /// Creates a caller capability.
    #[must_use]
    pub const fn new(user_id: UserId, role: CallerRole) -> Self {
        Self { user_id, role }
    }

    /// Creates an operator capability.
    #[must_use]
    pub const fn operator(user_id: UserId) -> Self {
        Self::new(user_id, CallerRole::Operator)
    }

    /// Creates a judge capability.
    #[must_use]
    pub const fn judge(user_id: UserId) -> Self {
        Self::new(user_id, CallerRole::Judge)
    }

    /// Creates a participant capability.
    #[must_use]
    pub const fn participant(user_id: UserId) -> Self {
        Self::new(user_id, CallerRole::Participant)
    }

    /// Returns the caller identity.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller role.
    #[must_use]
    pub const fn role(&self) -> CallerRole {
        self.role
    }

    /// Returns whether the caller may run formation and lifecycle operations.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self.role, CallerRole::Operator)
    }
}
