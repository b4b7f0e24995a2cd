use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct InvitationId(pub u64);

impl fmt::Display for InvitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvitationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(InvitationId)
    }
}

/// `pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Refused,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Refused => "refused",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "refused" => Ok(InvitationStatus::Refused),
            other => Err(format!("unknown invitation status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("only the receiver may resolve an invitation")]
    NotReceiver,
    #[error("invitation already {0}")]
    AlreadyResolved(InvitationStatus),
    #[error("cannot move an invitation back to pending")]
    IllegalTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub sender: UserId,
    pub receiver: UserId,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Validates `pending -> target` on behalf of `actor`.
    ///
    /// Authorization is checked before state so that a stranger gets the
    /// same answer for a pending and a resolved invitation.
    pub fn transition(
        &self,
        actor: UserId,
        target: InvitationStatus,
    ) -> Result<InvitationStatus, TransitionError> {
        if target == InvitationStatus::Pending {
            return Err(TransitionError::IllegalTarget);
        }
        if actor != self.receiver {
            return Err(TransitionError::NotReceiver);
        }
        if self.status.is_terminal() {
            return Err(TransitionError::AlreadyResolved(self.status));
        }
        Ok(target)
    }
}
