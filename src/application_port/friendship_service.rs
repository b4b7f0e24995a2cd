use crate::application_port::ErrorKind;
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("cannot invite yourself")]
    SelfInvite,
    #[error("already friends")]
    AlreadyFriends,
    #[error("a pending invitation already exists between these users")]
    DuplicateInvitation,
    #[error("not friends")]
    NotFriends,
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("only the receiver may resolve this invitation")]
    NotReceiver,
    #[error("invitation already {0}")]
    InvitationResolved(InvitationStatus),
    #[error("friendship already recorded")]
    FriendshipExists,
    #[error("store error: {0}")]
    Store(String),
}

impl RelationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelationError::Validation(_) | RelationError::SelfInvite => ErrorKind::Validation,
            RelationError::InvitationNotFound => ErrorKind::NotFound,
            RelationError::NotReceiver => ErrorKind::Unauthorized,
            RelationError::AlreadyFriends
            | RelationError::DuplicateInvitation
            | RelationError::NotFriends
            | RelationError::InvitationResolved(_)
            | RelationError::FriendshipExists => ErrorKind::Conflict,
            RelationError::Store(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<anyhow::Error> for RelationError {
    fn from(err: anyhow::Error) -> Self {
        RelationError::Store(err.to_string())
    }
}

impl From<TransitionError> for RelationError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotReceiver => RelationError::NotReceiver,
            TransitionError::AlreadyResolved(status) => RelationError::InvitationResolved(status),
            TransitionError::IllegalTarget => RelationError::Validation(err.to_string()),
        }
    }
}

/// Invitation workflow and friendship queries for an authenticated actor.
///
/// Every call is stateless: nothing is cached between calls and all state is
/// re-read from the relation store.
#[async_trait::async_trait]
pub trait FriendshipService: Send + Sync {
    /// Creates a pending invitation. Not idempotent: a second call while the
    /// first is still pending fails with `DuplicateInvitation`.
    async fn send_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Invitation, RelationError>;
    /// Single-shot: a repeated call fails with `InvitationResolved`.
    async fn accept_invitation(
        &self,
        invitation: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError>;
    /// Single-shot: a repeated call fails with `InvitationResolved`.
    async fn refuse_invitation(
        &self,
        invitation: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError>;
    async fn received_invitations(&self, user: UserId) -> Result<Vec<Invitation>, RelationError>;
    async fn sent_invitations(&self, user: UserId) -> Result<Vec<Invitation>, RelationError>;
    async fn remove_friend(&self, user: UserId, friend: UserId) -> Result<(), RelationError>;
    async fn check_friendship(&self, user: UserId, other: UserId) -> Result<bool, RelationError>;
    async fn friend_count(&self, user: UserId) -> Result<u64, RelationError>;
    async fn friend_list(&self, user: UserId) -> Result<Vec<UserSummary>, RelationError>;
}
