use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::{StorageTx, finish};

/// Writes that must land together when an invitation is resolved.
#[async_trait::async_trait]
pub trait RelationTx<'t>: StorageTx<'t> {
    /// Loads the invitation and holds it against concurrent resolution until
    /// the scope ends.
    async fn lock_invitation(
        &mut self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError>;
    async fn set_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<(), RelationError>;
    /// Fails with `FriendshipExists` if the canonical row is already there.
    async fn insert_friendship(&mut self, pair: UserPair) -> Result<(), RelationError>;
}

/// Exclusive writer of the friendship and invitation tables.
///
/// Every friendship operation canonicalizes its two ids through `UserPair`.
/// Invitation preconditions (no self invite, not already friends, no pending
/// duplicate) are the caller's job, not the store's.
#[async_trait::async_trait]
pub trait RelationStore: Send + Sync {
    async fn begin_relation_tx<'t>(&'t self)
    -> Result<Box<dyn RelationTx<'t> + 't>, RelationError>;

    async fn create_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError>;
    /// Deleting an absent pair is a no-op.
    async fn delete_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError>;
    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, RelationError>;
    async fn count_friends(&self, user: UserId) -> Result<u64, RelationError>;
    async fn list_friends(&self, user: UserId) -> Result<Vec<UserSummary>, RelationError>;

    async fn create_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Invitation, RelationError>;
    /// Newest sender -> receiver invitation. Direction matters.
    async fn find_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<Invitation>, RelationError>;
    async fn get_invitation_by_id(
        &self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError>;
    /// Newest first.
    async fn list_received(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError>;
    /// Newest first.
    async fn list_sent(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError>;

    /// Marks the invitation accepted and records the friendship in one
    /// transaction. Either both writes commit or neither does.
    async fn accept_invitation(
        &self,
        id: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError> {
        self.resolve_invitation(id, acting_user, InvitationStatus::Accepted)
            .await
    }

    async fn refuse_invitation(
        &self,
        id: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError> {
        self.resolve_invitation(id, acting_user, InvitationStatus::Refused)
            .await
    }

    async fn resolve_invitation(
        &self,
        id: InvitationId,
        acting_user: UserId,
        target: InvitationStatus,
    ) -> Result<Invitation, RelationError> {
        let mut tx = self.begin_relation_tx().await?;
        let result = resolve_in_tx(&mut *tx, id, acting_user, target).await;
        finish(tx, result).await
    }
}

async fn resolve_in_tx<'t>(
    tx: &mut (dyn RelationTx<'t> + 't),
    id: InvitationId,
    acting_user: UserId,
    target: InvitationStatus,
) -> Result<Invitation, RelationError> {
    let mut invitation = tx
        .lock_invitation(id)
        .await?
        .ok_or(RelationError::InvitationNotFound)?;

    let status = invitation.transition(acting_user, target)?;
    tx.set_invitation_status(id, status).await?;
    if status == InvitationStatus::Accepted {
        tx.insert_friendship(UserPair::new(invitation.sender, invitation.receiver))
            .await?;
    }

    invitation.status = status;
    Ok(invitation)
}
