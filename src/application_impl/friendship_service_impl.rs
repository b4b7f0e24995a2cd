use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::RelationStore;
use crate::logger::*;
use std::sync::Arc;

pub struct RealFriendshipService {
    relation_store: Arc<dyn RelationStore>,
}

impl RealFriendshipService {
    pub fn new(relation_store: Arc<dyn RelationStore>) -> RealFriendshipService {
        RealFriendshipService { relation_store }
    }

    async fn has_pending(&self, sender: UserId, receiver: UserId) -> Result<bool, RelationError> {
        let newest = self.relation_store.find_invitation(sender, receiver).await?;
        Ok(newest.is_some_and(|inv| inv.is_pending()))
    }
}

#[async_trait::async_trait]
impl FriendshipService for RealFriendshipService {
    async fn send_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Invitation, RelationError> {
        if receiver.0 == 0 {
            return Err(RelationError::Validation("receiver id is required".into()));
        }
        if sender == receiver {
            return Err(RelationError::SelfInvite);
        }
        if self.relation_store.are_friends(sender, receiver).await? {
            return Err(RelationError::AlreadyFriends);
        }
        // a pending request either way blocks; resolved history does not
        if self.has_pending(sender, receiver).await? || self.has_pending(receiver, sender).await?
        {
            return Err(RelationError::DuplicateInvitation);
        }

        let invitation = self
            .relation_store
            .create_invitation(sender, receiver)
            .await?;
        info!(id = %invitation.id, %sender, %receiver, "invitation sent");
        Ok(invitation)
    }

    async fn accept_invitation(
        &self,
        invitation: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError> {
        let accepted = self
            .relation_store
            .accept_invitation(invitation, acting_user)
            .await?;
        info!(id = %invitation, sender = %accepted.sender, receiver = %accepted.receiver, "invitation accepted");
        Ok(accepted)
    }

    async fn refuse_invitation(
        &self,
        invitation: InvitationId,
        acting_user: UserId,
    ) -> Result<Invitation, RelationError> {
        let refused = self
            .relation_store
            .refuse_invitation(invitation, acting_user)
            .await?;
        info!(id = %invitation, "invitation refused");
        Ok(refused)
    }

    async fn received_invitations(&self, user: UserId) -> Result<Vec<Invitation>, RelationError> {
        self.relation_store
            .list_received(user, Some(InvitationStatus::Pending))
            .await
    }

    async fn sent_invitations(&self, user: UserId) -> Result<Vec<Invitation>, RelationError> {
        self.relation_store
            .list_sent(user, Some(InvitationStatus::Pending))
            .await
    }

    async fn remove_friend(&self, user: UserId, friend: UserId) -> Result<(), RelationError> {
        if !self.relation_store.are_friends(user, friend).await? {
            return Err(RelationError::NotFriends);
        }
        self.relation_store.delete_friendship(user, friend).await?;
        info!(%user, %friend, "friendship removed");
        Ok(())
    }

    async fn check_friendship(&self, user: UserId, other: UserId) -> Result<bool, RelationError> {
        self.relation_store.are_friends(user, other).await
    }

    async fn friend_count(&self, user: UserId) -> Result<u64, RelationError> {
        self.relation_store.count_friends(user).await
    }

    async fn friend_list(&self, user: UserId) -> Result<Vec<UserSummary>, RelationError> {
        self.relation_store.list_friends(user).await
    }
}
