use super::memory_db::{MemoryDb, MemoryTx, Tables};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;

pub struct MemoryRelationStore {
    db: MemoryDb,
}

impl MemoryRelationStore {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    fn newest_first(mut invitations: Vec<Invitation>) -> Vec<Invitation> {
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        invitations
    }
}

fn insert_friendship(tables: &mut Tables, pair: UserPair) -> Result<(), RelationError> {
    if tables.friendships.contains_key(&pair) {
        return Err(RelationError::FriendshipExists);
    }
    tables
        .friendships
        .insert(pair, Friendship::new(pair, Utc::now()));
    Ok(())
}

#[async_trait::async_trait]
impl RelationStore for MemoryRelationStore {
    async fn begin_relation_tx<'t>(
        &'t self,
    ) -> Result<Box<dyn RelationTx<'t> + 't>, RelationError> {
        Ok(Box::new(self.db.begin().await))
    }

    async fn create_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError> {
        let mut tables = self.db.lock().await;
        insert_friendship(&mut tables, UserPair::new(a, b))
    }

    async fn delete_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError> {
        let mut tables = self.db.lock().await;
        tables.friendships.remove(&UserPair::new(a, b));
        Ok(())
    }

    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, RelationError> {
        let tables = self.db.lock().await;
        Ok(tables.friendships.contains_key(&UserPair::new(a, b)))
    }

    async fn count_friends(&self, user: UserId) -> Result<u64, RelationError> {
        let tables = self.db.lock().await;
        let count = tables
            .friendships
            .keys()
            .filter(|pair| pair.contains(user))
            .count();
        Ok(count as u64)
    }

    async fn list_friends(&self, user: UserId) -> Result<Vec<UserSummary>, RelationError> {
        let tables = self.db.lock().await;
        let mut friendships: Vec<&Friendship> = tables
            .friendships
            .values()
            .filter(|f| f.pair().contains(user))
            .collect();
        friendships.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let friends = friendships
            .into_iter()
            .filter_map(|f| f.pair().other(user))
            .map(|other| {
                tables
                    .users
                    .get(&other)
                    .cloned()
                    .unwrap_or_else(|| UserSummary::bare(other))
            })
            .collect();
        Ok(friends)
    }

    async fn create_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Invitation, RelationError> {
        let mut tables = self.db.lock().await;
        tables.last_invitation_id += 1;
        let invitation = Invitation {
            id: InvitationId(tables.last_invitation_id),
            sender,
            receiver,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
        };
        tables.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<Invitation>, RelationError> {
        let tables = self.db.lock().await;
        let matching = tables
            .invitations
            .values()
            .filter(|inv| inv.sender == sender && inv.receiver == receiver)
            .cloned()
            .collect();
        Ok(Self::newest_first(matching).into_iter().next())
    }

    async fn get_invitation_by_id(
        &self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError> {
        let tables = self.db.lock().await;
        Ok(tables.invitations.get(&id).cloned())
    }

    async fn list_received(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError> {
        let tables = self.db.lock().await;
        let matching = tables
            .invitations
            .values()
            .filter(|inv| inv.receiver == user)
            .filter(|inv| status.is_none_or(|s| inv.status == s))
            .cloned()
            .collect();
        Ok(Self::newest_first(matching))
    }

    async fn list_sent(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError> {
        let tables = self.db.lock().await;
        let matching = tables
            .invitations
            .values()
            .filter(|inv| inv.sender == user)
            .filter(|inv| status.is_none_or(|s| inv.status == s))
            .cloned()
            .collect();
        Ok(Self::newest_first(matching))
    }
}

#[async_trait::async_trait]
impl<'t> RelationTx<'t> for MemoryTx {
    async fn lock_invitation(
        &mut self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError> {
        Ok(self.tables().invitations.get(&id).cloned())
    }

    async fn set_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<(), RelationError> {
        let invitation = self
            .tables()
            .invitations
            .get_mut(&id)
            .ok_or(RelationError::InvitationNotFound)?;
        invitation.status = status;
        Ok(())
    }

    async fn insert_friendship(&mut self, pair: UserPair) -> Result<(), RelationError> {
        insert_friendship(self.tables(), pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryRelationStore {
        MemoryRelationStore::new(MemoryDb::new())
    }

    #[tokio::test]
    async fn friendship_is_order_independent() {
        let store = store();

        store.create_friendship(UserId(5), UserId(2)).await.unwrap();

        assert!(store.are_friends(UserId(2), UserId(5)).await.unwrap());
        assert!(store.are_friends(UserId(5), UserId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn mirrored_friendship_is_rejected() {
        let store = store();

        store.create_friendship(UserId(1), UserId(2)).await.unwrap();
        let err = store
            .create_friendship(UserId(2), UserId(1))
            .await
            .unwrap_err();

        assert!(matches!(err, RelationError::FriendshipExists));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.count_friends(UserId(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_friends_returns_the_other_side() {
        let db = MemoryDb::new();
        db.upsert_user(UserSummary {
            user_id: UserId(3),
            user_name: "carol".to_string(),
            nick_name: "Carol".to_string(),
            avatar: String::new(),
        })
        .await;
        let store = MemoryRelationStore::new(db);

        store.create_friendship(UserId(1), UserId(3)).await.unwrap();
        store.create_friendship(UserId(4), UserId(1)).await.unwrap();
        store.create_friendship(UserId(3), UserId(4)).await.unwrap();

        let mut ids: Vec<UserId> = store
            .list_friends(UserId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.user_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![UserId(3), UserId(4)]);

        let friends = store.list_friends(UserId(1)).await.unwrap();
        let carol = friends.iter().find(|u| u.user_id == UserId(3)).unwrap();
        assert_eq!(carol.user_name, "carol");
    }

    #[tokio::test]
    async fn delete_friendship_uses_canonical_pair() {
        let store = store();

        store.create_friendship(UserId(1), UserId(2)).await.unwrap();
        store.delete_friendship(UserId(2), UserId(1)).await.unwrap();

        assert!(!store.are_friends(UserId(1), UserId(2)).await.unwrap());
        // absent pair
        store.delete_friendship(UserId(2), UserId(1)).await.unwrap();
    }

    #[tokio::test]
    async fn accept_creates_friendship_atomically() {
        let store = store();
        let inv = store.create_invitation(UserId(1), UserId(2)).await.unwrap();

        let accepted = store.accept_invitation(inv.id, UserId(2)).await.unwrap();

        assert_eq!(accepted.status, InvitationStatus::Accepted);
        assert!(store.are_friends(UserId(1), UserId(2)).await.unwrap());
        let stored = store.get_invitation_by_id(inv.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Accepted);
    }

    #[tokio::test]
    async fn accept_by_stranger_leaves_invitation_pending() {
        let store = store();
        let inv = store.create_invitation(UserId(1), UserId(2)).await.unwrap();

        let err = store.accept_invitation(inv.id, UserId(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let stored = store.get_invitation_by_id(inv.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Pending);
        assert!(!store.are_friends(UserId(1), UserId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn second_accept_is_rejected_without_duplicate_friendship() {
        let store = store();
        let inv = store.create_invitation(UserId(1), UserId(2)).await.unwrap();
        store.accept_invitation(inv.id, UserId(2)).await.unwrap();

        let err = store.accept_invitation(inv.id, UserId(2)).await.unwrap_err();

        assert!(matches!(
            err,
            RelationError::InvitationResolved(InvitationStatus::Accepted)
        ));
        assert_eq!(store.count_friends(UserId(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn accept_rolls_back_status_when_friendship_exists() {
        let store = store();
        let inv = store.create_invitation(UserId(1), UserId(2)).await.unwrap();
        store.create_friendship(UserId(2), UserId(1)).await.unwrap();

        let err = store.accept_invitation(inv.id, UserId(2)).await.unwrap_err();

        assert!(matches!(err, RelationError::FriendshipExists));
        let stored = store.get_invitation_by_id(inv.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Pending);
    }

    #[tokio::test]
    async fn refuse_does_not_create_friendship() {
        let store = store();
        let inv = store.create_invitation(UserId(1), UserId(2)).await.unwrap();

        let refused = store.refuse_invitation(inv.id, UserId(2)).await.unwrap();

        assert_eq!(refused.status, InvitationStatus::Refused);
        assert!(!store.are_friends(UserId(1), UserId(2)).await.unwrap());
        let err = store.accept_invitation(inv.id, UserId(2)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn resolving_unknown_invitation_is_not_found() {
        let store = store();

        let err = store
            .accept_invitation(InvitationId(404), UserId(2))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn find_invitation_is_directional_and_newest() {
        let store = store();
        let first = store.create_invitation(UserId(1), UserId(2)).await.unwrap();
        store.refuse_invitation(first.id, UserId(2)).await.unwrap();
        let second = store.create_invitation(UserId(1), UserId(2)).await.unwrap();

        let found = store.find_invitation(UserId(1), UserId(2)).await.unwrap();
        assert_eq!(found.map(|inv| inv.id), Some(second.id));
        assert!(
            store
                .find_invitation(UserId(2), UserId(1))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn listings_filter_by_status_newest_first() {
        let store = store();
        let a = store.create_invitation(UserId(1), UserId(9)).await.unwrap();
        let b = store.create_invitation(UserId(2), UserId(9)).await.unwrap();
        let c = store.create_invitation(UserId(3), UserId(9)).await.unwrap();
        store.refuse_invitation(b.id, UserId(9)).await.unwrap();

        let all: Vec<InvitationId> = store
            .list_received(UserId(9), None)
            .await
            .unwrap()
            .into_iter()
            .map(|inv| inv.id)
            .collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let pending: Vec<InvitationId> = store
            .list_received(UserId(9), Some(InvitationStatus::Pending))
            .await
            .unwrap()
            .into_iter()
            .map(|inv| inv.id)
            .collect();
        assert_eq!(pending, vec![c.id, a.id]);

        let sent = store.list_sent(UserId(2), None).await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].status, InvitationStatus::Refused);
    }
}
