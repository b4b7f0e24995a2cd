use crate::domain_model::*;
use crate::domain_port::StorageTx;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub friendships: BTreeMap<UserPair, Friendship>,
    pub invitations: BTreeMap<InvitationId, Invitation>,
    pub last_invitation_id: u64,
    pub wishlist: BTreeMap<(UserId, AppId), WishlistItem>,
    pub users: BTreeMap<UserId, UserSummary>,
}

/// In-process tables shared by the memory stores.
///
/// One async mutex guards all tables, so a transaction scope sees and
/// publishes a consistent snapshot.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the account projection returned by friend listings.
    pub async fn upsert_user(&self, user: UserSummary) {
        self.tables.lock().await.users.insert(user.user_id, user);
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }

    pub(crate) async fn begin(&self) -> MemoryTx {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        MemoryTx { guard, work }
    }
}

/// Holds the table lock for its whole life and writes to a private copy.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

impl MemoryTx {
    pub(crate) fn tables(&mut self) -> &mut Tables {
        &mut self.work
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}
