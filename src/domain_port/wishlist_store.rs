use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::{StorageTx, finish};

#[async_trait::async_trait]
pub trait WishlistTx<'t>: StorageTx<'t> {
    /// Current sort order of the item, locked until the scope ends.
    async fn lock_item(&mut self, user: UserId, app: AppId)
    -> Result<Option<i64>, WishlistError>;
    /// Highest sort order in the user's list, `None` when the list is empty.
    async fn max_sort_order(&mut self, user: UserId) -> Result<Option<i64>, WishlistError>;
    /// Returns `false` when the row already existed.
    async fn insert_item(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<bool, WishlistError>;
    async fn set_sort_order(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<(), WishlistError>;
}

/// Exclusive writer of the wishlist table.
#[async_trait::async_trait]
pub trait WishlistStore: Send + Sync {
    async fn begin_wishlist_tx<'t>(&'t self)
    -> Result<Box<dyn WishlistTx<'t> + 't>, WishlistError>;

    /// Deleting an absent item is a no-op.
    async fn remove_item(&self, user: UserId, app: AppId) -> Result<(), WishlistError>;
    async fn item_count(&self, user: UserId) -> Result<u64, WishlistError>;
    /// No particular order; callers sort by `sort_order`.
    async fn list_items(&self, user: UserId) -> Result<Vec<WishlistItem>, WishlistError>;
    async fn is_in_wishlist(&self, user: UserId, app: AppId) -> Result<bool, WishlistError>;

    /// Idempotent append: an existing item keeps its sort order, a new one
    /// gets `max + 1`, or `0` on an empty list.
    async fn add_item(&self, user: UserId, app: AppId) -> Result<(), WishlistError> {
        let mut tx = self.begin_wishlist_tx().await?;
        let result = append_in_tx(&mut *tx, user, app).await;
        finish(tx, result).await
    }

    /// Applies the whole batch or nothing. Any app missing from the user's
    /// list aborts the batch with `NotInWishlist`.
    async fn update_order(&self, user: UserId, items: &[SortItem]) -> Result<(), WishlistError> {
        let mut tx = self.begin_wishlist_tx().await?;
        let result = reorder_in_tx(&mut *tx, user, items).await;
        finish(tx, result).await
    }
}

async fn append_in_tx<'t>(
    tx: &mut (dyn WishlistTx<'t> + 't),
    user: UserId,
    app: AppId,
) -> Result<(), WishlistError> {
    if tx.lock_item(user, app).await?.is_some() {
        return Ok(());
    }

    let next = match tx.max_sort_order(user).await? {
        None => 0,
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| WishlistError::Validation("wishlist order exhausted".into()))?,
    };
    if !tx.insert_item(user, app, next).await? {
        // lost a race with a concurrent add of the same app
        tracing::debug!(%user, %app, "wishlist item appeared concurrently");
    }
    Ok(())
}

async fn reorder_in_tx<'t>(
    tx: &mut (dyn WishlistTx<'t> + 't),
    user: UserId,
    items: &[SortItem],
) -> Result<(), WishlistError> {
    for item in items {
        if tx.lock_item(user, item.app_id).await?.is_none() {
            return Err(WishlistError::NotInWishlist(item.app_id));
        }
        tx.set_sort_order(user, item.app_id, item.sort_order).await?;
    }
    Ok(())
}
