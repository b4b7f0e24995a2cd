use super::memory_db::{MemoryDb, MemoryTx};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;

pub struct MemoryWishlistStore {
    db: MemoryDb,
}

impl MemoryWishlistStore {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl WishlistStore for MemoryWishlistStore {
    async fn begin_wishlist_tx<'t>(
        &'t self,
    ) -> Result<Box<dyn WishlistTx<'t> + 't>, WishlistError> {
        Ok(Box::new(self.db.begin().await))
    }

    async fn remove_item(&self, user: UserId, app: AppId) -> Result<(), WishlistError> {
        self.db.lock().await.wishlist.remove(&(user, app));
        Ok(())
    }

    async fn item_count(&self, user: UserId) -> Result<u64, WishlistError> {
        let tables = self.db.lock().await;
        let count = tables.wishlist.keys().filter(|(u, _)| *u == user).count();
        Ok(count as u64)
    }

    async fn list_items(&self, user: UserId) -> Result<Vec<WishlistItem>, WishlistError> {
        let tables = self.db.lock().await;
        Ok(tables
            .wishlist
            .values()
            .filter(|item| item.user_id == user)
            .cloned()
            .collect())
    }

    async fn is_in_wishlist(&self, user: UserId, app: AppId) -> Result<bool, WishlistError> {
        Ok(self.db.lock().await.wishlist.contains_key(&(user, app)))
    }
}

#[async_trait::async_trait]
impl<'t> WishlistTx<'t> for MemoryTx {
    async fn lock_item(
        &mut self,
        user: UserId,
        app: AppId,
    ) -> Result<Option<i64>, WishlistError> {
        Ok(self
            .tables()
            .wishlist
            .get(&(user, app))
            .map(|item| item.sort_order))
    }

    async fn max_sort_order(&mut self, user: UserId) -> Result<Option<i64>, WishlistError> {
        Ok(self
            .tables()
            .wishlist
            .values()
            .filter(|item| item.user_id == user)
            .map(|item| item.sort_order)
            .max())
    }

    async fn insert_item(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<bool, WishlistError> {
        let wishlist = &mut self.tables().wishlist;
        if wishlist.contains_key(&(user, app)) {
            return Ok(false);
        }
        wishlist.insert(
            (user, app),
            WishlistItem {
                user_id: user,
                app_id: app,
                sort_order,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn set_sort_order(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<(), WishlistError> {
        if let Some(item) = self.tables().wishlist.get_mut(&(user, app)) {
            item.sort_order = sort_order;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(items: &[WishlistItem]) -> Vec<(u64, i64)> {
        let mut pairs: Vec<(u64, i64)> = items
            .iter()
            .map(|item| (item.app_id.0, item.sort_order))
            .collect();
        pairs.sort();
        pairs
    }

    #[tokio::test]
    async fn append_assigns_increasing_orders() {
        let store = MemoryWishlistStore::new(MemoryDb::new());

        store.add_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(20)).await.unwrap();
        store.add_item(UserId(2), AppId(10)).await.unwrap();

        let items = store.list_items(UserId(1)).await.unwrap();
        assert_eq!(orders(&items), vec![(10, 0), (20, 1)]);
        let other = store.list_items(UserId(2)).await.unwrap();
        assert_eq!(orders(&other), vec![(10, 0)]);
    }

    #[tokio::test]
    async fn adding_twice_keeps_one_item_and_its_order() {
        let store = MemoryWishlistStore::new(MemoryDb::new());
        store.add_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(20)).await.unwrap();

        store.add_item(UserId(1), AppId(10)).await.unwrap();

        assert_eq!(store.item_count(UserId(1)).await.unwrap(), 2);
        let items = store.list_items(UserId(1)).await.unwrap();
        assert_eq!(orders(&items), vec![(10, 0), (20, 1)]);
    }

    #[tokio::test]
    async fn update_order_applies_whole_batch() {
        let store = MemoryWishlistStore::new(MemoryDb::new());
        store.add_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(20)).await.unwrap();

        let batch = [
            SortItem { app_id: AppId(10), sort_order: 1 },
            SortItem { app_id: AppId(20), sort_order: 0 },
        ];
        store.update_order(UserId(1), &batch).await.unwrap();

        let items = store.list_items(UserId(1)).await.unwrap();
        assert_eq!(orders(&items), vec![(10, 1), (20, 0)]);
    }

    #[tokio::test]
    async fn update_order_with_unknown_app_changes_nothing() {
        let store = MemoryWishlistStore::new(MemoryDb::new());
        store.add_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(20)).await.unwrap();

        let batch = [
            SortItem { app_id: AppId(20), sort_order: 7 },
            SortItem { app_id: AppId(99), sort_order: 0 },
        ];
        let err = store.update_order(UserId(1), &batch).await.unwrap_err();

        assert!(matches!(err, WishlistError::NotInWishlist(AppId(99))));
        let items = store.list_items(UserId(1)).await.unwrap();
        assert_eq!(orders(&items), vec![(10, 0), (20, 1)]);
    }

    #[tokio::test]
    async fn append_after_max_order_is_rejected() {
        let store = MemoryWishlistStore::new(MemoryDb::new());
        store.add_item(UserId(1), AppId(1)).await.unwrap();
        let batch = [SortItem { app_id: AppId(1), sort_order: i64::MAX }];
        store.update_order(UserId(1), &batch).await.unwrap();

        let err = store.add_item(UserId(1), AppId(2)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!store.is_in_wishlist(UserId(1), AppId(2)).await.unwrap());
        assert_eq!(store.item_count(UserId(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_then_append_goes_to_the_end() {
        let store = MemoryWishlistStore::new(MemoryDb::new());
        store.add_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(20)).await.unwrap();

        store.remove_item(UserId(1), AppId(10)).await.unwrap();
        store.remove_item(UserId(1), AppId(10)).await.unwrap();
        store.add_item(UserId(1), AppId(10)).await.unwrap();

        assert!(store.is_in_wishlist(UserId(1), AppId(10)).await.unwrap());
        let items = store.list_items(UserId(1)).await.unwrap();
        assert_eq!(orders(&items), vec![(10, 2), (20, 1)]);
    }
}
