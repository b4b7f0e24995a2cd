use super::repo_tx_mysql::{MySqlTx, MySqlTxManager};
use super::util::{count_to_u64, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use sqlx::{MySqlPool, Row};

pub struct MySqlWishlistStore {
    tx_manager: MySqlTxManager,
}

impl MySqlWishlistStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            tx_manager: MySqlTxManager::new(pool),
        }
    }

    fn pool(&self) -> &MySqlPool {
        self.tx_manager.pool()
    }
}

#[async_trait::async_trait]
impl WishlistStore for MySqlWishlistStore {
    async fn begin_wishlist_tx<'t>(
        &'t self,
    ) -> Result<Box<dyn WishlistTx<'t> + 't>, WishlistError> {
        let tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| WishlistError::Store(format!("begin: {e}")))?;
        Ok(Box::new(tx))
    }

    async fn remove_item(&self, user: UserId, app: AppId) -> Result<(), WishlistError> {
        sqlx::query("DELETE FROM wishlist_item WHERE user_id = ? AND app_id = ?")
            .bind(user)
            .bind(app)
            .execute(self.pool())
            .await
            .map_err(|e| WishlistError::Store(format!("delete wishlist item: {e}")))?;

        Ok(())
    }

    async fn item_count(&self, user: UserId) -> Result<u64, WishlistError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM wishlist_item WHERE user_id = ?")
                .bind(user)
                .fetch_one(self.pool())
                .await
                .map_err(|e| WishlistError::Store(format!("count wishlist: {e}")))?;

        count_to_u64(count).map_err(WishlistError::Store)
    }

    async fn list_items(&self, user: UserId) -> Result<Vec<WishlistItem>, WishlistError> {
        let rows = sqlx::query(
            r#"
SELECT user_id, app_id, sort_order, created_at
FROM wishlist_item
WHERE user_id = ?
"#,
        )
        .bind(user)
        .fetch_all(self.pool())
        .await
        .map_err(|e| WishlistError::Store(format!("list wishlist: {e}")))?;

        let decode = |e: sqlx::Error| WishlistError::Store(format!("decode wishlist item: {e}"));
        rows.into_iter()
            .map(|row| {
                Ok(WishlistItem {
                    user_id: row.try_get("user_id").map_err(decode)?,
                    app_id: row.try_get("app_id").map_err(decode)?,
                    sort_order: row.try_get("sort_order").map_err(decode)?,
                    created_at: row.try_get("created_at").map_err(decode)?,
                })
            })
            .collect()
    }

    async fn is_in_wishlist(&self, user: UserId, app: AppId) -> Result<bool, WishlistError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM wishlist_item WHERE user_id = ? AND app_id = ?",
        )
        .bind(user)
        .bind(app)
        .fetch_one(self.pool())
        .await
        .map_err(|e| WishlistError::Store(format!("check wishlist item: {e}")))?;

        Ok(count > 0)
    }
}

#[async_trait::async_trait]
impl<'t> WishlistTx<'t> for MySqlTx {
    async fn lock_item(
        &mut self,
        user: UserId,
        app: AppId,
    ) -> Result<Option<i64>, WishlistError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT sort_order FROM wishlist_item WHERE user_id = ? AND app_id = ? FOR UPDATE",
        )
        .bind(user)
        .bind(app)
        .fetch_optional(self.conn())
        .await
        .map_err(|e| WishlistError::Store(format!("lock wishlist item: {e}")))
    }

    async fn max_sort_order(&mut self, user: UserId) -> Result<Option<i64>, WishlistError> {
        sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(sort_order) FROM wishlist_item WHERE user_id = ?",
        )
        .bind(user)
        .fetch_one(self.conn())
        .await
        .map_err(|e| WishlistError::Store(format!("max sort order: {e}")))
    }

    async fn insert_item(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<bool, WishlistError> {
        let res = sqlx::query(
            r#"
INSERT INTO wishlist_item (user_id, app_id, sort_order, created_at)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(user)
        .bind(app)
        .bind(sort_order)
        .bind(Utc::now())
        .execute(self.conn())
        .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) if is_dup_key(&e) => Ok(false),
            Err(e) => Err(WishlistError::Store(format!("insert wishlist item: {e}"))),
        }
    }

    async fn set_sort_order(
        &mut self,
        user: UserId,
        app: AppId,
        sort_order: i64,
    ) -> Result<(), WishlistError> {
        sqlx::query("UPDATE wishlist_item SET sort_order = ? WHERE user_id = ? AND app_id = ?")
            .bind(sort_order)
            .bind(user)
            .bind(app)
            .execute(self.conn())
            .await
            .map_err(|e| WishlistError::Store(format!("update sort order: {e}")))?;

        Ok(())
    }
}
