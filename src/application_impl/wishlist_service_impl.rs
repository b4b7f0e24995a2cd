use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{Catalog, CatalogError, WishlistStore};
use crate::logger::*;
use std::collections::HashSet;
use std::sync::Arc;

pub struct RealWishlistService {
    wishlist_store: Arc<dyn WishlistStore>,
    catalog: Arc<dyn Catalog>,
}

impl RealWishlistService {
    pub fn new(wishlist_store: Arc<dyn WishlistStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            wishlist_store,
            catalog,
        }
    }

    async fn require_app(&self, app: AppId) -> Result<App, WishlistError> {
        Ok(self.catalog.find_by_id(app).await?)
    }
}

fn validate_batch(items: &[SortItem]) -> Result<(), WishlistError> {
    if items.is_empty() {
        return Err(WishlistError::Validation("sort batch is empty".into()));
    }
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.sort_order < 0 {
            return Err(WishlistError::Validation(format!(
                "negative sort order for app {}",
                item.app_id
            )));
        }
        if !seen.insert(item.app_id) {
            return Err(WishlistError::Validation(format!(
                "app {} appears twice",
                item.app_id
            )));
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl WishlistService for RealWishlistService {
    async fn add_to_wishlist(&self, user: UserId, app: AppId) -> Result<(), WishlistError> {
        self.require_app(app).await?;
        self.wishlist_store.add_item(user, app).await?;
        info!(%user, %app, "wishlist item added");
        Ok(())
    }

    async fn remove_from_wishlist(&self, user: UserId, app: AppId) -> Result<(), WishlistError> {
        self.require_app(app).await?;
        self.wishlist_store.remove_item(user, app).await?;
        info!(%user, %app, "wishlist item removed");
        Ok(())
    }

    async fn wishlist_size(&self, user: UserId) -> Result<u64, WishlistError> {
        self.wishlist_store.item_count(user).await
    }

    async fn wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, WishlistError> {
        let mut items = self.wishlist_store.list_items(user).await?;
        items.sort_by_key(|item| (item.sort_order, item.app_id));

        let mut entries = Vec::with_capacity(items.len());
        for item in &items {
            match self.catalog.find_by_id(item.app_id).await {
                Ok(app) => entries.push(WishlistEntry::enrich(item, app)),
                Err(CatalogError::NotFound(app)) => {
                    warn!(%user, %app, "wishlist item dropped: app no longer in catalog");
                }
                Err(e) => {
                    warn!(%user, app = %item.app_id, error = %e, "wishlist item dropped");
                }
            }
        }
        Ok(entries)
    }

    async fn is_in_wishlist(&self, user: UserId, app: AppId) -> Result<bool, WishlistError> {
        self.wishlist_store.is_in_wishlist(user, app).await
    }

    async fn sort_wishlist(
        &self,
        user: UserId,
        items: Vec<SortItem>,
    ) -> Result<(), WishlistError> {
        validate_batch(&items)?;
        self.wishlist_store.update_order(user, &items).await?;
        info!(%user, count = items.len(), "wishlist reordered");
        Ok(())
    }
}
