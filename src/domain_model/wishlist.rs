use crate::domain_model::{App, AppId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub user_id: UserId,
    pub app_id: AppId,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// One element of a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortItem {
    pub app_id: AppId,
    pub sort_order: i64,
}

/// Wishlist row joined with catalog display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub app_id: AppId,
    pub name: String,
    pub price: f64,
    pub discount: f64,
    pub image_url: String,
    pub positive_rate: i32,
    pub sort_order: i64,
}

impl WishlistEntry {
    pub fn enrich(item: &WishlistItem, app: App) -> Self {
        Self {
            app_id: item.app_id,
            name: app.name,
            price: app.price,
            discount: app.discount,
            image_url: app.image_url,
            positive_rate: app.positive_rate,
            sort_order: item.sort_order,
        }
    }
}
