use crate::application_port::ErrorKind;
use crate::domain_model::*;
use crate::domain_port::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("app {0} not found")]
    AppNotFound(AppId),
    #[error("app {0} is not in the wishlist")]
    NotInWishlist(AppId),
    #[error("store error: {0}")]
    Store(String),
}

impl WishlistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WishlistError::Validation(_) => ErrorKind::Validation,
            WishlistError::AppNotFound(_) | WishlistError::NotInWishlist(_) => ErrorKind::NotFound,
            WishlistError::Store(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<anyhow::Error> for WishlistError {
    fn from(err: anyhow::Error) -> Self {
        WishlistError::Store(err.to_string())
    }
}

impl From<CatalogError> for WishlistError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(app) => WishlistError::AppNotFound(app),
            CatalogError::Store(e) => WishlistError::Store(e),
        }
    }
}

/// Per-user ordered wishlist.
///
/// Idempotence differs per operation: adding and removing are idempotent,
/// sorting is all-or-nothing and leaves the list untouched on any failure.
#[async_trait::async_trait]
pub trait WishlistService: Send + Sync {
    /// Appends `app` after the current last item. Re-adding is a no-op that
    /// keeps the existing sort order.
    async fn add_to_wishlist(&self, user: UserId, app: AppId) -> Result<(), WishlistError>;
    /// Removing an app that is not listed is a no-op, but the app must exist.
    async fn remove_from_wishlist(&self, user: UserId, app: AppId) -> Result<(), WishlistError>;
    async fn wishlist_size(&self, user: UserId) -> Result<u64, WishlistError>;
    /// Items sorted by ascending sort order. Items whose catalog lookup fails
    /// are left out rather than failing the call.
    async fn wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, WishlistError>;
    async fn is_in_wishlist(&self, user: UserId, app: AppId) -> Result<bool, WishlistError>;
    async fn sort_wishlist(&self, user: UserId, items: Vec<SortItem>)
    -> Result<(), WishlistError>;
}
