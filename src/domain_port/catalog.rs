use crate::domain_model::{App, AppId};

/// Read-only view of the app catalog. Never mutated from here.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    async fn find_by_id(&self, app: AppId) -> Result<App, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("app {0} not found")]
    NotFound(AppId),
    #[error("catalog store error: {0}")]
    Store(String),
}
