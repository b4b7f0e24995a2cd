use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub friendship_service: Arc<dyn FriendshipService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pool: Option<MySqlPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let pool = if settings.store.backend == "mysql" || settings.catalog.backend == "mysql" {
            let dsn = settings
                .store
                .mysql_dsn
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("store.mysql_dsn is required for mysql"))?;
            let pool = MySqlPoolOptions::new()
                .max_connections(settings.store.max_connections)
                .connect(dsn)
                .await?;
            Some(pool)
        } else {
            None
        };
        let memory_db = MemoryDb::new();

        let (relation_store, wishlist_store): (Arc<dyn RelationStore>, Arc<dyn WishlistStore>) =
            match (settings.store.backend.as_str(), &pool) {
                ("fake", _) => (
                    Arc::new(MemoryRelationStore::new(memory_db.clone())),
                    Arc::new(MemoryWishlistStore::new(memory_db.clone())),
                ),
                ("mysql", Some(pool)) => (
                    Arc::new(MySqlRelationStore::new(pool.clone())),
                    Arc::new(MySqlWishlistStore::new(pool.clone())),
                ),
                (other, _) => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
            };

        let catalog: Arc<dyn Catalog> = match (settings.catalog.backend.as_str(), &pool) {
            ("fake", _) => Arc::new(FakeCatalog::seeded()),
            ("mysql", Some(pool)) => Arc::new(MySqlCatalog::new(pool.clone())),
            (other, _) => return Err(anyhow::anyhow!("Unknown catalog backend: {}", other)),
        };

        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new()),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        let friendship_service: Arc<dyn FriendshipService> =
            Arc::new(RealFriendshipService::new(relation_store));
        let wishlist_service: Arc<dyn WishlistService> =
            Arc::new(RealWishlistService::new(wishlist_store, catalog));

        info!(
            store = %settings.store.backend,
            catalog = %settings.catalog.backend,
            "server started"
        );

        Ok(Self {
            auth_service,
            friendship_service,
            wishlist_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("mysql pool closed");
        }
    }
}
