use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashMap;
use std::sync::RwLock;

/// Fixed catalog for local runs and tests.
pub struct FakeCatalog {
    apps: RwLock<HashMap<AppId, App>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// A handful of apps with ids 1..=5.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        let seed = [
            (1, "Hollow Pines", 59.0, 0.0, 92),
            (2, "Starfall Tactics", 98.0, 0.5, 87),
            (3, "Dune Courier", 38.0, 0.2, 78),
            (4, "Lantern Keep", 0.0, 0.0, 95),
            (5, "Iron Orchard", 128.0, 0.1, 81),
        ];
        for (id, name, price, discount, positive_rate) in seed {
            catalog.insert(App {
                app_id: AppId(id),
                name: name.to_string(),
                price,
                discount,
                image_url: format!("https://cdn.example.com/apps/{id}/cover.jpg"),
                positive_rate,
            });
        }
        catalog
    }

    pub fn insert(&self, app: App) {
        if let Ok(mut apps) = self.apps.write() {
            apps.insert(app.app_id, app);
        }
    }

    pub fn remove(&self, app: AppId) {
        if let Ok(mut apps) = self.apps.write() {
            apps.remove(&app);
        }
    }
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait::async_trait]
impl Catalog for FakeCatalog {
    async fn find_by_id(&self, app: AppId) -> Result<App, CatalogError> {
        let apps = self
            .apps
            .read()
            .map_err(|e| CatalogError::Store(format!("catalog lock poisoned: {e}")))?;
        apps.get(&app).cloned().ok_or(CatalogError::NotFound(app))
    }
}
