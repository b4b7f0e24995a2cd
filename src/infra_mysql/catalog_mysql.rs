use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySqlPool, Row};

/// Reads the catalog table owned by the storefront's app subsystem.
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Catalog for MySqlCatalog {
    async fn find_by_id(&self, app: AppId) -> Result<App, CatalogError> {
        let row = sqlx::query(
            r#"
SELECT app_id,
       name,
       CAST(price AS DOUBLE)    AS price,
       CAST(discount AS DOUBLE) AS discount,
       image_url,
       positive_rate
FROM app
WHERE app_id = ?
"#,
        )
        .bind(app)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Store(format!("find app {app}: {e}")))?
        .ok_or(CatalogError::NotFound(app))?;

        let decode = |e: sqlx::Error| CatalogError::Store(format!("decode app {app}: {e}"));
        Ok(App {
            app_id: row.try_get("app_id").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            price: row.try_get("price").map_err(decode)?,
            discount: row.try_get("discount").map_err(decode)?,
            image_url: row.try_get("image_url").map_err(decode)?,
            positive_rate: row.try_get("positive_rate").map_err(decode)?,
        })
    }
}
