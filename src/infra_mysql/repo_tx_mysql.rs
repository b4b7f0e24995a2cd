use crate::domain_port::StorageTx;
use anyhow::anyhow;
use sqlx::{MySql, MySqlConnection, MySqlPool, Transaction};

/// Opens pool-backed transactions for the MySQL stores.
#[derive(Clone)]
pub struct MySqlTxManager {
    pool: MySqlPool,
}

impl MySqlTxManager {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTxManager { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<MySqlTx, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(MySqlTx::new(tx))
    }
}

/// sqlx rolls the inner transaction back when it is dropped uncommitted.
pub struct MySqlTx {
    inner: Transaction<'static, MySql>,
}

impl MySqlTx {
    pub fn new(inner: Transaction<'static, MySql>) -> Self {
        MySqlTx { inner }
    }

    pub fn conn(&mut self) -> &mut MySqlConnection {
        &mut self.inner
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MySqlTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.commit().await.map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.rollback().await.map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
