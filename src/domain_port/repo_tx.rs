/// Unit of work handed out by a store backend.
///
/// Writes made through the scope become visible only on `commit`. Dropping a
/// scope without committing discards them, same as `rollback`.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

/// Commits on `Ok`, rolls back on `Err`. A failed rollback is logged and the
/// original error is returned.
pub async fn finish<'t, T, E, S>(tx: Box<S>, result: Result<T, E>) -> Result<T, E>
where
    S: StorageTx<'t> + ?Sized,
    E: From<anyhow::Error>,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("rollback failed: {rollback_err}");
            }
            Err(e)
        }
    }
}
