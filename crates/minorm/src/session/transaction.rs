use super::Session;
use crate::error::{OrmError, OrmResult};

impl Session {
    /// Open a transaction; later statements of this session run inside it.
    pub async fn begin(&mut self) -> OrmResult<()> {
        if self.tx.is_some() {
            return Err(OrmError::transaction("transaction already open"));
        }
        tracing::info!("transaction begin");
        let tx = self
            .executor
            .begin()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "begin failed"))?;
        self.tx = Some(tx);
        Ok(())
    }

    pub async fn commit(&mut self) -> OrmResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| OrmError::transaction("commit without an open transaction"))?;
        tracing::info!("transaction commit");
        tx.commit()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "commit failed"))
    }

    pub async fn rollback(&mut self) -> OrmResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| OrmError::transaction("rollback without an open transaction"))?;
        tracing::info!("transaction rollback");
        tx.rollback()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "rollback failed"))
    }
}
