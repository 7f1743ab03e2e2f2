//! Connection bootstrap and session factory.

use crate::client::{Executor, PgExecutor};
use crate::config::EngineConfig;
use crate::dialect::{Dialect, get_dialect};
use crate::error::{OrmError, OrmResult};
use crate::migrate;
use crate::schema::Model;
use crate::session::{DEFAULT_SQL_LOG_MAX_LENGTH, Session};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Entry point: owns the connection pool and hands out [`Session`]s.
///
/// Sessions share the pool. A transaction keeps one connection to itself
/// until it finishes, so statements of other sessions never join it.
pub struct Engine {
    executor: Arc<dyn Executor>,
    dialect: &'static dyn Dialect,
    sql_log_max_length: Option<usize>,
}

impl Engine {
    /// Connect to PostgreSQL and check the connection with a ping.
    pub async fn connect(config: EngineConfig) -> OrmResult<Self> {
        let executor = PgExecutor::connect_lazy(&config.database_url, config.pool_max_size)
            .inspect_err(|err| tracing::error!(error = %err, "connect failed"))?;

        let engine = Self::with_executor(Arc::new(executor), &config.dialect)?
            .sql_log_max_length(config.sql_log_max_length);
        engine.ping().await?;
        tracing::info!(
            dialect = engine.dialect.name(),
            pool_max_size = config.pool_max_size,
            "connected to database"
        );
        Ok(engine)
    }

    /// Build an engine over an existing executor.
    ///
    /// Fails with [`OrmError::Dialect`] when `dialect` is not registered.
    pub fn with_executor(executor: Arc<dyn Executor>, dialect: &str) -> OrmResult<Self> {
        let dialect = get_dialect(dialect).ok_or_else(|| {
            tracing::error!(dialect, "dialect not found");
            OrmError::Dialect(dialect.to_string())
        })?;
        Ok(Self {
            executor,
            dialect,
            sql_log_max_length: Some(DEFAULT_SQL_LOG_MAX_LENGTH),
        })
    }

    /// Byte limit for SQL text logged by sessions of this engine.
    pub fn sql_log_max_length(mut self, max: Option<usize>) -> Self {
        self.sql_log_max_length = max;
        self
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    pub async fn ping(&self) -> OrmResult<()> {
        self.executor
            .query_row("SELECT 1", &[])
            .await
            .inspect_err(|err| tracing::error!(error = %err, "ping failed"))
            .map(|_| ())
    }

    pub fn new_session(&self) -> Session {
        Session::new(Arc::clone(&self.executor), self.dialect)
            .with_sql_log_max_length(self.sql_log_max_length)
    }

    /// Release the engine. Pooled connections close once the last session
    /// using them is dropped.
    pub fn close(self) {
        tracing::info!("database closed");
    }

    /// Run `body` on a fresh session inside a transaction.
    ///
    /// The transaction commits when `body` returns `Ok`. It rolls back when
    /// `body` returns `Err` or panics; a panic resumes unwinding after the
    /// rollback.
    ///
    /// ```ignore
    /// engine
    ///     .transaction(|s| {
    ///         Box::pin(async move {
    ///             s.insert(&mut [user]).await?;
    ///             s.model::<User>().count().await
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn transaction<F, R>(&self, body: F) -> OrmResult<R>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, OrmResult<R>> + Send,
        R: Send,
    {
        let mut session = self.new_session();
        session.begin().await?;

        let outcome = AssertUnwindSafe(async { body(&mut session).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => {
                session.commit().await?;
                Ok(value)
            }
            Ok(Err(error)) => match session.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err(OrmError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
            Err(panic) => {
                if let Err(rollback_err) = session.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback after panic failed");
                }
                std::panic::resume_unwind(panic)
            }
        }
    }

    /// Create the table of `T`, or reconcile its columns with `T`, in one
    /// transaction.
    pub async fn migrate<T: Model>(&self) -> OrmResult<()> {
        self.transaction(|s| Box::pin(migrate::migrate_table::<T>(s)))
            .await
            .map_err(|err| OrmError::Migration(format!("{}: {err}", T::TABLE)))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dialect", &self.dialect.name())
            .field("sql_log_max_length", &self.sql_log_max_length)
            .finish()
    }
}
