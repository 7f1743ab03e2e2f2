//! Engine configuration.

use crate::error::{OrmError, OrmResult};
use crate::session::DEFAULT_SQL_LOG_MAX_LENGTH;

/// Environment variable holding the connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable selecting the dialect.
pub const DIALECT_ENV: &str = "MINORM_DIALECT";
/// Default upper bound on pooled connections.
pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

/// Connection settings for [`Engine::connect`](crate::Engine::connect).
///
/// ```ignore
/// let config = EngineConfig::new("postgres://localhost/app")
///     .sql_log_max_length(500);
/// let engine = Engine::connect(config).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Connection string, parsed as a `tokio_postgres::Config`.
    pub database_url: String,
    /// Registered dialect name.
    pub dialect: String,
    /// Byte limit for SQL text in log events; `None` disables truncation.
    pub sql_log_max_length: Option<usize>,
    /// Upper bound on pooled connections.
    pub pool_max_size: usize,
}

impl EngineConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            dialect: "postgres".to_string(),
            sql_log_max_length: Some(DEFAULT_SQL_LOG_MAX_LENGTH),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }

    /// Read `DATABASE_URL` and optionally `MINORM_DIALECT`, loading a `.env`
    /// file first when one exists.
    pub fn from_env() -> OrmResult<Self> {
        dotenvy::dotenv().ok();

        let url = std::env::var(DATABASE_URL_ENV)
            .map_err(|_| OrmError::Connection(format!("{DATABASE_URL_ENV} is not set")))?;
        let mut config = Self::new(url);
        if let Ok(dialect) = std::env::var(DIALECT_ENV) {
            config = config.dialect(dialect);
        }
        Ok(config)
    }

    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.dialect = name.into();
        self
    }

    pub fn sql_log_max_length(mut self, len: usize) -> Self {
        self.sql_log_max_length = Some(len);
        self
    }

    pub fn no_sql_truncate(mut self) -> Self {
        self.sql_log_max_length = None;
        self
    }

    pub fn pool_max_size(mut self, max_size: usize) -> Self {
        self.pool_max_size = max_size;
        self
    }
}
