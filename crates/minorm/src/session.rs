//! Database session.
//!
//! A [`Session`] accumulates one statement at a time, either as raw SQL
//! ([`raw`](Session::raw)) or through the clause builder used by the record
//! operations, and runs it on the engine's executor or on the session's open
//! transaction.
//!
//! ```ignore
//! let mut s = engine.new_session();
//! s.model::<User>().drop_table().await?;
//! s.create_table().await?;
//! s.insert(&mut [User { name: "Tom".into(), age: 18 }]).await?;
//!
//! let mut users = Vec::new();
//! s.filter("age > ?", params![10]).order_by("age DESC").find(&mut users).await?;
//! ```

mod hooks;
mod raw;
mod record;
mod table;
mod transaction;


use crate::clause::Clause;
use crate::client::{Executor, Transaction};
use crate::dialect::Dialect;
use crate::schema::Schema;
use crate::value::Value;
use std::sync::Arc;

/// Default byte limit for SQL text in log events.
pub const DEFAULT_SQL_LOG_MAX_LENGTH: usize = 200;

/// One unit of work against the database. See the [module docs](self).
pub struct Session {
    executor: Arc<dyn Executor>,
    tx: Option<Box<dyn Transaction>>,
    dialect: &'static dyn Dialect,
    ref_table: Option<Schema>,
    clause: Clause,
    sql: String,
    sql_vars: Vec<Value>,
    sql_log_max_length: Option<usize>,
}

impl Session {
    pub fn new(executor: Arc<dyn Executor>, dialect: &'static dyn Dialect) -> Self {
        Self {
            executor,
            tx: None,
            dialect,
            ref_table: None,
            clause: Clause::new(),
            sql: String::new(),
            sql_vars: Vec::new(),
            sql_log_max_length: Some(DEFAULT_SQL_LOG_MAX_LENGTH),
        }
    }

    /// Truncate logged SQL to `max` bytes; `None` logs it whole.
    pub fn with_sql_log_max_length(mut self, max: Option<usize>) -> Self {
        self.sql_log_max_length = max;
        self
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    /// Whether a transaction is open on this session.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Drop the pending raw SQL and clause fragments.
    ///
    /// The bound schema and any open transaction are kept.
    pub fn clear(&mut self) {
        self.sql.clear();
        self.sql_vars.clear();
        self.clause.clear();
    }

    /// The executor statements run on: the open transaction, if any.
    pub(crate) fn db(&self) -> &dyn Executor {
        match &self.tx {
            Some(tx) => tx.as_ref(),
            None => self.executor.as_ref(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.dialect.name())
            .field("ref_table", &self.ref_table)
            .field("sql", &self.sql)
            .field("sql_vars", &self.sql_vars)
            .field("in_transaction", &self.tx.is_some())
            .finish()
    }
}
