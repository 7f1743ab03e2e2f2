//! Executor traits for unified database access.
//!
//! A [`Session`](crate::Session) talks to the database only through
//! [`Executor`]. [`PgExecutor`] implements it over a pool of
//! `tokio_postgres` connections; tests substitute a recording implementation.

use crate::error::{OrmError, OrmResult};
use crate::row::{Row, Rows};
use crate::value::Value;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_postgres::NoTls;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

/// A connection capable of running parameterized statements.
///
/// Parameters are bound positionally; the SQL text must already use the
/// driver's placeholder syntax (see
/// [`Dialect::rewrite_placeholders`](crate::dialect::Dialect::rewrite_placeholders)).
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64>;

    /// Execute a query and return all rows together with the column names.
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows>;

    /// Execute a query and return the first row, if any.
    ///
    /// Additional rows are ignored.
    async fn query_row(&self, sql: &str, params: &[Value]) -> OrmResult<Option<Row>> {
        let rows = self.query(sql, params).await?;
        Ok(rows.into_iter().next())
    }

    /// Open a transaction on a connection reserved for it.
    async fn begin(&self) -> OrmResult<Box<dyn Transaction>>;
}

/// An open transaction. Statements run through it belong to the transaction
/// until [`commit`](Transaction::commit) or [`rollback`](Transaction::rollback).
///
/// Implementations own their connection for the transaction's lifetime and
/// roll back when dropped unfinished.
#[async_trait]
pub trait Transaction: Executor {
    async fn commit(&self) -> OrmResult<()>;

    async fn rollback(&self) -> OrmResult<()>;
}

fn bind(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn decode_cell(row: &tokio_postgres::Row, idx: usize) -> OrmResult<Value> {
    let column = &row.columns()[idx];
    let decode_err = |e: tokio_postgres::Error| OrmError::decode(column.name(), e.to_string());

    let value = match column.type_().name() {
        "bool" => row.try_get::<_, Option<bool>>(idx).map_err(decode_err)?.map(Value::Bool),
        "int2" => row.try_get::<_, Option<i16>>(idx).map_err(decode_err)?.map(Value::SmallInt),
        "int4" => row.try_get::<_, Option<i32>>(idx).map_err(decode_err)?.map(Value::Int),
        "int8" => row.try_get::<_, Option<i64>>(idx).map_err(decode_err)?.map(Value::BigInt),
        "float4" => row.try_get::<_, Option<f32>>(idx).map_err(decode_err)?.map(Value::Real),
        "float8" => row.try_get::<_, Option<f64>>(idx).map_err(decode_err)?.map(Value::Double),
        "text" | "varchar" | "bpchar" | "name" => row
            .try_get::<_, Option<String>>(idx)
            .map_err(decode_err)?
            .map(Value::Text),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)
            .map_err(decode_err)?
            .map(Value::Bytes),
        "date" => row
            .try_get::<_, Option<NaiveDate>>(idx)
            .map_err(decode_err)?
            .map(Value::Date),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map_err(decode_err)?
            .map(Value::Timestamp),
        "timestamptz" => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map_err(decode_err)?
            .map(Value::TimestampTz),
        "uuid" => row
            .try_get::<_, Option<Uuid>>(idx)
            .map_err(decode_err)?
            .map(Value::Uuid),
        "json" | "jsonb" => row
            .try_get::<_, Option<serde_json::Value>>(idx)
            .map_err(decode_err)?
            .map(Value::Json),
        other => {
            return Err(OrmError::decode(
                column.name(),
                format!("unsupported column type {other}"),
            ));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn decode_rows(columns: Vec<String>, rows: Vec<tokio_postgres::Row>) -> OrmResult<Rows> {
    let values = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| decode_cell(row, i)).collect())
        .collect::<OrmResult<Vec<Vec<Value>>>>()?;
    Ok(Rows::from_values(columns, values))
}

async fn pg_query(client: &tokio_postgres::Client, sql: &str, params: &[Value]) -> OrmResult<Rows> {
    // Prepare first so column names are known even for an empty result.
    let stmt = client.prepare(sql).await.map_err(OrmError::from_db_error)?;
    let columns = stmt
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let rows = client
        .query(&stmt, &bind(params))
        .await
        .map_err(OrmError::from_db_error)?;
    decode_rows(columns, rows)
}

async fn pg_execute(client: &tokio_postgres::Client, sql: &str, params: &[Value]) -> OrmResult<u64> {
    client
        .execute(sql, &bind(params))
        .await
        .map_err(OrmError::from_db_error)
}

/// [`Executor`] over a `deadpool_postgres` pool.
///
/// Statements outside a transaction check out any pooled connection and
/// autocommit. [`begin`](Executor::begin) holds one connection for the whole
/// transaction, so other sessions never run inside it.
#[derive(Clone)]
pub struct PgExecutor {
    pool: Pool,
}

impl PgExecutor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool of at most `max_size` connections from a connection string.
    ///
    /// No connection is opened until the first statement.
    pub fn connect_lazy(database_url: &str, max_size: usize) -> OrmResult<Self> {
        let pg_config: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| OrmError::Connection(e.to_string()))?;
        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(max_size)
            .build()
            .map_err(|e| OrmError::Pool(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

impl std::fmt::Debug for PgExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PgExecutor")
            .field("max_size", &status.max_size)
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

#[async_trait]
impl Executor for PgExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        let conn = self.pool.get().await?;
        pg_execute(&conn, sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        let conn = self.pool.get().await?;
        pg_query(&conn, sql, params).await
    }

    async fn begin(&self) -> OrmResult<Box<dyn Transaction>> {
        let conn = self.pool.get().await?;
        conn.batch_execute("BEGIN")
            .await
            .map_err(OrmError::from_db_error)?;
        Ok(Box::new(PgTransaction {
            conn: Some(conn),
            done: AtomicBool::new(false),
        }))
    }
}

/// A transaction opened by [`PgExecutor::begin`] on its own pooled connection.
///
/// Dropping it unfinished rolls it back before the connection is reused.
pub struct PgTransaction {
    conn: Option<Object>,
    done: AtomicBool,
}

impl PgTransaction {
    fn conn(&self) -> OrmResult<&Object> {
        self.conn
            .as_ref()
            .ok_or_else(|| OrmError::transaction("transaction connection released"))
    }

    async fn finish(&self, stmt: &str) -> OrmResult<()> {
        if self.done.swap(true, Ordering::AcqRel) {
            return Err(OrmError::transaction("transaction already finished"));
        }
        self.conn()?
            .batch_execute(stmt)
            .await
            .map_err(OrmError::from_db_error)
    }
}

#[async_trait]
impl Executor for PgTransaction {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        pg_execute(self.conn()?, sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        pg_query(self.conn()?, sql, params).await
    }

    async fn begin(&self) -> OrmResult<Box<dyn Transaction>> {
        Err(OrmError::transaction("nested transactions are not supported"))
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(&self) -> OrmResult<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(&self) -> OrmResult<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PgTransaction {
    fn drop(&mut self) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        let Some(conn) = self.conn.take() else {
            return;
        };
        tracing::warn!("transaction dropped without commit or rollback; rolling back");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = conn.batch_execute("ROLLBACK").await {
                        tracing::error!(error = %err, "rollback of dropped transaction failed");
                        // Closing the connection makes the server abort the transaction.
                        drop(Object::take(conn));
                    }
                });
            }
            Err(_) => drop(Object::take(conn)),
        }
    }
}
