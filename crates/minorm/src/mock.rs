//! Recording executor for unit tests.

use crate::client::{Executor, Transaction};
use crate::error::{OrmError, OrmResult};
use crate::row::Rows;
use crate::value::Value;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    responses: Mutex<Vec<(String, Rows)>>,
    failures: Mutex<Vec<String>>,
}

/// Records every statement and answers queries from canned responses.
///
/// Responses and failures are matched by substring against the SQL text; the
/// most recently registered response wins. Unmatched queries return no rows
/// and unmatched statements report one affected row.
#[derive(Clone, Default)]
pub(crate) struct MockExecutor {
    state: Arc<State>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, needle: &str, rows: Rows) -> &Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .push((needle.to_string(), rows));
        self
    }

    pub(crate) fn fail_on(&self, needle: &str) -> &Self {
        self.state.failures.lock().unwrap().push(needle.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.state.calls.lock().unwrap().clone()
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.calls().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, params: &[Value]) -> OrmResult<()> {
        self.state
            .calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        let failures = self.state.failures.lock().unwrap();
        match failures.iter().find(|needle| sql.contains(needle.as_str())) {
            Some(needle) => Err(OrmError::Other(format!("mock failure on '{needle}'"))),
            None => Ok(()),
        }
    }

    fn response(&self, sql: &str) -> Rows {
        self.state
            .responses
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        self.record(sql, params)?;
        Ok(1)
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        self.record(sql, params)?;
        Ok(self.response(sql))
    }

    async fn begin(&self) -> OrmResult<Box<dyn Transaction>> {
        self.record("BEGIN", &[])?;
        Ok(Box::new(MockTransaction {
            inner: self.clone(),
            done: AtomicBool::new(false),
        }))
    }
}

/// Records `ROLLBACK` when dropped unfinished, like [`PgTransaction`](crate::PgTransaction).
struct MockTransaction {
    inner: MockExecutor,
    done: AtomicBool,
}

#[async_trait]
impl Executor for MockTransaction {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        self.inner.execute(sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        self.inner.query(sql, params).await
    }

    async fn begin(&self) -> OrmResult<Box<dyn Transaction>> {
        Err(OrmError::transaction("nested transactions are not supported"))
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(&self) -> OrmResult<()> {
        self.done.store(true, Ordering::Release);
        self.inner.record("COMMIT", &[])
    }

    async fn rollback(&self) -> OrmResult<()> {
        self.done.store(true, Ordering::Release);
        self.inner.record("ROLLBACK", &[])
    }
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        if !self.done.load(Ordering::Acquire) {
            let _ = self.inner.record("ROLLBACK", &[]);
        }
    }
}
