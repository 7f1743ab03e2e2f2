use super::Session;
use crate::error::OrmResult;
use crate::row::{Row, Rows};
use crate::value::Value;

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

impl Session {
    /// Append `sql` and its variables to the pending statement.
    pub fn raw(&mut self, sql: &str, vars: Vec<Value>) -> &mut Self {
        self.sql.push_str(sql);
        self.sql.push(' ');
        self.sql_vars.extend(vars);
        self
    }

    /// Run the pending statement and return the number of affected rows.
    pub async fn exec(&mut self) -> OrmResult<u64> {
        let (sql, vars) = self.take_statement();
        self.db()
            .execute(&sql, &vars)
            .await
            .inspect_err(|err| tracing::error!(target: "minorm.sql", error = %err, "exec failed"))
    }

    /// Run the pending statement and return every row.
    pub async fn query_rows(&mut self) -> OrmResult<Rows> {
        let (sql, vars) = self.take_statement();
        self.db()
            .query(&sql, &vars)
            .await
            .inspect_err(|err| tracing::error!(target: "minorm.sql", error = %err, "query failed"))
    }

    /// Run the pending statement and return its first row, if any.
    pub async fn query_row(&mut self) -> OrmResult<Option<Row>> {
        let (sql, vars) = self.take_statement();
        self.db()
            .query_row(&sql, &vars)
            .await
            .inspect_err(|err| tracing::error!(target: "minorm.sql", error = %err, "query failed"))
    }

    // The buffer is emptied before execution so a failed statement never leaks
    // into the next one.
    fn take_statement(&mut self) -> (String, Vec<Value>) {
        let sql = self
            .dialect
            .rewrite_placeholders(self.sql.trim())
            .into_owned();
        let vars = std::mem::take(&mut self.sql_vars);
        self.sql.clear();

        match self.sql_log_max_length {
            Some(max) if sql.len() > max => tracing::debug!(
                target: "minorm.sql",
                sql = %format_args!("{}...", truncate_sql_bytes(&sql, max)),
                vars = ?vars,
            ),
            _ => tracing::debug!(target: "minorm.sql", sql = %sql, vars = ?vars),
        }
        (sql, vars)
    }
}
