//! Column-diff migration.
//!
//! The declared columns of a record type are compared with the columns of the
//! live table. New columns are added in place; when columns disappear the table
//! is rebuilt from a projection of the declared columns:
//!
//! ```text
//! ALTER TABLE t ADD COLUMN c <type>          -- once per added column
//! CREATE TABLE temp_t AS SELECT <cols> FROM t
//! DROP TABLE t
//! ALTER TABLE temp_t RENAME TO t
//! ```
//!
//! Run it through [`Engine::migrate`](crate::Engine::migrate), which wraps the
//! statements in one transaction.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::schema::Model;
use crate::session::Session;
use std::collections::HashSet;

/// Columns to add and drop to bring a live table in line with a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Declared column names missing from the table.
    pub add_columns: Vec<String>,
    /// Live column names no longer declared.
    pub drop_columns: Vec<String>,
}

impl MigrationPlan {
    /// Diff `target` against `live`, comparing names as the dialect's catalog
    /// stores them. Both lists keep their input order.
    pub fn diff(target: &[String], live: &[String], dialect: &dyn Dialect) -> Self {
        let live_set: HashSet<String> = live.iter().map(|c| dialect.normalize_ident(c)).collect();
        let target_set: HashSet<String> =
            target.iter().map(|c| dialect.normalize_ident(c)).collect();

        Self {
            add_columns: target
                .iter()
                .filter(|c| !live_set.contains(&dialect.normalize_ident(c)))
                .cloned()
                .collect(),
            drop_columns: live
                .iter()
                .filter(|c| !target_set.contains(&dialect.normalize_ident(c)))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_columns.is_empty() && self.drop_columns.is_empty()
    }
}

/// Create or reconcile the table of `T` on `session`.
pub(crate) async fn migrate_table<T: Model>(session: &mut Session) -> OrmResult<()> {
    session.model::<T>();
    let table = session.ref_table().name.clone();

    if !session.has_table().await? {
        tracing::info!(table = %table, "table does not exist, creating it");
        return session.create_table().await;
    }

    let sample = format!("SELECT * FROM {table} LIMIT 1");
    let live = session.raw(&sample, Vec::new()).query_rows().await?.columns;
    let target = session.ref_table().field_names.clone();
    let plan = MigrationPlan::diff(&target, &live, session.dialect());
    tracing::info!(
        table = %table,
        added = ?plan.add_columns,
        dropped = ?plan.drop_columns,
        "migration plan"
    );

    for column in &plan.add_columns {
        let field = session
            .ref_table()
            .get_field(column)
            .ok_or_else(|| OrmError::Migration(format!("unknown column {column}")))?;
        let sql = format!(
            "ALTER TABLE {table} ADD COLUMN {} {}",
            field.name, field.column_type
        );
        session.raw(&sql, Vec::new()).exec().await?;
    }

    if plan.drop_columns.is_empty() {
        return Ok(());
    }

    let temp = format!("temp_{table}");
    let statements = [
        format!("CREATE TABLE {temp} AS SELECT {} FROM {table}", target.join(", ")),
        format!("DROP TABLE {table}"),
        format!("ALTER TABLE {temp} RENAME TO {table}"),
    ];
    for sql in &statements {
        session.raw(sql, Vec::new()).exec().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Postgres, Sqlite3, get_dialect};
    use crate::mock::MockExecutor;
    use crate::row::Rows;
    use crate::{FromRow, Model, params};
    use std::sync::Arc;

    #[derive(Debug, Default, Model, FromRow)]
    #[orm(table = "people")]
    struct Person {
        name: String,
        age: i32,
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_both_ways() {
        let plan = MigrationPlan::diff(&names(&["name", "age"]), &names(&["name", "xxx"]), &Sqlite3);
        assert_eq!(plan.add_columns, vec!["age"]);
        assert_eq!(plan.drop_columns, vec!["xxx"]);
        assert!(!plan.is_empty());
    }

    #[test]
    fn diff_folds_case_for_postgres() {
        let plan = MigrationPlan::diff(&names(&["Name", "Age"]), &names(&["name", "age"]), &Postgres);
        assert!(plan.is_empty());

        let plan = MigrationPlan::diff(&names(&["Name"]), &names(&["name"]), &Sqlite3);
        assert_eq!(plan.add_columns, vec!["Name"]);
        assert_eq!(plan.drop_columns, vec!["name"]);
    }

    fn session(mock: &MockExecutor) -> Session {
        Session::new(Arc::new(mock.clone()), get_dialect("sqlite3").unwrap())
    }

    #[tokio::test]
    async fn missing_table_is_created() {
        let mock = MockExecutor::new();
        let mut s = session(&mock);
        migrate_table::<Person>(&mut s).await.unwrap();

        assert_eq!(
            mock.statements().last().map(String::as_str),
            Some("CREATE TABLE people (name text, age integer)")
        );
    }

    #[tokio::test]
    async fn changed_columns_rebuild_the_table() {
        let mock = MockExecutor::new();
        mock.respond(
            "sqlite_master",
            Rows::from_values(vec!["name".into()], vec![params!["people"]]),
        )
        .respond(
            "SELECT * FROM people",
            Rows::from_values(vec!["name".into(), "xxx".into()], vec![]),
        );
        let mut s = session(&mock);
        migrate_table::<Person>(&mut s).await.unwrap();

        assert_eq!(
            mock.statements()[2..],
            [
                "ALTER TABLE people ADD COLUMN age integer",
                "CREATE TABLE temp_people AS SELECT name, age FROM people",
                "DROP TABLE people",
                "ALTER TABLE temp_people RENAME TO people",
            ]
        );
    }

    #[tokio::test]
    async fn only_added_columns_skip_the_rebuild() {
        let mock = MockExecutor::new();
        mock.respond(
            "sqlite_master",
            Rows::from_values(vec!["name".into()], vec![params!["people"]]),
        )
        .respond(
            "SELECT * FROM people",
            Rows::from_values(vec!["name".into()], vec![]),
        );
        let mut s = session(&mock);
        migrate_table::<Person>(&mut s).await.unwrap();

        assert_eq!(
            mock.statements()[2..],
            ["ALTER TABLE people ADD COLUMN age integer"]
        );
    }
}
