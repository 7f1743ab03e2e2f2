use super::Session;
use crate::clause::{ClauseArgs, ClauseKind};
use crate::error::{OrmError, OrmResult};
use crate::hooks::Hook;
use crate::schema::Model;
use crate::value::Value;

impl Session {
    /// Insert `records` with a single multi-row `INSERT`.
    ///
    /// `BeforeInsert` runs on each record before its values are read, so a hook
    /// may still change them. An empty slice executes nothing.
    pub async fn insert<T: Model>(&mut self, records: &mut [T]) -> OrmResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut rows = Vec::with_capacity(records.len());
        for record in records.iter_mut() {
            self.call_method(Hook::BeforeInsert, Some(&mut *record));
            rows.push(self.model::<T>().ref_table().record_values(&*record));
        }

        let table = self.ref_table();
        let insert = ClauseArgs::insert(table.name.as_str(), table.field_names.iter().cloned());
        self.clause.set(insert).set(ClauseArgs::values(rows));
        let (sql, vars) = self
            .clause
            .build(&[ClauseKind::Insert, ClauseKind::Values]);

        let affected = self.raw(&sql, vars).exec().await?;
        self.call_method(Hook::AfterInsert, None);
        Ok(affected)
    }

    /// Append every row selected by the pending WHERE / ORDER BY / LIMIT to `dest`.
    pub async fn find<T: Model>(&mut self, dest: &mut Vec<T>) -> OrmResult<()> {
        self.model::<T>();
        self.call_method(Hook::BeforeQuery, None);

        let table = self.ref_table();
        let select = ClauseArgs::select(table.name.as_str(), table.field_names.iter().cloned());
        self.clause.set(select);
        let (sql, vars) = self.clause.build(&[
            ClauseKind::Select,
            ClauseKind::Where,
            ClauseKind::OrderBy,
            ClauseKind::Limit,
        ]);

        let rows = self.raw(&sql, vars).query_rows().await?;
        dest.reserve(rows.len());
        for row in rows {
            let mut record = T::from_row(&row)?;
            self.call_method(Hook::AfterQuery, Some(&mut record));
            dest.push(record);
        }
        Ok(())
    }

    /// Load the first selected row into `dest`.
    ///
    /// Returns [`OrmError::NotFound`] when nothing matches; `dest` is left
    /// untouched in that case.
    pub async fn first<T: Model>(&mut self, dest: &mut T) -> OrmResult<()> {
        let mut found = Vec::with_capacity(1);
        self.limit(1).find(&mut found).await?;
        match found.into_iter().next() {
            Some(record) => {
                *dest = record;
                Ok(())
            }
            None => Err(OrmError::not_found(format!(
                "no row in {}",
                self.ref_table().name
            ))),
        }
    }

    /// Update the bound table, setting columns in the order given.
    ///
    /// ```ignore
    /// s.model::<User>().filter("name = ?", params!["Tom"]).update([("age", 30)]).await?;
    /// ```
    pub async fn update<I, K, V>(&mut self, pairs: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.call_method(Hook::BeforeUpdate, None);

        let update = ClauseArgs::update(self.ref_table().name.as_str(), pairs);
        self.clause.set(update);
        let (sql, vars) = self.clause.build(&[ClauseKind::Update, ClauseKind::Where]);

        let affected = self.raw(&sql, vars).exec().await?;
        self.call_method(Hook::AfterUpdate, None);
        Ok(affected)
    }

    pub async fn delete(&mut self) -> OrmResult<u64> {
        self.call_method(Hook::BeforeDelete, None);

        let delete = ClauseArgs::delete(self.ref_table().name.as_str());
        self.clause.set(delete);
        let (sql, vars) = self.clause.build(&[ClauseKind::Delete, ClauseKind::Where]);

        let affected = self.raw(&sql, vars).exec().await?;
        self.call_method(Hook::AfterDelete, None);
        Ok(affected)
    }

    pub async fn count(&mut self) -> OrmResult<i64> {
        let count = ClauseArgs::count(self.ref_table().name.as_str());
        self.clause.set(count);
        let (sql, vars) = self.clause.build(&[ClauseKind::Count, ClauseKind::Where]);

        let row = self
            .raw(&sql, vars)
            .query_row()
            .await?
            .ok_or_else(|| OrmError::not_found("COUNT returned no row"))?;
        row.get(0)
    }

    /// Set the WHERE condition. `vars` bind to its `?` markers in order,
    /// each with the type of its variant (see [`params!`](crate::params)).
    pub fn filter(&mut self, desc: &str, vars: Vec<Value>) -> &mut Self {
        self.clause.set(ClauseArgs::filter(desc, vars));
        self
    }

    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.clause.set(ClauseArgs::limit(n));
        self
    }

    pub fn order_by(&mut self, desc: &str) -> &mut Self {
        self.clause.set(ClauseArgs::order_by(desc));
        self
    }
}
