use super::Session;
use crate::error::OrmResult;
use crate::schema::{Model, Schema};

impl Session {
    /// Bind the session to the table of `T`.
    ///
    /// The schema is parsed only when none is bound or the bound one belongs
    /// to a different type.
    pub fn model<T: Model>(&mut self) -> &mut Self {
        if !self.ref_table.as_ref().is_some_and(Schema::is_model::<T>) {
            self.ref_table = Some(Schema::parse::<T>(self.dialect));
        }
        self
    }

    /// The bound schema.
    ///
    /// # Panics
    ///
    /// Panics when no model has been bound with [`model`](Session::model).
    pub fn ref_table(&self) -> &Schema {
        match &self.ref_table {
            Some(schema) => schema,
            None => panic!("model is not set; call Session::model first"),
        }
    }

    pub async fn create_table(&mut self) -> OrmResult<()> {
        let table = self.ref_table();
        let columns: Vec<String> = table
            .fields
            .iter()
            .map(|f| {
                format!("{} {} {}", f.name, f.column_type, f.tag)
                    .trim_end()
                    .to_string()
            })
            .collect();
        let sql = format!("CREATE TABLE {} ({})", table.name, columns.join(", "));
        self.raw(&sql, Vec::new()).exec().await.map(|_| ())
    }

    pub async fn drop_table(&mut self) -> OrmResult<()> {
        let sql = format!("DROP TABLE IF EXISTS {}", self.ref_table().name);
        self.raw(&sql, Vec::new()).exec().await.map(|_| ())
    }

    /// Whether the bound table exists, according to the dialect's probe.
    pub async fn has_table(&mut self) -> OrmResult<bool> {
        let table = self.ref_table().name.clone();
        let (sql, vars) = self.dialect.table_exist_sql(&table);
        let Some(row) = self.raw(&sql, vars).query_row().await? else {
            return Ok(false);
        };
        let found: String = row.get(0)?;
        Ok(self.dialect.normalize_ident(&found) == self.dialect.normalize_ident(&table))
    }
}
