//! Record-to-table mapping.
//!
//! [`Model`] is the compile-time description of a record type (normally
//! derived). [`Schema`] is that description resolved against a dialect: column
//! types are fixed and the names are indexed for lookup.

use crate::dialect::Dialect;
use crate::hooks::Hooks;
use crate::row::FromRow;
use crate::value::{Value, ValueKind};
use std::any::{TypeId, type_name};
use std::collections::HashMap;

/// A declared column of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ValueKind,
    /// Constraint text appended verbatim to the column definition in DDL.
    pub tag: &'static str,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: ValueKind, tag: &'static str) -> Self {
        Self { name, kind, tag }
    }
}

/// A record type mapped to a table.
///
/// Use `#[derive(Model, FromRow)]` rather than implementing this by hand; the
/// derive keeps [`columns`](Model::columns), [`values`](Model::values) and the
/// positional `FromRow` decoding in the same order.
///
/// ```ignore
/// #[derive(Debug, Default, Model, FromRow)]
/// struct User {
///     #[orm(tag = "PRIMARY KEY")]
///     name: String,
///     age: i32,
/// }
/// ```
pub trait Model: FromRow + Hooks + Default + 'static {
    /// Table name; the type name unless overridden with `#[orm(table = "...")]`.
    const TABLE: &'static str;

    /// Declared columns in field declaration order.
    fn columns() -> Vec<ColumnDef>;

    /// Field values in the order of [`columns`](Model::columns).
    fn values(&self) -> Vec<Value>;
}

/// A resolved column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub column_type: String,
    pub tag: String,
}

/// A record type resolved against a dialect.
pub struct Schema {
    pub(crate) model: Box<dyn Hooks>,
    model_type: TypeId,
    model_name: &'static str,
    pub name: String,
    pub fields: Vec<Field>,
    pub field_names: Vec<String>,
    field_map: HashMap<String, usize>,
}

impl Schema {
    /// Resolve the schema of `T`.
    ///
    /// # Panics
    ///
    /// Panics when `dialect` has no column type for one of the field kinds.
    pub fn parse<T: Model>(dialect: &dyn Dialect) -> Self {
        let columns = T::columns();
        let mut fields = Vec::with_capacity(columns.len());
        let mut field_names = Vec::with_capacity(columns.len());
        let mut field_map = HashMap::with_capacity(columns.len());

        for (idx, col) in columns.iter().enumerate() {
            fields.push(Field {
                name: col.name.to_string(),
                column_type: dialect.data_type_of(col.kind).to_string(),
                tag: col.tag.to_string(),
            });
            field_names.push(col.name.to_string());
            field_map.insert(col.name.to_string(), idx);
        }

        Self {
            model: Box::new(T::default()),
            model_type: TypeId::of::<T>(),
            model_name: type_name::<T>(),
            name: T::TABLE.to_string(),
            fields,
            field_names,
            field_map,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.field_map.get(name).map(|&idx| &self.fields[idx])
    }

    /// Whether this schema was parsed from `T`.
    pub fn is_model<T: Model>(&self) -> bool {
        self.model_type == TypeId::of::<T>()
    }

    /// Column values of `record`, aligned with [`field_names`](Schema::field_names).
    ///
    /// # Panics
    ///
    /// Panics when `T` is not the type this schema was parsed from.
    pub fn record_values<T: Model>(&self, record: &T) -> Vec<Value> {
        assert!(
            self.is_model::<T>(),
            "record type {} does not match schema of {}",
            type_name::<T>(),
            self.model_name
        );
        record.values()
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("model", &self.model_name)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}
