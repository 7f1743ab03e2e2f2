use super::Dialect;
use crate::value::{Value, ValueKind};

/// SQLite 3 type names and catalog probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite3;

impl Dialect for Sqlite3 {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn data_type_of(&self, kind: ValueKind) -> &'static str {
        match kind {
            ValueKind::Bool => "bool",
            ValueKind::SmallInt | ValueKind::Int => "integer",
            ValueKind::BigInt => "bigint",
            ValueKind::Real | ValueKind::Double => "real",
            ValueKind::Text => "text",
            ValueKind::Bytes => "blob",
            ValueKind::Date | ValueKind::Timestamp | ValueKind::TimestampTz => "datetime",
            ValueKind::Uuid | ValueKind::Json => {
                panic!("invalid SQL type {kind:?} for dialect sqlite3")
            }
        }
    }

    fn table_exist_sql(&self, table: &str) -> (String, Vec<Value>) {
        (
            "SELECT name FROM sqlite_master WHERE type='table' and name = ?".to_string(),
            vec![Value::Text(table.to_string())],
        )
    }
}
