//! Row mapping traits and utilities

use crate::error::{OrmError, OrmResult};
use crate::value::{Value, ValueKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// A result row: column names shared across the result set plus this row's values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Decode the value at `index`.
    pub fn get<T: FieldType>(&self, index: usize) -> OrmResult<T> {
        let column = self
            .columns
            .get(index)
            .map(String::as_str)
            .unwrap_or("?");
        let value = self.values.get(index).cloned().ok_or_else(|| {
            OrmError::decode(
                index.to_string(),
                format!("row has {} columns", self.values.len()),
            )
        })?;
        T::from_value(value).map_err(|message| OrmError::decode(column, message))
    }

    /// Decode the value of the first column called `name`.
    pub fn get_by_name<T: FieldType>(&self, name: &str) -> OrmResult<T> {
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| OrmError::decode(name, "no such column"))?;
        self.get(index)
    }

    /// Fail unless the row has exactly `expected` columns.
    ///
    /// Records are decoded positionally, so a live table whose column list has
    /// drifted from the record definition must not be silently mis-assigned.
    pub fn expect_len(&self, expected: usize) -> OrmResult<()> {
        if self.values.len() != expected {
            return Err(OrmError::decode(
                self.columns.join(","),
                format!(
                    "expected {} columns, got {}",
                    expected,
                    self.values.len()
                ),
            ));
        }
        Ok(())
    }
}

/// All rows of a query together with its column names.
///
/// Column names are known even when the result set is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a result set from raw value lists sharing the given columns.
    pub fn from_values(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let shared: Arc<[String]> = columns.clone().into();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&shared), values))
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Trait that maps Rust field types to column kinds and values.
///
/// This is used by derive macros to build schemas, extract record values and
/// decode rows.
pub trait FieldType: Sized {
    /// Column kind handed to the dialect when deriving the column type.
    const KIND: ValueKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, got: &Value) -> String {
    match got {
        Value::Null => format!("unexpected NULL for {expected}"),
        other => format!("expected {expected}, got {:?}", other.kind()),
    }
}

macro_rules! impl_field_type {
    ($ty:ty, $kind:ident, |$v:ident| $to:expr, { $($pat:pat => $from:expr),+ $(,)? }) => {
        impl FieldType for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn to_value(&self) -> Value {
                let $v = self;
                $to
            }

            fn from_value(value: Value) -> Result<Self, String> {
                match value {
                    $($pat => Ok($from),)+
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    };
}

impl_field_type!(bool, Bool, |v| Value::Bool(*v), { Value::Bool(v) => v });
impl_field_type!(i16, SmallInt, |v| Value::SmallInt(*v), { Value::SmallInt(v) => v });
impl_field_type!(i32, Int, |v| Value::Int(*v), {
    Value::Int(v) => v,
    Value::SmallInt(v) => i32::from(v),
});
impl_field_type!(i64, BigInt, |v| Value::BigInt(*v), {
    Value::BigInt(v) => v,
    Value::Int(v) => i64::from(v),
    Value::SmallInt(v) => i64::from(v),
});
impl_field_type!(f32, Real, |v| Value::Real(*v), { Value::Real(v) => v });
impl_field_type!(f64, Double, |v| Value::Double(*v), {
    Value::Double(v) => v,
    Value::Real(v) => f64::from(v),
});
impl_field_type!(String, Text, |v| Value::Text(v.clone()), { Value::Text(v) => v });
impl_field_type!(Vec<u8>, Bytes, |v| Value::Bytes(v.clone()), { Value::Bytes(v) => v });
impl_field_type!(NaiveDate, Date, |v| Value::Date(*v), { Value::Date(v) => v });
impl_field_type!(NaiveDateTime, Timestamp, |v| Value::Timestamp(*v), {
    Value::Timestamp(v) => v,
});
impl_field_type!(DateTime<Utc>, TimestampTz, |v| Value::TimestampTz(*v), {
    Value::TimestampTz(v) => v,
});
impl_field_type!(Uuid, Uuid, |v| Value::Uuid(*v), { Value::Uuid(v) => v });
impl_field_type!(serde_json::Value, Json, |v| Value::Json(v.clone()), {
    Value::Json(v) => v,
});

// Option<T> shares the column kind of T; NULL decodes to None.
impl<T: FieldType> FieldType for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldType::to_value)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Trait for converting a database row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRow)]`
/// from the `minorm-derive` crate. Derived impls read columns positionally in
/// field declaration order.
///
/// # Example
///
/// ```ignore
/// use minorm::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     name: String,
///     age: i32,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<Value>) -> Row {
        let columns: Arc<[String]> = (0..values.len())
            .map(|i| format!("c{i}"))
            .collect::<Vec<_>>()
            .into();
        Row::new(columns, values)
    }

    #[test]
    fn option_shares_inner_kind() {
        assert_eq!(<Option<String> as FieldType>::KIND, ValueKind::Text);
        assert_eq!(<Option<i64> as FieldType>::KIND, ValueKind::BigInt);
    }

    #[test]
    fn integers_widen_losslessly() {
        let r = row(vec![Value::Int(7), Value::SmallInt(2)]);
        assert_eq!(r.get::<i64>(0).unwrap(), 7);
        assert_eq!(r.get::<i32>(1).unwrap(), 2);
    }

    #[test]
    fn null_into_non_option_is_a_decode_error() {
        let r = row(vec![Value::Null]);
        let err = r.get::<String>(0).unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "c0"));
        assert_eq!(r.get::<Option<String>>(0).unwrap(), None);
    }

    #[test]
    fn out_of_range_index_is_a_decode_error() {
        let r = row(vec![Value::Int(1)]);
        assert!(r.get::<i32>(3).is_err());
    }

    #[test]
    fn lookup_by_name() {
        let r = row(vec![Value::Int(1), Value::Text("x".into())]);
        assert_eq!(r.get_by_name::<String>("c1").unwrap(), "x");
        assert!(r.get_by_name::<String>("missing").is_err());
    }

    #[test]
    fn expect_len_rejects_drifted_rows() {
        let r = row(vec![Value::Int(1), Value::Int(2)]);
        assert!(r.expect_len(2).is_ok());
        assert!(r.expect_len(3).is_err());
    }

    #[test]
    fn rows_keep_columns_when_empty() {
        let rows = Rows::from_values(vec!["name".into(), "age".into()], vec![]);
        assert!(rows.is_empty());
        assert_eq!(rows.columns, vec!["name", "age"]);
    }
}
