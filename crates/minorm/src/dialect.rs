//! SQL dialects: column type mapping and the table existence probe.
//!
//! Dialects register themselves at process start through [`register_dialect!`]
//! and are looked up by name afterwards with [`get_dialect`]. The registry is
//! read-only once the first lookup has happened.
//!
//! ```ignore
//! struct MyDialect;
//! impl minorm::Dialect for MyDialect { /* ... */ }
//! minorm::register_dialect!("mydb", &MyDialect);
//!
//! let dialect = minorm::get_dialect("mydb").unwrap();
//! ```

mod postgres;
mod sqlite3;

#[cfg(test)]
mod tests;

use crate::value::{Value, ValueKind};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

pub use postgres::Postgres;
pub use sqlite3::Sqlite3;

/// A database dialect.
pub trait Dialect: Send + Sync {
    /// Registry key of this dialect.
    fn name(&self) -> &'static str;

    /// Column type for a field of the given kind.
    ///
    /// # Panics
    ///
    /// Panics when the dialect has no column type for `kind`; a schema that
    /// cannot be expressed in the dialect cannot be derived at all.
    fn data_type_of(&self, kind: ValueKind) -> &'static str;

    /// A single-row probe returning the table name when `table` exists.
    fn table_exist_sql(&self, table: &str) -> (String, Vec<Value>);

    /// Render `?` bind markers the way the driver expects them.
    fn rewrite_placeholders<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(sql)
    }

    /// Canonical spelling of an unquoted identifier as stored in the catalog.
    fn normalize_ident(&self, ident: &str) -> String {
        ident.to_string()
    }
}

/// Registration entry collected by `inventory`.
pub struct DialectRegistration {
    pub name: &'static str,
    pub dialect: &'static dyn Dialect,
}

impl DialectRegistration {
    pub const fn new(name: &'static str, dialect: &'static dyn Dialect) -> Self {
        Self { name, dialect }
    }
}

inventory::collect!(DialectRegistration);

/// Register a dialect under a name at process start.
#[macro_export]
macro_rules! register_dialect {
    ($name:expr, $dialect:expr) => {
        $crate::inventory::submit! {
            $crate::dialect::DialectRegistration::new($name, $dialect)
        }
    };
}

register_dialect!("postgres", &Postgres);
register_dialect!("sqlite3", &Sqlite3);

fn registry() -> &'static HashMap<&'static str, &'static dyn Dialect> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static dyn Dialect>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        inventory::iter::<DialectRegistration>
            .into_iter()
            .map(|reg| (reg.name, reg.dialect))
            .collect()
    })
}

/// Look up a registered dialect by name.
pub fn get_dialect(name: &str) -> Option<&'static dyn Dialect> {
    registry().get(name).copied()
}

/// Names of all registered dialects, sorted.
pub fn dialect_names() -> Vec<&'static str> {
    let mut names: Vec<_> = registry().keys().copied().collect();
    names.sort_unstable();
    names
}
