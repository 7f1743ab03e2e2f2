//! # minorm
//!
//! A small session-based ORM for Rust.
//!
//! ## Features
//!
//! - **Derived schemas**: `#[derive(Model, FromRow)]` maps a struct to a table
//! - **Clause assembly**: statements are composed from typed fragments in an explicit order
//! - **Lifecycle hooks**: per-type callbacks around insert, update, delete and query
//! - **Transactions**: explicit `begin`/`commit`/`rollback`, or a closure via [`Engine::transaction`]
//! - **Migration**: add and drop columns by diffing a record type against the live table
//! - **Pluggable dialects**: column types and the table probe are resolved per dialect
//!
//! ## Example
//!
//! ```ignore
//! use minorm::{Engine, EngineConfig, FromRow, Model, params};
//!
//! #[derive(Debug, Default, Model, FromRow)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(tag = "PRIMARY KEY")]
//!     name: String,
//!     age: i32,
//! }
//!
//! let engine = Engine::connect(EngineConfig::from_env()?).await?;
//! let mut s = engine.new_session();
//! s.model::<User>().create_table().await?;
//! s.insert(&mut [User { name: "Tom".into(), age: 18 }]).await?;
//!
//! let mut tom = User::default();
//! s.filter("name = ?", params!["Tom"]).first(&mut tom).await?;
//! ```

extern crate self as minorm;

pub mod clause;
pub mod client;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod migrate;
pub mod row;
pub mod schema;
pub mod session;
pub mod value;

#[cfg(test)]
mod mock;

pub use clause::{Clause, ClauseArgs, ClauseKind, Fragment};
pub use client::{Executor, PgExecutor, PgTransaction, Transaction};
pub use config::EngineConfig;
pub use dialect::{Dialect, DialectRegistration, dialect_names, get_dialect};
pub use engine::Engine;
pub use error::{OrmError, OrmResult};
pub use hooks::{Hook, Hooks};
pub use migrate::MigrationPlan;
pub use row::{FieldType, FromRow, Row, Rows};
pub use schema::{ColumnDef, Field, Model, Schema};
pub use session::Session;
pub use value::{Value, ValueKind};

pub use inventory;

#[cfg(feature = "derive")]
pub use minorm_derive::{FromRow, Model};
