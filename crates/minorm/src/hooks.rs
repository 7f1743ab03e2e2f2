//! Record lifecycle hooks.
//!
//! Every record type implements [`Hooks`]. `#[derive(Model)]` emits an empty
//! impl, so a record has no observable hooks unless it opts out with
//! `#[orm(hooks)]` and writes the impl itself:
//!
//! ```ignore
//! #[derive(Debug, Default, Model, FromRow)]
//! #[orm(hooks)]
//! struct Account {
//!     id: i32,
//!     password: String,
//! }
//!
//! impl minorm::Hooks for Account {
//!     fn before_insert(&mut self, _session: &minorm::Session) -> minorm::OrmResult<()> {
//!         self.id += 1000;
//!         Ok(())
//!     }
//!
//!     fn after_query(&mut self, _session: &minorm::Session) -> minorm::OrmResult<()> {
//!         self.password = "******".into();
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Hook errors are logged by the session and never abort the operation.

use crate::error::OrmResult;
use crate::session::Session;

/// Lifecycle callbacks around session CRUD operations.
///
/// Hooks fire either on the record the operation is handling (`BeforeInsert`,
/// `AfterQuery`) or on the schema's model sample (all others).
#[allow(unused_variables)]
pub trait Hooks: Send + Sync {
    fn before_insert(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn after_insert(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn before_update(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn after_update(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn before_delete(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn after_delete(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn before_query(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }

    fn after_query(&mut self, session: &Session) -> OrmResult<()> {
        Ok(())
    }
}

impl Hooks for () {}

/// Names of the lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeInsert,
    AfterInsert,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
    BeforeQuery,
    AfterQuery,
}

impl Hook {
    pub fn name(self) -> &'static str {
        match self {
            Hook::BeforeInsert => "BeforeInsert",
            Hook::AfterInsert => "AfterInsert",
            Hook::BeforeUpdate => "BeforeUpdate",
            Hook::AfterUpdate => "AfterUpdate",
            Hook::BeforeDelete => "BeforeDelete",
            Hook::AfterDelete => "AfterDelete",
            Hook::BeforeQuery => "BeforeQuery",
            Hook::AfterQuery => "AfterQuery",
        }
    }

    /// Invoke this hook on `receiver`.
    pub fn dispatch(self, receiver: &mut dyn Hooks, session: &Session) -> OrmResult<()> {
        match self {
            Hook::BeforeInsert => receiver.before_insert(session),
            Hook::AfterInsert => receiver.after_insert(session),
            Hook::BeforeUpdate => receiver.before_update(session),
            Hook::AfterUpdate => receiver.after_update(session),
            Hook::BeforeDelete => receiver.before_delete(session),
            Hook::AfterDelete => receiver.after_delete(session),
            Hook::BeforeQuery => receiver.before_query(session),
            Hook::AfterQuery => receiver.after_query(session),
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
