//! Per-statement SQL fragment table.
//!
//! A [`Clause`] holds at most one generated fragment per [`ClauseKind`] and
//! assembles them into one statement in an order chosen by the caller:
//!
//! ```ignore
//! let mut clause = Clause::new();
//! clause.set(ClauseArgs::limit(3));
//! clause.set(ClauseArgs::select("User", ["*"]));
//! clause.set(ClauseArgs::filter("Name = ?", params!["Tom"]));
//! clause.set(ClauseArgs::order_by("Age ASC"));
//! let (sql, vars) = clause.build(&[
//!     ClauseKind::Select,
//!     ClauseKind::Where,
//!     ClauseKind::OrderBy,
//!     ClauseKind::Limit,
//! ]);
//! assert_eq!(sql, "SELECT * FROM User WHERE Name = ? ORDER BY Age ASC LIMIT ?");
//! ```

mod generator;

#[cfg(test)]
mod tests;

use crate::error::OrmError;
use crate::value::Value;

/// The fixed set of fragment categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ClauseKind {
    Insert = 0,
    Values = 1,
    Select = 2,
    Limit = 3,
    Where = 4,
    OrderBy = 5,
    Update = 6,
    Delete = 7,
    Count = 8,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 9] = [
        ClauseKind::Insert,
        ClauseKind::Values,
        ClauseKind::Select,
        ClauseKind::Limit,
        ClauseKind::Where,
        ClauseKind::OrderBy,
        ClauseKind::Update,
        ClauseKind::Delete,
        ClauseKind::Count,
    ];
}

impl TryFrom<u8> for ClauseKind {
    type Error = OrmError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| OrmError::Validation(format!("unknown clause kind {code}")))
    }
}

/// Typed arguments of one clause; the variant selects the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseArgs {
    Insert { table: String, columns: Vec<String> },
    Values(Vec<Vec<Value>>),
    Select { table: String, columns: Vec<String> },
    Limit(i64),
    Where { desc: String, vars: Vec<Value> },
    OrderBy(String),
    Update { table: String, pairs: Vec<(String, Value)> },
    Delete { table: String },
    Count { table: String },
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ClauseArgs {
    pub fn insert<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClauseArgs::Insert {
            table: table.into(),
            columns: strings(columns),
        }
    }

    pub fn values(rows: Vec<Vec<Value>>) -> Self {
        ClauseArgs::Values(rows)
    }

    pub fn select<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClauseArgs::Select {
            table: table.into(),
            columns: strings(columns),
        }
    }

    pub fn limit(n: i64) -> Self {
        ClauseArgs::Limit(n)
    }

    pub fn filter(desc: impl Into<String>, vars: Vec<Value>) -> Self {
        ClauseArgs::Where {
            desc: desc.into(),
            vars,
        }
    }

    pub fn order_by(desc: impl Into<String>) -> Self {
        ClauseArgs::OrderBy(desc.into())
    }

    pub fn update<I, K, V>(table: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        ClauseArgs::Update {
            table: table.into(),
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn delete(table: impl Into<String>) -> Self {
        ClauseArgs::Delete {
            table: table.into(),
        }
    }

    pub fn count(table: impl Into<String>) -> Self {
        ClauseArgs::Count {
            table: table.into(),
        }
    }

    pub fn kind(&self) -> ClauseKind {
        match self {
            ClauseArgs::Insert { .. } => ClauseKind::Insert,
            ClauseArgs::Values(_) => ClauseKind::Values,
            ClauseArgs::Select { .. } => ClauseKind::Select,
            ClauseArgs::Limit(_) => ClauseKind::Limit,
            ClauseArgs::Where { .. } => ClauseKind::Where,
            ClauseArgs::OrderBy(_) => ClauseKind::OrderBy,
            ClauseArgs::Update { .. } => ClauseKind::Update,
            ClauseArgs::Delete { .. } => ClauseKind::Delete,
            ClauseArgs::Count { .. } => ClauseKind::Count,
        }
    }
}

/// One generated SQL text plus its bound variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub vars: Vec<Value>,
}

/// Fragment table for the statement under construction.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    fragments: [Option<Fragment>; 9],
}

impl Clause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the fragment for `args`, replacing any fragment of the same kind.
    pub fn set(&mut self, args: ClauseArgs) -> &mut Self {
        let kind = args.kind();
        self.fragments[kind as usize] = Some(generator::generate(args));
        self
    }

    /// The fragment currently stored for `kind`.
    pub fn get(&self, kind: ClauseKind) -> Option<&Fragment> {
        self.fragments[kind as usize].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(Option::is_none)
    }

    /// Join the fragments of `order` with single spaces, skipping unset kinds.
    ///
    /// Variables are concatenated in the same order. All fragments are
    /// discarded afterwards, including kinds not named in `order`.
    pub fn build(&mut self, order: &[ClauseKind]) -> (String, Vec<Value>) {
        let mut sqls: Vec<&str> = Vec::with_capacity(order.len());
        let mut vars = Vec::new();
        for kind in order {
            if let Some(fragment) = &self.fragments[*kind as usize] {
                sqls.push(&fragment.sql);
                vars.extend(fragment.vars.iter().cloned());
            }
        }
        let sql = sqls.join(" ");
        self.clear();
        (sql, vars)
    }

    pub fn clear(&mut self) {
        self.fragments = Default::default();
    }
}
