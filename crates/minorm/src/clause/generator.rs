use super::{ClauseArgs, Fragment};
use crate::value::Value;

pub(super) fn generate(args: ClauseArgs) -> Fragment {
    match args {
        ClauseArgs::Insert { table, columns } => insert(&table, &columns),
        ClauseArgs::Values(rows) => values(rows),
        ClauseArgs::Select { table, columns } => select(&table, &columns),
        ClauseArgs::Limit(n) => Fragment {
            sql: "LIMIT ?".to_string(),
            vars: vec![Value::BigInt(n)],
        },
        ClauseArgs::Where { desc, vars } => Fragment {
            sql: format!("WHERE {desc}"),
            vars,
        },
        ClauseArgs::OrderBy(desc) => text(format!("ORDER BY {desc}")),
        ClauseArgs::Update { table, pairs } => update(&table, pairs),
        ClauseArgs::Delete { table } => text(format!("DELETE FROM {table}")),
        ClauseArgs::Count { table } => select(&table, &["COUNT(*)".to_string()]),
    }
}

fn text(sql: String) -> Fragment {
    Fragment {
        sql,
        vars: Vec::new(),
    }
}

fn bind_vars(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn insert(table: &str, columns: &[String]) -> Fragment {
    text(format!("INSERT INTO {table} ({})", columns.join(",")))
}

// Every group uses the placeholder count of the first row.
fn values(rows: Vec<Vec<Value>>) -> Fragment {
    let Some(first) = rows.first() else {
        return text("VALUES".to_string());
    };
    let group = format!("({})", bind_vars(first.len()));

    let groups = vec![group.as_str(); rows.len()].join(", ");
    Fragment {
        sql: format!("VALUES {groups}"),
        vars: rows.into_iter().flatten().collect(),
    }
}

fn select(table: &str, columns: &[String]) -> Fragment {
    text(format!("SELECT {} FROM {table}", columns.join(",")))
}

fn update(table: &str, pairs: Vec<(String, Value)>) -> Fragment {
    let mut sets = Vec::with_capacity(pairs.len());
    let mut vars = Vec::with_capacity(pairs.len());
    for (column, value) in pairs {
        sets.push(format!("{column} = ?"));
        vars.push(value);
    }
    Fragment {
        sql: format!("UPDATE {table} SET {}", sets.join(", ")),
        vars,
    }
}
