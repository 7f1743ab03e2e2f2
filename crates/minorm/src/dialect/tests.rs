use super::*;

#[test]
fn builtin_dialects_are_registered() {
    assert_eq!(get_dialect("postgres").unwrap().name(), "postgres");
    assert_eq!(get_dialect("sqlite3").unwrap().name(), "sqlite3");
    assert!(get_dialect("oracle").is_none());
    assert!(dialect_names().contains(&"sqlite3"));
}

#[test]
fn sqlite3_type_mapping() {
    let d = Sqlite3;
    let cases = [
        (ValueKind::Bool, "bool"),
        (ValueKind::SmallInt, "integer"),
        (ValueKind::Int, "integer"),
        (ValueKind::BigInt, "bigint"),
        (ValueKind::Real, "real"),
        (ValueKind::Double, "real"),
        (ValueKind::Text, "text"),
        (ValueKind::Bytes, "blob"),
        (ValueKind::Timestamp, "datetime"),
    ];
    for (kind, expected) in cases {
        assert_eq!(d.data_type_of(kind), expected, "{kind:?}");
    }
}

#[test]
#[should_panic(expected = "invalid SQL type")]
fn sqlite3_rejects_unsupported_kind() {
    Sqlite3.data_type_of(ValueKind::Uuid);
}

#[test]
fn sqlite3_table_probe() {
    let (sql, vars) = Sqlite3.table_exist_sql("users");
    assert_eq!(
        sql,
        "SELECT name FROM sqlite_master WHERE type='table' and name = ?"
    );
    assert_eq!(vars, vec![Value::Text("users".into())]);
}

#[test]
fn postgres_type_mapping() {
    let d = Postgres;
    assert_eq!(d.data_type_of(ValueKind::Int), "integer");
    assert_eq!(d.data_type_of(ValueKind::BigInt), "bigint");
    assert_eq!(d.data_type_of(ValueKind::Double), "double precision");
    assert_eq!(d.data_type_of(ValueKind::Json), "jsonb");
}

#[test]
fn postgres_probe_binds_folded_name() {
    let (sql, vars) = Postgres.table_exist_sql("User");
    assert!(sql.contains("pg_tables"));
    assert_eq!(vars, vec![Value::Text("user".into())]);
}

#[test]
fn postgres_numbers_placeholders_in_order() {
    let sql = "SELECT * FROM users WHERE name = ? AND age > ? LIMIT ?";
    assert_eq!(
        Postgres.rewrite_placeholders(sql),
        "SELECT * FROM users WHERE name = $1 AND age > $2 LIMIT $3"
    );
}

#[test]
fn postgres_leaves_quoted_question_marks() {
    let sql = "SELECT '?' AS q, \"a?b\" FROM t WHERE x = ?";
    assert_eq!(
        Postgres.rewrite_placeholders(sql),
        "SELECT '?' AS q, \"a?b\" FROM t WHERE x = $1"
    );
    assert!(matches!(
        Postgres.rewrite_placeholders("SELECT 1"),
        Cow::Borrowed(_)
    ));
}

#[test]
fn postgres_skips_comments() {
    let sql = "SELECT a -- why?\nFROM t /* who? /* nested? */ still? */ WHERE a = ?";
    assert_eq!(
        Postgres.rewrite_placeholders(sql),
        "SELECT a -- why?\nFROM t /* who? /* nested? */ still? */ WHERE a = $1"
    );
    assert_eq!(Postgres.rewrite_placeholders("SELECT 5 - ? / ?"), "SELECT 5 - $1 / $2");
}

#[test]
fn postgres_skips_escape_and_dollar_quoted_strings() {
    let sql = r"SELECT E'it\'s ?', 'a''?', $$ ? $$, $fn$ why? $fn$ FROM t WHERE a = ?";
    assert_eq!(
        Postgres.rewrite_placeholders(sql),
        r"SELECT E'it\'s ?', 'a''?', $$ ? $$, $fn$ why? $fn$ FROM t WHERE a = $1"
    );
}

#[test]
fn postgres_unterminated_literal_swallows_the_rest() {
    assert_eq!(
        Postgres.rewrite_placeholders("SELECT ? , 'open ?"),
        "SELECT $1 , 'open ?"
    );
}

#[test]
fn sqlite3_keeps_question_marks() {
    let sql = "INSERT INTO t (a,b) VALUES (?, ?)";
    assert_eq!(Sqlite3.rewrite_placeholders(sql), sql);
}
