use super::*;
use crate::params;

#[test]
fn select_with_filter_order_and_limit() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::limit(3));
    clause.set(ClauseArgs::select("User", ["*"]));
    clause.set(ClauseArgs::filter("Name = ?", params!["Tom"]));
    clause.set(ClauseArgs::order_by("Age ASC"));

    let (sql, vars) = clause.build(&[
        ClauseKind::Select,
        ClauseKind::Where,
        ClauseKind::OrderBy,
        ClauseKind::Limit,
    ]);
    assert_eq!(sql, "SELECT * FROM User WHERE Name = ? ORDER BY Age ASC LIMIT ?");
    assert_eq!(vars, vec![Value::from("Tom"), Value::BigInt(3)]);
}

#[test]
fn insert_with_multiple_value_groups() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::insert("User", ["Name", "Age"]));
    clause.set(ClauseArgs::values(vec![
        params!["Tom", 18],
        params!["Sam", 25],
    ]));

    let (sql, vars) = clause.build(&[ClauseKind::Insert, ClauseKind::Values]);
    assert_eq!(sql, "INSERT INTO User (Name,Age) VALUES (?, ?), (?, ?)");
    assert_eq!(vars, params!["Tom", 18, "Sam", 25]);
}

#[test]
fn update_follows_caller_order() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::update("User", [("Age", Value::Int(30)), ("Name", "Tom".into())]));
    clause.set(ClauseArgs::filter("Name = ?", params!["Tom"]));

    let (sql, vars) = clause.build(&[ClauseKind::Update, ClauseKind::Where]);
    assert_eq!(sql, "UPDATE User SET Age = ?, Name = ? WHERE Name = ?");
    assert_eq!(vars, params![30, "Tom", "Tom"]);
}

#[test]
fn delete_and_count() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::delete("User"));
    clause.set(ClauseArgs::filter("Name = ?", params!["Tom"]));
    let (sql, vars) = clause.build(&[ClauseKind::Delete, ClauseKind::Where]);
    assert_eq!(sql, "DELETE FROM User WHERE Name = ?");
    assert_eq!(vars, params!["Tom"]);

    clause.set(ClauseArgs::count("User"));
    let (sql, vars) = clause.build(&[ClauseKind::Count, ClauseKind::Where]);
    assert_eq!(sql, "SELECT COUNT(*) FROM User");
    assert!(vars.is_empty());
}

#[test]
fn setting_a_kind_twice_keeps_the_second() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::filter("Name = ?", params!["Tom"]));
    clause.set(ClauseArgs::filter("Age > ?", params![18]));

    assert_eq!(
        clause.get(ClauseKind::Where),
        Some(&Fragment {
            sql: "WHERE Age > ?".into(),
            vars: params![18],
        })
    );
}

#[test]
fn build_skips_unset_kinds_and_clears() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::select("User", ["Name", "Age"]));
    clause.set(ClauseArgs::update("User", [("Age", 1)]));

    let (sql, vars) = clause.build(&[
        ClauseKind::Select,
        ClauseKind::Where,
        ClauseKind::OrderBy,
        ClauseKind::Limit,
    ]);
    assert_eq!(sql, "SELECT Name,Age FROM User");
    assert!(vars.is_empty());
    assert!(clause.is_empty());

    let (sql, vars) = clause.build(&[ClauseKind::Update]);
    assert_eq!(sql, "");
    assert!(vars.is_empty());
}

#[test]
fn build_respects_caller_order() {
    let mut clause = Clause::new();
    clause.set(ClauseArgs::limit(1));
    clause.set(ClauseArgs::filter("a = ?", params![2]));

    let (sql, vars) = clause.build(&[ClauseKind::Limit, ClauseKind::Where]);
    assert_eq!(sql, "LIMIT ? WHERE a = ?");
    assert_eq!(vars, vec![Value::BigInt(1), Value::Int(2)]);
}

#[test]
fn clause_kind_codes() {
    assert_eq!(ClauseKind::try_from(0).unwrap(), ClauseKind::Insert);
    assert_eq!(ClauseKind::try_from(8).unwrap(), ClauseKind::Count);
    assert!(ClauseKind::try_from(9).is_err());
    for kind in ClauseKind::ALL {
        assert_eq!(ClauseKind::try_from(kind as u8).unwrap(), kind);
    }
}
