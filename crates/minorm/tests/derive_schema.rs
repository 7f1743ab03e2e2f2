use minorm::{
    ColumnDef, FieldType, FromRow, Model, OrmError, Rows, Schema, Value, ValueKind, get_dialect,
    params,
};

#[derive(Debug, Default, Clone, PartialEq, Model, FromRow)]
struct User {
    #[orm(tag = "PRIMARY KEY")]
    name: String,
    age: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Model, FromRow)]
#[orm(table = "profiles")]
struct Profile {
    #[orm(column = "user_name", tag = "NOT NULL")]
    name: String,
    bio: Option<String>,
    #[orm(skip)]
    loaded: bool,
    score: f64,
}

#[test]
fn table_defaults_to_type_name() {
    assert_eq!(User::TABLE, "User");
    assert_eq!(Profile::TABLE, "profiles");
}

#[test]
fn columns_follow_declaration_order() {
    assert_eq!(
        User::columns(),
        vec![
            ColumnDef::new("name", ValueKind::Text, "PRIMARY KEY"),
            ColumnDef::new("age", ValueKind::Int, ""),
        ]
    );
    assert_eq!(
        Profile::columns(),
        vec![
            ColumnDef::new("user_name", ValueKind::Text, "NOT NULL"),
            ColumnDef::new("bio", <Option<String> as FieldType>::KIND, ""),
            ColumnDef::new("score", ValueKind::Double, ""),
        ]
    );
}

#[test]
fn schema_uses_dialect_types() {
    let sqlite = Schema::parse::<Profile>(get_dialect("sqlite3").unwrap());
    let types: Vec<_> = sqlite.fields.iter().map(|f| f.column_type.as_str()).collect();
    assert_eq!(types, ["text", "text", "real"]);

    let pg = Schema::parse::<Profile>(get_dialect("postgres").unwrap());
    let types: Vec<_> = pg.fields.iter().map(|f| f.column_type.as_str()).collect();
    assert_eq!(types, ["text", "text", "double precision"]);
    assert_eq!(pg.field_names, ["user_name", "bio", "score"]);
}

#[test]
fn values_and_decoding_share_an_order() {
    let profile = Profile {
        name: "Tom".into(),
        bio: None,
        loaded: true,
        score: 1.5,
    };
    let values = profile.values();
    assert_eq!(values, vec![Value::from("Tom"), Value::Null, Value::Double(1.5)]);

    let rows = Rows::from_values(
        vec!["user_name".into(), "bio".into(), "score".into()],
        vec![values],
    );
    let decoded = Profile::from_row(&rows.rows[0]).unwrap();
    assert_eq!(
        decoded,
        Profile {
            loaded: false,
            ..profile
        }
    );
}

#[test]
fn decoding_rejects_column_count_drift() {
    let rows = Rows::from_values(
        vec!["name".into(), "age".into(), "extra".into()],
        vec![params!["Tom", 18, 1]],
    );
    let err = User::from_row(&rows.rows[0]).unwrap_err();
    assert!(matches!(err, OrmError::Decode { .. }));
}

#[test]
fn decoding_reports_the_failing_column() {
    let rows = Rows::from_values(
        vec!["name".into(), "age".into()],
        vec![params!["Tom", "old"]],
    );
    match User::from_row(&rows.rows[0]).unwrap_err() {
        OrmError::Decode { column, .. } => assert_eq!(column, "age"),
        other => panic!("unexpected error: {other}"),
    }
}
