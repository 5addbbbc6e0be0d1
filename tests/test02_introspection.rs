mod common;

use common::{RecordingExecutor, interface, new_log, requests, rows};
use sql_dialect::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn catalog_queries_run_as_unbound_selects() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let executor = RecordingExecutor::new(&log)
        .respond_with(rows(&["ColumnName"], vec![vec![BindValue::from("id")]]))
        .respond_with(rows(&["tableName", "schema"], vec![]))
        .respond_with(rows(&["schema"], vec![vec![BindValue::from("APP")]]));
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut qi = interface(DialectKind::Hana, executor);
        let columns = qi.describe_table("APP.Users").await?;
        assert_eq!(columns.len(), 1);
        assert_eq!(
            columns.first().and_then(|row| row.get("ColumnName")),
            Some(&BindValue::from("id"))
        );
        qi.list_tables(&ListTablesOptions::default()).await?;
        let schemas = qi
            .list_schemas(&ListSchemasOptions {
                skip: vec!["SCRATCH".into()],
            })
            .await?;
        assert_eq!(schemas.len(), 1);
        Ok::<(), SqlDialectError>(())
    })?;

    let sent = requests(&log);
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|request| request.kind == QueryKind::Select));
    assert!(sent.iter().all(|request| request.params.is_empty()));
    assert!(sent[0].sql.ends_with("AND SYS.TABLE_COLUMNS.SCHEMA_NAME = 'APP'"));
    assert!(sent[1].sql.contains("AND SCHEMA_NAME NOT IN ('SYSTEM', 'UIS', 'HANA_XS_BASE')"));
    assert!(sent[2].sql.contains("'SCRATCH'"));
    Ok(())
}

#[test]
fn technical_schemas_are_hidden_per_dialect() -> Result<(), Box<dyn std::error::Error>> {
    let postgres = QueryGenerator::for_dialect(DialectKind::Postgres);
    let sql = postgres.list_tables_query(&ListTablesOptions::default())?;
    assert!(sql.contains("'information_schema'"));
    assert!(sql.contains("!~ '^pg_'"));
    assert!(!sql.contains("'public'"), "tables in the default schema stay visible: {sql}");

    let mssql = QueryGenerator::for_dialect(DialectKind::Mssql);
    let sql = mssql.list_schemas_query(&ListSchemasOptions::default())?;
    assert!(sql.contains("'dbo'") && sql.contains("'sys'"));

    let config = DialectConfig::new(DialectKind::Db2).with_extra_technical_schemas(["AUDIT"]);
    let db2 = QueryGenerator::from_config(&config);
    let sql = db2.list_tables_query(&ListTablesOptions::default())?;
    assert!(sql.contains("'AUDIT'"));
    Ok(())
}

#[test]
fn missing_schema_defaults_to_current_schema() {
    let table = TableReference::parse("Users").unwrap();
    let cases = [
        (DialectKind::Postgres, "current_schema()"),
        (DialectKind::Mssql, "SCHEMA_NAME()"),
        (DialectKind::Mysql, "DATABASE()"),
        (DialectKind::Db2, "CURRENT SCHEMA"),
        (DialectKind::Hana, "CURRENT_SCHEMA"),
    ];
    for (kind, current) in cases {
        let generator = QueryGenerator::for_dialect(kind);
        for sql in [
            generator.describe_table_query(&table),
            generator.show_indexes_query(&table),
            generator.table_exists_query(&table),
        ] {
            if kind == DialectKind::Mysql && sql.starts_with("SHOW INDEX") {
                continue;
            }
            if kind == DialectKind::Mssql && sql.starts_with("EXEC") {
                continue;
            }
            assert!(sql.contains(current), "{kind}: {sql}");
        }
    }
}

#[test]
fn show_constraints_options_are_checked_before_sql() {
    let sqlite = QueryGenerator::for_dialect(DialectKind::Sqlite);
    let err = sqlite
        .show_constraints_query(
            &TableReference::parse("Users").unwrap(),
            &ShowConstraintsOptions {
                constraint_type: Some(ConstraintType::ForeignKey),
                column_name: Some("teamId".into()),
                constraint_name: None,
            },
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "showConstraintsQuery was called with options that sqlite does not support: constraintType, columnName"
    );
}

#[test]
fn table_exists_and_version_read_result_rows() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let executor = RecordingExecutor::new(&log)
        .respond_with(rows(&["TABLE_NAME"], vec![vec![BindValue::from("Users")]]))
        .respond_with(rows(&["TABLE_NAME"], vec![]))
        .respond_with(rows(&["version"], vec![vec![BindValue::from("16.2")]]));
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut qi = interface(DialectKind::Postgres, executor);
        assert!(qi.table_exists("Users").await?);
        assert!(!qi.table_exists("public.Missing").await?);
        assert_eq!(qi.database_version().await?.as_deref(), Some("16.2"));
        Ok::<(), SqlDialectError>(())
    })?;

    let sent = requests(&log);
    assert!(sent[1].sql.contains("TABLE_SCHEMA = 'public' AND TABLE_NAME = 'Missing'"));
    assert_eq!(sent[2].sql, "SHOW SERVER_VERSION");
    Ok(())
}

#[test]
fn hana_constraint_listing_is_foreign_key_only() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let rt = Runtime::new()?;
    let outcome = rt.block_on(async {
        let mut qi = interface(DialectKind::Hana, RecordingExecutor::new(&log));
        qi.show_constraints(
            "Users",
            &ShowConstraintsOptions {
                constraint_type: Some(ConstraintType::PrimaryKey),
                ..ShowConstraintsOptions::default()
            },
        )
        .await
    });
    assert!(matches!(outcome, Err(SqlDialectError::Unimplemented(_))));
    assert!(requests(&log).is_empty());
    Ok(())
}
