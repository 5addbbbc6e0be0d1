mod common;

use common::{RecordingExecutor, interface, new_log, requests, statements};
use sql_dialect::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn drop_without_if_exists_is_guarded_in_sql() -> Result<(), Box<dyn std::error::Error>> {
    let hana = QueryGenerator::for_dialect(DialectKind::Hana);
    let sql = hana.drop_table_query(
        &TableReference::parse("APP.Users")?,
        DropTableOptions::default(),
    )?;
    assert_eq!(
        sql,
        "DO BEGIN DECLARE table_count INTEGER; SELECT COUNT(*) INTO table_count FROM TABLES \
         WHERE TABLE_NAME = 'Users' AND SCHEMA_NAME = 'APP'; \
         IF :table_count > 0 THEN EXEC 'DROP TABLE \"APP\".\"Users\"'; END IF; END;"
    );

    for kind in [DialectKind::Postgres, DialectKind::Sqlite, DialectKind::Mssql, DialectKind::Mysql] {
        let sql = QueryGenerator::for_dialect(kind)
            .drop_table_query(&TableReference::parse("Users")?, DropTableOptions::default())?;
        assert!(sql.starts_with("DROP TABLE IF EXISTS "), "{kind}: {sql}");
    }
    Ok(())
}

#[test]
fn cascade_only_where_declared() {
    let users = TableReference::parse("Users").unwrap();
    let cascade = DropTableOptions { cascade: true };
    for kind in [DialectKind::Postgres, DialectKind::Hana] {
        assert!(
            QueryGenerator::for_dialect(kind)
                .drop_table_query(&users, cascade)
                .is_ok(),
            "{kind}"
        );
    }
    for kind in [DialectKind::Sqlite, DialectKind::Mssql, DialectKind::Mysql, DialectKind::Db2] {
        let err = QueryGenerator::for_dialect(kind)
            .drop_table_query(&users, cascade)
            .unwrap_err();
        assert!(
            matches!(
                err,
                SqlDialectError::UnsupportedOption { method: "dropTableQuery", ref options, .. }
                    if options == &vec!["cascade"]
            ),
            "{kind}: {err}"
        );
    }
}

#[test]
fn rejected_drop_sends_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let rt = Runtime::new()?;
    let outcome = rt.block_on(async {
        let mut qi = interface(DialectKind::Mssql, RecordingExecutor::new(&log));
        qi.drop_table("Users", DropTableOptions { cascade: true }).await
    });
    assert!(outcome.is_err());
    assert!(requests(&log).is_empty());
    Ok(())
}

#[test]
fn index_created_by_columns_is_removed_by_columns() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut qi = interface(DialectKind::Postgres, RecordingExecutor::new(&log));
        let unique = AddIndexOptions {
            name: None,
            unique: true,
        };
        qi.add_index("app.Users", &["email"], &unique).await?;
        qi.remove_index(
            "app.Users",
            &IndexTarget::UniqueColumns(vec!["email".into()]),
            RemoveIndexOptions::default(),
        )
        .await?;
        Ok::<(), SqlDialectError>(())
    })?;

    assert_eq!(
        statements(&log),
        vec![
            "CREATE UNIQUE INDEX \"users_email_unique\" ON \"app\".\"Users\" (\"email\");".to_string(),
            "DROP INDEX \"app\".\"users_email_unique\";".to_string(),
        ]
    );
    assert!(requests(&log).iter().all(|r| r.kind == QueryKind::Schema));
    Ok(())
}

#[test]
fn sql_server_drops_index_on_its_table() -> Result<(), Box<dyn std::error::Error>> {
    let mssql = QueryGenerator::for_dialect(DialectKind::Mssql);
    let sql = mssql.remove_index_query(
        &TableReference::parse("dbo.Users")?,
        &IndexTarget::columns(["lastName", "firstName"]),
        RemoveIndexOptions {
            if_exists: true,
            ..RemoveIndexOptions::default()
        },
    )?;
    assert_eq!(
        sql,
        "DROP INDEX IF EXISTS [users_last_name_first_name] ON [dbo].[Users];"
    );
    Ok(())
}

#[test]
fn index_removal_names_every_unsupported_option() {
    let db2 = QueryGenerator::for_dialect(DialectKind::Db2);
    let err = db2
        .remove_index_query(
            &TableReference::parse("Users").unwrap(),
            &IndexTarget::from("users_email"),
            RemoveIndexOptions {
                if_exists: true,
                cascade: true,
                concurrently: true,
            },
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "removeIndexQuery was called with options that db2 does not support: ifExists, cascade, concurrently"
    );
}

#[test]
fn schema_drop_and_foreign_key_checks() -> Result<(), Box<dyn std::error::Error>> {
    let log = new_log();
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut qi = interface(DialectKind::Mysql, RecordingExecutor::new(&log));
        qi.toggle_foreign_key_checks(false).await?;
        qi.drop_schema("staging", DropSchemaOptions::default()).await?;
        qi.toggle_foreign_key_checks(true).await?;
        Ok::<(), SqlDialectError>(())
    })?;
    assert_eq!(
        statements(&log),
        vec![
            "SET FOREIGN_KEY_CHECKS=0;".to_string(),
            "DROP SCHEMA IF EXISTS `staging`;".to_string(),
            "SET FOREIGN_KEY_CHECKS=1;".to_string(),
        ]
    );
    Ok(())
}
