//! `INFORMATION_SCHEMA` catalog shared by Postgres, SQL Server and MySQL.

use crate::fragments::{SqlFragments, join_sql_fragments};
use crate::query_generator::QueryGenerator;
use crate::query_generator::options::{ListSchemasOptions, ListTablesOptions, ShowConstraintsOptions};
use crate::table::TableReference;
use crate::types::DialectKind;

/// Postgres keeps its own catalogs (`pg_catalog`, `pg_toast`, ...) outside the technical list.
fn native_schema_filter(generator: &QueryGenerator, column: &str) -> Option<String> {
    (generator.dialect() == DialectKind::Postgres).then(|| format!("AND {column} !~ '^pg_'"))
}

fn alias(generator: &QueryGenerator, name: &str) -> String {
    generator.quote_identifier(name)
}

pub(super) fn list_schemas(generator: &QueryGenerator, options: &ListSchemasOptions) -> String {
    SqlFragments::new()
        .push(format!(
            "SELECT SCHEMA_NAME AS {}",
            alias(generator, "schema")
        ))
        .push("FROM INFORMATION_SCHEMA.SCHEMATA")
        .push(format!(
            "WHERE SCHEMA_NAME NOT IN ({})",
            generator.hidden_schemas(true, &options.skip)
        ))
        .push_opt(native_schema_filter(generator, "SCHEMA_NAME"))
        .join()
}

pub(super) fn describe_table(generator: &QueryGenerator, table: &TableReference) -> String {
    let is_primary_key = match generator.dialect() {
        DialectKind::Postgres => "PK.COLUMN_NAME IS NOT NULL",
        _ => "CASE WHEN PK.COLUMN_NAME IS NULL THEN 0 ELSE 1 END",
    };
    join_sql_fragments([
        "SELECT".to_string(),
        format!("C.COLUMN_NAME AS {},", alias(generator, "ColumnName")),
        format!("C.TABLE_NAME AS {},", alias(generator, "TableName")),
        format!("C.TABLE_SCHEMA AS {},", alias(generator, "SchemaName")),
        format!("C.DATA_TYPE AS {},", alias(generator, "DataTypeName")),
        format!("C.CHARACTER_MAXIMUM_LENGTH AS {},", alias(generator, "Length")),
        format!("C.NUMERIC_SCALE AS {},", alias(generator, "Scale")),
        format!("C.IS_NULLABLE AS {},", alias(generator, "IsNullable")),
        format!("C.COLUMN_DEFAULT AS {},", alias(generator, "DefaultValue")),
        format!("{is_primary_key} AS {}", alias(generator, "IsPrimaryKey")),
        "FROM INFORMATION_SCHEMA.COLUMNS C".to_string(),
        "LEFT JOIN".to_string(),
        "(SELECT KCU.TABLE_SCHEMA, KCU.TABLE_NAME, KCU.COLUMN_NAME".to_string(),
        "FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS TC".to_string(),
        "INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU".to_string(),
        "ON TC.CONSTRAINT_SCHEMA = KCU.CONSTRAINT_SCHEMA".to_string(),
        "AND TC.CONSTRAINT_NAME = KCU.CONSTRAINT_NAME".to_string(),
        "AND TC.TABLE_NAME = KCU.TABLE_NAME".to_string(),
        "WHERE TC.CONSTRAINT_TYPE = 'PRIMARY KEY') PK".to_string(),
        "ON C.TABLE_SCHEMA = PK.TABLE_SCHEMA".to_string(),
        "AND C.TABLE_NAME = PK.TABLE_NAME".to_string(),
        "AND C.COLUMN_NAME = PK.COLUMN_NAME".to_string(),
        format!("WHERE C.TABLE_NAME = {}", generator.escape(table.table_name())),
        format!(
            "AND C.TABLE_SCHEMA = {}",
            generator.schema_or_current(table.schema())
        ),
        "ORDER BY C.ORDINAL_POSITION".to_string(),
    ])
}

pub(super) fn list_tables(generator: &QueryGenerator, options: &ListTablesOptions) -> String {
    let schema_filter = match &options.schema {
        Some(schema) => format!("AND TABLE_SCHEMA = {}", generator.escape(schema)),
        None => format!(
            "AND TABLE_SCHEMA NOT IN ({})",
            generator.hidden_schemas(false, &[])
        ),
    };
    SqlFragments::new()
        .push(format!(
            "SELECT TABLE_NAME AS {},",
            alias(generator, "tableName")
        ))
        .push(format!("TABLE_SCHEMA AS {}", alias(generator, "schema")))
        .push("FROM INFORMATION_SCHEMA.TABLES")
        .push("WHERE TABLE_TYPE = 'BASE TABLE'")
        .push(schema_filter)
        .push_opt(
            options
                .schema
                .is_none()
                .then(|| native_schema_filter(generator, "TABLE_SCHEMA"))
                .flatten(),
        )
        .push("ORDER BY TABLE_SCHEMA, TABLE_NAME")
        .join()
}

pub(super) fn show_indexes_postgres(generator: &QueryGenerator, table: &TableReference) -> String {
    join_sql_fragments([
        "SELECT I.INDEXNAME AS \"name\",".to_string(),
        "I.TABLENAME AS \"tableName\",".to_string(),
        "I.SCHEMANAME AS \"schemaName\",".to_string(),
        "I.INDEXDEF AS \"definition\"".to_string(),
        "FROM PG_INDEXES I".to_string(),
        format!("WHERE I.TABLENAME = {}", generator.escape(table.table_name())),
        format!(
            "AND I.SCHEMANAME = {}",
            generator.schema_or_current(table.schema())
        ),
        "ORDER BY I.INDEXNAME".to_string(),
    ])
}

pub(super) fn show_indexes_mssql(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "EXEC sys.sp_helpindex @objname = {};",
        generator.escape(&generator.quote_table(table))
    )
}

pub(super) fn show_indexes_mysql(generator: &QueryGenerator, table: &TableReference) -> String {
    format!("SHOW INDEX FROM {};", generator.quote_table(table))
}

pub(super) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableReference,
    options: &ShowConstraintsOptions,
) -> String {
    SqlFragments::new()
        .push(format!(
            "SELECT TC.CONSTRAINT_SCHEMA AS {},",
            alias(generator, "constraintSchema")
        ))
        .push(format!(
            "TC.CONSTRAINT_NAME AS {},",
            alias(generator, "constraintName")
        ))
        .push(format!(
            "TC.CONSTRAINT_TYPE AS {},",
            alias(generator, "constraintType")
        ))
        .push(format!("TC.TABLE_SCHEMA AS {},", alias(generator, "tableSchema")))
        .push(format!("TC.TABLE_NAME AS {},", alias(generator, "tableName")))
        .push(format!("KCU.COLUMN_NAME AS {}", alias(generator, "columnNames")))
        .push("FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS TC")
        .push("LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU")
        .push("ON TC.CONSTRAINT_SCHEMA = KCU.CONSTRAINT_SCHEMA")
        .push("AND TC.CONSTRAINT_NAME = KCU.CONSTRAINT_NAME")
        .push("AND TC.TABLE_NAME = KCU.TABLE_NAME")
        .push(format!(
            "WHERE TC.TABLE_NAME = {}",
            generator.escape(table.table_name())
        ))
        .push(format!(
            "AND TC.TABLE_SCHEMA = {}",
            generator.schema_or_current(table.schema())
        ))
        .push_opt(
            options
                .constraint_type
                .map(|kind| format!("AND TC.CONSTRAINT_TYPE = {}", generator.escape(kind.as_sql()))),
        )
        .push_opt(
            options
                .column_name
                .as_deref()
                .map(|column| format!("AND KCU.COLUMN_NAME = {}", generator.escape(column))),
        )
        .push_opt(
            options
                .constraint_name
                .as_deref()
                .map(|name| format!("AND TC.CONSTRAINT_NAME = {}", generator.escape(name))),
        )
        .push("ORDER BY TC.CONSTRAINT_NAME, KCU.ORDINAL_POSITION")
        .join()
}

pub(super) fn table_exists(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}",
        generator.schema_or_current(table.schema()),
        generator.escape(table.table_name())
    )
}
