use crate::error::SqlDialectError;
use crate::fragments::join_sql_fragments;
use crate::query_generator::QueryGenerator;
use crate::query_generator::options::{
    ConstraintType, ListSchemasOptions, ListTablesOptions, ShowConstraintsOptions,
};
use crate::table::TableReference;

pub(super) const VERSION: &str = "SELECT \"VALUE\" AS \"version\" FROM SYS.M_SYSTEM_OVERVIEW \
     WHERE \"SECTION\" = 'System' and \"NAME\" = 'Version';";

pub(super) fn list_schemas(generator: &QueryGenerator, options: &ListSchemasOptions) -> String {
    join_sql_fragments([
        "SELECT SCHEMA_NAME AS \"schema\"".to_string(),
        "FROM SYS.SCHEMAS".to_string(),
        "WHERE SCHEMA_NAME != 'SYS' AND SCHEMA_NAME != 'PUBLIC' AND SCHEMA_NAME NOT LIKE '_SYS%'"
            .to_string(),
        format!(
            "AND SCHEMA_NAME NOT IN ({})",
            generator.hidden_schemas(false, &options.skip)
        ),
    ])
}

pub(super) fn describe_table(generator: &QueryGenerator, table: &TableReference) -> String {
    join_sql_fragments([
        "SELECT".to_string(),
        "SYS.TABLE_COLUMNS.COLUMN_NAME AS \"ColumnName\",".to_string(),
        "SYS.TABLE_COLUMNS.TABLE_NAME AS \"TableName\",".to_string(),
        "SYS.TABLE_COLUMNS.SCHEMA_NAME AS \"SchemaName\",".to_string(),
        "SYS.TABLE_COLUMNS.DATA_TYPE_NAME AS \"DataTypeName\",".to_string(),
        "SYS.TABLE_COLUMNS.LENGTH AS \"Length\",".to_string(),
        "SYS.TABLE_COLUMNS.SCALE AS \"Scale\",".to_string(),
        "SYS.TABLE_COLUMNS.IS_NULLABLE AS \"IsNullable\",".to_string(),
        "SYS.TABLE_COLUMNS.DEFAULT_VALUE AS \"DefaultValue\",".to_string(),
        "SYS.TABLE_COLUMNS.GENERATION_TYPE AS \"GenerationType\",".to_string(),
        "pk.IS_PRIMARY_KEY AS \"IsPrimaryKey\",".to_string(),
        "SYS.TABLE_COLUMNS.COMMENTS AS \"Comments\"".to_string(),
        "FROM SYS.TABLE_COLUMNS".to_string(),
        "LEFT JOIN".to_string(),
        "(SELECT SCHEMA_NAME, TABLE_NAME, COLUMN_NAME, IS_PRIMARY_KEY".to_string(),
        "FROM SYS.CONSTRAINTS WHERE IS_PRIMARY_KEY = 'TRUE') pk".to_string(),
        "ON SYS.TABLE_COLUMNS.SCHEMA_NAME = pk.SCHEMA_NAME".to_string(),
        "AND SYS.TABLE_COLUMNS.TABLE_NAME = pk.TABLE_NAME".to_string(),
        "AND SYS.TABLE_COLUMNS.COLUMN_NAME = pk.COLUMN_NAME".to_string(),
        format!(
            "WHERE SYS.TABLE_COLUMNS.TABLE_NAME = {}",
            generator.escape(table.table_name())
        ),
        format!(
            "AND SYS.TABLE_COLUMNS.SCHEMA_NAME = {}",
            generator.schema_or_current(table.schema())
        ),
    ])
}

pub(super) fn list_tables(generator: &QueryGenerator, options: &ListTablesOptions) -> String {
    let schema_filter = match &options.schema {
        Some(schema) => format!("AND SCHEMA_NAME = {}", generator.escape(schema)),
        None => format!(
            "AND SCHEMA_NAME NOT IN ({})",
            generator.hidden_schemas(false, &[])
        ),
    };
    join_sql_fragments([
        "SELECT TABLE_NAME AS \"tableName\",".to_string(),
        "SCHEMA_NAME AS \"schema\"".to_string(),
        "FROM SYS.TABLES".to_string(),
        "WHERE SCHEMA_NAME != 'SYS' AND SCHEMA_NAME NOT LIKE '_SYS%'".to_string(),
        schema_filter,
        "ORDER BY SCHEMA_NAME, TABLE_NAME".to_string(),
    ])
}

pub(super) fn show_indexes(generator: &QueryGenerator, table: &TableReference) -> String {
    join_sql_fragments([
        "SELECT".to_string(),
        "SYS.INDEXES.SCHEMA_NAME AS \"schemaName\",".to_string(),
        "SYS.INDEXES.TABLE_NAME AS \"tableName\",".to_string(),
        "SYS.INDEXES.INDEX_NAME AS \"name\",".to_string(),
        "SYS.INDEXES.INDEX_TYPE AS \"type\",".to_string(),
        "SYS.INDEXES.CONSTRAINT AS \"constraint\",".to_string(),
        "SYS.INDEX_COLUMNS.COLUMN_NAME AS \"columnName\",".to_string(),
        "SYS.INDEX_COLUMNS.POSITION AS \"position\",".to_string(),
        "SYS.INDEX_COLUMNS.ASCENDING_ORDER AS \"ascendingOrder\"".to_string(),
        "FROM SYS.INDEXES".to_string(),
        "INNER JOIN SYS.INDEX_COLUMNS".to_string(),
        "ON SYS.INDEXES.SCHEMA_NAME = SYS.INDEX_COLUMNS.SCHEMA_NAME".to_string(),
        "AND SYS.INDEXES.TABLE_NAME = SYS.INDEX_COLUMNS.TABLE_NAME".to_string(),
        "AND SYS.INDEXES.INDEX_NAME = SYS.INDEX_COLUMNS.INDEX_NAME".to_string(),
        format!(
            "WHERE SYS.INDEXES.SCHEMA_NAME = {}",
            generator.schema_or_current(table.schema())
        ),
        format!(
            "AND SYS.INDEXES.TABLE_NAME = {}",
            generator.escape(table.table_name())
        ),
    ])
}

/// Only referential constraints are exposed through a single view.
pub(super) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableReference,
    options: &ShowConstraintsOptions,
) -> Result<String, SqlDialectError> {
    if let Some(kind) = options.constraint_type
        && kind != ConstraintType::ForeignKey
    {
        return Err(SqlDialectError::Unimplemented(format!(
            "showConstraintsQuery for {} constraints on hana",
            kind.as_sql()
        )));
    }

    Ok(join_sql_fragments([
        "SELECT SCHEMA_NAME AS \"constraintSchema\",".to_string(),
        "CONSTRAINT_NAME AS \"constraintName\",".to_string(),
        "'FOREIGN KEY' AS \"constraintType\",".to_string(),
        "SCHEMA_NAME AS \"tableSchema\",".to_string(),
        "TABLE_NAME AS \"tableName\",".to_string(),
        "COLUMN_NAME AS \"columnNames\",".to_string(),
        "REFERENCED_SCHEMA_NAME AS \"referencedTableSchema\",".to_string(),
        "REFERENCED_TABLE_NAME AS \"referencedTableName\",".to_string(),
        "REFERENCED_COLUMN_NAME AS \"referencedColumnNames\",".to_string(),
        "DELETE_RULE AS \"deleteAction\",".to_string(),
        "UPDATE_RULE AS \"updateAction\"".to_string(),
        "FROM SYS.REFERENTIAL_CONSTRAINTS".to_string(),
        format!("WHERE TABLE_NAME = {}", generator.escape(table.table_name())),
        format!(
            "AND SCHEMA_NAME = {}",
            generator.schema_or_current(table.schema())
        ),
        options
            .column_name
            .as_deref()
            .map(|column| format!("AND COLUMN_NAME = {}", generator.escape(column)))
            .unwrap_or_default(),
        options
            .constraint_name
            .as_deref()
            .map(|name| format!("AND CONSTRAINT_NAME = {}", generator.escape(name)))
            .unwrap_or_default(),
        "ORDER BY CONSTRAINT_NAME, POSITION".to_string(),
    ]))
}

pub(super) fn table_exists(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "SELECT TABLE_NAME FROM \"SYS\".\"TABLES\" WHERE SCHEMA_NAME = {} AND TABLE_NAME = {}",
        generator.schema_or_current(table.schema()),
        generator.escape(table.table_name())
    )
}
