use crate::fragments::{SqlFragments, join_sql_fragments};
use crate::query_generator::QueryGenerator;
use crate::query_generator::options::{
    ConstraintType, ListSchemasOptions, ListTablesOptions, ShowConstraintsOptions,
};
use crate::table::TableReference;

pub(super) const VERSION: &str =
    "select service_level as \"version\" from TABLE (sysproc.env_get_inst_info()) as A";

fn constraint_code(kind: ConstraintType) -> &'static str {
    match kind {
        ConstraintType::Check => "K",
        ConstraintType::ForeignKey => "F",
        ConstraintType::PrimaryKey => "P",
        ConstraintType::Unique => "U",
        // Db2 has no catalogued DEFAULT constraints; the filter matches nothing.
        ConstraintType::Default => "D",
    }
}

pub(super) fn list_schemas(generator: &QueryGenerator, options: &ListSchemasOptions) -> String {
    join_sql_fragments([
        "SELECT SCHEMANAME AS \"schema\" FROM SYSCAT.SCHEMATA".to_string(),
        "WHERE (SCHEMANAME NOT LIKE 'SYS%')".to_string(),
        format!(
            "AND SCHEMANAME NOT IN ({})",
            generator.hidden_schemas(true, &options.skip)
        ),
    ])
}

pub(super) fn describe_table(generator: &QueryGenerator, table: &TableReference) -> String {
    join_sql_fragments([
        "SELECT NAME AS \"Name\", TBNAME AS \"Table\", TBCREATOR AS \"Schema\",".to_string(),
        "TRIM(COLTYPE) AS \"Type\", LENGTH AS \"Length\", SCALE AS \"Scale\",".to_string(),
        "NULLS AS \"IsNull\", DEFAULT AS \"Default\", COLNO AS \"Colno\",".to_string(),
        "IDENTITY AS \"IsIdentity\", KEYSEQ AS \"KeySeq\", REMARKS AS \"Comment\"".to_string(),
        "FROM SYSIBM.SYSCOLUMNS".to_string(),
        format!("WHERE TBNAME = {}", generator.escape(table.table_name())),
        format!(
            "AND TBCREATOR = {}",
            generator.schema_or_current(table.schema())
        ),
        "ORDER BY COLNO".to_string(),
    ])
}

pub(super) fn list_tables(generator: &QueryGenerator, options: &ListTablesOptions) -> String {
    let schema_filter = match &options.schema {
        Some(schema) => format!("AND TABSCHEMA = {}", generator.escape(schema)),
        None => format!(
            "AND TABSCHEMA NOT LIKE 'SYS%' AND TABSCHEMA NOT IN ({})",
            generator.hidden_schemas(false, &[])
        ),
    };
    join_sql_fragments([
        "SELECT TABNAME AS \"tableName\",".to_string(),
        "TRIM(TABSCHEMA) AS \"schema\"".to_string(),
        "FROM SYSCAT.TABLES".to_string(),
        "WHERE TYPE = 'T'".to_string(),
        schema_filter,
        "ORDER BY TABSCHEMA, TABNAME".to_string(),
    ])
}

pub(super) fn show_indexes(generator: &QueryGenerator, table: &TableReference) -> String {
    join_sql_fragments([
        "SELECT NAME AS \"name\", TBNAME AS \"tableName\", UNIQUERULE AS \"keyType\",".to_string(),
        "COLNAMES, INDEXTYPE AS \"type\" FROM SYSIBM.SYSINDEXES".to_string(),
        format!("WHERE TBNAME = {}", generator.escape(table.table_name())),
        format!(
            "AND TBCREATOR = {}",
            generator.schema_or_current(table.schema())
        ),
        "ORDER BY NAME".to_string(),
    ])
}

pub(super) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableReference,
    options: &ShowConstraintsOptions,
) -> String {
    SqlFragments::new()
        .push("SELECT c.TABSCHEMA AS \"constraintSchema\",")
        .push("c.CONSTNAME AS \"constraintName\",")
        .push(
            "CASE c.TYPE WHEN 'P' THEN 'PRIMARY KEY' WHEN 'F' THEN 'FOREIGN KEY' \
             WHEN 'K' THEN 'CHECK' WHEN 'U' THEN 'UNIQUE' ELSE NULL END AS \"constraintType\",",
        )
        .push("c.TABSCHEMA AS \"tableSchema\",")
        .push("c.TABNAME AS \"tableName\",")
        .push("k.COLNAME AS \"columnNames\"")
        .push("FROM SYSCAT.TABCONST c")
        .push("LEFT JOIN SYSCAT.KEYCOLUSE k")
        .push("ON c.CONSTNAME = k.CONSTNAME AND c.TABSCHEMA = k.TABSCHEMA AND c.TABNAME = k.TABNAME")
        .push(format!("WHERE c.TABNAME = {}", generator.escape(table.table_name())))
        .push(format!(
            "AND c.TABSCHEMA = {}",
            generator.schema_or_current(table.schema())
        ))
        .push_opt(
            options
                .constraint_type
                .map(|kind| format!("AND c.TYPE = {}", generator.escape(constraint_code(kind)))),
        )
        .push_opt(
            options
                .column_name
                .as_deref()
                .map(|column| format!("AND k.COLNAME = {}", generator.escape(column))),
        )
        .push_opt(
            options
                .constraint_name
                .as_deref()
                .map(|name| format!("AND c.CONSTNAME = {}", generator.escape(name))),
        )
        .push("ORDER BY c.CONSTNAME, k.COLSEQ")
        .join()
}

pub(super) fn table_exists(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "SELECT TABNAME FROM SYSCAT.TABLES WHERE TABSCHEMA = {} AND TABNAME = {}",
        generator.schema_or_current(table.schema()),
        generator.escape(table.table_name())
    )
}
