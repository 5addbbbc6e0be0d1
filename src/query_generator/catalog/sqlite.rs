use crate::query_generator::QueryGenerator;
use crate::table::TableReference;

pub(super) const VERSION: &str = "SELECT sqlite_version() as `version`";

pub(super) fn describe_table(generator: &QueryGenerator, table: &TableReference) -> String {
    format!("PRAGMA TABLE_INFO({});", generator.quote_table(table))
}

pub(super) fn list_tables() -> String {
    "SELECT name AS `tableName` FROM sqlite_master WHERE type='table' AND name != 'sqlite_sequence';"
        .to_string()
}

pub(super) fn show_indexes(generator: &QueryGenerator, table: &TableReference) -> String {
    format!("PRAGMA INDEX_LIST({})", generator.quote_table(table))
}

/// `SQLite` keeps constraints only in the table's DDL.
pub(super) fn show_constraints(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "SELECT sql FROM sqlite_master WHERE tbl_name = {}",
        generator.escape(&folded_name(table))
    )
}

pub(super) fn table_exists(generator: &QueryGenerator, table: &TableReference) -> String {
    format!(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = {}",
        generator.escape(&folded_name(table))
    )
}

/// Name the table is stored under once a schema has been folded into it.
fn folded_name(table: &TableReference) -> String {
    match table.schema() {
        Some(schema) => format!("{schema}.{}", table.table_name()),
        None => table.table_name().to_string(),
    }
}
