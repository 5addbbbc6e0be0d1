use lazy_static::lazy_static;
use regex::Regex;

use crate::table::TableReference;

lazy_static! {
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
}

/// `firstName` -> `first_name`, `HTTPServer` -> `http_server`, `a-b` -> `a_b`.
#[must_use]
pub fn underscore(name: &str) -> String {
    let split = ACRONYM_BOUNDARY.replace_all(name, "${1}_${2}");
    let split = CAMEL_BOUNDARY.replace_all(&split, "${1}_${2}");
    split.replace('-', "_").to_lowercase()
}

/// Name an index built without an explicit name gets.
///
/// Depends only on the table name (not its schema), the columns and uniqueness, so dropping
/// by columns finds the index that creating by the same columns produced.
#[must_use]
pub fn generate_index_name<S: AsRef<str>>(
    table: &TableReference,
    columns: &[S],
    unique: bool,
) -> String {
    let mut name = table.table_name().to_string();
    for column in columns {
        name.push('_');
        name.push_str(column.as_ref());
    }
    if unique {
        name.push_str("_unique");
    }
    underscore(&name)
}
