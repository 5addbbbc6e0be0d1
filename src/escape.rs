//! Identifier quoting and literal escaping.
//!
//! Only values the crate itself controls (catalog names, schema filters, constants) are ever
//! inlined through [`escape_literal`]. Caller data goes through the bind resolver.

use crate::dialect::DialectCapabilities;
use crate::table::TableReference;

/// A value that may be written into SQL text directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqlLiteral<'a> {
    Text(&'a str),
    Int(i64),
    Bool(bool),
    Null,
}

/// Wrap `name` in the dialect's identifier quotes, doubling any embedded closing quote.
#[must_use]
pub fn quote_identifier(capabilities: &DialectCapabilities, name: &str) -> String {
    let (open, close) = capabilities.identifier_quotes;
    let mut out = String::with_capacity(name.len() + 2);
    out.push(open);
    for c in name.chars() {
        if c == close {
            out.push(close);
        }
        out.push(c);
    }
    out.push(close);
    out
}

/// Quote a table, qualifying it with its schema when the dialect has schemas.
///
/// Dialects without schemas fold the schema into the table name (`` `schema.table` ``).
#[must_use]
pub fn quote_table(capabilities: &DialectCapabilities, table: &TableReference) -> String {
    match table.schema() {
        Some(schema) if capabilities.supports_schemas => format!(
            "{}.{}",
            quote_identifier(capabilities, schema),
            quote_identifier(capabilities, table.table_name())
        ),
        Some(schema) => {
            quote_identifier(capabilities, &format!("{schema}.{}", table.table_name()))
        }
        None => quote_identifier(capabilities, table.table_name()),
    }
}

/// Single-quoted string literal.
#[must_use]
pub fn escape_string(capabilities: &DialectCapabilities, value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' if capabilities.backslash_escapes => out.push_str("\\\\"),
            '\0' if capabilities.backslash_escapes => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[must_use]
pub fn escape_literal(capabilities: &DialectCapabilities, literal: SqlLiteral<'_>) -> String {
    match literal {
        SqlLiteral::Text(value) => escape_string(capabilities, value),
        SqlLiteral::Int(value) => value.to_string(),
        SqlLiteral::Bool(true) => capabilities.boolean_literals.0.to_string(),
        SqlLiteral::Bool(false) => capabilities.boolean_literals.1.to_string(),
        SqlLiteral::Null => "NULL".to_string(),
    }
}

/// Comma-separated string literals, as used in `NOT IN (...)` filters.
#[must_use]
pub fn escape_string_list<S: AsRef<str>>(capabilities: &DialectCapabilities, values: &[S]) -> String {
    values
        .iter()
        .map(|value| escape_string(capabilities, value.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
