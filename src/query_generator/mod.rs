//! SQL text generation driven by a [`DialectCapabilities`] descriptor.
//!
//! Every method is a pure function of its arguments and the descriptor: nothing is executed
//! and no state is kept between calls. Options are validated before any SQL is built.

mod catalog;
mod ddl;
mod insert;
mod json;
mod naming;
mod options;
mod procedure;
mod transaction;

use std::sync::Arc;

pub use insert::{ColumnAssignments, ColumnValue, InsertQuery, InsertResultShape};
pub use json::{JsonPathSegment, build_json_path};
pub use naming::{generate_index_name, underscore};
pub use options::{
    AddIndexOptions, ConstraintType, DropSchemaOptions, DropTableOptions, IndexTarget,
    InsertOptions, IsolationLevel, ListSchemasOptions, ListTablesOptions, RemoveIndexOptions,
    Returning, ShowConstraintsOptions, StartTransactionOptions, TransactionType,
    reject_invalid_options,
};
pub use procedure::{ProcedureParameter, guarded_drop_block, identity_insert_procedure};

use crate::config::DialectConfig;
use crate::dialect::DialectCapabilities;
use crate::escape::{escape_string, escape_string_list, quote_identifier, quote_table};
use crate::table::TableReference;
use crate::types::DialectKind;

/// Builds dialect-specific SQL for engine-neutral operations.
///
/// Cheap to clone; the capabilities are shared.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    capabilities: Arc<DialectCapabilities>,
}

impl QueryGenerator {
    #[must_use]
    pub fn new(capabilities: Arc<DialectCapabilities>) -> Self {
        Self { capabilities }
    }

    #[must_use]
    pub fn for_dialect(kind: DialectKind) -> Self {
        Self::new(DialectCapabilities::for_dialect(kind).shared())
    }

    #[must_use]
    pub fn from_config(config: &DialectConfig) -> Self {
        Self::new(DialectCapabilities::from_config(config).shared())
    }

    #[must_use]
    pub fn capabilities(&self) -> &DialectCapabilities {
        &self.capabilities
    }

    #[must_use]
    pub fn dialect(&self) -> DialectKind {
        self.capabilities.kind
    }

    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(&self.capabilities, name)
    }

    #[must_use]
    pub fn quote_table(&self, table: &TableReference) -> String {
        quote_table(&self.capabilities, table)
    }

    /// String literal for an internal value (catalog names, filters).
    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        escape_string(&self.capabilities, value)
    }

    /// Escaped schema name, or the dialect's current-schema expression when absent.
    fn schema_or_current(&self, schema: Option<&str>) -> String {
        schema.map_or_else(
            || self.capabilities.current_schema.to_string(),
            |schema| self.escape(schema),
        )
    }

    /// Technical schemas plus `extra`, as a literal list for `NOT IN (...)`.
    fn hidden_schemas(&self, include_default: bool, extra: &[String]) -> String {
        let mut hidden: Vec<&str> = Vec::new();
        if include_default && let Some(default) = self.capabilities.default_schema {
            hidden.push(default);
        }
        hidden.extend(self.capabilities.technical_schemas.iter().map(String::as_str));
        hidden.extend(extra.iter().map(String::as_str));
        escape_string_list(&self.capabilities, &hidden)
    }

    fn emit(&self, operation: &'static str, sql: String) -> String {
        tracing::debug!(
            target: "sql_dialect",
            dialect = %self.capabilities.kind,
            operation,
            sql = %sql,
            "generated sql"
        );
        sql
    }
}
