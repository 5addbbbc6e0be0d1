//! Convenient imports for common functionality.
//!
//! This module re-exports the types most callers need to generate and run statements.

pub use crate::bind::{BindCollection, Replacements};
pub use crate::config::DialectConfig;
pub use crate::dialect::DialectCapabilities;
pub use crate::error::SqlDialectError;
pub use crate::executor::{QueryKind, SqlExecutor, SqlRequest};
pub use crate::query_generator::{
    AddIndexOptions, ColumnAssignments, ColumnValue, ConstraintType, DropSchemaOptions,
    DropTableOptions, IndexTarget, InsertOptions, InsertQuery, InsertResultShape, IsolationLevel,
    JsonPathSegment, ListSchemasOptions, ListTablesOptions, QueryGenerator, RemoveIndexOptions,
    Returning, ShowConstraintsOptions, StartTransactionOptions, TransactionType,
};
pub use crate::query_interface::{InsertResult, QueryInterface};
pub use crate::results::{ResultRow, ResultSet};
pub use crate::table::TableReference;
pub use crate::transaction::{
    SharedConnection, Transaction, TransactionConnection, TransactionState,
};
pub use crate::translation::{FinalParams, FinalQuery, PlaceholderStyle, finalize_query};
pub use crate::tx_outcome::TxOutcome;
pub use crate::types::{BindValue, DialectKind};
