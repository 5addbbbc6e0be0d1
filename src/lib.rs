//! Dialect-aware SQL generation for Postgres, SQLite, SQL Server, MySQL, Db2 and HANA.
//!
//! A [`QueryGenerator`] turns engine-neutral operations (insert, introspection, DDL,
//! transaction control) into SQL text for one dialect, described by a
//! [`DialectCapabilities`] value. Nothing here opens a connection: statements are handed to an
//! [`SqlExecutor`] supplied by the caller, and the [`TransactionController`] only drives the
//! transaction lifecycle through that executor and the connection's autocommit switch.

pub mod bind;
pub mod config;
pub mod dialect;
pub mod escape;
pub mod executor;
pub mod prelude;
pub mod query_generator;
pub mod transaction;
pub mod translation;

mod error;
mod fragments;
mod query_interface;
mod results;
mod table;
mod tx_outcome;
mod types;

pub use bind::{BindCollection, RESERVED_BIND_PREFIX, Replacements};
pub use config::DialectConfig;
pub use dialect::DialectCapabilities;
pub use error::{CollaboratorError, SqlDialectError};
pub use executor::{QueryKind, SqlExecutor, SqlRequest};
pub use fragments::{SqlFragments, join_sql_fragments};
pub use query_generator::QueryGenerator;
pub use query_interface::{InsertResult, QueryInterface};
pub use results::{ResultRow, ResultSet};
pub use table::TableReference;
pub use transaction::{
    SharedConnection, Transaction, TransactionConnection, TransactionController, TransactionState,
};
pub use translation::{FinalParams, FinalQuery, PlaceholderStyle, finalize_query};
pub use tx_outcome::TxOutcome;
pub use types::{BindValue, DialectKind};
