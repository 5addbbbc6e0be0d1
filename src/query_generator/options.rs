//! Per-method option structs and the check that rejects options a dialect cannot honour.

use crate::bind::{BindCollection, Replacements};
use crate::dialect::DialectCapabilities;
use crate::error::SqlDialectError;

/// Verify every provided option is known to `method` and supported by the dialect.
///
/// `supportable` lists the options the method understands on any dialect; `supported` the ones
/// this dialect implements. Runs before any SQL is produced.
///
/// # Errors
/// [`SqlDialectError::InvalidOption`] for an option the method never accepts,
/// [`SqlDialectError::UnsupportedOption`] listing every option the dialect lacks.
pub fn reject_invalid_options(
    method: &'static str,
    capabilities: &DialectCapabilities,
    supportable: &[&'static str],
    supported: &[&'static str],
    provided: &[&'static str],
) -> Result<(), SqlDialectError> {
    if let Some(&option) = provided.iter().find(|option| !supportable.contains(option)) {
        return Err(SqlDialectError::InvalidOption { method, option });
    }

    let unsupported: Vec<&'static str> = provided
        .iter()
        .filter(|option| !supported.contains(option))
        .copied()
        .collect();

    if unsupported.is_empty() {
        Ok(())
    } else {
        Err(SqlDialectError::UnsupportedOption {
            method,
            dialect: capabilities.name(),
            options: unsupported,
        })
    }
}

fn flags(pairs: &[(bool, &'static str)]) -> Vec<&'static str> {
    pairs
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| *name)
        .collect()
}

/// Columns an INSERT should hand back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Returning {
    #[default]
    None,
    All,
    /// Column names. Always quoted as identifiers, never scanned for placeholders.
    Columns(Vec<String>),
}

impl Returning {
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Returning::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// An empty column list requests nothing.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        match self {
            Returning::None => false,
            Returning::All => true,
            Returning::Columns(columns) => !columns.is_empty(),
        }
    }
}

/// Options for [`QueryGenerator::insert_query`](super::QueryGenerator::insert_query).
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    pub returning: Returning,
    /// Auto-generated key to hand back. Engines without a returning clause select it from a
    /// synthesized procedure or with `LAST_INSERT_ID()`.
    pub primary_key: Option<String>,
    pub bind: Option<BindCollection>,
    pub replacements: Option<Replacements>,
    pub ignore_duplicates: bool,
}

impl InsertOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] = &["returning", "ignoreDuplicates"];

    #[must_use]
    pub fn returning(mut self, returning: Returning) -> Self {
        self.returning = returning;
        self
    }

    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    #[must_use]
    pub fn bind(mut self, bind: BindCollection) -> Self {
        self.bind = Some(bind);
        self
    }

    #[must_use]
    pub fn replacements(mut self, replacements: Replacements) -> Self {
        self.replacements = Some(replacements);
        self
    }

    #[must_use]
    pub fn ignore_duplicates(mut self, ignore: bool) -> Self {
        self.ignore_duplicates = ignore;
        self
    }

    pub(crate) fn provided(&self) -> Vec<&'static str> {
        flags(&[
            (self.returning.is_requested(), "returning"),
            (self.ignore_duplicates, "ignoreDuplicates"),
        ])
    }

    pub(crate) fn supported(capabilities: &DialectCapabilities) -> Vec<&'static str> {
        flags(&[
            (capabilities.supports_returning(), "returning"),
            (capabilities.ignore_duplicates.is_some(), "ignoreDuplicates"),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSchemasOptions {
    /// Schemas hidden in addition to the dialect's technical schemas.
    pub skip: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTablesOptions {
    /// Restrict the listing to one schema instead of hiding technical schemas.
    pub schema: Option<String>,
}

impl ListTablesOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] = &["schema"];

    pub(crate) fn provided(&self) -> Vec<&'static str> {
        flags(&[(self.schema.is_some(), "schema")])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    Check,
    Default,
    ForeignKey,
    PrimaryKey,
    Unique,
}

impl ConstraintType {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            ConstraintType::Check => "CHECK",
            ConstraintType::Default => "DEFAULT",
            ConstraintType::ForeignKey => "FOREIGN KEY",
            ConstraintType::PrimaryKey => "PRIMARY KEY",
            ConstraintType::Unique => "UNIQUE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowConstraintsOptions {
    pub constraint_type: Option<ConstraintType>,
    pub column_name: Option<String>,
    pub constraint_name: Option<String>,
}

impl ShowConstraintsOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] =
        &["constraintType", "columnName", "constraintName"];

    pub(crate) fn provided(&self) -> Vec<&'static str> {
        flags(&[
            (self.constraint_type.is_some(), "constraintType"),
            (self.column_name.is_some(), "columnName"),
            (self.constraint_name.is_some(), "constraintName"),
        ])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTableOptions {
    pub cascade: bool,
}

impl DropTableOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] = &["cascade"];

    pub(crate) fn provided(self) -> Vec<&'static str> {
        flags(&[(self.cascade, "cascade")])
    }

    pub(crate) fn supported(capabilities: &DialectCapabilities) -> Vec<&'static str> {
        flags(&[(capabilities.drop_table.cascade, "cascade")])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropSchemaOptions {
    pub cascade: bool,
}

impl DropSchemaOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] = &["cascade"];

    pub(crate) fn provided(self) -> Vec<&'static str> {
        flags(&[(self.cascade, "cascade")])
    }

    pub(crate) fn supported(capabilities: &DialectCapabilities) -> Vec<&'static str> {
        flags(&[(capabilities.drop_schema.cascade, "cascade")])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddIndexOptions {
    /// Explicit index name; derived from the table and columns when absent.
    pub name: Option<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveIndexOptions {
    pub if_exists: bool,
    pub cascade: bool,
    pub concurrently: bool,
}

impl RemoveIndexOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] =
        &["ifExists", "cascade", "concurrently"];

    pub(crate) fn provided(self) -> Vec<&'static str> {
        flags(&[
            (self.if_exists, "ifExists"),
            (self.cascade, "cascade"),
            (self.concurrently, "concurrently"),
        ])
    }

    pub(crate) fn supported(capabilities: &DialectCapabilities) -> Vec<&'static str> {
        let support = capabilities.remove_index;
        flags(&[
            (support.if_exists, "ifExists"),
            (support.cascade, "cascade"),
            (support.concurrently, "concurrently"),
        ])
    }
}

/// Which index `remove_index_query` drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    Name(String),
    /// Columns of a non-unique index created without an explicit name.
    Columns(Vec<String>),
    /// Columns of a unique index created without an explicit name.
    UniqueColumns(Vec<String>),
}

impl IndexTarget {
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexTarget::Columns(columns.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for IndexTarget {
    fn from(name: &str) -> Self {
        IndexTarget::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// `SQLite` lock acquisition mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionType {
    #[default]
    Deferred,
    Immediate,
    Exclusive,
}

impl TransactionType {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            TransactionType::Deferred => "DEFERRED",
            TransactionType::Immediate => "IMMEDIATE",
            TransactionType::Exclusive => "EXCLUSIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartTransactionOptions {
    pub read_only: bool,
    pub isolation_level: Option<IsolationLevel>,
    pub transaction_type: Option<TransactionType>,
}

impl StartTransactionOptions {
    pub(crate) const SUPPORTABLE: &'static [&'static str] =
        &["readOnly", "isolationLevel", "transactionType"];

    pub(crate) fn provided(self) -> Vec<&'static str> {
        flags(&[
            (self.read_only, "readOnly"),
            (self.isolation_level.is_some(), "isolationLevel"),
            (self.transaction_type.is_some(), "transactionType"),
        ])
    }

    pub(crate) fn supported(capabilities: &DialectCapabilities) -> Vec<&'static str> {
        let syntax = capabilities.transactions;
        flags(&[
            (syntax.read_only, "readOnly"),
            (syntax.isolation_level, "isolationLevel"),
            (syntax.transaction_type, "transactionType"),
        ])
    }
}
