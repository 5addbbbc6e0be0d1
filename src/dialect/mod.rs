//! Per-engine capability descriptors.
//!
//! A [`DialectCapabilities`] value is the only thing the generator consults when SQL has to
//! differ between engines. Presets are built once and shared; a [`DialectConfig`] can extend
//! them (extra technical schemas, a placeholder override) without touching the presets.
//!
//! [`DialectConfig`]: crate::config::DialectConfig

mod presets;

use std::sync::Arc;

use crate::config::DialectConfig;
use crate::translation::PlaceholderStyle;
use crate::types::DialectKind;

/// How a dialect returns values produced by an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningStyle {
    /// `INSERT ... RETURNING "col"`
    Returning,
    /// `INSERT ... OUTPUT INSERTED.[col] VALUES ...`
    OutputInserted,
    /// `SELECT * FROM FINAL TABLE (INSERT ...)`
    FinalTable,
    /// No returning clause; a procedure reads the session's last identity value instead.
    IdentityProcedure,
    /// No returning clause; only a generated key can be read back, with `LAST_INSERT_ID()`.
    LastInsertId,
}

/// What to emit for an INSERT without columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInsertStyle {
    /// `INSERT INTO t DEFAULT VALUES`
    DefaultValues,
    /// `INSERT INTO t () VALUES ()`
    EmptyColumnList,
    Unsupported,
}

/// How duplicate rows are skipped when `ignore_duplicates` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreDuplicatesStyle {
    /// `INSERT IGNORE INTO`
    InsertIgnore,
    /// `INSERT OR IGNORE INTO`
    InsertOrIgnore,
    /// `... ON CONFLICT DO NOTHING`
    OnConflictDoNothing,
}

/// How a value is read out of a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonExtractionStyle {
    /// `doc->'a'`, `doc#>ARRAY['a','0']::VARCHAR(255)[]`; `->>` / `#>>` unquote.
    PathOperators,
    /// `doc->'$.a'`; `->>` unquotes.
    ArrowJsonPath,
    /// `json_extract(doc,'$.a')`, wrapped in `json_unquote(...)` to unquote.
    ExtractFunction,
    /// `JSON_QUERY(doc, '$.a')`; `JSON_VALUE` unquotes.
    SqlStandard,
}

/// How a root transaction is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginStyle {
    /// `START TRANSACTION;`
    StartTransaction,
    /// `BEGIN DEFERRED TRANSACTION;`
    Begin,
    /// `BEGIN TRANSACTION;`
    BeginTransaction,
    /// The transaction opens when autocommit is switched off; no SQL is sent.
    Implicit,
}

/// Savepoint grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavepointStyle {
    /// `SAVEPOINT "x";` / `ROLLBACK TO SAVEPOINT "x";`
    Standard,
    /// `SAVEPOINT "x" ON ROLLBACK RETAIN CURSORS;`
    Db2,
    /// `SAVE TRANSACTION [x];` / `ROLLBACK TRANSACTION [x];`
    SqlServer,
}

/// Guarded procedural block used when `DROP TABLE IF EXISTS` is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedDropStyle {
    /// `DO BEGIN ... EXEC '...'; END;`
    Hana,
    /// `BEGIN ... EXECUTE IMMEDIATE '...'; END`
    Db2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropTableSupport {
    pub cascade: bool,
    pub if_exists: bool,
    /// Only consulted when `if_exists` is false.
    pub guarded: Option<GuardedDropStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropSchemaSupport {
    pub supported: bool,
    pub cascade: bool,
    pub if_exists: bool,
    /// Db2 requires an explicit `RESTRICT`.
    pub restrict_keyword: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveIndexSupport {
    pub if_exists: bool,
    pub cascade: bool,
    pub concurrently: bool,
    /// `DROP INDEX x ON table` (MySQL, SQL Server).
    pub on_table: bool,
    /// Index names live in the table's schema (`DROP INDEX "schema"."x"`).
    pub schema_qualified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSyntax {
    pub begin: BeginStyle,
    pub savepoint: SavepointStyle,
    pub commit: &'static str,
    pub rollback: &'static str,
    pub read_only: bool,
    pub isolation_level: bool,
    pub transaction_type: bool,
}

/// Read-only description of what a target engine supports and how it spells things.
#[derive(Debug, Clone, PartialEq)]
pub struct DialectCapabilities {
    pub kind: DialectKind,
    /// Opening and closing identifier quote characters.
    pub identifier_quotes: (char, char),
    pub placeholder_style: PlaceholderStyle,
    pub returning: ReturningStyle,
    pub supports_schemas: bool,
    /// Schema that user-facing schema listings hide besides the technical ones.
    pub default_schema: Option<&'static str>,
    /// Engine-internal schemas excluded from introspection by default.
    pub technical_schemas: Vec<String>,
    /// Expression that evaluates to the session's current schema.
    pub current_schema: &'static str,
    pub boolean_literals: (&'static str, &'static str),
    /// MySQL treats backslashes in string literals as escapes.
    pub backslash_escapes: bool,
    pub empty_insert: EmptyInsertStyle,
    pub ignore_duplicates: Option<IgnoreDuplicatesStyle>,
    pub json_extraction: JsonExtractionStyle,
    pub drop_table: DropTableSupport,
    pub drop_schema: DropSchemaSupport,
    pub remove_index: RemoveIndexSupport,
    pub transactions: TransactionSyntax,
}

impl DialectCapabilities {
    /// Shared preset for `kind`. Built on first use.
    #[must_use]
    pub fn preset(kind: DialectKind) -> &'static DialectCapabilities {
        presets::preset(kind)
    }

    /// Owned copy of the preset for `kind`.
    #[must_use]
    pub fn for_dialect(kind: DialectKind) -> DialectCapabilities {
        Self::preset(kind).clone()
    }

    /// Preset for the configured dialect with the configuration's overrides applied.
    #[must_use]
    pub fn from_config(config: &DialectConfig) -> DialectCapabilities {
        let mut caps = Self::for_dialect(config.dialect);
        for schema in &config.extra_technical_schemas {
            if !caps.technical_schemas.contains(schema) {
                caps.technical_schemas.push(schema.clone());
            }
        }
        if let Some(style) = config.placeholder_style {
            caps.placeholder_style = style;
        }
        caps
    }

    #[must_use]
    pub fn shared(self) -> Arc<DialectCapabilities> {
        Arc::new(self)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn supports_returning(&self) -> bool {
        !matches!(self.returning, ReturningStyle::LastInsertId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_extends_technical_schemas_without_duplicates() {
        let config = DialectConfig::new(DialectKind::Hana)
            .with_extra_technical_schemas(["SYSTEM", "TENANT_ADMIN"]);
        let caps = DialectCapabilities::from_config(&config);
        let preset = DialectCapabilities::preset(DialectKind::Hana);
        assert_eq!(caps.technical_schemas.len(), preset.technical_schemas.len() + 1);
        assert!(caps.technical_schemas.contains(&"TENANT_ADMIN".to_string()));
    }

    #[test]
    fn placeholder_override_applies() {
        let config = DialectConfig::new(DialectKind::Sqlite)
            .with_placeholder_style(PlaceholderStyle::Question);
        assert_eq!(
            DialectCapabilities::from_config(&config).placeholder_style,
            PlaceholderStyle::Question
        );
    }

    #[test]
    fn only_hana_synthesizes_identity_procedures() {
        for kind in [
            DialectKind::Postgres,
            DialectKind::Sqlite,
            DialectKind::Mssql,
            DialectKind::Mysql,
            DialectKind::Db2,
        ] {
            assert_ne!(
                DialectCapabilities::preset(kind).returning,
                ReturningStyle::IdentityProcedure
            );
        }
        assert_eq!(
            DialectCapabilities::preset(DialectKind::Hana).returning,
            ReturningStyle::IdentityProcedure
        );
    }
}
