//! Read-only introspection queries against each engine's system catalog.

mod db2;
mod hana;
mod information_schema;
mod sqlite;

use crate::error::SqlDialectError;
use crate::table::TableReference;
use crate::types::DialectKind;

use super::QueryGenerator;
use super::options::{
    ListSchemasOptions, ListTablesOptions, ShowConstraintsOptions, reject_invalid_options,
};

impl QueryGenerator {
    /// Schemas visible to users: technical schemas, the default schema, and `options.skip`
    /// are filtered out.
    ///
    /// # Errors
    /// [`SqlDialectError::Unimplemented`] for engines without schemas.
    pub fn list_schemas_query(
        &self,
        options: &ListSchemasOptions,
    ) -> Result<String, SqlDialectError> {
        let sql = match self.dialect() {
            DialectKind::Hana => hana::list_schemas(self, options),
            DialectKind::Db2 => db2::list_schemas(self, options),
            DialectKind::Sqlite => {
                return Err(SqlDialectError::Unimplemented(
                    "listSchemasQuery on sqlite".into(),
                ));
            }
            DialectKind::Postgres | DialectKind::Mssql | DialectKind::Mysql => {
                information_schema::list_schemas(self, options)
            }
        };
        Ok(self.emit("listSchemasQuery", sql))
    }

    /// Columns of `table` with type, nullability, default and primary-key membership.
    #[must_use]
    pub fn describe_table_query(&self, table: &TableReference) -> String {
        let sql = match self.dialect() {
            DialectKind::Hana => hana::describe_table(self, table),
            DialectKind::Db2 => db2::describe_table(self, table),
            DialectKind::Sqlite => sqlite::describe_table(self, table),
            DialectKind::Postgres | DialectKind::Mssql | DialectKind::Mysql => {
                information_schema::describe_table(self, table)
            }
        };
        self.emit("describeTableQuery", sql)
    }

    /// User tables, either in `options.schema` or across all non-technical schemas.
    ///
    /// # Errors
    /// [`SqlDialectError::UnsupportedOption`] when a schema is given to an engine without
    /// schemas.
    pub fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String, SqlDialectError> {
        let supported: &[&'static str] = if self.capabilities().supports_schemas {
            ListTablesOptions::SUPPORTABLE
        } else {
            &[]
        };
        reject_invalid_options(
            "listTablesQuery",
            self.capabilities(),
            ListTablesOptions::SUPPORTABLE,
            supported,
            &options.provided(),
        )?;

        let sql = match self.dialect() {
            DialectKind::Hana => hana::list_tables(self, options),
            DialectKind::Db2 => db2::list_tables(self, options),
            DialectKind::Sqlite => sqlite::list_tables(),
            DialectKind::Postgres | DialectKind::Mssql | DialectKind::Mysql => {
                information_schema::list_tables(self, options)
            }
        };
        Ok(self.emit("listTablesQuery", sql))
    }

    /// Indexes of `table`, one row per indexed column where the engine reports it that way.
    #[must_use]
    pub fn show_indexes_query(&self, table: &TableReference) -> String {
        let sql = match self.dialect() {
            DialectKind::Hana => hana::show_indexes(self, table),
            DialectKind::Db2 => db2::show_indexes(self, table),
            DialectKind::Sqlite => sqlite::show_indexes(self, table),
            DialectKind::Postgres => information_schema::show_indexes_postgres(self, table),
            DialectKind::Mssql => information_schema::show_indexes_mssql(self, table),
            DialectKind::Mysql => information_schema::show_indexes_mysql(self, table),
        };
        self.emit("showIndexesQuery", sql)
    }

    /// Constraints of `table`, optionally narrowed by type, column or name.
    ///
    /// # Errors
    /// [`SqlDialectError::UnsupportedOption`] for filters the engine's catalog cannot apply,
    /// [`SqlDialectError::Unimplemented`] for constraint types the engine does not expose.
    pub fn show_constraints_query(
        &self,
        table: &TableReference,
        options: &ShowConstraintsOptions,
    ) -> Result<String, SqlDialectError> {
        let supported: &[&'static str] = if self.dialect() == DialectKind::Sqlite {
            &[]
        } else {
            ShowConstraintsOptions::SUPPORTABLE
        };
        reject_invalid_options(
            "showConstraintsQuery",
            self.capabilities(),
            ShowConstraintsOptions::SUPPORTABLE,
            supported,
            &options.provided(),
        )?;

        let sql = match self.dialect() {
            DialectKind::Hana => hana::show_constraints(self, table, options)?,
            DialectKind::Db2 => db2::show_constraints(self, table, options),
            DialectKind::Sqlite => sqlite::show_constraints(self, table),
            DialectKind::Postgres | DialectKind::Mssql | DialectKind::Mysql => {
                information_schema::show_constraints(self, table, options)
            }
        };
        Ok(self.emit("showConstraintsQuery", sql))
    }

    /// Returns a row when `table` exists.
    #[must_use]
    pub fn table_exists_query(&self, table: &TableReference) -> String {
        let sql = match self.dialect() {
            DialectKind::Hana => hana::table_exists(self, table),
            DialectKind::Db2 => db2::table_exists(self, table),
            DialectKind::Sqlite => sqlite::table_exists(self, table),
            DialectKind::Postgres | DialectKind::Mssql | DialectKind::Mysql => {
                information_schema::table_exists(self, table)
            }
        };
        self.emit("tableExistsQuery", sql)
    }

    /// Server version as a single `version` column.
    #[must_use]
    pub fn version_query(&self) -> String {
        let sql = match self.dialect() {
            DialectKind::Hana => hana::VERSION.to_string(),
            DialectKind::Db2 => db2::VERSION.to_string(),
            DialectKind::Sqlite => sqlite::VERSION.to_string(),
            DialectKind::Postgres => "SHOW SERVER_VERSION".to_string(),
            DialectKind::Mssql => {
                "SELECT CONVERT(NVARCHAR(128), SERVERPROPERTY('ProductVersion')) AS [version];"
                    .to_string()
            }
            DialectKind::Mysql => "SELECT CAST(VERSION() AS CHAR) AS `version`;".to_string(),
        };
        self.emit("versionQuery", sql)
    }
}
