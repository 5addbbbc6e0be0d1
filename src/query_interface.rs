//! Generator plus execution collaborator: builds a statement, finalizes its binds, runs it.

use crate::error::SqlDialectError;
use crate::executor::{QueryKind, SqlExecutor, SqlRequest};
use crate::query_generator::{
    AddIndexOptions, ColumnAssignments, DropSchemaOptions, DropTableOptions, IndexTarget,
    InsertOptions, InsertResultShape, ListSchemasOptions, ListTablesOptions, QueryGenerator,
    RemoveIndexOptions, ShowConstraintsOptions,
};
use crate::results::ResultSet;
use crate::table::TableReference;
use crate::transaction::{Transaction, TransactionController};
use crate::translation::finalize_query;
use crate::tx_outcome::TxOutcome;
use crate::types::BindValue;

/// Rows from an executed INSERT and how to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertResult {
    pub rows: ResultSet,
    pub shape: InsertResultShape,
}

impl InsertResult {
    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows.rows_affected
    }

    /// Generated key from an identity procedure, or from the single returned row when the
    /// column was requested by name.
    #[must_use]
    pub fn identity(&self, column: &str) -> Option<&BindValue> {
        match &self.shape {
            InsertResultShape::IdentityRow { primary_key } => {
                self.rows.first().and_then(|row| row.get(primary_key))
            }
            InsertResultShape::ReturnedRows => self.rows.first().and_then(|row| row.get(column)),
            InsertResultShape::RowCount => None,
        }
    }
}

/// Runs generated statements through an [`SqlExecutor`].
///
/// Every operation issues exactly one statement, except the transaction calls, which may
/// issue none.
pub struct QueryInterface<E> {
    generator: QueryGenerator,
    controller: TransactionController,
    executor: E,
}

impl<E: SqlExecutor> QueryInterface<E> {
    pub fn new(generator: QueryGenerator, executor: E) -> Self {
        Self {
            controller: TransactionController::new(generator.clone()),
            generator,
            executor,
        }
    }

    pub fn generator(&self) -> &QueryGenerator {
        &self.generator
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Insert one row. Values are bound, never inlined.
    ///
    /// # Errors
    /// Generation errors before anything is executed, then executor failures unchanged.
    pub async fn insert<T>(
        &mut self,
        table: T,
        values: &ColumnAssignments,
        options: &InsertOptions,
    ) -> Result<InsertResult, SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let table = table.try_into()?;
        let query = self.generator.insert_query(&table, values, options)?;
        let finalized = finalize_query(
            &query.sql,
            &query.merged_bind(),
            self.generator.capabilities(),
        )?;
        let rows = self
            .execute(SqlRequest::finalized(finalized, QueryKind::Insert))
            .await?;
        Ok(InsertResult {
            rows,
            shape: query.result,
        })
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn describe_table<T>(&mut self, table: T) -> Result<ResultSet, SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self.generator.describe_table_query(&table.try_into()?);
        self.select(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn list_tables(
        &mut self,
        options: &ListTablesOptions,
    ) -> Result<ResultSet, SqlDialectError> {
        let sql = self.generator.list_tables_query(options)?;
        self.select(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn list_schemas(
        &mut self,
        options: &ListSchemasOptions,
    ) -> Result<ResultSet, SqlDialectError> {
        let sql = self.generator.list_schemas_query(options)?;
        self.select(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn show_indexes<T>(&mut self, table: T) -> Result<ResultSet, SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self.generator.show_indexes_query(&table.try_into()?);
        self.select(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn show_constraints<T>(
        &mut self,
        table: T,
        options: &ShowConstraintsOptions,
    ) -> Result<ResultSet, SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self
            .generator
            .show_constraints_query(&table.try_into()?, options)?;
        self.select(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn table_exists<T>(&mut self, table: T) -> Result<bool, SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self.generator.table_exists_query(&table.try_into()?);
        Ok(!self.select(sql).await?.is_empty())
    }

    /// Server version string, if the engine reported one.
    ///
    /// # Errors
    /// Execution failures.
    pub async fn database_version(&mut self) -> Result<Option<String>, SqlDialectError> {
        let sql = self.generator.version_query();
        let rows = self.select(sql).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get_by_index(0))
            .and_then(BindValue::as_text)
            .map(str::to_string))
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn drop_table<T>(
        &mut self,
        table: T,
        options: DropTableOptions,
    ) -> Result<(), SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self.generator.drop_table_query(&table.try_into()?, options)?;
        self.schema_change(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn drop_schema(
        &mut self,
        schema: &str,
        options: DropSchemaOptions,
    ) -> Result<(), SqlDialectError> {
        let sql = self.generator.drop_schema_query(schema, options)?;
        self.schema_change(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn add_index<T, S>(
        &mut self,
        table: T,
        columns: &[S],
        options: &AddIndexOptions,
    ) -> Result<(), SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
        S: AsRef<str>,
    {
        let sql = self
            .generator
            .add_index_query(&table.try_into()?, columns, options)?;
        self.schema_change(sql).await
    }

    /// # Errors
    /// Generation or execution failures.
    pub async fn remove_index<T>(
        &mut self,
        table: T,
        target: &IndexTarget,
        options: RemoveIndexOptions,
    ) -> Result<(), SqlDialectError>
    where
        T: TryInto<TableReference, Error = SqlDialectError>,
    {
        let sql = self
            .generator
            .remove_index_query(&table.try_into()?, target, options)?;
        self.schema_change(sql).await
    }

    /// # Errors
    /// Unsupported dialect or execution failures.
    pub async fn toggle_foreign_key_checks(&mut self, enable: bool) -> Result<(), SqlDialectError> {
        let sql = self.generator.toggle_foreign_key_checks_query(enable)?;
        self.schema_change(sql).await
    }

    /// See [`TransactionController::start`].
    ///
    /// # Errors
    /// Invalid transaction, option or execution failures.
    pub async fn start_transaction(
        &mut self,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError> {
        self.controller.start(&mut self.executor, transaction).await
    }

    /// See [`TransactionController::commit`].
    ///
    /// # Errors
    /// Invalid transaction or execution failures.
    pub async fn commit_transaction(
        &mut self,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError> {
        self.controller.commit(&mut self.executor, transaction).await
    }

    /// See [`TransactionController::rollback`].
    ///
    /// # Errors
    /// Invalid transaction or execution failures.
    pub async fn rollback_transaction(
        &mut self,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError> {
        self.controller.rollback(&mut self.executor, transaction).await
    }

    async fn select(&mut self, sql: String) -> Result<ResultSet, SqlDialectError> {
        self.execute(SqlRequest::unbound(sql, QueryKind::Select))
            .await
    }

    async fn schema_change(&mut self, sql: String) -> Result<(), SqlDialectError> {
        self.execute(SqlRequest::unbound(sql, QueryKind::Schema))
            .await
            .map(|_| ())
    }

    async fn execute(&mut self, request: SqlRequest) -> Result<ResultSet, SqlDialectError> {
        self.executor
            .execute(request)
            .await
            .map_err(SqlDialectError::Execution)
    }
}
