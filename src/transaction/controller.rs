use tracing::{debug, warn};

use crate::error::SqlDialectError;
use crate::executor::{QueryKind, SqlExecutor, SqlRequest};
use crate::query_generator::QueryGenerator;
use crate::tx_outcome::TxOutcome;

use super::{SharedConnection, Transaction, TransactionState, lock_connection};

/// Issues transaction-control SQL through an executor and keeps the connection's autocommit
/// flag in step.
///
/// Calls for one connection must not overlap; the caller serializes them.
///
/// Autocommit after each call:
/// - root start: off (restored to on if the begin statement fails)
/// - root commit / rollback: on, whether or not the statement succeeded
/// - savepoint start / commit / rollback: untouched
///
/// A savepoint can only be started while its parent is active.
#[derive(Debug, Clone)]
pub struct TransactionController {
    generator: QueryGenerator,
}

impl TransactionController {
    #[must_use]
    pub fn new(generator: QueryGenerator) -> Self {
        Self { generator }
    }

    /// Begin a root transaction, or create the savepoint `transaction` names.
    ///
    /// # Errors
    /// [`SqlDialectError::InvalidTransaction`] unless `transaction` is pending with a connection;
    /// option errors from the generator; executor and connection failures as
    /// [`SqlDialectError::Execution`]. The transaction stays pending on failure.
    pub async fn start<E>(
        &self,
        executor: &mut E,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError>
    where
        E: SqlExecutor + ?Sized,
    {
        let connection = require(transaction, TransactionState::Pending, "start")?;
        let savepoint = transaction.is_savepoint().then(|| transaction.id().to_string());
        let sql = self
            .generator
            .start_transaction_query(savepoint.as_deref(), transaction.options())?;

        if transaction.is_savepoint() {
            if let Some(sql) = &sql {
                run(executor, sql).await?;
            }
            transaction.set_state(TransactionState::Active);
            debug!(target: "sql_dialect::transaction", id = transaction.id(), "savepoint created");
            return Ok(outcome(sql, &connection));
        }

        lock_connection(&connection)
            .set_auto_commit(false)
            .map_err(SqlDialectError::Execution)?;
        debug!(target: "sql_dialect::transaction", id = transaction.id(), auto_commit = false, "autocommit toggled");

        if let Some(sql) = &sql
            && let Err(err) = run(executor, sql).await
        {
            restore_auto_commit(&connection, transaction.id());
            return Err(err);
        }

        transaction.set_state(TransactionState::Active);
        debug!(target: "sql_dialect::transaction", id = transaction.id(), "transaction started");
        Ok(outcome(sql, &connection))
    }

    /// Commit a root transaction. Savepoints are released with their root, so committing one
    /// sends nothing and leaves both autocommit and the savepoint's state as they are.
    ///
    /// # Errors
    /// [`SqlDialectError::InvalidTransaction`] unless `transaction` is active with a connection;
    /// executor failures unchanged. A failed root commit leaves the transaction active.
    pub async fn commit<E>(
        &self,
        executor: &mut E,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError>
    where
        E: SqlExecutor + ?Sized,
    {
        let connection = require(transaction, TransactionState::Active, "commit")?;

        let Some(sql) = self
            .generator
            .commit_transaction_query(transaction.is_savepoint())
        else {
            // Savepoints stay active; a later rollback to them is still valid.
            debug!(target: "sql_dialect::transaction", id = transaction.id(), "savepoint commit is a no-op");
            return Ok(outcome(None, &connection));
        };

        if let Err(err) = run(executor, sql).await {
            restore_auto_commit(&connection, transaction.id());
            return Err(err);
        }
        transaction.set_state(TransactionState::Committed);
        enable_auto_commit(&connection, transaction.id())?;
        debug!(target: "sql_dialect::transaction", id = transaction.id(), "transaction committed");
        Ok(outcome(Some(sql.to_string()), &connection))
    }

    /// Roll back a root transaction, or everything since a savepoint.
    ///
    /// # Errors
    /// [`SqlDialectError::InvalidTransaction`] unless `transaction` is active with a connection;
    /// executor failures unchanged. A failed rollback leaves the transaction active.
    pub async fn rollback<E>(
        &self,
        executor: &mut E,
        transaction: &mut Transaction,
    ) -> Result<TxOutcome, SqlDialectError>
    where
        E: SqlExecutor + ?Sized,
    {
        let connection = require(transaction, TransactionState::Active, "rollback")?;
        let savepoint = transaction.is_savepoint().then(|| transaction.id().to_string());
        let sql = self.generator.rollback_transaction_query(savepoint.as_deref());

        if savepoint.is_some() {
            run(executor, &sql).await?;
            transaction.set_state(TransactionState::RolledBack);
            debug!(target: "sql_dialect::transaction", id = transaction.id(), "rolled back to savepoint");
            return Ok(outcome(Some(sql), &connection));
        }

        if let Err(err) = run(executor, &sql).await {
            restore_auto_commit(&connection, transaction.id());
            return Err(err);
        }
        transaction.set_state(TransactionState::RolledBack);
        enable_auto_commit(&connection, transaction.id())?;
        debug!(target: "sql_dialect::transaction", id = transaction.id(), "transaction rolled back");
        Ok(outcome(Some(sql), &connection))
    }
}

fn require(
    transaction: &Transaction,
    expected: TransactionState,
    operation: &str,
) -> Result<SharedConnection, SqlDialectError> {
    if transaction.state() != expected {
        return Err(SqlDialectError::InvalidTransaction(format!(
            "cannot {operation} {}: expected state {expected:?}, found {:?}",
            transaction.id(),
            transaction.state()
        )));
    }
    transaction.connection().cloned().ok_or_else(|| {
        SqlDialectError::InvalidTransaction(format!(
            "cannot {operation} {}: no connection is attached",
            transaction.id()
        ))
    })
}

async fn run<E>(executor: &mut E, sql: &str) -> Result<(), SqlDialectError>
where
    E: SqlExecutor + ?Sized,
{
    executor
        .execute(SqlRequest::unbound(sql, QueryKind::Transaction))
        .await
        .map(|_| ())
        .map_err(SqlDialectError::Execution)
}

fn outcome(sql: Option<String>, connection: &SharedConnection) -> TxOutcome {
    let auto_commit = lock_connection(connection).auto_commit();
    match sql {
        Some(sql) => TxOutcome::with_sql(sql, auto_commit),
        None => TxOutcome::without_sql(auto_commit),
    }
}

fn enable_auto_commit(connection: &SharedConnection, id: &str) -> Result<(), SqlDialectError> {
    lock_connection(connection)
        .set_auto_commit(true)
        .map_err(SqlDialectError::Execution)?;
    debug!(target: "sql_dialect::transaction", id, auto_commit = true, "autocommit toggled");
    Ok(())
}

/// Best effort after a failed statement; the statement's error is the one reported.
fn restore_auto_commit(connection: &SharedConnection, id: &str) {
    if let Err(err) = lock_connection(connection).set_auto_commit(true) {
        warn!(target: "sql_dialect::transaction", id, error = %err, "could not restore autocommit");
    }
}
