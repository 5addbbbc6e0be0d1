//! Transaction objects and the controller that drives them through their lifecycle.
//!
//! A [`Transaction`] is created by the caller's transaction manager, gets a connection
//! attached, and is then handed to the [`TransactionController`]. Only the controller moves it
//! between states or toggles the connection's autocommit flag. A transaction that has been
//! committed or rolled back is never started again.

mod controller;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub use controller::TransactionController;

use crate::error::{CollaboratorError, SqlDialectError};
use crate::query_generator::StartTransactionOptions;

/// The connection collaborator's autocommit switch.
pub trait TransactionConnection: Send {
    /// # Errors
    /// Whatever the driver reports; surfaced as [`SqlDialectError::Execution`].
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), CollaboratorError>;

    fn auto_commit(&self) -> bool;
}

/// A connection shared by a root transaction and its savepoints.
pub type SharedConnection = Arc<Mutex<dyn TransactionConnection>>;

pub(crate) fn lock_connection(
    connection: &SharedConnection,
) -> MutexGuard<'_, dyn TransactionConnection + 'static> {
    match connection.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Created, not yet started.
    Pending,
    Active,
    Committed,
    RolledBack,
}

/// A root transaction or a savepoint inside one.
pub struct Transaction {
    id: String,
    root_id: String,
    parent_id: Option<String>,
    connection: Option<SharedConnection>,
    state: TransactionState,
    /// Shared by every transaction under the same root so generated names never repeat.
    savepoint_counter: Arc<AtomicUsize>,
    options: StartTransactionOptions,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("has_connection", &self.connection.is_some())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    /// A root transaction without a connection yet.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            root_id: id.clone(),
            id,
            parent_id: None,
            connection: None,
            state: TransactionState::Pending,
            savepoint_counter: Arc::new(AtomicUsize::new(0)),
            options: StartTransactionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_connection(mut self, connection: SharedConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Options applied when the root transaction is started.
    #[must_use]
    pub fn with_options(mut self, options: StartTransactionOptions) -> Self {
        self.options = options;
        self
    }

    /// A savepoint nested in `parent`, sharing its connection.
    ///
    /// Unnamed savepoints are called `"{root id}-sp-{n}"`, `n` counting the unnamed savepoints
    /// created anywhere under the root.
    ///
    /// # Errors
    /// [`SqlDialectError::InvalidTransaction`] when `parent` has no connection or is not active.
    pub fn savepoint(parent: &mut Transaction, name: Option<&str>) -> Result<Transaction, SqlDialectError> {
        let Some(connection) = parent.connection.clone() else {
            return Err(SqlDialectError::InvalidTransaction(format!(
                "cannot create a savepoint of {}: it has no connection",
                parent.id
            )));
        };
        if parent.state != TransactionState::Active {
            return Err(SqlDialectError::InvalidTransaction(format!(
                "cannot create a savepoint of {}: it is {:?}, not Active",
                parent.id, parent.state
            )));
        }

        let id = name.map_or_else(
            || {
                let n = parent.savepoint_counter.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{}-sp-{n}", parent.root_id)
            },
            str::to_string,
        );
        Ok(Transaction {
            id,
            root_id: parent.root_id.clone(),
            parent_id: Some(parent.id.clone()),
            connection: Some(connection),
            state: TransactionState::Pending,
            savepoint_counter: Arc::clone(&parent.savepoint_counter),
            options: StartTransactionOptions::default(),
        })
    }

    /// For savepoints this is also the savepoint name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    #[must_use]
    pub fn is_savepoint(&self) -> bool {
        self.parent_id.is_some()
    }

    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    #[must_use]
    pub fn connection(&self) -> Option<&SharedConnection> {
        self.connection.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> StartTransactionOptions {
        self.options
    }

    pub(crate) fn set_state(&mut self, state: TransactionState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag(bool);

    impl TransactionConnection for Flag {
        fn set_auto_commit(&mut self, enabled: bool) -> Result<(), CollaboratorError> {
            self.0 = enabled;
            Ok(())
        }

        fn auto_commit(&self) -> bool {
            self.0
        }
    }

    fn connection() -> SharedConnection {
        Arc::new(Mutex::new(Flag(true)))
    }

    #[test]
    fn savepoint_names_are_unique_under_the_root() {
        let mut root = Transaction::new("tx1").with_connection(connection());
        root.set_state(TransactionState::Active);
        let mut first = Transaction::savepoint(&mut root, None).unwrap();
        first.set_state(TransactionState::Active);
        let second = Transaction::savepoint(&mut root, None).unwrap();
        let nested = Transaction::savepoint(&mut first, None).unwrap();
        let named = Transaction::savepoint(&mut root, Some("before_import")).unwrap();

        assert_eq!(first.id(), "tx1-sp-1");
        assert_eq!(second.id(), "tx1-sp-2");
        assert_eq!(nested.id(), "tx1-sp-3");
        assert_eq!(nested.parent_id(), Some("tx1-sp-1"));
        assert_eq!(named.id(), "before_import");
        assert!(named.is_savepoint());
        assert!(!root.is_savepoint());
        assert!(Arc::ptr_eq(
            root.connection().unwrap(),
            named.connection().unwrap()
        ));
    }

    #[test]
    fn savepoint_needs_a_live_connected_parent() {
        let mut detached = Transaction::new("tx1");
        assert!(matches!(
            Transaction::savepoint(&mut detached, None),
            Err(SqlDialectError::InvalidTransaction(_))
        ));

        let mut pending = Transaction::new("tx2").with_connection(connection());
        assert!(matches!(
            Transaction::savepoint(&mut pending, None),
            Err(SqlDialectError::InvalidTransaction(_))
        ));

        let mut done = Transaction::new("tx3").with_connection(connection());
        done.set_state(TransactionState::Committed);
        assert!(Transaction::savepoint(&mut done, None).is_err());
    }
}
