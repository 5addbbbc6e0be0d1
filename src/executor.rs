//! The execution collaborator boundary.
//!
//! Nothing in this crate talks to a database. Generated statements are handed to an
//! [`SqlExecutor`], which owns the connection, runs the SQL, and reports back.

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::results::ResultSet;
use crate::translation::{FinalParams, FinalQuery};

/// What a statement does, so an executor can pick its select/DML/batch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Catalog introspection; returns rows.
    Select,
    /// An INSERT; may return rows depending on the insert's result shape.
    Insert,
    /// DDL or procedural blocks; no rows expected.
    Schema,
    /// BEGIN / SAVEPOINT / COMMIT / ROLLBACK.
    Transaction,
}

/// A statement in the dialect's native placeholder syntax with the values it references.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRequest {
    pub sql: String,
    pub params: FinalParams,
    pub kind: QueryKind,
}

impl SqlRequest {
    /// A statement without parameters.
    #[must_use]
    pub fn unbound(sql: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            sql: sql.into(),
            params: FinalParams::Positional(Vec::new()),
            kind,
        }
    }

    #[must_use]
    pub fn finalized(query: FinalQuery, kind: QueryKind) -> Self {
        Self {
            sql: query.sql,
            params: query.params,
            kind,
        }
    }
}

#[async_trait]
pub trait SqlExecutor: Send {
    /// Run one statement. Failures are returned unchanged to the caller of the operation.
    async fn execute(&mut self, request: SqlRequest) -> Result<ResultSet, CollaboratorError>;
}

#[async_trait]
impl<E: SqlExecutor + ?Sized> SqlExecutor for Box<E> {
    async fn execute(&mut self, request: SqlRequest) -> Result<ResultSet, CollaboratorError> {
        (**self).execute(request).await
    }
}
