/// Outcome of a transaction-control call.
///
/// Reports the statement sent to the executor, if any, and the connection's autocommit flag
/// once the call returned. Savepoint commits and implicit-begin dialects send nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    sql_issued: Option<String>,
    auto_commit: bool,
}

impl TxOutcome {
    /// Outcome where no SQL reached the executor.
    #[must_use]
    pub fn without_sql(auto_commit: bool) -> Self {
        Self {
            sql_issued: None,
            auto_commit,
        }
    }

    #[must_use]
    pub fn with_sql(sql: impl Into<String>, auto_commit: bool) -> Self {
        Self {
            sql_issued: Some(sql.into()),
            auto_commit,
        }
    }

    #[must_use]
    pub fn sql_issued(&self) -> Option<&str> {
        self.sql_issued.as_deref()
    }

    #[must_use]
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn into_sql(self) -> Option<String> {
        self.sql_issued
    }
}
