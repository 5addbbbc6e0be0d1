//! Transaction-control SQL text. Nothing here touches a connection.

use crate::dialect::{BeginStyle, SavepointStyle};
use crate::error::SqlDialectError;
use crate::fragments::SqlFragments;

use super::QueryGenerator;
use super::options::{StartTransactionOptions, reject_invalid_options};

impl QueryGenerator {
    /// SQL that opens a root transaction, or creates `savepoint` inside one.
    ///
    /// `None` means the engine opens transactions implicitly once autocommit is off.
    ///
    /// # Errors
    /// [`SqlDialectError::UnsupportedOption`] for options the engine cannot apply.
    pub fn start_transaction_query(
        &self,
        savepoint: Option<&str>,
        options: StartTransactionOptions,
    ) -> Result<Option<String>, SqlDialectError> {
        let caps = self.capabilities();
        reject_invalid_options(
            "startTransactionQuery",
            caps,
            StartTransactionOptions::SUPPORTABLE,
            &StartTransactionOptions::supported(caps),
            &options.provided(),
        )?;

        if let Some(name) = savepoint {
            let sql = match caps.transactions.savepoint {
                SavepointStyle::Standard => format!("SAVEPOINT {};", self.quote_identifier(name)),
                SavepointStyle::Db2 => format!(
                    "SAVEPOINT {} ON ROLLBACK RETAIN CURSORS;",
                    self.quote_identifier(name)
                ),
                SavepointStyle::SqlServer => {
                    format!("SAVE TRANSACTION {};", self.quote_identifier(name))
                }
            };
            return Ok(Some(self.emit("startTransactionQuery", sql)));
        }

        let sql = match caps.transactions.begin {
            BeginStyle::StartTransaction => SqlFragments::new()
                .push("START TRANSACTION")
                .push_opt(
                    options
                        .isolation_level
                        .map(|level| format!("ISOLATION LEVEL {}", level.as_sql())),
                )
                .push_if(options.read_only, "READ ONLY")
                .push(";")
                .join(),
            BeginStyle::Begin => format!(
                "BEGIN {} TRANSACTION;",
                options.transaction_type.unwrap_or_default().as_sql()
            ),
            BeginStyle::BeginTransaction => "BEGIN TRANSACTION;".to_string(),
            BeginStyle::Implicit => return Ok(None),
        };
        Ok(Some(self.emit("startTransactionQuery", sql)))
    }

    /// `None` for savepoints, which are released with their root transaction.
    #[must_use]
    pub fn commit_transaction_query(&self, is_savepoint: bool) -> Option<&'static str> {
        (!is_savepoint).then_some(self.capabilities().transactions.commit)
    }

    /// Undo the root transaction, or everything since `savepoint`.
    #[must_use]
    pub fn rollback_transaction_query(&self, savepoint: Option<&str>) -> String {
        let sql = match savepoint {
            None => self.capabilities().transactions.rollback.to_string(),
            Some(name) => match self.capabilities().transactions.savepoint {
                SavepointStyle::SqlServer => {
                    format!("ROLLBACK TRANSACTION {};", self.quote_identifier(name))
                }
                SavepointStyle::Standard | SavepointStyle::Db2 => {
                    format!("ROLLBACK TO SAVEPOINT {};", self.quote_identifier(name))
                }
            },
        };
        self.emit("rollbackTransactionQuery", sql)
    }
}
