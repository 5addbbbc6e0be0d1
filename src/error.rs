use thiserror::Error;

/// Boxed error surfaced by an execution or connection collaborator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SqlDialectError {
    #[error("{method} was called with options that {dialect} does not support: {}", options.join(", "))]
    UnsupportedOption {
        method: &'static str,
        dialect: &'static str,
        options: Vec<&'static str>,
    },

    #[error("{method} does not accept the option {option}")]
    InvalidOption {
        method: &'static str,
        option: &'static str,
    },

    #[error(
        "Bind parameters cannot start with \"{0}\", these bind parameters are reserved for generated values."
    )]
    ReservedBindName(String),

    #[error("Query includes bind parameter \"${0}\", but no value was provided for it")]
    MissingBindParameter(String),

    #[error("Replacement \"{0}\" has no entry in the replacement map")]
    MissingReplacement(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error(transparent)]
    Execution(CollaboratorError),
}

impl SqlDialectError {
    /// Wrap a collaborator failure without altering it.
    pub fn execution<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SqlDialectError::Execution(Box::new(err))
    }

    /// True when the error came from the execution collaborator rather than from generation.
    #[must_use]
    pub fn is_execution(&self) -> bool {
        matches!(self, SqlDialectError::Execution(_))
    }
}

impl From<serde_json::Error> for SqlDialectError {
    fn from(err: serde_json::Error) -> Self {
        SqlDialectError::ConfigError(format!("invalid dialect config: {err}"))
    }
}
