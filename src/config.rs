use serde::Deserialize;

use crate::error::SqlDialectError;
use crate::translation::PlaceholderStyle;
use crate::types::DialectKind;

/// Dialect selection plus the few knobs a deployment may override.
///
/// Can be built in code or deserialized:
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let config = DialectConfig::from_json(
///     r#"{ "dialect": "hana", "extra_technical_schemas": ["TENANT_ADMIN"] }"#,
/// )?;
/// assert_eq!(config.dialect, DialectKind::Hana);
/// # Ok::<(), SqlDialectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialectConfig {
    pub dialect: DialectKind,
    #[serde(default)]
    pub extra_technical_schemas: Vec<String>,
    #[serde(default)]
    pub placeholder_style: Option<PlaceholderStyle>,
}

impl DialectConfig {
    #[must_use]
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            extra_technical_schemas: Vec::new(),
            placeholder_style: None,
        }
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` if the document is malformed or a schema name is
    /// empty.
    pub fn from_json(json: &str) -> Result<Self, SqlDialectError> {
        let config: DialectConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_extra_technical_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_technical_schemas
            .extend(schemas.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = Some(style);
        self
    }

    /// # Errors
    /// Returns `SqlDialectError::ConfigError` if an extra technical schema name is blank.
    pub fn validate(&self) -> Result<(), SqlDialectError> {
        if self
            .extra_technical_schemas
            .iter()
            .any(|schema| schema.trim().is_empty())
        {
            return Err(SqlDialectError::ConfigError(
                "extra_technical_schemas entries must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
