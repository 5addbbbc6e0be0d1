use crate::error::SqlDialectError;

/// A table name with an optional schema.
///
/// ```rust
/// use sql_dialect::TableReference;
///
/// let qualified = TableReference::parse("audit.Events")?;
/// assert_eq!(qualified.schema(), Some("audit"));
/// assert_eq!(qualified.table_name(), "Events");
///
/// let plain = TableReference::parse("Users")?;
/// assert_eq!(plain.schema(), None);
/// # Ok::<(), sql_dialect::SqlDialectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    table_name: String,
    schema: Option<String>,
}

impl TableReference {
    /// Build a reference from parts.
    ///
    /// # Errors
    /// Returns `SqlDialectError::InvalidIdentifier` if the table name is empty or either part
    /// contains a NUL character.
    pub fn new(table_name: impl Into<String>, schema: Option<String>) -> Result<Self, SqlDialectError> {
        let table_name = table_name.into();
        if table_name.is_empty() {
            return Err(SqlDialectError::InvalidIdentifier(
                "table name cannot be empty".into(),
            ));
        }
        let schema = schema.filter(|schema| !schema.is_empty());
        if table_name.contains('\0') || schema.as_deref().is_some_and(|s| s.contains('\0')) {
            return Err(SqlDialectError::InvalidIdentifier(
                "identifiers cannot contain NUL characters".into(),
            ));
        }
        Ok(Self { table_name, schema })
    }

    /// Parse `table` or `schema.table`. Only the first `.` separates the schema.
    ///
    /// # Errors
    /// Returns `SqlDialectError::InvalidIdentifier` for empty names.
    pub fn parse(identifier: &str) -> Result<Self, SqlDialectError> {
        match identifier.split_once('.') {
            Some((schema, table)) => Self::new(table, Some(schema.to_string())),
            None => Self::new(identifier, None),
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        self.schema = (!schema.is_empty()).then_some(schema);
        self
    }
}

impl TryFrom<&str> for TableReference {
    type Error = SqlDialectError;

    fn try_from(identifier: &str) -> Result<Self, Self::Error> {
        Self::parse(identifier)
    }
}

impl TryFrom<String> for TableReference {
    type Error = SqlDialectError;

    fn try_from(identifier: String) -> Result<Self, Self::Error> {
        Self::parse(&identifier)
    }
}

impl TryFrom<(&str, &str)> for TableReference {
    type Error = SqlDialectError;

    /// `(schema, table)`
    fn try_from((schema, table): (&str, &str)) -> Result<Self, Self::Error> {
        Self::new(table, Some(schema.to_string()))
    }
}

impl TryFrom<&TableReference> for TableReference {
    type Error = SqlDialectError;

    fn try_from(table: &TableReference) -> Result<Self, Self::Error> {
        Ok(table.clone())
    }
}
