use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be bound to a generated statement.
///
/// The same enum is used for every dialect, so callers never build driver types:
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let values = vec![
///     BindValue::Int(1),
///     BindValue::Text("alice".into()),
///     BindValue::Bool(true),
/// ];
/// # let _ = values;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl BindValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let BindValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let BindValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let BindValue::Bool(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// SQL type used when the value has to be declared as a procedure parameter.
    #[must_use]
    pub fn procedure_type(&self) -> &'static str {
        match self {
            BindValue::Int(_) => "BIGINT",
            BindValue::Float(_) => "DOUBLE",
            BindValue::Bool(_) => "BOOLEAN",
            BindValue::Timestamp(_) => "TIMESTAMP",
            BindValue::Blob(_) => "BLOB",
            BindValue::JSON(_) => "NCLOB",
            BindValue::Text(_) | BindValue::Null => "NVARCHAR(5000)",
        }
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Int(i64::from(value))
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Bool(value)
    }
}

impl From<NaiveDateTime> for BindValue {
    fn from(value: NaiveDateTime) -> Self {
        BindValue::Timestamp(value)
    }
}

impl From<JsonValue> for BindValue {
    fn from(value: JsonValue) -> Self {
        BindValue::JSON(value)
    }
}

/// The database engines this crate generates SQL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// `PostgreSQL`
    Postgres,
    /// `SQLite`
    Sqlite,
    /// SQL Server
    Mssql,
    /// `MySQL` / `MariaDB`
    Mysql,
    /// IBM Db2 for LUW
    Db2,
    /// SAP HANA
    Hana,
}

impl DialectKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DialectKind::Postgres => "postgres",
            DialectKind::Sqlite => "sqlite",
            DialectKind::Mssql => "mssql",
            DialectKind::Mysql => "mysql",
            DialectKind::Db2 => "db2",
            DialectKind::Hana => "hana",
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
