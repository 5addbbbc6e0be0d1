use lazy_static::lazy_static;
use regex::Regex;

use crate::bind::{BindCollection, BindResolver, ResolvedBinds, assert_no_reserved_binds};
use crate::dialect::{EmptyInsertStyle, IgnoreDuplicatesStyle, ReturningStyle};
use crate::error::SqlDialectError;
use crate::fragments::{SqlFragments, join_sql_fragments};
use crate::table::TableReference;
use crate::translation::{MarkerKind, live_markers, splice};
use crate::types::BindValue;

use super::QueryGenerator;
use super::options::{InsertOptions, Returning, reject_invalid_options};
use super::procedure::{IDENTITY_VARIABLE, ProcedureParameter, identity_insert_procedure};

lazy_static! {
    static ref LONE_PLACEHOLDER: Regex = Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*|\d+)$").unwrap();
    static ref PLAIN_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

const DEFAULT_PRIMARY_KEY: &str = "id";
const DEFAULT_PROCEDURE_TYPE: &str = "NVARCHAR(5000)";

/// A column's new value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// Bound through a generated parameter.
    Value(BindValue),
    /// SQL written into the statement as is. May reference caller binds (`$1`, `$name`) and,
    /// when replacements are given, `:name` / `?` replacements.
    Raw(String),
}

/// Ordered column -> value map. Setting a column twice keeps its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAssignments {
    entries: Vec<(String, ColumnValue)>,
}

impl ColumnAssignments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.set(column, ColumnValue::Value(value.into()))
    }

    #[must_use]
    pub fn raw(self, column: impl Into<String>, sql: impl Into<String>) -> Self {
        self.set(column, ColumnValue::Raw(sql.into()))
    }

    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: ColumnValue) -> Self {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnAssignments
where
    K: Into<String>,
    V: Into<BindValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (column, value)| acc.value(column, value))
    }
}

/// What executing an [`InsertQuery`] yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResultShape {
    /// Only an affected-row count.
    RowCount,
    /// Rows produced by RETURNING / OUTPUT / FINAL TABLE.
    ReturnedRows,
    /// A single row with the new identity value under `primary_key`.
    IdentityRow { primary_key: String },
}

/// A generated INSERT, its binds, and how to read its result.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub sql: String,
    pub bind: ResolvedBinds,
    pub result: InsertResultShape,
}

impl InsertQuery {
    /// Caller and generated binds as one collection.
    #[must_use]
    pub fn merged_bind(&self) -> BindCollection {
        self.bind.merged()
    }
}

enum RenderedValue {
    Bound {
        placeholder: String,
        sql_type: &'static str,
    },
    Raw(String),
}

impl RenderedValue {
    fn sql(&self) -> &str {
        match self {
            RenderedValue::Bound { placeholder, .. } => placeholder,
            RenderedValue::Raw(sql) => sql,
        }
    }
}

impl QueryGenerator {
    /// Build an INSERT for one row.
    ///
    /// Literal values become generated `$sequelize_N` binds in column order; raw values are
    /// copied into the statement. When the dialect has no returning clause and a key or
    /// returned columns are requested, the insert is wrapped in an identity procedure, or
    /// followed by a `LAST_INSERT_ID()` lookup where the engine keeps one per session.
    ///
    /// ```rust
    /// use sql_dialect::prelude::*;
    ///
    /// let generator = QueryGenerator::for_dialect(DialectKind::Postgres);
    /// let users = TableReference::parse("Users")?;
    /// let insert = generator.insert_query(
    ///     &users,
    ///     &ColumnAssignments::new().value("firstName", "Zoe"),
    ///     &InsertOptions::default(),
    /// )?;
    /// assert_eq!(insert.sql, r#"INSERT INTO "Users" ("firstName") VALUES ($sequelize_1);"#);
    /// # Ok::<(), SqlDialectError>(())
    /// ```
    ///
    /// # Errors
    /// Fails before producing SQL on reserved bind names, unsupported options, missing
    /// replacements, or an empty column list the dialect cannot express.
    pub fn insert_query(
        &self,
        table: &TableReference,
        values: &ColumnAssignments,
        options: &InsertOptions,
    ) -> Result<InsertQuery, SqlDialectError> {
        let caps = self.capabilities();
        assert_no_reserved_binds(options.bind.as_ref())?;
        reject_invalid_options(
            "insertQuery",
            caps,
            InsertOptions::SUPPORTABLE,
            &InsertOptions::supported(caps),
            &options.provided(),
        )?;
        if values.is_empty() && caps.empty_insert == EmptyInsertStyle::Unsupported {
            return Err(SqlDialectError::Unimplemented(format!(
                "insertQuery without columns on {}",
                caps.name()
            )));
        }

        let mut resolver = BindResolver::new(caps).with_replacements(options.replacements.as_ref());
        let mut columns = Vec::with_capacity(values.len());
        let mut rendered = Vec::with_capacity(values.len());
        for (column, value) in values.iter() {
            columns.push(column);
            rendered.push(match value {
                ColumnValue::Value(value) => RenderedValue::Bound {
                    sql_type: value.procedure_type(),
                    placeholder: resolver.bind(value.clone()),
                },
                ColumnValue::Raw(sql) => RenderedValue::Raw(resolver.raw(sql)?),
            });
        }

        let wants_identity = caps.returning == ReturningStyle::IdentityProcedure
            && (options.returning.is_requested() || options.primary_key.is_some());

        let (sql, result) = if wants_identity {
            let primary_key = options
                .primary_key
                .as_deref()
                .unwrap_or(DEFAULT_PRIMARY_KEY);
            let sql = self.identity_insert(
                table,
                &columns,
                &rendered,
                options.bind.as_ref(),
                &resolver,
                primary_key,
            )?;
            (
                sql,
                InsertResultShape::IdentityRow {
                    primary_key: primary_key.to_string(),
                },
            )
        } else if caps.returning == ReturningStyle::LastInsertId
            && let Some(primary_key) = options.primary_key.as_deref()
        {
            let (insert, _) = self.plain_insert(table, &columns, &rendered, options);
            let lookup = format!(
                "SELECT LAST_INSERT_ID() AS {};",
                self.quote_identifier(primary_key)
            );
            (
                join_sql_fragments([insert, lookup]),
                InsertResultShape::IdentityRow {
                    primary_key: primary_key.to_string(),
                },
            )
        } else {
            self.plain_insert(table, &columns, &rendered, options)
        };

        let bind = resolver.finish(options.bind.as_ref())?;
        Ok(InsertQuery {
            sql: self.emit("insertQuery", sql),
            bind,
            result,
        })
    }

    fn column_list(&self, columns: &[&str]) -> String {
        let quoted: Vec<String> = columns
            .iter()
            .map(|column| self.quote_identifier(column))
            .collect();
        format!("({})", quoted.join(","))
    }

    fn plain_insert(
        &self,
        table: &TableReference,
        columns: &[&str],
        rendered: &[RenderedValue],
        options: &InsertOptions,
    ) -> (String, InsertResultShape) {
        let caps = self.capabilities();
        let ignore = options
            .ignore_duplicates
            .then_some(caps.ignore_duplicates)
            .flatten();
        let keyword = match ignore {
            Some(IgnoreDuplicatesStyle::InsertIgnore) => "INSERT IGNORE INTO",
            Some(IgnoreDuplicatesStyle::InsertOrIgnore) => "INSERT OR IGNORE INTO",
            Some(IgnoreDuplicatesStyle::OnConflictDoNothing) | None => "INSERT INTO",
        };

        let (column_part, values_part) = if columns.is_empty() {
            match caps.empty_insert {
                EmptyInsertStyle::EmptyColumnList => (Some("()".to_string()), "VALUES ()".to_string()),
                EmptyInsertStyle::DefaultValues | EmptyInsertStyle::Unsupported => {
                    (None, "DEFAULT VALUES".to_string())
                }
            }
        } else {
            let values: Vec<&str> = rendered.iter().map(RenderedValue::sql).collect();
            (
                Some(self.column_list(columns)),
                format!("VALUES ({})", values.join(",")),
            )
        };

        let returned = self.returned_columns(options);
        let (output_clause, returning_clause) = match (&returned, caps.returning) {
            (Some(returned), ReturningStyle::Returning) => {
                (None, Some(format!("RETURNING {}", self.returned_list(returned, ""))))
            }
            (Some(returned), ReturningStyle::OutputInserted) => (
                Some(format!("OUTPUT {}", self.returned_list(returned, "INSERTED."))),
                None,
            ),
            _ => (None, None),
        };

        let statement = SqlFragments::new()
            .push(keyword)
            .push(self.quote_table(table))
            .push_opt(column_part)
            .push_opt(output_clause)
            .push(values_part)
            .push_if(
                ignore == Some(IgnoreDuplicatesStyle::OnConflictDoNothing),
                "ON CONFLICT DO NOTHING",
            )
            .push_opt(returning_clause)
            .join();

        match (returned, caps.returning) {
            (Some(_), ReturningStyle::FinalTable) => (
                format!("SELECT * FROM FINAL TABLE ({statement});"),
                InsertResultShape::ReturnedRows,
            ),
            (Some(_), ReturningStyle::Returning | ReturningStyle::OutputInserted) => (
                join_sql_fragments([statement.as_str(), ";"]),
                InsertResultShape::ReturnedRows,
            ),
            _ => (
                join_sql_fragments([statement.as_str(), ";"]),
                InsertResultShape::RowCount,
            ),
        }
    }

    /// Explicit `returning` wins; a bare primary key asks for that column alone.
    fn returned_columns(&self, options: &InsertOptions) -> Option<Returning> {
        if !self.capabilities().supports_returning() {
            return None;
        }
        if options.returning.is_requested() {
            return Some(options.returning.clone());
        }
        options
            .primary_key
            .as_ref()
            .map(|key| Returning::Columns(vec![key.clone()]))
    }

    fn returned_list(&self, returned: &Returning, prefix: &str) -> String {
        match returned {
            Returning::Columns(columns) if !columns.is_empty() => columns
                .iter()
                .map(|column| format!("{prefix}{}", self.quote_identifier(column)))
                .collect::<Vec<_>>()
                .join(", "),
            _ => format!("{prefix}*"),
        }
    }

    fn identity_insert(
        &self,
        table: &TableReference,
        columns: &[&str],
        rendered: &[RenderedValue],
        caller: Option<&BindCollection>,
        resolver: &BindResolver<'_>,
        primary_key: &str,
    ) -> Result<String, SqlDialectError> {
        let mut parameters = ProcedureParameters::default();
        let mut values = Vec::with_capacity(rendered.len());

        for (index, (column, value)) in columns.iter().zip(rendered).enumerate() {
            let sql = match value {
                RenderedValue::Bound {
                    placeholder,
                    sql_type,
                } => parameters.declare(column, index, sql_type, placeholder.clone()),
                RenderedValue::Raw(sql) => {
                    let type_of = |key: &str| {
                        caller
                            .and_then(|binds| binds.get(key))
                            .or_else(|| resolver.generated_value(key))
                            .map_or(DEFAULT_PROCEDURE_TYPE, BindValue::procedure_type)
                    };
                    match LONE_PLACEHOLDER.captures(sql).and_then(|c| c.get(1)) {
                        Some(key) => parameters.declare(
                            column,
                            index,
                            type_of(key.as_str()),
                            sql.clone(),
                        ),
                        None => parameters.declare_embedded(self, sql, &type_of)?,
                    }
                }
            };
            values.push(sql);
        }

        let insert = join_sql_fragments([
            "INSERT INTO".to_string(),
            self.quote_table(table),
            self.column_list(columns),
            format!("VALUES ({})", values.join(",")),
            ";".to_string(),
        ]);
        Ok(identity_insert_procedure(
            self.capabilities(),
            &insert,
            &parameters.list,
            primary_key,
        ))
    }
}

/// Names declared in a `DO (...)` header. Procedure parameter names are case-insensitive.
#[derive(Default)]
struct ProcedureParameters {
    list: Vec<ProcedureParameter>,
}

impl ProcedureParameters {
    fn is_taken(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(IDENTITY_VARIABLE)
            || self
                .list
                .iter()
                .any(|parameter| parameter.name.eq_ignore_ascii_case(name))
    }

    fn unique_name(&self, preferred: &str, fallback: String) -> String {
        let mut name = if PLAIN_NAME.is_match(preferred) && !self.is_taken(preferred) {
            preferred.to_string()
        } else {
            fallback
        };
        while self.is_taken(&name) {
            name.push('_');
        }
        name
    }

    /// Declare a parameter for `column` and return the `:name` reference to it.
    fn declare(
        &mut self,
        column: &str,
        index: usize,
        sql_type: &'static str,
        placeholder: String,
    ) -> String {
        let name = self.unique_name(column, format!("p{}", index + 1));
        let reference = format!(":{name}");
        self.list.push(ProcedureParameter {
            name,
            sql_type,
            placeholder,
        });
        reference
    }

    /// Replace bind placeholders inside a raw expression with declared parameters.
    fn declare_embedded(
        &mut self,
        generator: &QueryGenerator,
        sql: &str,
        type_of: &dyn Fn(&str) -> &'static str,
    ) -> Result<String, SqlDialectError> {
        let markers = live_markers(sql, generator.capabilities());
        let spliced = splice(sql, &markers, |marker| {
            let (key, placeholder) = match &marker.kind {
                MarkerKind::NamedBind(name) => (name.clone(), format!("${name}")),
                MarkerKind::PositionalBind(position) => {
                    (position.to_string(), format!("${position}"))
                }
                MarkerKind::NamedReplacement(_) | MarkerKind::PositionalReplacement => {
                    return Ok(None);
                }
            };
            if let Some(existing) = self
                .list
                .iter()
                .find(|parameter| parameter.placeholder == placeholder)
            {
                return Ok(Some(format!(":{}", existing.name)));
            }
            let name = self.unique_name("", format!("p{}", self.list.len() + 1));
            let reference = format!(":{name}");
            self.list.push(ProcedureParameter {
                name,
                sql_type: type_of(&key),
                placeholder,
            });
            Ok(Some(reference))
        });
        Ok(spliced?.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::Replacements;
    use crate::types::DialectKind;

    fn users() -> TableReference {
        TableReference::parse("Users").unwrap()
    }

    fn generator(kind: DialectKind) -> QueryGenerator {
        QueryGenerator::for_dialect(kind)
    }

    #[test]
    fn literal_values_follow_column_order() {
        let values = ColumnAssignments::new()
            .value("b", 2)
            .value("a", 1)
            .value("c", 3);
        let insert = generator(DialectKind::Postgres)
            .insert_query(&users(), &values, &InsertOptions::default())
            .unwrap();
        assert_eq!(
            insert.sql,
            "INSERT INTO \"Users\" (\"b\",\"a\",\"c\") VALUES ($sequelize_1,$sequelize_2,$sequelize_3);"
        );
        assert_eq!(
            insert.bind.generated(),
            &[
                ("sequelize_1".to_string(), BindValue::Int(2)),
                ("sequelize_2".to_string(), BindValue::Int(1)),
                ("sequelize_3".to_string(), BindValue::Int(3)),
            ]
        );
        assert_eq!(insert.result, InsertResultShape::RowCount);
    }

    #[test]
    fn returning_names_are_never_placeholders() {
        let values = ColumnAssignments::new().value("firstName", "Zoe");
        let options = InsertOptions::default()
            .returning(Returning::columns([":data"]))
            .replacements(Replacements::named([("data", "abc")]));

        let cases = [
            (
                DialectKind::Postgres,
                "INSERT INTO \"Users\" (\"firstName\") VALUES ($sequelize_1) RETURNING \":data\";",
            ),
            (
                DialectKind::Sqlite,
                "INSERT INTO `Users` (`firstName`) VALUES ($sequelize_1) RETURNING `:data`;",
            ),
            (
                DialectKind::Mssql,
                "INSERT INTO [Users] ([firstName]) OUTPUT INSERTED.[:data] VALUES ($sequelize_1);",
            ),
            (
                DialectKind::Db2,
                "SELECT * FROM FINAL TABLE (INSERT INTO \"Users\" (\"firstName\") VALUES ($sequelize_1));",
            ),
        ];
        for (kind, expected) in cases {
            let insert = generator(kind).insert_query(&users(), &values, &options).unwrap();
            assert_eq!(insert.sql, expected, "{kind}");
            assert_eq!(insert.result, InsertResultShape::ReturnedRows);
            assert_eq!(
                insert.merged_bind(),
                BindCollection::named([("sequelize_1", "Zoe")])
            );
        }
    }

    #[test]
    fn mysql_rejects_returning() {
        let err = generator(DialectKind::Mysql)
            .insert_query(
                &users(),
                &ColumnAssignments::new().value("a", 1),
                &InsertOptions::default().returning(Returning::All),
            )
            .unwrap_err();
        assert!(matches!(err, SqlDialectError::UnsupportedOption { options, .. } if options == vec!["returning"]));
    }

    #[test]
    fn ignore_duplicates_per_dialect() {
        let values = ColumnAssignments::new().value("a", 1);
        let options = InsertOptions::default().ignore_duplicates(true);
        assert_eq!(
            generator(DialectKind::Mysql)
                .insert_query(&users(), &values, &options)
                .unwrap()
                .sql,
            "INSERT IGNORE INTO `Users` (`a`) VALUES ($sequelize_1);"
        );
        assert_eq!(
            generator(DialectKind::Postgres)
                .insert_query(&users(), &values, &options.clone().primary_key("id"))
                .unwrap()
                .sql,
            "INSERT INTO \"Users\" (\"a\") VALUES ($sequelize_1) ON CONFLICT DO NOTHING RETURNING \"id\";"
        );
        assert!(
            generator(DialectKind::Hana)
                .insert_query(&users(), &values, &options)
                .is_err()
        );
    }

    #[test]
    fn empty_inserts() {
        let none = ColumnAssignments::new();
        let options = InsertOptions::default();
        assert_eq!(
            generator(DialectKind::Mssql)
                .insert_query(&users(), &none, &options.clone().returning(Returning::All))
                .unwrap()
                .sql,
            "INSERT INTO [Users] OUTPUT INSERTED.* DEFAULT VALUES;"
        );
        assert_eq!(
            generator(DialectKind::Mysql)
                .insert_query(&users(), &none, &options)
                .unwrap()
                .sql,
            "INSERT INTO `Users` () VALUES ();"
        );
        assert!(matches!(
            generator(DialectKind::Hana).insert_query(&users(), &none, &options),
            Err(SqlDialectError::Unimplemented(_))
        ));
    }

    #[test]
    fn hana_declares_raw_placeholders_in_the_header() {
        let values = ColumnAssignments::new()
            .raw("firstName", "$1")
            .value("lastName", "Doe");
        let insert = generator(DialectKind::Hana)
            .insert_query(
                &users(),
                &values,
                &InsertOptions::default()
                    .primary_key("id")
                    .bind(BindCollection::positional(["John"])),
            )
            .unwrap();
        assert!(insert.sql.starts_with(
            "DO (IN firstName NVARCHAR(5000) => $1, IN lastName NVARCHAR(5000) => $sequelize_1) BEGIN"
        ));
        assert!(
            insert
                .sql
                .contains("INSERT INTO \"Users\" (\"firstName\",\"lastName\") VALUES (:firstName,:lastName);")
        );
        assert_eq!(
            insert.result,
            InsertResultShape::IdentityRow {
                primary_key: "id".into()
            }
        );
    }

    #[test]
    fn hana_rewrites_embedded_placeholders() {
        let values = ColumnAssignments::new()
            .raw("total", "$price * $qty + $price")
            .value("note", 7);
        let insert = generator(DialectKind::Hana)
            .insert_query(
                &users(),
                &values,
                &InsertOptions::default()
                    .returning(Returning::All)
                    .bind(BindCollection::named([
                        ("price", BindValue::Float(1.5)),
                        ("qty", BindValue::Int(2)),
                    ])),
            )
            .unwrap();
        assert!(insert.sql.starts_with(
            "DO (IN p1 DOUBLE => $price, IN p2 BIGINT => $qty, IN note BIGINT => $sequelize_1) BEGIN"
        ));
        assert!(insert.sql.contains("VALUES (:p1 * :p2 + :p1,:note);"));
    }

    #[test]
    fn hana_without_key_request_is_a_plain_insert() {
        let insert = generator(DialectKind::Hana)
            .insert_query(
                &users(),
                &ColumnAssignments::new().value("a", true),
                &InsertOptions::default(),
            )
            .unwrap();
        assert_eq!(insert.sql, "INSERT INTO \"Users\" (\"a\") VALUES ($sequelize_1);");
    }
}
