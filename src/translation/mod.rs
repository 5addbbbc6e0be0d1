use std::borrow::Cow;

mod parsers;
mod scanner;

pub use scanner::{LiveMarker, MarkerKind};

use crate::bind::BindCollection;
use crate::dialect::DialectCapabilities;
use crate::error::SqlDialectError;
use crate::types::BindValue;

/// Native placeholder syntax of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// PostgreSQL-style numbered placeholders like `$1`.
    Numbered,
    /// SQLite-style named placeholders like `$name`.
    DollarNamed,
    /// SQL Server-style named placeholders like `@name`.
    AtNamed,
    /// Anonymous `?` placeholders, one value per occurrence.
    Question,
}

/// Parameters in the shape the dialect's driver expects.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalParams {
    Positional(Vec<BindValue>),
    Named(Vec<(String, BindValue)>),
}

impl FinalParams {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FinalParams::Positional(values) => values.len(),
            FinalParams::Named(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SQL text rewritten into native placeholder syntax plus the values it references.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalQuery {
    pub sql: String,
    pub params: FinalParams,
}

/// The parts of a dialect's lexical rules that decide where a literal ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRules {
    pub identifier_quotes: (char, char),
    /// `\` escapes the next byte inside string literals.
    pub backslash_escapes: bool,
}

impl From<&DialectCapabilities> for QuoteRules {
    fn from(capabilities: &DialectCapabilities) -> Self {
        Self {
            identifier_quotes: capabilities.identifier_quotes,
            backslash_escapes: capabilities.backslash_escapes,
        }
    }
}

/// Every placeholder or replacement marker in an executable position of `sql`.
#[must_use]
pub fn live_markers(sql: &str, rules: impl Into<QuoteRules>) -> Vec<LiveMarker> {
    let rules = rules.into();
    scanner::scan(sql, rules.identifier_quotes, rules.backslash_escapes)
}

/// Keys of the bind parameters `sql` actually references, in order of first appearance.
///
/// Positional `$1` markers are reported as `"1"` to match merged bind keys.
#[must_use]
pub fn live_bind_keys(sql: &str, rules: impl Into<QuoteRules>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for marker in live_markers(sql, rules) {
        if let Some(key) = bind_key(&marker.kind)
            && !keys.iter().any(|k| *k == key)
        {
            keys.push(key);
        }
    }
    keys
}

fn bind_key(kind: &MarkerKind) -> Option<String> {
    match kind {
        MarkerKind::NamedBind(name) => Some(name.clone()),
        MarkerKind::PositionalBind(position) => Some(position.to_string()),
        MarkerKind::NamedReplacement(_) | MarkerKind::PositionalReplacement => None,
    }
}

/// Replace each selected marker with the text returned by `replace`.
///
/// Returns a borrowed `Cow` when nothing was replaced.
pub(crate) fn splice<'a, F>(
    sql: &'a str,
    markers: &[LiveMarker],
    mut replace: F,
) -> Result<Cow<'a, str>, SqlDialectError>
where
    F: FnMut(&LiveMarker) -> Result<Option<String>, SqlDialectError>,
{
    let mut out: Option<String> = None;
    let mut copied_to = 0;

    for marker in markers {
        if let Some(replacement) = replace(marker)? {
            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
            buf.push_str(&sql[copied_to..marker.start]);
            buf.push_str(&replacement);
            copied_to = marker.end;
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Ok(Cow::Owned(buf))
        }
        None => Ok(Cow::Borrowed(sql)),
    }
}

/// Rewrite canonical `$name` / `$n` placeholders into the dialect's native syntax.
///
/// Only live placeholders are considered; text inside literals, quoted identifiers, comments,
/// or dollar-quoted blocks is left alone. Binds that the statement never references are not
/// passed on.
///
/// # Errors
/// Returns [`SqlDialectError::MissingBindParameter`] when a live placeholder has no value.
pub fn finalize_query(
    sql: &str,
    binds: &BindCollection,
    capabilities: &DialectCapabilities,
) -> Result<FinalQuery, SqlDialectError> {
    let markers: Vec<LiveMarker> = live_markers(sql, capabilities)
        .into_iter()
        .filter(|marker| bind_key(&marker.kind).is_some())
        .collect();

    let lookup = |key: &str| -> Result<BindValue, SqlDialectError> {
        binds
            .get(key)
            .cloned()
            .ok_or_else(|| SqlDialectError::MissingBindParameter(key.to_string()))
    };

    let style = capabilities.placeholder_style;
    let mut named: Vec<(String, BindValue)> = Vec::new();
    let mut positional: Vec<BindValue> = Vec::new();
    let mut numbered_keys: Vec<String> = Vec::new();

    let rewritten = splice(sql, &markers, |marker| {
        let Some(key) = bind_key(&marker.kind) else {
            return Ok(None);
        };
        let value = lookup(&key)?;
        let text = match style {
            PlaceholderStyle::Numbered => {
                let slot = match numbered_keys.iter().position(|k| *k == key) {
                    Some(slot) => slot,
                    None => {
                        numbered_keys.push(key.clone());
                        positional.push(value);
                        numbered_keys.len() - 1
                    }
                };
                format!("${}", slot + 1)
            }
            PlaceholderStyle::Question => {
                positional.push(value);
                "?".to_string()
            }
            PlaceholderStyle::DollarNamed | PlaceholderStyle::AtNamed => {
                let name = native_name(&key);
                if !named.iter().any(|(existing, _)| *existing == name) {
                    named.push((name.clone(), value));
                }
                if style == PlaceholderStyle::AtNamed {
                    format!("@{name}")
                } else {
                    format!("${name}")
                }
            }
        };
        Ok(Some(text))
    })?;

    let params = match style {
        PlaceholderStyle::Numbered | PlaceholderStyle::Question => FinalParams::Positional(positional),
        PlaceholderStyle::DollarNamed | PlaceholderStyle::AtNamed => FinalParams::Named(named),
    };

    Ok(FinalQuery {
        sql: rewritten.into_owned(),
        params,
    })
}

/// Named styles cannot start a parameter with a digit, so `$1` becomes `p1`.
fn native_name(key: &str) -> String {
    if key.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        format!("p{key}")
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DialectKind;

    fn caps(kind: DialectKind) -> DialectCapabilities {
        DialectCapabilities::for_dialect(kind)
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '$1', $a -- $b\n/* $c */ from t where x = \"$d\"";
        assert_eq!(live_bind_keys(sql, &caps(DialectKind::Postgres)), vec!["a".to_string()]);
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select $1 from t $foo$ where a = $2";
        assert_eq!(live_bind_keys(sql, &caps(DialectKind::Postgres)), vec!["2".to_string()]);
    }

    #[test]
    fn skips_bracket_identifiers_for_sql_server() {
        let sql = "INSERT INTO [a$b] ([$x]) VALUES ($y)";
        assert_eq!(live_bind_keys(sql, &caps(DialectKind::Mssql)), vec!["y".to_string()]);
    }

    #[test]
    fn backslash_escaped_quotes_stay_inside_mysql_literals() {
        let sql = r"SELECT 'it\'s $x', $y";
        assert_eq!(live_bind_keys(sql, &caps(DialectKind::Mysql)), vec!["y".to_string()]);
        // Without backslash escapes the same text closes the literal early.
        let sql = r"SELECT 'it\'s $x'";
        assert_eq!(live_bind_keys(sql, &caps(DialectKind::Postgres)), vec!["x".to_string()]);
    }

    #[test]
    fn ignores_casts_and_glued_dollars() {
        let markers = live_markers("select a::int, price$1, :name", &caps(DialectKind::Postgres));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::NamedReplacement("name".into()));
    }

    #[test]
    fn numbers_named_binds_for_postgres() {
        let binds = BindCollection::named([
            ("firstName", BindValue::from("John")),
            ("sequelize_1", BindValue::from("Doe")),
        ]);
        let out = finalize_query(
            "INSERT INTO \"Users\" (\"a\",\"b\",\"c\") VALUES ($firstName,$sequelize_1,$firstName);",
            &binds,
            &caps(DialectKind::Postgres),
        )
        .unwrap();
        assert_eq!(
            out.sql,
            "INSERT INTO \"Users\" (\"a\",\"b\",\"c\") VALUES ($1,$2,$1);"
        );
        assert_eq!(
            out.params,
            FinalParams::Positional(vec![BindValue::from("John"), BindValue::from("Doe")])
        );
    }

    #[test]
    fn question_style_repeats_values() {
        let binds = BindCollection::named([("a", BindValue::Int(1))]);
        let out = finalize_query("SELECT $a, $a", &binds, &caps(DialectKind::Mysql)).unwrap();
        assert_eq!(out.sql, "SELECT ?, ?");
        assert_eq!(
            out.params,
            FinalParams::Positional(vec![BindValue::Int(1), BindValue::Int(1)])
        );
    }

    #[test]
    fn at_named_style_renames_positional_keys() {
        let binds = BindCollection::named([("1", BindValue::Int(7)), ("unused", BindValue::Null)]);
        let out = finalize_query("SELECT $1", &binds, &caps(DialectKind::Mssql)).unwrap();
        assert_eq!(out.sql, "SELECT @p1");
        assert_eq!(
            out.params,
            FinalParams::Named(vec![("p1".to_string(), BindValue::Int(7))])
        );
    }

    #[test]
    fn missing_bind_is_an_error() {
        let err = finalize_query(
            "SELECT $nope",
            &BindCollection::default(),
            &caps(DialectKind::Sqlite),
        )
        .unwrap_err();
        assert!(matches!(err, SqlDialectError::MissingBindParameter(name) if name == "nope"));
    }
}
