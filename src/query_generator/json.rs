use lazy_static::lazy_static;
use regex::Regex;

use crate::dialect::JsonExtractionStyle;

use super::QueryGenerator;

lazy_static! {
    static ref BARE_KEY: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for JsonPathSegment {
    fn from(key: &str) -> Self {
        JsonPathSegment::Key(key.to_string())
    }
}

impl From<String> for JsonPathSegment {
    fn from(key: String) -> Self {
        JsonPathSegment::Key(key)
    }
}

impl From<usize> for JsonPathSegment {
    fn from(index: usize) -> Self {
        JsonPathSegment::Index(index)
    }
}

/// SQL/JSON path text for `path`: `$.a[0]."b c"`.
///
/// Keys that are not plain identifiers are double-quoted with `"` and `\` backslash-escaped.
#[must_use]
pub fn build_json_path(path: &[JsonPathSegment]) -> String {
    let mut out = String::from("$");
    for segment in path {
        match segment {
            JsonPathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            JsonPathSegment::Key(key) if BARE_KEY.is_match(key) => {
                out.push('.');
                out.push_str(key);
            }
            JsonPathSegment::Key(key) => {
                out.push_str(".\"");
                for c in key.chars() {
                    if matches!(c, '"' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
            }
        }
    }
    out
}

impl QueryGenerator {
    /// Expression reading `path` out of the JSON in `expression`.
    ///
    /// `expression` is raw SQL and is copied as is; the path is always written as an escaped
    /// literal. With `unquote` the result is the scalar's SQL text rather than JSON.
    #[must_use]
    pub fn json_path_extraction_query(
        &self,
        expression: &str,
        path: &[JsonPathSegment],
        unquote: bool,
    ) -> String {
        match self.capabilities().json_extraction {
            JsonExtractionStyle::PathOperators => match path {
                [single] => {
                    let operator = if unquote { "->>" } else { "->" };
                    let step = match single {
                        JsonPathSegment::Key(key) => self.escape(key),
                        JsonPathSegment::Index(index) => index.to_string(),
                    };
                    format!("{expression}{operator}{step}")
                }
                _ => {
                    let operator = if unquote { "#>>" } else { "#>" };
                    format!("{expression}{operator}{}", self.text_array(path))
                }
            },
            JsonExtractionStyle::ArrowJsonPath => {
                let operator = if unquote { "->>" } else { "->" };
                format!("{expression}{operator}{}", self.escape(&build_json_path(path)))
            }
            JsonExtractionStyle::ExtractFunction => {
                let extract = format!(
                    "json_extract({expression},{})",
                    self.escape(&build_json_path(path))
                );
                if unquote {
                    format!("json_unquote({extract})")
                } else {
                    extract
                }
            }
            JsonExtractionStyle::SqlStandard => {
                let function = if unquote { "JSON_VALUE" } else { "JSON_QUERY" };
                format!(
                    "{function}({expression}, {})",
                    self.escape(&build_json_path(path))
                )
            }
        }
    }

    /// Expression turning the JSON scalar in `expression` into plain SQL text.
    #[must_use]
    pub fn format_unquote_json(&self, expression: &str) -> String {
        match self.capabilities().json_extraction {
            JsonExtractionStyle::PathOperators => {
                format!("{expression}#>>{}", self.text_array(&[]))
            }
            JsonExtractionStyle::ArrowJsonPath => format!("{expression}->>'$'"),
            JsonExtractionStyle::ExtractFunction => format!("json_unquote({expression})"),
            JsonExtractionStyle::SqlStandard => format!("JSON_VALUE({expression}, '$')"),
        }
    }

    fn text_array(&self, path: &[JsonPathSegment]) -> String {
        let items: Vec<String> = path
            .iter()
            .map(|segment| match segment {
                JsonPathSegment::Key(key) => self.escape(key),
                JsonPathSegment::Index(index) => self.escape(&index.to_string()),
            })
            .collect();
        format!("ARRAY[{}]::VARCHAR(255)[]", items.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DialectKind;

    fn path() -> Vec<JsonPathSegment> {
        vec!["address".into(), 0.into(), "it's \"x\"".into()]
    }

    #[test]
    fn paths_quote_keys_that_are_not_identifiers() {
        assert_eq!(build_json_path(&[]), "$");
        assert_eq!(
            build_json_path(&path()),
            r#"$.address[0]."it's \"x\"""#
        );
        assert_eq!(build_json_path(&[r"a\b".into()]), r#"$."a\\b""#);
    }

    #[test]
    fn extraction_per_dialect() {
        let cases = [
            (
                DialectKind::Postgres,
                r#"data#>ARRAY['address','0','it''s "x"']::VARCHAR(255)[]"#,
                r#"data#>>ARRAY['address','0','it''s "x"']::VARCHAR(255)[]"#,
            ),
            (
                DialectKind::Sqlite,
                r#"data->'$.address[0]."it''s \"x\""'"#,
                r#"data->>'$.address[0]."it''s \"x\""'"#,
            ),
            (
                DialectKind::Mysql,
                r#"json_extract(data,'$.address[0]."it''s \\"x\\""')"#,
                r#"json_unquote(json_extract(data,'$.address[0]."it''s \\"x\\""'))"#,
            ),
            (
                DialectKind::Hana,
                r#"JSON_QUERY(data, '$.address[0]."it''s \"x\""')"#,
                r#"JSON_VALUE(data, '$.address[0]."it''s \"x\""')"#,
            ),
        ];
        for (kind, quoted, unquoted) in cases {
            let generator = QueryGenerator::for_dialect(kind);
            assert_eq!(generator.json_path_extraction_query("data", &path(), false), quoted, "{kind}");
            assert_eq!(generator.json_path_extraction_query("data", &path(), true), unquoted, "{kind}");
        }
    }

    #[test]
    fn single_step_uses_arrow_operators_on_postgres() {
        let generator = QueryGenerator::for_dialect(DialectKind::Postgres);
        assert_eq!(
            generator.json_path_extraction_query("data", &["name".into()], true),
            "data->>'name'"
        );
        assert_eq!(
            generator.json_path_extraction_query("data", &[2.into()], false),
            "data->2"
        );
    }

    #[test]
    fn unquote_json_per_dialect() {
        let expected = [
            (DialectKind::Postgres, "data#>>ARRAY[]::VARCHAR(255)[]"),
            (DialectKind::Sqlite, "data->>'$'"),
            (DialectKind::Mysql, "json_unquote(data)"),
            (DialectKind::Mssql, "JSON_VALUE(data, '$')"),
            (DialectKind::Hana, "JSON_VALUE(data, '$')"),
        ];
        for (kind, sql) in expected {
            assert_eq!(QueryGenerator::for_dialect(kind).format_unquote_json("data"), sql);
        }
    }
}
