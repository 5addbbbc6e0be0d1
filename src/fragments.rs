//! Assembling clause fragments into a single statement.

fn wants_no_leading_space(fragment: &str) -> bool {
    fragment.starts_with([';', ',', ')'])
}

fn wants_no_trailing_space(fragment: &str) -> bool {
    fragment.ends_with('(')
}

/// Join SQL fragments with single spaces.
///
/// Empty and whitespace-only fragments are dropped, every fragment is trimmed, and no space is
/// inserted before a fragment starting with `;`, `,` or `)` or after one ending with `(`.
/// ```rust
/// use sql_dialect::join_sql_fragments;
///
/// let sql = join_sql_fragments(["DROP TABLE", " \"t\" ", "", ";"]);
/// assert_eq!(sql, "DROP TABLE \"t\";");
/// ```
pub fn join_sql_fragments<I>(fragments: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    let mut skip_next_space = true;

    for fragment in fragments {
        let part = fragment.as_ref().trim();
        if part.is_empty() {
            continue;
        }
        if !skip_next_space && !wants_no_leading_space(part) {
            out.push(' ');
        }
        out.push_str(part);
        skip_next_space = wants_no_trailing_space(part);
    }

    out
}

/// Ordered fragment list for statements with optional clauses.
#[derive(Debug, Default, Clone)]
pub struct SqlFragments {
    parts: Vec<String>,
}

impl SqlFragments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(mut self, fragment: impl Into<String>) -> Self {
        self.parts.push(fragment.into());
        self
    }

    #[must_use]
    pub fn push_if(self, condition: bool, fragment: impl Into<String>) -> Self {
        if condition { self.push(fragment) } else { self }
    }

    #[must_use]
    pub fn push_opt(self, fragment: Option<impl Into<String>>) -> Self {
        match fragment {
            Some(fragment) => self.push(fragment),
            None => self,
        }
    }

    #[must_use]
    pub fn join(&self) -> String {
        join_sql_fragments(&self.parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(join_sql_fragments(Vec::<&str>::new()), "");
        assert_eq!(join_sql_fragments(["", "   "]), "");
    }

    #[test]
    fn punctuation_hugs_neighbours() {
        let sql = join_sql_fragments(["SELECT a", ", b", "FROM t WHERE x IN (", "1", ")", ";"]);
        assert_eq!(sql, "SELECT a, b FROM t WHERE x IN (1);");
    }

    #[test]
    fn rejoining_is_stable() {
        let fragments = ["  IF :n > 0 THEN", "EXEC 'DROP TABLE \"x\"';", "", "END IF;"];
        let once = join_sql_fragments(fragments);
        let twice = join_sql_fragments(once.split(' '));
        assert_eq!(once, twice);
        assert_eq!(join_sql_fragments([once.as_str()]), once);
    }

    #[test]
    fn builder_skips_absent_clauses() {
        let sql = SqlFragments::new()
            .push("DROP TABLE \"t\"")
            .push_if(false, "CASCADE")
            .push_opt(None::<String>)
            .push(";")
            .join();
        assert_eq!(sql, "DROP TABLE \"t\";");
    }
}
