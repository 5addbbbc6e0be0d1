//! Bind collections, replacements, and the resolver that merges caller and generated binds.

mod resolver;

pub use resolver::{BindResolver, ParameterCounter, ResolvedBinds, assert_no_reserved_binds};

use crate::types::BindValue;

/// Prefix of every bind name minted by the generator. Callers may not use it.
pub const RESERVED_BIND_PREFIX: &str = "sequelize_";

/// Caller-supplied bind parameters.
///
/// Positional values are referenced as `$1`, `$2`, ... and named values as `$name`:
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let positional = BindCollection::positional(["John"]);
/// let named = BindCollection::named([("firstName", "John")]);
/// assert_eq!(positional.get("1"), named.get("firstName"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BindCollection {
    Positional(Vec<BindValue>),
    Named(Vec<(String, BindValue)>),
}

impl Default for BindCollection {
    fn default() -> Self {
        BindCollection::Named(Vec::new())
    }
}

impl BindCollection {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        BindCollection::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build a named collection; a repeated key keeps the last value.
    pub fn named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<BindValue>,
    {
        let mut out: Vec<(String, BindValue)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        BindCollection::Named(out)
    }

    /// Look up a value by merged key. Positional entries use their 1-based index as key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BindValue> {
        match self {
            BindCollection::Positional(values) => key
                .parse::<usize>()
                .ok()
                .and_then(|position| position.checked_sub(1))
                .and_then(|index| values.get(index)),
            BindCollection::Named(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
        }
    }

    /// Keys in order: `"1"`, `"2"`, ... for positional collections, names otherwise.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            BindCollection::Positional(values) => {
                (1..=values.len()).map(|position| position.to_string()).collect()
            }
            BindCollection::Named(entries) => entries.iter().map(|(name, _)| name.clone()).collect(),
        }
    }

    /// Flatten into `(key, value)` pairs using the merged key convention.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, BindValue)> {
        match self {
            BindCollection::Positional(values) => values
                .iter()
                .enumerate()
                .map(|(index, value)| ((index + 1).to_string(), value.clone()))
                .collect(),
            BindCollection::Named(entries) => entries.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            BindCollection::Positional(values) => values.len(),
            BindCollection::Named(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Values substituted for `:name` or `?` markers inside raw SQL expressions.
///
/// Replacements never reach the SQL text as literals; each one becomes a generated bind.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacements {
    Positional(Vec<BindValue>),
    Named(Vec<(String, BindValue)>),
}

impl Replacements {
    pub fn named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<BindValue>,
    {
        Replacements::Named(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        Replacements::Positional(values.into_iter().map(Into::into).collect())
    }
}
