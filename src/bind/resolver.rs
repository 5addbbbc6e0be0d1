use crate::dialect::DialectCapabilities;
use crate::error::SqlDialectError;
use crate::translation::{MarkerKind, QuoteRules, live_markers, splice};
use crate::types::BindValue;

use super::{BindCollection, RESERVED_BIND_PREFIX, Replacements};

/// Mints `sequelize_1`, `sequelize_2`, ... for a single generation call.
#[derive(Debug, Default)]
pub struct ParameterCounter {
    last: u32,
}

impl ParameterCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        self.last += 1;
        format!("{RESERVED_BIND_PREFIX}{}", self.last)
    }
}

/// Reject caller binds that use the generated-name prefix.
///
/// Positional binds are keyed by index and cannot collide.
///
/// # Errors
/// Returns [`SqlDialectError::ReservedBindName`] naming the prefix.
pub fn assert_no_reserved_binds(binds: Option<&BindCollection>) -> Result<(), SqlDialectError> {
    if let Some(BindCollection::Named(entries)) = binds
        && entries
            .iter()
            .any(|(name, _)| name.starts_with(RESERVED_BIND_PREFIX))
    {
        return Err(SqlDialectError::ReservedBindName(
            RESERVED_BIND_PREFIX.to_string(),
        ));
    }
    Ok(())
}

/// Caller binds and generated binds, kept apart until the statement is handed off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBinds {
    caller: Option<BindCollection>,
    generated: Vec<(String, BindValue)>,
}

impl ResolvedBinds {
    #[must_use]
    pub fn caller(&self) -> Option<&BindCollection> {
        self.caller.as_ref()
    }

    #[must_use]
    pub fn generated(&self) -> &[(String, BindValue)] {
        &self.generated
    }

    /// Flat view: caller entries first (positional ones keyed `"1"`, `"2"`, ...), then
    /// generated entries. Keys are disjoint because generated names carry the reserved prefix.
    #[must_use]
    pub fn merged(&self) -> BindCollection {
        let mut entries = self
            .caller
            .as_ref()
            .map(BindCollection::entries)
            .unwrap_or_default();
        entries.extend(self.generated.iter().cloned());
        BindCollection::Named(entries)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.caller.as_ref().is_none_or(BindCollection::is_empty)
    }
}

/// Turns literal values into generated placeholders and folds replacements into binds.
///
/// One resolver serves one generation call; its counter is never shared.
pub struct BindResolver<'a> {
    counter: ParameterCounter,
    generated: Vec<(String, BindValue)>,
    quote_rules: QuoteRules,
    replacements: Option<&'a Replacements>,
    next_positional_replacement: usize,
}

impl<'a> BindResolver<'a> {
    #[must_use]
    pub fn new(capabilities: &DialectCapabilities) -> Self {
        Self {
            counter: ParameterCounter::new(),
            generated: Vec::new(),
            quote_rules: QuoteRules::from(capabilities),
            replacements: None,
            next_positional_replacement: 0,
        }
    }

    #[must_use]
    pub fn with_replacements(mut self, replacements: Option<&'a Replacements>) -> Self {
        self.replacements = replacements;
        self
    }

    /// Register a literal value and return the placeholder that stands for it.
    pub fn bind(&mut self, value: BindValue) -> String {
        let name = self.counter.next_name();
        let placeholder = format!("${name}");
        self.generated.push((name, value));
        placeholder
    }

    pub(crate) fn generated_value(&self, name: &str) -> Option<&BindValue> {
        self.generated
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Pass a raw SQL expression through, binding any replacement markers it contains.
    ///
    /// Without replacements the expression is returned untouched.
    ///
    /// # Errors
    /// Returns [`SqlDialectError::MissingReplacement`] when a marker has no value.
    pub fn raw(&mut self, sql: &str) -> Result<String, SqlDialectError> {
        let Some(replacements) = self.replacements else {
            return Ok(sql.to_string());
        };

        let markers = live_markers(sql, self.quote_rules);
        let rewritten = splice(sql, &markers, |marker| {
            let value = match (&marker.kind, replacements) {
                (MarkerKind::NamedReplacement(name), Replacements::Named(entries)) => entries
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| SqlDialectError::MissingReplacement(format!(":{name}")))?,
                (MarkerKind::PositionalReplacement, Replacements::Positional(values)) => {
                    let index = self.next_positional_replacement;
                    self.next_positional_replacement += 1;
                    values.get(index).cloned().ok_or_else(|| {
                        SqlDialectError::MissingReplacement(format!("?{}", index + 1))
                    })?
                }
                _ => return Ok(None),
            };
            Ok(Some(self.bind(value)))
        })?;
        Ok(rewritten.into_owned())
    }

    /// Validate caller binds and pair them with everything generated so far.
    ///
    /// # Errors
    /// Returns [`SqlDialectError::ReservedBindName`] when a caller key uses the reserved prefix.
    pub fn finish(self, caller: Option<&BindCollection>) -> Result<ResolvedBinds, SqlDialectError> {
        assert_no_reserved_binds(caller)?;
        Ok(ResolvedBinds {
            caller: caller.cloned(),
            generated: self.generated,
        })
    }
}
