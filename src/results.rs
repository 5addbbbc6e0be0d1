use std::collections::HashMap;
use std::sync::Arc;

use crate::types::BindValue;

/// A row handed back by the execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Shared with every other row of the same set.
    pub column_names: Arc<Vec<String>>,
    pub values: Vec<BindValue>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultRow {
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Value under `column_name`, or `None` if the row has no such column.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&BindValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&BindValue> {
        self.values.get(index)
    }
}

/// Rows and affected-row count reported for one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub results: Vec<ResultRow>,
    /// Rows changed by DML, or rows added through `add_row_values`.
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            ..ResultSet::default()
        }
    }

    /// Result of a statement that returns no rows.
    #[must_use]
    pub fn affected(rows_affected: usize) -> ResultSet {
        ResultSet {
            rows_affected,
            ..ResultSet::default()
        }
    }

    /// Set the column names shared by every row added afterwards.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect(),
        );
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row. Ignored until column names have been set.
    pub fn add_row_values(&mut self, row_values: Vec<BindValue>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(ResultRow {
                column_names: column_names.clone(),
                values: row_values,
                column_index: self.column_index.clone(),
            });
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&ResultRow> {
        self.results.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
