//! Tabular action data consumed by the report writers

use crate::Result;
use crate::error::LayoutError;
use std::collections::HashMap;
use tracing::trace;

/// One action keyed by column label
pub type ActionRow = HashMap<String, Option<String>>;

/// Column-labelled table with one row per action
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Labels produced by each report field, in column order
    pub field_labels: HashMap<String, Vec<String>>,
}

impl ActionTable {
    /// Create an empty table with the given column labels
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            field_labels: HashMap::new(),
        }
    }

    /// Record that a report field produced a column label
    pub fn with_field_label<F: Into<String>, L: Into<String>>(mut self, field: F, label: L) -> Self {
        self.field_labels
            .entry(field.into())
            .or_default()
            .push(label.into());
        self
    }

    /// Add an action row, values in column order
    pub fn add_row<S: Into<String>>(mut self, values: impl IntoIterator<Item = Option<S>>) -> Self {
        let row: Vec<Option<String>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        trace!("Adding action row with {} values", row.len());
        self.rows.push(row);
        self
    }

    /// Number of action rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Validate table structure
    pub fn validate(&self) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(LayoutError::InvalidRow(format!(
                    "Action row {} has {} values, expected {}",
                    i,
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        for (field, labels) in &self.field_labels {
            if let Some(label) = labels.iter().find(|l| !self.columns.contains(l)) {
                return Err(LayoutError::InvalidRow(format!(
                    "Field {field} refers to missing column {label}"
                )));
            }
        }
        Ok(())
    }

    /// All column labels a report field produced
    pub fn column_labels(&self, field: &str) -> Result<&[String]> {
        self.field_labels
            .get(field)
            .map(|labels| labels.as_slice())
            .ok_or_else(|| LayoutError::UnknownField(field.to_string()))
    }

    /// The column label of a field that must produce exactly one column
    pub fn single_field_label(&self, field: &str) -> Result<&str> {
        match self.column_labels(field)? {
            [label] => Ok(label.as_str()),
            labels => Err(LayoutError::AmbiguousField {
                field: field.to_string(),
                count: labels.len(),
            }),
        }
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|v| v.as_deref()))
    }

    /// Rows as label-keyed maps
    pub fn iter_named_rows(&self) -> impl Iterator<Item = ActionRow> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect::<ActionRow>()
        })
    }
}
