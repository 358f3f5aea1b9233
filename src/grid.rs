//! Grid layout calculation for action summaries
//!
//! Each field of an action gets a column width from the width table based on
//! the longest value any action has for it. Fields are then packed greedily,
//! left to right, into rows of `max_columns` columns. The same grid is used
//! for every action of a report.

use crate::Result;
use crate::dataset::ActionTable;
use crate::error::LayoutError;
use serde_json::Value;
use tracing::{debug, trace};

/// One `width_needed` entry: values up to `max_chars` characters need
/// `columns` columns. A `None` threshold never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthEntry {
    pub max_chars: Option<usize>,
    pub columns: usize,
}

/// Lookup from character count to column width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthTable {
    pub entries: Vec<WidthEntry>,
    pub max_columns: usize,
}

impl WidthTable {
    /// Create a width table from parsed entries
    pub fn new(entries: Vec<WidthEntry>, max_columns: usize) -> Self {
        Self {
            entries,
            max_columns,
        }
    }

    /// Parse the JSON form `[[threshold | null, columns], ...]`
    pub fn from_json(value: &Value, max_columns: usize) -> Result<Self> {
        let invalid = |reason: String| LayoutError::InvalidCustomization(format!("width_needed {reason}"));

        let list = value
            .as_array()
            .ok_or_else(|| invalid("is not a list".to_string()))?;
        if list.is_empty() {
            return Err(invalid("is empty".to_string()));
        }

        let mut entries = Vec::with_capacity(list.len());
        for (i, item) in list.iter().enumerate() {
            let pair = match item.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                _ => return Err(invalid(format!("entry {i} is not a [chars, columns] pair"))),
            };
            let max_chars = match &pair[0] {
                Value::Null => None,
                v => Some(
                    v.as_u64()
                        .ok_or_else(|| invalid(format!("entry {i} has an invalid threshold")))?
                        as usize,
                ),
            };
            let columns = pair[1]
                .as_u64()
                .filter(|c| *c > 0)
                .ok_or_else(|| invalid(format!("entry {i} has an invalid column count")))?
                as usize;
            entries.push(WidthEntry { max_chars, columns });
        }

        Ok(Self::new(entries, max_columns))
    }

    /// Columns needed for a value of `length` characters.
    ///
    /// The first entry whose threshold is at least `length` wins; without a
    /// match the field takes a full row. Widths never exceed `max_columns`.
    pub fn columns_for(&self, length: usize) -> usize {
        self.entries
            .iter()
            .find(|e| e.max_chars.is_some_and(|max| max >= length))
            .map(|e| e.columns)
            .unwrap_or(self.max_columns)
            .min(self.max_columns)
    }
}

/// A field placed in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridField {
    pub label: String,
    pub columns: usize,
}

/// Row-by-row packing of field labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: Vec<Vec<GridField>>,
}

impl GridLayout {
    /// Columns consumed by a row
    pub fn row_width(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map(|fields| fields.iter().map(|f| f.columns).sum())
            .unwrap_or(0)
    }

    /// Labels of a row
    pub fn row_labels(&self, row: usize) -> impl Iterator<Item = &str> {
        self.rows
            .get(row)
            .into_iter()
            .flatten()
            .map(|f| f.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Each column label with the character count of its longest value.
/// Null values count as zero.
pub fn keys_with_total_length(table: &ActionTable) -> Vec<(String, usize)> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let longest = table
                .column_values(i)
                .map(|v| v.map_or(0, |s| s.chars().count()))
                .max()
                .unwrap_or(0);
            (label.clone(), longest)
        })
        .collect()
}

/// Pack fields into rows of at most `widths.max_columns` columns
pub fn build_grid_layout(
    keys: &[(String, usize)],
    excluded: &[&str],
    widths: &WidthTable,
) -> GridLayout {
    let max_columns = widths.max_columns;
    let mut rows = Vec::new();
    let mut current_row: Vec<GridField> = Vec::new();
    let mut cols_left_in_row = max_columns;

    for (label, length) in keys {
        if excluded.contains(&label.as_str()) {
            continue;
        }
        let columns = widths.columns_for(*length);
        trace!("Field {} ({} chars) needs {} columns", label, length, columns);

        if columns > cols_left_in_row {
            if !current_row.is_empty() {
                rows.push(std::mem::take(&mut current_row));
            }
            cols_left_in_row = max_columns;
        }
        current_row.push(GridField {
            label: label.clone(),
            columns,
        });
        cols_left_in_row -= columns;
    }
    if !current_row.is_empty() {
        rows.push(current_row);
    }

    debug!(
        "Built grid layout with {} rows for {} fields",
        rows.len(),
        keys.len()
    );
    GridLayout { rows }
}
