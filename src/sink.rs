//! Spreadsheet output abstraction
//!
//! Report writers talk to a `WorkbookSink`, which hands out one `SheetSink`
//! per worksheet. The xlsx backend lives in `crate::xlsx`; the in-memory
//! backend here records everything written, for callers that want the raw
//! layout and for tests.

use crate::Result;
use crate::sheet::{Cell, FormatTag};
use std::collections::BTreeMap;
use tracing::trace;

/// A worksheet that accepts positioned writes
pub trait SheetSink {
    /// Write a value (or a formatted blank) at a position
    fn write_cell(
        &mut self,
        row: u32,
        col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()>;

    /// Write a hyperlink showing `text`
    fn write_url(
        &mut self,
        row: u32,
        col: u16,
        url: &str,
        text: &str,
        format: Option<FormatTag>,
    ) -> Result<()>;

    /// Merge an inclusive range and write `value` into it
    fn merge_range(
        &mut self,
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()>;

    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()>;

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()>;

    /// Force horizontal page breaks above the given rows
    fn set_page_breaks(&mut self, rows: &[u32]) -> Result<()>;
}

impl<S: SheetSink + ?Sized> SheetSink for &mut S {
    fn write_cell(
        &mut self,
        row: u32,
        col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()> {
        (**self).write_cell(row, col, value, format)
    }

    fn write_url(
        &mut self,
        row: u32,
        col: u16,
        url: &str,
        text: &str,
        format: Option<FormatTag>,
    ) -> Result<()> {
        (**self).write_url(row, col, url, text, format)
    }

    fn merge_range(
        &mut self,
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()> {
        (**self).merge_range(first_row, first_col, last_row, last_col, value, format)
    }

    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        (**self).set_column_width(col, width)
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        (**self).set_row_height(row, height)
    }

    fn set_page_breaks(&mut self, rows: &[u32]) -> Result<()> {
        (**self).set_page_breaks(rows)
    }
}

/// A workbook that creates named worksheets
pub trait WorkbookSink {
    type Sheet<'a>: SheetSink
    where
        Self: 'a;

    fn add_sheet(&mut self, name: &str) -> Result<Self::Sheet<'_>>;
}

/// An inclusive merged range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

/// Worksheet kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u16), Cell>,
    pub merges: Vec<MergedRange>,
    pub column_widths: BTreeMap<u16, f64>,
    pub row_heights: BTreeMap<u32, f64>,
    pub page_breaks: Vec<u32>,
}

impl MemorySheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Number of rows up to the last written one
    pub fn row_count(&self) -> u32 {
        self.cells.keys().map(|(r, _)| r + 1).max().unwrap_or(0)
    }

    /// Texts of a row in column order, blanks included
    pub fn row_texts(&self, row: u32) -> Vec<&str> {
        self.cells
            .range((row, 0)..=(row, u16::MAX))
            .map(|(_, cell)| cell.text())
            .collect()
    }
}

impl SheetSink for MemorySheet {
    fn write_cell(
        &mut self,
        row: u32,
        col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()> {
        trace!("{}: write ({}, {})", self.name, row, col);
        self.cells.insert(
            (row, col),
            Cell {
                value: value.map(str::to_string),
                format,
                url: None,
            },
        );
        Ok(())
    }

    fn write_url(
        &mut self,
        row: u32,
        col: u16,
        url: &str,
        text: &str,
        format: Option<FormatTag>,
    ) -> Result<()> {
        self.cells.insert(
            (row, col),
            Cell {
                value: Some(text.to_string()),
                format,
                url: Some(url.to_string()),
            },
        );
        Ok(())
    }

    fn merge_range(
        &mut self,
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()> {
        self.write_cell(first_row, first_col, value, format)?;
        self.merges.push(MergedRange {
            first_row,
            first_col,
            last_row,
            last_col,
        });
        Ok(())
    }

    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        self.column_widths.insert(col, width);
        Ok(())
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        self.row_heights.insert(row, height);
        Ok(())
    }

    fn set_page_breaks(&mut self, rows: &[u32]) -> Result<()> {
        self.page_breaks = rows.to_vec();
        Ok(())
    }
}

/// Workbook kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    pub sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

impl WorkbookSink for MemoryWorkbook {
    type Sheet<'a> = &'a mut MemorySheet;

    fn add_sheet(&mut self, name: &str) -> Result<Self::Sheet<'_>> {
        self.sheets.push(MemorySheet::new(name));
        let index = self.sheets.len() - 1;
        Ok(&mut self.sheets[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sheet_records_writes() {
        let mut workbook = MemoryWorkbook::new();
        {
            let sheet = workbook.add_sheet("Lead").unwrap();
            sheet
                .write_cell(0, 0, Some("Plan"), Some(FormatTag::Title))
                .unwrap();
            sheet
                .write_url(2, 1, "https://kausal.tech", "kausal.tech", None)
                .unwrap();
            sheet.merge_range(1, 0, 1, 2, Some("Wide"), None).unwrap();
            sheet.set_page_breaks(&[2]).unwrap();
        }

        let sheet = workbook.sheet("Lead").unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(0, 0).unwrap().format, Some(FormatTag::Title));
        assert_eq!(
            sheet.cell(2, 1).unwrap().url.as_deref(),
            Some("https://kausal.tech")
        );
        assert_eq!(sheet.row_texts(1), vec!["Wide"]);
        assert_eq!(sheet.merges.len(), 1);
        assert_eq!(sheet.page_breaks, vec![2]);
        assert_eq!(workbook.sheet_names(), vec!["Lead"]);
    }
}
