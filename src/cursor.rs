//! Sequential cell writer over a worksheet

use crate::Result;
use crate::error::LayoutError;
use crate::sheet::{Cell, FormatTag};
use crate::sink::SheetSink;
use tracing::trace;

/// Writes cells left to right, row by row, from a start position.
///
/// With a width, `newline` pads the rest of the row with blanks in the last
/// used format so row-based formatting stays rectangular. With merging
/// enabled, rows shorter than the width are spread over it by padding each
/// cell and merging the padded range.
#[derive(Debug)]
pub struct CursorWriter<S> {
    sheet: S,
    default_format: Option<FormatTag>,
    start: (u32, u16),
    cursor: (u32, u16),
    width: Option<u16>,
    current_format: Option<FormatTag>,
    merge: bool,
}

impl<S: SheetSink> CursorWriter<S> {
    /// Create a writer starting at the top-left cell
    pub fn new(sheet: S) -> Self {
        Self {
            sheet,
            default_format: None,
            start: (0, 0),
            cursor: (0, 0),
            width: None,
            current_format: None,
            merge: false,
        }
    }

    /// Format for cells written without one
    pub fn with_default_format(mut self, format: FormatTag) -> Self {
        self.default_format = Some(format);
        self
    }

    /// Start writing at another position; rows restart at its column
    pub fn with_start(mut self, row: u32, col: u16) -> Self {
        self.start = (row, col);
        self.cursor = (row, col);
        self
    }

    /// Pad every row to `width` columns
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = (width > 0).then_some(width);
        self
    }

    /// Spread short rows over the full width by merging cells
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Current (row, column)
    pub fn cursor(&self) -> (u32, u16) {
        self.cursor
    }

    fn fill_to(&self) -> Option<u16> {
        self.width.map(|w| self.start.1 + w)
    }

    /// Write one cell and advance one column
    pub fn write(
        &mut self,
        value: Option<&str>,
        format: Option<FormatTag>,
        url: Option<&str>,
    ) -> Result<&mut Self> {
        let format = format.or(self.default_format);
        self.current_format = format;
        let (row, col) = self.cursor;
        match url {
            Some(url) => self
                .sheet
                .write_url(row, col, url, value.unwrap_or(""), format)?,
            None => self.sheet.write_cell(row, col, value, format)?,
        }
        let next = col.checked_add(1).ok_or_else(|| {
            LayoutError::InvalidRow(format!("row {row} runs past the last sheet column"))
        })?;
        self.cursor = (row, next);
        Ok(self)
    }

    /// Write `count` blanks in the last used format
    pub fn write_empty(&mut self, count: u16) -> Result<&mut Self> {
        for _ in 0..count {
            let format = self.current_format;
            self.write(None, format, None)?;
        }
        Ok(self)
    }

    /// Pad the row to the width and move to the start of the next row
    pub fn newline(&mut self) -> Result<&mut Self> {
        let (row, col) = self.cursor;
        if let Some(fill_to) = self.fill_to() {
            if fill_to > col {
                self.write_empty(fill_to - col)?;
            }
        }
        self.cursor = (row + 1, self.start.1);
        Ok(self)
    }

    /// Write rows of cells, one sheet row each
    pub fn write_cells(&mut self, rows: &[Vec<Cell>]) -> Result<()> {
        for row in rows {
            let mut pad_all = 0;
            let mut pad_last = 0;
            if let (true, Some(width)) = (self.merge, self.width) {
                let len = row.len() as u16;
                if len > 0 && len < width {
                    pad_all = width / len - 1;
                    pad_last = width % len;
                }
            }

            for (i, cell) in row.iter().enumerate() {
                let start = self.cursor;
                self.write(cell.value.as_deref(), cell.format, cell.url.as_deref())?;

                let mut add_empty = pad_all;
                if i + 1 == row.len() {
                    add_empty += pad_last;
                }
                if add_empty > 0 {
                    self.write_empty(add_empty)?;
                    let end = self.cursor;
                    trace!("Merging {:?}..{:?}", start, end);
                    self.sheet.merge_range(
                        start.0,
                        start.1,
                        end.0,
                        end.1 - 1,
                        cell.value.as_deref(),
                        cell.format.or(self.default_format),
                    )?;
                }
            }
            self.newline()?;
        }
        Ok(())
    }

    /// Give back the sheet
    pub fn into_inner(self) -> S {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySheet;

    #[test]
    fn test_newline_pads_to_width() {
        let mut sheet = MemorySheet::new("test");
        let mut writer = CursorWriter::new(&mut sheet).with_width(3);
        writer
            .write(Some("a"), Some(FormatTag::EvenRow), None)
            .unwrap()
            .newline()
            .unwrap();
        assert_eq!(writer.cursor(), (1, 0));

        assert_eq!(sheet.row_texts(0), vec!["a", "", ""]);
        assert_eq!(sheet.cell(0, 2).unwrap().format, Some(FormatTag::EvenRow));
        assert_eq!(sheet.cell(0, 2).unwrap().value, None);
    }

    #[test]
    fn test_newline_without_width() {
        let mut sheet = MemorySheet::new("test");
        let mut writer = CursorWriter::new(&mut sheet).with_start(2, 1);
        writer.write(Some("a"), None, None).unwrap();
        writer.newline().unwrap();
        assert_eq!(writer.cursor(), (3, 1));
        assert_eq!(sheet.cells.len(), 1);
    }

    #[test]
    fn test_default_format() {
        let mut sheet = MemorySheet::new("test");
        CursorWriter::new(&mut sheet)
            .with_default_format(FormatTag::EvenRow)
            .write_cells(&[vec![Cell::plain("x"), Cell::new("y", FormatTag::Date)]])
            .unwrap();

        assert_eq!(sheet.cell(0, 0).unwrap().format, Some(FormatTag::EvenRow));
        assert_eq!(sheet.cell(0, 1).unwrap().format, Some(FormatTag::Date));
    }

    #[test]
    fn test_last_column_cannot_advance() {
        let mut sheet = MemorySheet::new("test");
        let mut writer = CursorWriter::new(&mut sheet).with_start(0, u16::MAX);
        assert!(matches!(
            writer.write(Some("a"), None, None),
            Err(LayoutError::InvalidRow(_))
        ));
    }

    #[test]
    fn test_urls() {
        let mut sheet = MemorySheet::new("test");
        CursorWriter::new(&mut sheet)
            .write_cells(&[vec![
                Cell::new("kausal.tech", FormatTag::MetadataValue).with_url("https://kausal.tech"),
            ]])
            .unwrap();

        let cell = sheet.cell(0, 0).unwrap();
        assert_eq!(cell.text(), "kausal.tech");
        assert_eq!(cell.url.as_deref(), Some("https://kausal.tech"));
    }

    #[test]
    fn test_merge_spreads_short_rows() {
        let mut sheet = MemorySheet::new("test");
        let rows = vec![
            vec![Cell::new("header", FormatTag::ActionDigestPageHeader)],
            vec![
                Cell::new("a", FormatTag::ActionDigestLabel),
                Cell::new("b", FormatTag::ActionDigestLabel),
                Cell::new("c", FormatTag::ActionDigestLabel),
            ],
            vec![
                Cell::new("1", FormatTag::ActionDigestValue),
                Cell::new("2", FormatTag::ActionDigestValue),
                Cell::new("3", FormatTag::ActionDigestValue),
                Cell::new("4", FormatTag::ActionDigestValue),
            ],
        ];
        CursorWriter::new(&mut sheet)
            .with_width(4)
            .with_merge(true)
            .write_cells(&rows)
            .unwrap();

        // single cell spans the row
        assert_eq!(sheet.row_texts(0), vec!["header", "", "", ""]);
        // 4 / 3 - 1 = 0 padding each, 4 % 3 = 1 extra on the last cell
        assert_eq!(sheet.row_texts(1), vec!["a", "b", "c", ""]);
        // full rows are not merged
        assert_eq!(sheet.row_texts(2), vec!["1", "2", "3", "4"]);

        assert_eq!(
            sheet.merges,
            vec![
                crate::sink::MergedRange {
                    first_row: 0,
                    first_col: 0,
                    last_row: 0,
                    last_col: 3
                },
                crate::sink::MergedRange {
                    first_row: 1,
                    first_col: 2,
                    last_row: 1,
                    last_col: 3
                },
            ]
        );
    }

    #[test]
    fn test_merge_two_cells_over_four_columns() {
        let mut sheet = MemorySheet::new("test");
        CursorWriter::new(&mut sheet)
            .with_width(4)
            .with_merge(true)
            .write_cells(&[vec![
                Cell::new("id", FormatTag::ActionDigestPageHeader),
                Cell::new("name", FormatTag::ActionDigestPageHeader),
            ]])
            .unwrap();

        assert_eq!(sheet.row_texts(0), vec!["id", "", "name", ""]);
        assert_eq!(sheet.merges.len(), 2);
        assert_eq!(sheet.merges[1].first_col, 2);
        assert_eq!(sheet.merges[1].last_col, 3);
    }
}
