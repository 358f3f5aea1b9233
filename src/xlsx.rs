//! xlsx backend built on rust_xlsxwriter

use crate::Result;
use crate::constants::MAX_PAGE_BREAKS;
use crate::sheet::FormatTag;
use crate::sink::{SheetSink, WorkbookSink};
use crate::style::{Alignment, FormatSpec, VerticalAlignment};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Url, Workbook, Worksheet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One rust_xlsxwriter format per format tag
#[derive(Debug, Clone)]
pub struct ExcelFormats {
    formats: HashMap<FormatTag, Format>,
}

impl ExcelFormats {
    pub fn new() -> Self {
        let formats = FormatTag::ALL
            .into_iter()
            .map(|tag| (tag, to_xlsx_format(&FormatSpec::for_tag(tag))))
            .collect();
        Self { formats }
    }

    pub fn get(&self, tag: FormatTag) -> Option<&Format> {
        self.formats.get(&tag)
    }
}

impl Default for ExcelFormats {
    fn default() -> Self {
        Self::new()
    }
}

fn to_xlsx_format(spec: &FormatSpec) -> Format {
    let mut format = Format::new();
    if let Some(size) = spec.font_size {
        format = format.set_font_size(size);
    }
    if spec.bold {
        format = format.set_bold();
    }
    if let Some(color) = spec.font_color {
        format = format.set_font_color(Color::RGB(color.to_hex()));
    }
    if let Some(color) = spec.background_color {
        format = format.set_background_color(Color::RGB(color.to_hex()));
    }
    format = match spec.alignment {
        Alignment::General => format,
        Alignment::Left => format.set_align(FormatAlign::Left),
        Alignment::Right => format.set_align(FormatAlign::Right),
    };
    format = match spec.vertical_alignment {
        VerticalAlignment::Bottom => format,
        VerticalAlignment::Top => format.set_align(FormatAlign::Top),
        VerticalAlignment::Justify => format.set_align(FormatAlign::VerticalJustify),
    };
    if spec.text_wrap {
        format = format.set_text_wrap();
    }
    if spec.borders.left {
        format = format.set_border_left(FormatBorder::Thin);
    }
    if spec.borders.top {
        format = format.set_border_top(FormatBorder::Thin);
    }
    if spec.borders.right {
        format = format.set_border_right(FormatBorder::Thin);
    }
    if spec.borders.bottom {
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    if let Some(num_format) = spec.num_format {
        format = format.set_num_format(num_format);
    }
    format
}

/// A worksheet of an `XlsxWorkbook`
pub struct XlsxSheet<'a> {
    worksheet: &'a mut Worksheet,
    formats: &'a ExcelFormats,
}

impl XlsxSheet<'_> {
    fn format(&self, tag: Option<FormatTag>) -> Option<&Format> {
        tag.and_then(|t| self.formats.get(t))
    }
}

impl SheetSink for XlsxSheet<'_> {
    fn write_cell(
        &mut self,
        row: u32,
        col: u16,
        value: Option<&str>,
        format: Option<FormatTag>,
    ) -> Result<()> {
        let format = format.and_then(|t| self.formats.get(t));
        match (value, format) {
            (Some(text), Some(format)) => {
                self.worksheet
                    .write_string_with_format(row, col, text, format)?;
            }
            (Some(text), None) => {
                self.worksheet.write_string(row, col, text)?;
            }
            (None, Some(format)) => {
                self.worksheet.write_blank(row, col, format)?;
            }
            (None, None) => {}
        }
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
        let link = Url::new(url).set_text(text);
        match format.and_then(|t| self.formats.get(t)) {
            Some(format) => self.worksheet.write_url_with_format(row, col, link, format)?,
            None => self.worksheet.write_url(row, col, link)?,
        };
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
        let plain = Format::new();
        let format = self.format(format).cloned().unwrap_or(plain);
        self.worksheet.merge_range(
            first_row,
            first_col,
            last_row,
            last_col,
            value.unwrap_or(""),
            &format,
        )?;
        Ok(())
    }

    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        self.worksheet.set_column_width(col, width)?;
        Ok(())
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        self.worksheet.set_row_height(row, height)?;
        Ok(())
    }

    fn set_page_breaks(&mut self, rows: &[u32]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let rows = if rows.len() > MAX_PAGE_BREAKS {
            warn!(
                "Sheet has {} page breaks, keeping the first {}",
                rows.len(),
                MAX_PAGE_BREAKS
            );
            &rows[..MAX_PAGE_BREAKS]
        } else {
            rows
        };
        self.worksheet.set_page_breaks(rows)?;
        Ok(())
    }
}

/// Workbook written to an xlsx file
pub struct XlsxWorkbook {
    workbook: Workbook,
    formats: ExcelFormats,
    sheet_names: Vec<String>,
}

impl XlsxWorkbook {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            formats: ExcelFormats::new(),
            sheet_names: Vec::new(),
        }
    }

    /// Names of the worksheets added so far, in order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Serialize the workbook to xlsx bytes
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>> {
        let bytes = self.workbook.save_to_buffer()?;
        debug!(
            "Saved workbook with {} sheets, {} bytes",
            self.sheet_names.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl Default for XlsxWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookSink for XlsxWorkbook {
    type Sheet<'a> = XlsxSheet<'a>;

    fn add_sheet(&mut self, name: &str) -> Result<Self::Sheet<'_>> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;
        self.sheet_names.push(name.to_string());
        Ok(XlsxSheet {
            worksheet,
            formats: &self.formats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorWriter;
    use crate::sheet::Cell;

    #[test]
    fn test_every_tag_has_a_format() {
        let formats = ExcelFormats::new();
        for tag in FormatTag::ALL {
            assert!(formats.get(tag).is_some(), "missing format for {tag}");
        }
    }

    #[test]
    fn test_write_and_save() {
        let mut workbook = XlsxWorkbook::new();
        {
            let sheet = workbook.add_sheet("Paginated actions").unwrap();
            let mut writer = CursorWriter::new(sheet).with_width(4).with_merge(true);
            writer
                .write_cells(&[
                    vec![
                        Cell::new("1.1", FormatTag::ActionDigestPageHeader),
                        Cell::new("Bike lanes", FormatTag::ActionDigestPageHeader),
                    ],
                    vec![Cell::new("Description", FormatTag::ActionDigestLabel)],
                    vec![Cell::new("Build them", FormatTag::ActionDigestValue)],
                ])
                .unwrap();
            let mut sheet = writer.into_inner();
            sheet.set_page_breaks(&[2]).unwrap();
        }

        let bytes = workbook.save_to_buffer().unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(workbook.sheet_names(), ["Paginated actions"]);
    }

    #[test]
    fn test_page_breaks_past_excel_limit() {
        let mut workbook = XlsxWorkbook::new();
        {
            let mut sheet = workbook.add_sheet("Paginated actions").unwrap();
            let breaks: Vec<u32> = (1..=1100).map(|i| i * 3).collect();
            sheet.set_page_breaks(&breaks).unwrap();
        }
        assert!(workbook.save_to_buffer().is_ok());
    }
}
