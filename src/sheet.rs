//! Cell and row model for printable sheets

use std::fmt;

/// Named cell format, resolved to a concrete format by the workbook backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Title,
    SubTitle,
    SubSubTitle,
    MetadataLabel,
    MetadataValue,
    Date,
    HeaderRow,
    EvenRow,
    OddRow,
    AllRows,
    ActionDigestLabel,
    ActionDigestValue,
    ActionDigestValueLong,
    ActionDigestPageHeader,
}

impl FormatTag {
    pub const ALL: [FormatTag; 14] = [
        FormatTag::Title,
        FormatTag::SubTitle,
        FormatTag::SubSubTitle,
        FormatTag::MetadataLabel,
        FormatTag::MetadataValue,
        FormatTag::Date,
        FormatTag::HeaderRow,
        FormatTag::EvenRow,
        FormatTag::OddRow,
        FormatTag::AllRows,
        FormatTag::ActionDigestLabel,
        FormatTag::ActionDigestValue,
        FormatTag::ActionDigestValueLong,
        FormatTag::ActionDigestPageHeader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Title => "title",
            FormatTag::SubTitle => "sub_title",
            FormatTag::SubSubTitle => "sub_sub_title",
            FormatTag::MetadataLabel => "metadata_label",
            FormatTag::MetadataValue => "metadata_value",
            FormatTag::Date => "date",
            FormatTag::HeaderRow => "header_row",
            FormatTag::EvenRow => "even_row",
            FormatTag::OddRow => "odd_row",
            FormatTag::AllRows => "all_rows",
            FormatTag::ActionDigestLabel => "action_digest_label",
            FormatTag::ActionDigestValue => "action_digest_value",
            FormatTag::ActionDigestValueLong => "action_digest_value_long",
            FormatTag::ActionDigestPageHeader => "action_digest_page_header",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single printable cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: Option<String>,
    pub format: Option<FormatTag>,
    pub url: Option<String>,
}

impl Cell {
    /// Create a new cell with text content and a format
    pub fn new<S: Into<String>>(value: S, format: FormatTag) -> Self {
        Self {
            value: Some(value.into()),
            format: Some(format),
            url: None,
        }
    }

    /// Create a cell without a value
    pub fn empty(format: FormatTag) -> Self {
        Self {
            value: None,
            format: Some(format),
            url: None,
        }
    }

    /// Create a cell that falls back to the writer's default format
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Self {
            value: Some(value.into()),
            format: None,
            url: None,
        }
    }

    /// Turn the cell into a hyperlink showing its value as text
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The cell text, empty for null cells
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Signals the start of a new printed page for an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBreakMarker {
    pub action_identifier: String,
    pub action_name: String,
}

impl PageBreakMarker {
    pub fn new<I: Into<String>, N: Into<String>>(action_identifier: I, action_name: N) -> Self {
        Self {
            action_identifier: action_identifier.into(),
            action_name: action_name.into(),
        }
    }
}

/// One logical output row before page headers are resolved
#[derive(Debug, Clone, PartialEq)]
pub enum SheetRow {
    Cells(Vec<Cell>),
    PageBreak(PageBreakMarker),
}

impl SheetRow {
    pub fn is_page_break(&self) -> bool {
        matches!(self, SheetRow::PageBreak(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_builder() {
        let cell = Cell::new("kausal.tech", FormatTag::MetadataValue).with_url("https://kausal.tech");

        assert_eq!(cell.text(), "kausal.tech");
        assert_eq!(cell.format, Some(FormatTag::MetadataValue));
        assert_eq!(cell.url.as_deref(), Some("https://kausal.tech"));
    }

    #[test]
    fn test_empty_cell_text() {
        let cell = Cell::empty(FormatTag::EvenRow);
        assert_eq!(cell.text(), "");
    }

    #[test]
    fn test_format_tag_names() {
        assert_eq!(
            FormatTag::ActionDigestValueLong.to_string(),
            "action_digest_value_long"
        );
        assert_eq!(FormatTag::ALL.len(), 14);
    }

    #[test]
    fn test_page_break_row() {
        let row = SheetRow::PageBreak(PageBreakMarker::new("1.1", "Plant trees"));
        assert!(row.is_page_break());
        assert!(!SheetRow::Cells(vec![]).is_page_break());
    }
}
