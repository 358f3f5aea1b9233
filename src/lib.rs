//! Print-oriented pagination of per-action summaries for spreadsheet reports
//!
//! Every action of a plan is laid out as a block of label and value rows on
//! a fixed-width grid, with a page header row at the top of each printed page.
//! Long values are split across pages using a character-count estimate whose
//! tunables come from a per-plan customization with a global fallback.
//!
//! ```
//! use action_print_layout::{
//!     ActionTable, CustomizationStore, MemoryWorkbook, ReportLabels, write_action_summaries,
//! };
//!
//! let store = CustomizationStore::from_json(
//!     r#"[{"max_columns": 4, "approximate_chars_per_line": 80,
//!          "approximate_lines_per_page": 40, "min_split_chars": 500,
//!          "width_needed": [[20, 1], [40, 2], [100, 3]]}]"#,
//! )?;
//! let table = ActionTable::new(["ID", "Name", "Description"])
//!     .with_field_label("identifier", "ID")
//!     .with_field_label("name", "Name")
//!     .with_field_label("description", "Description")
//!     .add_row([Some("1.1"), Some("Bike lanes"), Some("Paint them green")]);
//!
//! let mut workbook = MemoryWorkbook::new();
//! let values = store.resolve(None)?;
//! let sheet = write_action_summaries(&mut workbook, &table, &values, &ReportLabels::default())?;
//! assert_eq!(sheet.map(|s| s.page_count()), Some(1));
//! # Ok::<(), action_print_layout::LayoutError>(())
//! ```

mod constants;
pub mod cursor;
pub mod customization;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod pagination;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod report;
pub mod sheet;
pub mod sink;
pub mod style;
pub mod text;
pub mod xlsx;

pub use cursor::CursorWriter;
pub use customization::{
    Customization, CustomizationStore, LayoutParams, LayoutValues, PlanId, VariableKey,
};
pub use dataset::{ActionRow, ActionTable};
pub use error::{LayoutError, Result};
pub use grid::{GridField, GridLayout, WidthTable, build_grid_layout};
pub use pagination::{PaginatedSheet, paginate_actions};
#[cfg(feature = "pdf")]
pub use pdf::render_print_preview;
pub use report::{
    ExcelReport, ReportInput, ReportLabels, ReportMetadata, ReportSummary, write_action_summaries,
};
pub use sheet::{Cell, FormatTag, PageBreakMarker, SheetRow};
pub use sink::{MemorySheet, MemoryWorkbook, SheetSink, WorkbookSink};
pub use style::{FormatSpec, PreviewStyle};
pub use xlsx::{ExcelFormats, XlsxWorkbook};
