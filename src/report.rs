//! Report workbook assembly
//!
//! A report workbook has a lead sheet with the report metadata, an actions
//! sheet with one row per action and, for plans that enable it, the
//! paginated action summaries meant for printing.

use crate::Result;
use crate::constants::*;
use crate::cursor::CursorWriter;
use crate::customization::{CustomizationStore, LayoutValues, PlanId};
use crate::dataset::ActionTable;
use crate::error::LayoutError;
use crate::pagination::{PaginatedSheet, paginate_actions};
use crate::sheet::{Cell, FormatTag};
use crate::sink::{SheetSink, WorkbookSink};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, info, instrument};

/// Translatable strings written into the workbook
#[derive(Debug, Clone)]
pub struct ReportLabels {
    pub lead_sheet: String,
    pub actions_sheet: String,
    pub paginated_sheet: String,
    /// Word used in page headers, as in "1.2 [Page 1/3]"
    pub page: String,
    pub status: String,
    pub complete: String,
    pub in_progress: String,
    pub start_date: String,
    pub end_date: String,
    pub updated_at: String,
    pub exported_from: String,
    pub credit_text: String,
    pub credit_url: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            lead_sheet: "Lead".to_string(),
            actions_sheet: "Actions".to_string(),
            paginated_sheet: "Paginated actions".to_string(),
            page: "Page".to_string(),
            status: "status".to_string(),
            complete: "complete".to_string(),
            in_progress: "in progress".to_string(),
            start_date: "start date".to_string(),
            end_date: "end date".to_string(),
            updated_at: "updated at".to_string(),
            exported_from: "Exported from Kausal Watch".to_string(),
            credit_text: "kausal.tech".to_string(),
            credit_url: "https://kausal.tech".to_string(),
        }
    }
}

/// Descriptive data shown on the lead sheet
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    pub plan_name: String,
    pub report_type_name: String,
    pub report_name: String,
    pub is_complete: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Export time in the plan's local timezone
    pub updated_at: NaiveDateTime,
}

/// Everything needed to generate one report workbook
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub plan: PlanId,
    pub metadata: ReportMetadata,
    pub actions: ActionTable,
    /// Whether the plan has the paginated print layout enabled
    pub print_layout: bool,
}

/// What `ExcelReport::generate` wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub sheets: Vec<String>,
    pub paginated: Option<PaginatedSheet>,
}

/// Write the paginated action summaries sheet.
///
/// An unusable customization is logged and the sheet is skipped; the rest of
/// the report is not affected.
#[instrument(skip_all, fields(actions = table.height()))]
pub fn write_action_summaries<W: WorkbookSink>(
    workbook: &mut W,
    table: &ActionTable,
    customization: &LayoutValues,
    labels: &ReportLabels,
) -> Result<Option<PaginatedSheet>> {
    let params = match customization.validate() {
        Ok(params) => params,
        Err(e) => {
            error!("Invalid layout customization for write_action_summaries: {e}");
            return Ok(None);
        }
    };

    let paginated = paginate_actions(table, &params, labels)?;
    let mut sheet = workbook.add_sheet(&labels.paginated_sheet)?;
    let width = u16::try_from(paginated.max_columns).map_err(|_| {
        LayoutError::InvalidCustomization(format!(
            "max_columns {} does not fit in a sheet",
            paginated.max_columns
        ))
    })?;
    for col in 0..width {
        sheet.set_column_width(col, paginated.column_width)?;
    }

    let mut writer = CursorWriter::new(sheet).with_width(width).with_merge(true);
    writer.write_cells(&paginated.rows)?;
    let mut sheet = writer.into_inner();
    sheet.set_page_breaks(&paginated.page_breaks)?;

    debug!(
        "Wrote {} paginated rows on {} pages",
        paginated.rows.len(),
        paginated.page_count()
    );
    Ok(Some(paginated))
}

/// Generates report workbooks
#[derive(Debug, Clone, Default)]
pub struct ExcelReport {
    pub labels: ReportLabels,
}

impl ExcelReport {
    pub fn new(labels: ReportLabels) -> Self {
        Self { labels }
    }

    /// Write all sheets of a report into `workbook`
    #[instrument(skip_all, fields(plan = %input.plan))]
    pub fn generate<W: WorkbookSink>(
        &self,
        workbook: &mut W,
        input: &ReportInput,
        store: &CustomizationStore,
    ) -> Result<ReportSummary> {
        input.actions.validate()?;
        let mut sheets = Vec::new();

        self.write_lead_sheet(workbook, &input.metadata)?;
        sheets.push(self.labels.lead_sheet.clone());
        self.write_actions_sheet(workbook, &input.actions)?;
        sheets.push(self.labels.actions_sheet.clone());

        let mut paginated = None;
        if input.print_layout {
            match store.resolve(Some(&input.plan)) {
                Ok(customization) => {
                    paginated = write_action_summaries(
                        workbook,
                        &input.actions,
                        &customization,
                        &self.labels,
                    )?;
                }
                Err(e) => error!("No layout customization for plan {}: {e}", input.plan),
            }
            if paginated.is_some() {
                sheets.push(self.labels.paginated_sheet.clone());
            }
        }

        info!("Generated report with sheets {:?}", sheets);
        Ok(ReportSummary { sheets, paginated })
    }

    fn write_lead_sheet<W: WorkbookSink>(
        &self,
        workbook: &mut W,
        metadata: &ReportMetadata,
    ) -> Result<()> {
        let labels = &self.labels;
        let status = if metadata.is_complete {
            &labels.complete
        } else {
            &labels.in_progress
        };
        let date = |d: NaiveDate| Cell::new(d.format("%-d %B %Y").to_string(), FormatTag::Date);
        let cells = vec![
            vec![Cell::new(&metadata.plan_name, FormatTag::Title)],
            vec![Cell::new(&metadata.report_type_name, FormatTag::SubTitle)],
            vec![Cell::new(&metadata.report_name, FormatTag::SubSubTitle)],
            vec![],
            vec![
                Cell::new(&labels.status, FormatTag::MetadataLabel),
                Cell::new(status, FormatTag::MetadataValue),
            ],
            vec![
                Cell::new(&labels.start_date, FormatTag::MetadataLabel),
                date(metadata.start_date),
            ],
            vec![
                Cell::new(&labels.end_date, FormatTag::MetadataLabel),
                date(metadata.end_date),
            ],
            vec![
                Cell::new(&labels.updated_at, FormatTag::MetadataLabel),
                Cell::new(
                    metadata.updated_at.format("%-d %B %Y %H:%M").to_string(),
                    FormatTag::Date,
                ),
            ],
            vec![],
            vec![Cell::new(&labels.exported_from, FormatTag::MetadataValue)],
            vec![
                Cell::new(&labels.credit_text, FormatTag::MetadataValue)
                    .with_url(&labels.credit_url),
            ],
            vec![],
        ];

        let sheet = workbook.add_sheet(&labels.lead_sheet)?;
        let mut writer = CursorWriter::new(sheet)
            .with_default_format(FormatTag::EvenRow)
            .with_width(LEAD_SHEET_WIDTH);
        writer.write_cells(&cells)?;
        let mut sheet = writer.into_inner();
        for row in 0..3 {
            sheet.set_row_height(row, LEAD_TITLE_ROW_HEIGHT)?;
        }
        sheet.set_column_width(1, LEAD_VALUE_COLUMN_WIDTH)?;
        Ok(())
    }

    fn write_actions_sheet<W: WorkbookSink>(
        &self,
        workbook: &mut W,
        table: &ActionTable,
    ) -> Result<()> {
        let mut sheet = workbook.add_sheet(&self.labels.actions_sheet)?;

        sheet.set_row_height(0, ACTIONS_HEADER_ROW_HEIGHT)?;
        for (col, label) in table.columns.iter().enumerate() {
            sheet.write_cell(0, col as u16, Some(label), Some(FormatTag::HeaderRow))?;
        }

        for (i, row) in table.rows.iter().enumerate() {
            let sheet_row = i as u32 + 1;
            // Excel rows are 1-based, so even sheet indexes are odd rows
            let band = if sheet_row % 2 == 0 {
                FormatTag::OddRow
            } else {
                FormatTag::EvenRow
            };
            sheet.set_row_height(sheet_row, ACTIONS_ROW_HEIGHT)?;
            for (col, value) in row.iter().enumerate() {
                sheet.write_cell(sheet_row, col as u16, value.as_deref(), Some(band))?;
            }
        }

        let last = table.width().saturating_sub(1);
        for col in 0..table.width() {
            let width = if col == 0 {
                ACTIONS_FIRST_COLUMN_WIDTH
            } else if col == last {
                ACTIONS_LAST_COLUMN_WIDTH
            } else {
                ACTIONS_COLUMN_WIDTH
            };
            sheet.set_column_width(col as u16, width)?;
        }
        Ok(())
    }
}
