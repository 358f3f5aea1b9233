//! Page break estimation for action summaries
//!
//! There is no reliable way to know where a spreadsheet application will break
//! pages when printing, so the layout is estimated from character counts: a
//! line holds roughly `approximate_chars_per_line` characters and a page
//! roughly `approximate_lines_per_page` lines. When an action's fields overflow
//! the estimate, the last value is split at whitespace and the rest continues
//! on a new page. All numbers are tunable per plan.

use crate::Result;
use crate::constants::*;
use crate::customization::LayoutParams;
use crate::dataset::{ActionRow, ActionTable};
use crate::error::LayoutError;
use crate::grid::{GridLayout, build_grid_layout, keys_with_total_length};
use crate::report::ReportLabels;
use crate::sheet::{Cell, FormatTag, PageBreakMarker, SheetRow};
use tracing::{debug, instrument, trace};

/// Paginated sheet ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedSheet {
    /// Physical rows, page headers included
    pub rows: Vec<Vec<Cell>>,
    /// Row indexes that start a new printed page
    pub page_breaks: Vec<u32>,
    /// Number of sheet columns every row is spread over
    pub max_columns: usize,
    /// Width of each of the `max_columns` columns
    pub column_width: f64,
}

impl PaginatedSheet {
    /// Number of printed pages
    pub fn page_count(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_breaks.len() + 1
        }
    }

    /// Rows grouped by printed page
    pub fn pages(&self) -> Vec<&[Vec<Cell>]> {
        let mut pages = Vec::with_capacity(self.page_count());
        let mut start = 0;
        for &brk in &self.page_breaks {
            let brk = brk as usize;
            pages.push(&self.rows[start..brk]);
            start = brk;
        }
        if start < self.rows.len() {
            pages.push(&self.rows[start..]);
        }
        pages
    }
}

/// Column labels with special handling in the summaries
#[derive(Debug, Clone)]
pub struct SummaryFields {
    pub identifier: String,
    pub name: String,
    /// Labels kept out of the grid
    pub excluded: Vec<String>,
}

impl SummaryFields {
    /// Look up the labels of the excluded fields in a table. The identifier
    /// and name columns are required; completion columns are optional.
    pub fn from_table(table: &ActionTable) -> Result<Self> {
        let identifier = table.single_field_label("identifier")?.to_string();
        let name = table.single_field_label("name")?.to_string();
        let mut excluded = Vec::with_capacity(EXCLUDED_FIELDS.len());
        for field in EXCLUDED_FIELDS {
            match table.single_field_label(field) {
                Ok(label) => excluded.push(label.to_string()),
                Err(LayoutError::UnknownField(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(Self {
            identifier,
            name,
            excluded,
        })
    }

    fn is_excluded(&self, label: &str) -> bool {
        self.excluded.iter().any(|l| l == label)
    }
}

/// Estimated printed lines of a text: wrapped lines plus explicit newlines
pub fn estimate_lines(text: &str, approximate_chars_per_line: usize) -> usize {
    let chars = text.chars().count();
    chars.div_ceil(approximate_chars_per_line) + text.matches('\n').count()
}

/// Character offset at which to split an overflowing value.
///
/// Starts from the character budget left on the page, falls back to half
/// the value when the budget is past its end and to `min_split_chars` when the
/// budget is smaller than that, then walks back to the nearest whitespace.
/// The returned offset is one past that whitespace, so the first part keeps
/// it. Without any whitespace the offset is 1.
pub fn split_point(chars: &[char], budget: i64, min_split_chars: usize) -> usize {
    let len = chars.len() as i64;
    let min_split = min_split_chars as i64;

    let mut split = budget;
    if split > len - 1 {
        split = len / 2;
    }
    if split < min_split {
        split = (len - 1).min(min_split);
    }
    if split < 0 {
        split = 0;
    }
    while split > 0 && !chars[split as usize].is_whitespace() {
        split -= 1;
        if split < min_split && chars[split as usize].is_whitespace() {
            break;
        }
    }
    ((split + 1) as usize).min(chars.len())
}

fn clean_text(value: &str) -> String {
    value.replace("\n\n", "\n").trim_end().to_string()
}

fn value_format(raw: Option<&str>) -> FormatTag {
    match raw {
        Some(v) if v.chars().count() > LONG_VALUE_THRESHOLD => FormatTag::ActionDigestValueLong,
        _ => FormatTag::ActionDigestValue,
    }
}

fn take_text(action: &mut ActionRow, label: &str) -> String {
    action.remove(label).flatten().unwrap_or_default()
}

/// Label and value cells of one grid row
fn grid_row_cells(
    grid: &GridLayout,
    row: usize,
    action: &ActionRow,
    fields: &SummaryFields,
) -> (Vec<Cell>, Vec<Cell>) {
    grid.row_labels(row)
        .filter(|label| !fields.is_excluded(label))
        .map(|label| {
            let raw = action.get(label).and_then(|v| v.as_deref());
            let text = match raw {
                Some(v) if !v.is_empty() => clean_text(v),
                _ => EMPTY_VALUE_PLACEHOLDER.to_string(),
            };
            (
                Cell::new(label, FormatTag::ActionDigestLabel),
                Cell::new(text, value_format(raw)),
            )
        })
        .unzip()
}

fn with_last_value(mut values: Vec<Cell>, text: String) -> SheetRow {
    values.pop();
    values.push(Cell::new(text, FormatTag::ActionDigestValueLong));
    SheetRow::Cells(values)
}

/// Lay out one action over the grid, appending to `out`.
///
/// The identifier and name are removed from `action` and carried by the page
/// break markers, one marker per page of the action.
pub fn paginate_action(
    grid: &GridLayout,
    mut action: ActionRow,
    fields: &SummaryFields,
    params: &LayoutParams,
    mut out: Vec<SheetRow>,
) -> Result<Vec<SheetRow>> {
    let chars_per_line = params.approximate_chars_per_line;
    let lines_per_page = params.approximate_lines_per_page;

    let identifier = take_text(&mut action, &fields.identifier);
    let name = take_text(&mut action, &fields.name);
    let mut page = 1;
    out.push(SheetRow::PageBreak(PageBreakMarker::new(
        identifier.clone(),
        name.clone(),
    )));

    let mut lines_so_far = 0;
    let mut pending: Option<(Vec<Cell>, Vec<Cell>)> = None;
    let mut i = 0;

    while i < grid.len() {
        let (label_row, value_row) = match pending.take() {
            Some(rows) => rows,
            None => grid_row_cells(grid, i, &action, fields),
        };
        if label_row.len() != value_row.len() {
            return Err(LayoutError::InvalidRow(format!(
                "{} labels but {} values",
                label_row.len(),
                value_row.len()
            )));
        }
        let Some(last_value) = value_row.last() else {
            i += 1;
            continue;
        };

        // header
        lines_so_far += 1;
        if label_row.len() == 1 {
            lines_so_far += estimate_lines(last_value.text(), chars_per_line);
        } else {
            lines_so_far += MULTI_FIELD_ROW_LINES;
        }
        trace!("Grid row {} of {}: ~{} lines", i, identifier, lines_so_far);

        if lines_so_far <= lines_per_page {
            out.push(SheetRow::Cells(label_row));
            out.push(SheetRow::Cells(value_row));
            i += 1;
            continue;
        }

        let text = last_value.text().to_string();
        let lines_last = estimate_lines(&text, chars_per_line) as i64;
        let budget =
            (lines_per_page as i64 - (lines_so_far as i64 - lines_last)) * chars_per_line as i64;
        let chars: Vec<char> = text.chars().collect();
        let split = split_point(&chars, budget, params.min_split_chars);
        let remainder: String = chars[split..].iter().collect();
        trace!(
            "Splitting {} chars at {} (budget {}), {} chars remain",
            chars.len(),
            split,
            budget,
            chars.len() - split
        );

        out.push(SheetRow::Cells(label_row.clone()));
        if remainder.chars().count() * 2 < chars_per_line {
            // Too little left over to be worth a page of its own; keep the
            // value whole and start the next grid row on a fresh page.
            out.push(with_last_value(value_row, text));
            if i + 1 < grid.len() {
                page += 1;
                out.push(SheetRow::PageBreak(PageBreakMarker::new(
                    identifier.clone(),
                    name.clone(),
                )));
                lines_so_far = 0;
            }
            i += 1;
        } else {
            let head: String = chars[..split].iter().collect();
            let format = last_value.format;
            let last_label = label_row.into_iter().last();
            out.push(with_last_value(value_row, head));
            page += 1;
            out.push(SheetRow::PageBreak(PageBreakMarker::new(
                identifier.clone(),
                name.clone(),
            )));
            lines_so_far = 0;
            pending = Some((
                last_label.into_iter().collect(),
                vec![Cell {
                    value: Some(remainder),
                    format,
                    url: None,
                }],
            ));
        }
    }

    debug!("Action {} laid out on {} pages", identifier, page);
    Ok(out)
}

/// Replace page break markers with page header rows and record the physical
/// row index of every page start after the first row.
pub fn emit_page_headers(rows: Vec<SheetRow>, labels: &ReportLabels) -> (Vec<Vec<Cell>>, Vec<u32>) {
    // Markers of one action are consecutive; a marker whose predecessor
    // belongs to another action starts a new run.
    let mut page_counts: Vec<usize> = Vec::new();
    let mut last_identifier: Option<&str> = None;
    for row in &rows {
        if let SheetRow::PageBreak(marker) = row {
            if last_identifier == Some(marker.action_identifier.as_str()) {
                if let Some(count) = page_counts.last_mut() {
                    *count += 1;
                }
            } else {
                page_counts.push(1);
                last_identifier = Some(marker.action_identifier.as_str());
            }
        }
    }

    let mut processed = Vec::with_capacity(rows.len());
    let mut page_breaks = Vec::new();
    let mut last_identifier: Option<String> = None;
    let mut run = 0;
    let mut page = 1;

    for row in rows {
        let marker = match row {
            SheetRow::Cells(cells) => {
                processed.push(cells);
                continue;
            }
            SheetRow::PageBreak(marker) => marker,
        };

        if last_identifier.as_deref() == Some(marker.action_identifier.as_str()) {
            page += 1;
        } else {
            if last_identifier.is_some() {
                run += 1;
            }
            last_identifier = Some(marker.action_identifier.clone());
            page = 1;
        }
        if !processed.is_empty() {
            page_breaks.push(processed.len() as u32);
        }

        let page_count = page_counts.get(run).copied().unwrap_or(1);
        let header = if page_count > 1 {
            format!(
                "{} [{} {}/{}]",
                marker.action_identifier, labels.page, page, page_count
            )
        } else {
            marker.action_identifier
        };
        processed.push(vec![
            Cell::new(header, FormatTag::ActionDigestPageHeader),
            Cell::new(marker.action_name, FormatTag::ActionDigestPageHeader),
        ]);
    }

    (processed, page_breaks)
}

/// Lay out every action of a table
#[instrument(skip_all, fields(actions = table.height()))]
pub fn paginate_actions(
    table: &ActionTable,
    params: &LayoutParams,
    labels: &ReportLabels,
) -> Result<PaginatedSheet> {
    table.validate()?;
    let fields = SummaryFields::from_table(table)?;
    let excluded: Vec<&str> = fields.excluded.iter().map(String::as_str).collect();
    let grid = build_grid_layout(&keys_with_total_length(table), &excluded, &params.width_needed);

    let mut rows = Vec::new();
    for action in table.iter_named_rows() {
        rows = paginate_action(&grid, action, &fields, params, rows)?;
    }
    let (rows, page_breaks) = emit_page_headers(rows, labels);

    debug!(
        "Paginated {} actions into {} rows with {} page breaks",
        table.height(),
        rows.len(),
        page_breaks.len()
    );
    Ok(PaginatedSheet {
        rows,
        page_breaks,
        max_columns: params.max_columns,
        column_width: PAGINATED_COLUMN_WIDTH,
    })
}
