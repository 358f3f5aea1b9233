//! PDF print preview of a paginated sheet
//!
//! Renders every printed page of a `PaginatedSheet` onto its own PDF page so
//! the page estimate can be checked without a spreadsheet application. Rows
//! are spread over the page width the same way the cursor writer merges them.
//! A sheet page taller than a PDF page continues on the next PDF page.
//!
//! Text uses the standard Helvetica faces with WinAnsi encoding. Characters
//! outside that code page are drawn as `?`.

use crate::Result;
use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;
use crate::pagination::PaginatedSheet;
use crate::sheet::Cell;
use crate::style::{Alignment, Color, FormatSpec, PreviewStyle, VerticalAlignment};
use crate::text::{chars_per_line, text_height, wrap_text};
use lopdf::{
    Document, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, instrument, trace};

const FONT: &str = "F1";
const FONT_BOLD: &str = "F1-Bold";

/// One cell prepared for drawing
struct LaidOutCell<'a> {
    spec: FormatSpec,
    lines: Vec<String>,
    font_size: f32,
    cell: &'a Cell,
}

/// Operations of the PDF page being filled
struct PageCanvas {
    operations: Vec<Operation>,
    y: f32,
    rows: usize,
}

impl PageCanvas {
    fn new(style: &PreviewStyle) -> Self {
        Self {
            operations: Vec::new(),
            y: style.page_height - style.margin,
            rows: 0,
        }
    }
}

/// Render a paginated sheet as a PDF document
#[instrument(skip_all, fields(rows = sheet.rows.len()))]
pub fn render_print_preview(sheet: &PaginatedSheet, style: &PreviewStyle) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT => font_id,
            FONT_BOLD => font_bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for rows in sheet.pages() {
        let mut canvas = PageCanvas::new(style);
        for row in rows.iter().filter(|r| !r.is_empty()) {
            let cells = lay_out_row(row, style);
            let height = row_height(&cells, style);
            if canvas.rows > 0 && canvas.y - height < style.margin {
                trace!("Row overflows PDF page {}, continuing", page_ids.len() + 1);
                let full = std::mem::replace(&mut canvas, PageCanvas::new(style));
                page_ids.push(add_page(&mut doc, pages_id, resources_id, full, style)?);
            }
            draw_row(&mut canvas, &cells, height, style);
        }
        page_ids.push(add_page(&mut doc, pages_id, resources_id, canvas, style)?);
    }
    if page_ids.is_empty() {
        page_ids.push(add_page(
            &mut doc,
            pages_id,
            resources_id,
            PageCanvas::new(style),
            style,
        )?);
    }

    let count = page_ids.len() as i64;
    let kids: Vec<Object> = page_ids.into_iter().map(Object::from).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => media_box(style),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    debug!(
        "Rendered {} sheet pages on {} PDF pages",
        sheet.page_count(),
        count
    );
    Ok(doc)
}

fn media_box(style: &PreviewStyle) -> Vec<Object> {
    vec![
        0.into(),
        0.into(),
        style.page_width.into(),
        style.page_height.into(),
    ]
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    canvas: PageCanvas,
    style: &PreviewStyle,
) -> Result<ObjectId> {
    let content = Content {
        operations: canvas.operations,
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box(style),
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

fn content_width(style: &PreviewStyle) -> f32 {
    style.page_width - 2.0 * style.margin
}

fn lay_out_row<'a>(row: &'a [Cell], style: &PreviewStyle) -> Vec<LaidOutCell<'a>> {
    let width = content_width(style) / row.len() as f32;
    let text_width = width - style.padding.left - style.padding.right;
    row.iter()
        .map(|cell| {
            let spec = cell.format.map(FormatSpec::for_tag).unwrap_or_default();
            let font_size = spec
                .font_size
                .map_or(style.default_font_size, |size| size as f32);
            let lines = if spec.text_wrap {
                wrap_text(cell.text(), chars_per_line(text_width, font_size))
            } else {
                vec![cell.text().to_string()]
            };
            LaidOutCell {
                spec,
                lines,
                font_size,
                cell,
            }
        })
        .collect()
}

fn row_height(cells: &[LaidOutCell<'_>], style: &PreviewStyle) -> f32 {
    let text = cells
        .iter()
        .map(|c| text_height(c.lines.len(), c.font_size))
        .fold(0.0, f32::max);
    text + style.padding.top + style.padding.bottom
}

fn draw_row(canvas: &mut PageCanvas, cells: &[LaidOutCell<'_>], height: f32, style: &PreviewStyle) {
    let width = content_width(style) / cells.len() as f32;
    let top = canvas.y;
    let bottom = top - height;

    for (i, cell) in cells.iter().enumerate() {
        let x = style.margin + i as f32 * width;
        if let Some(color) = cell.spec.background_color {
            fill_rect(&mut canvas.operations, x, bottom, width, height, color);
        }
        draw_borders(&mut canvas.operations, cell, x, top, width, height, style);
        draw_text(&mut canvas.operations, cell, x, top, width, height, style);
    }

    canvas.y = bottom;
    canvas.rows += 1;
}

fn fill_rect(ops: &mut Vec<Operation>, x: f32, y: f32, width: f32, height: f32, color: Color) {
    ops.push(Operation::new(
        "rg",
        vec![color.r.into(), color.g.into(), color.b.into()],
    ));
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), width.into(), height.into()],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn draw_borders(
    ops: &mut Vec<Operation>,
    cell: &LaidOutCell<'_>,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
    style: &PreviewStyle,
) {
    let borders = cell.spec.borders;
    let bottom = top - height;
    let right = x + width;
    let lines = [
        (borders.left, (x, top), (x, bottom)),
        (borders.top, (x, top), (right, top)),
        (borders.right, (right, top), (right, bottom)),
        (borders.bottom, (x, bottom), (right, bottom)),
    ];
    if !lines.iter().any(|(on, _, _)| *on) {
        return;
    }

    let color = style.border_color;
    ops.push(Operation::new(
        "RG",
        vec![color.r.into(), color.g.into(), color.b.into()],
    ));
    ops.push(Operation::new("w", vec![style.border_width.into()]));
    for (_, from, to) in lines.into_iter().filter(|(on, _, _)| *on) {
        ops.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
        ops.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
        ops.push(Operation::new("S", vec![]));
    }
}

fn draw_text(
    ops: &mut Vec<Operation>,
    cell: &LaidOutCell<'_>,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
    style: &PreviewStyle,
) {
    if cell.cell.text().is_empty() {
        return;
    }

    let padding = style.padding;
    let font_size = cell.font_size;
    let line_height = text_height(1, font_size);
    let first_y = match cell.spec.vertical_alignment {
        VerticalAlignment::Top | VerticalAlignment::Justify => top - padding.top - font_size,
        VerticalAlignment::Bottom => {
            top - height + padding.bottom + text_height(cell.lines.len(), font_size) - font_size
        }
    };
    let line_x = |line: &str| {
        let estimated = line.chars().count() as f32 * font_size * DEFAULT_CHAR_WIDTH_RATIO;
        match cell.spec.alignment {
            Alignment::General | Alignment::Left => x + padding.left,
            Alignment::Right => x + width - padding.right - estimated,
        }
    };

    let font = if cell.spec.bold { FONT_BOLD } else { FONT };
    let color = cell.spec.font_color.unwrap_or_default();
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), font_size.into()],
    ));
    ops.push(Operation::new(
        "rg",
        vec![color.r.into(), color.g.into(), color.b.into()],
    ));

    let mut previous_x: Option<f32> = None;
    for line in &cell.lines {
        let text_x = line_x(line);
        let offset = match previous_x {
            None => vec![text_x.into(), first_y.into()],
            Some(prev) => vec![(text_x - prev).into(), (-line_height).into()],
        };
        ops.push(Operation::new("Td", offset));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(line), StringFormat::Literal)],
        ));
        previous_x = Some(text_x);
    }
    ops.push(Operation::new("ET", vec![]));
}

/// Encode text for the WinAnsi code page
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{0}'..='\u{7f}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{0160}' => 0x8a,
            '\u{0152}' => 0x8c,
            '\u{017d}' => 0x8e,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{0161}' => 0x9a,
            '\u{0153}' => 0x9c,
            '\u{017e}' => 0x9e,
            '\u{0178}' => 0x9f,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::FormatTag;

    fn header(id: &str) -> Vec<Cell> {
        vec![
            Cell::new(id, FormatTag::ActionDigestPageHeader),
            Cell::new("Bike lanes", FormatTag::ActionDigestPageHeader),
        ]
    }

    fn field(label: &str, value: &str) -> [Vec<Cell>; 2] {
        [
            vec![Cell::new(label, FormatTag::ActionDigestLabel)],
            vec![Cell::new(value, FormatTag::ActionDigestValue)],
        ]
    }

    fn sheet(rows: Vec<Vec<Cell>>, page_breaks: Vec<u32>) -> PaginatedSheet {
        PaginatedSheet {
            rows,
            page_breaks,
            max_columns: 4,
            column_width: 16.0,
        }
    }

    #[test]
    fn test_one_pdf_page_per_sheet_page() {
        let mut rows = vec![header("1 [Page 1/2]")];
        rows.extend(field("Description", "First half"));
        rows.push(header("1 [Page 2/2]"));
        rows.extend(field("Description", "Second half"));

        let doc = render_print_preview(&sheet(rows, vec![3]), &PreviewStyle::default()).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_overflow_continues_on_next_page() {
        let long = "Reduce traffic emissions. ".repeat(400);
        let mut rows = vec![header("1")];
        rows.extend(field("Description", &long));

        let doc = render_print_preview(&sheet(rows, vec![]), &PreviewStyle::default()).unwrap();
        // a single cell is never split, so the value row gets a page of its own
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_empty_sheet_has_blank_page() {
        let doc = render_print_preview(&sheet(vec![], vec![]), &PreviewStyle::default()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Hyv\u{e4} ty\u{f6}"), b"Hyv\xe4 ty\xf6");
        assert_eq!(win_ansi("\u{20ac}5 \u{2013} \u{017e}"), b"\x805 \x96 \x9e");
        assert_eq!(win_ansi("\u{4f60}"), b"?");
    }

    #[test]
    fn test_save() {
        let mut rows = vec![header("1")];
        rows.extend(field("Status", "On time"));
        let mut doc = render_print_preview(&sheet(rows, vec![]), &PreviewStyle::default()).unwrap();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        assert!(buffer.starts_with(b"%PDF-1.5"));
    }
}
