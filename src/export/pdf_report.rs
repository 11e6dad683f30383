use chrono::NaiveDate;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb,
};

use super::ExportError;
use crate::model::attendance::AttendanceRecord;

// A4 portrait, millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const HEADER_HEIGHT: f32 = 10.0;
const ROW_HEIGHT: f32 = 8.5;
const FOOTER_SPACE: f32 = 20.0;

/// Column left edges relative to the table, and titles.
const COLUMNS: [(f32, &str); 4] = [
    (3.0, "Name"),
    (66.0, "Status"),
    (110.0, "Confidence"),
    (148.0, "Time"),
];

const CELL_SIZE: f32 = 11.0;
const CELL_PADDING: f32 = 2.0;
const ELLIPSIS: &str = "...";

// Builtin fonts carry no metrics here, so widths use an average glyph width.
const PT_TO_MM: f32 = 0.3528;
const AVG_GLYPH_EM: f32 = 0.5;

const TITLE: &str = "Attendance Report";
const FOOTER: &str = "Generated Automatically - Face Recognition Attendance System";

const ACCENT: (f32, f32, f32) = (0.0, 0.478, 1.0);
const STRIPE: (f32, f32, f32) = (0.953, 0.953, 0.953);

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Renders records as a paginated PDF table.
pub fn render_pdf(date: NaiveDate, records: &[AttendanceRecord]) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("{e:?}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("{e:?}")))?,
    };

    let mut layer = doc.get_page(page).get_layer(layer);

    // Title block
    let mut y = PAGE_HEIGHT - MARGIN - 8.0;
    set_fill(&layer, ACCENT);
    centered_text(&layer, TITLE, 22.0, y, &fonts.bold);
    y -= 10.0;
    set_fill(&layer, (0.0, 0.0, 0.0));
    centered_text(&layer, &format!("Date: {}", date.format("%Y-%m-%d")), 14.0, y, &fonts.regular);
    y -= 12.0;

    y = table_header(&layer, y, &fonts);

    let mut page_no = 1;
    for (index, record) in records.iter().enumerate() {
        if y - ROW_HEIGHT < MARGIN + FOOTER_SPACE {
            footer(&layer, &fonts);
            page_no += 1;
            layer = new_page(&doc, page_no);
            y = table_header(&layer, PAGE_HEIGHT - MARGIN, &fonts);
        }

        let top = y;
        y -= ROW_HEIGHT;

        if index % 2 == 0 {
            set_fill(&layer, STRIPE);
            fill_rect(&layer, MARGIN, y, MARGIN + TABLE_WIDTH, top);
        }

        set_fill(&layer, (0.0, 0.0, 0.0));
        let cells = [
            record.name.clone(),
            record.status.clone(),
            format!("{}%", (record.confidence * 100.0).round()),
            record.time.clone(),
        ];
        for (column, ((offset, _), cell)) in COLUMNS.iter().zip(cells).enumerate() {
            let cell = fit(&cell, column_width(column), CELL_SIZE);
            layer.use_text(cell, CELL_SIZE, Mm(MARGIN + offset), Mm(y + 2.8), &fonts.regular);
        }
    }

    footer(&layer, &fonts);

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))
}

fn new_page(doc: &PdfDocumentReference, page_no: usize) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {page_no}"));
    doc.get_page(page).get_layer(layer)
}

/// Draws the coloured header row whose top edge is at `top`; returns its bottom edge.
fn table_header(layer: &PdfLayerReference, top: f32, fonts: &Fonts) -> f32 {
    let bottom = top - HEADER_HEIGHT;

    set_fill(layer, ACCENT);
    fill_rect(layer, MARGIN, bottom, MARGIN + TABLE_WIDTH, top);

    set_fill(layer, (1.0, 1.0, 1.0));
    for (offset, title) in COLUMNS {
        layer.use_text(title, 12.0, Mm(MARGIN + offset), Mm(bottom + 3.2), &fonts.bold);
    }

    bottom
}

fn footer(layer: &PdfLayerReference, fonts: &Fonts) {
    set_fill(layer, (0.2, 0.2, 0.2));
    centered_text(layer, FOOTER, 10.0, MARGIN, &fonts.regular);
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn fill_rect(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    layer.add_rect(Rect::new(Mm(x1), Mm(y1), Mm(x2), Mm(y2)).with_mode(PaintMode::Fill));
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Usable width of a column, up to the next column's left edge.
fn column_width(column: usize) -> f32 {
    let next = COLUMNS
        .get(column + 1)
        .map_or(TABLE_WIDTH, |(offset, _)| *offset);
    next - COLUMNS[column].0 - CELL_PADDING
}

/// Cuts `text` to fit `width` millimetres, ending the cut with an ellipsis.
fn fit(text: &str, width: f32, size: f32) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let max_chars = (width / text_width("m", size)) as usize;
    let kept: String = text
        .chars()
        .take(max_chars.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

fn centered_text(layer: &PdfLayerReference, text: &str, size: f32, y: f32, font: &IndirectFontRef) {
    let width = text_width(text, size);
    let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
    layer.use_text(text, size, Mm(x), Mm(y), font);
}
