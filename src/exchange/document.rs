//! PDF snapshot
//!
//! A4 portrait table of every entry at fixed column offsets, paginated when the
//! next row would cross the bottom margin. Optionally followed by a landscape
//! page carrying the trend chart.

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;

use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};

use super::tabular::CSV_HEADERS;
use super::{ExchangeError, ExchangeResult};
use crate::models::{format_timestamp, HealthEntry};

pub const DOCUMENT_TITLE: &str = "Health Tracker Export";

// ============================================================================
// Layout (millimetres)
// ============================================================================

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 17.6;
const MARGIN_TOP: f32 = 14.0;
const MARGIN_BOTTOM: f32 = 14.0;
const ROW_PITCH: f32 = 7.0;

/// Column x offsets from the left margin: date, weight, sugar, sleep, mood, notes
const COLUMN_OFFSETS: [f32; 6] = [0.0, 34.0, 56.0, 78.0, 100.0, 126.0];
const NOTES_MAX_CHARS: usize = 36;

const TITLE_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 9.0;

const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

/// Landscape chart page
const CHART_PAGE_WIDTH: f32 = 297.0;
const CHART_PAGE_HEIGHT: f32 = 210.0;
const CHART_DPI: f32 = 120.0;

// ============================================================================
// Pagination
// ============================================================================

/// Baseline of the first data row on page `index`; page 0 also carries the title
fn first_row_y(index: usize) -> f32 {
    let top = PAGE_HEIGHT - MARGIN_TOP;
    if index == 0 {
        top - 2.0 * ROW_PITCH
    } else {
        top - ROW_PITCH
    }
}

fn rows_fitting(first_row_y: f32) -> usize {
    ((first_row_y - MARGIN_BOTTOM) / ROW_PITCH).floor() as usize + 1
}

/// Split `count` rows into per-page ranges. Always at least one page.
pub fn paginate(count: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    loop {
        let capacity = rows_fitting(first_row_y(pages.len()));
        let end = (start + capacity).min(count);
        pages.push(start..end);
        if end >= count {
            break;
        }
        start = end;
    }
    pages
}

// ============================================================================
// Drawing helpers
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(layer: &PdfLayerReference, x1: Mm, x2: Mm, y: Mm, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y), false), (Point::new(x2, y), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Notes on one line, cut to the width of the last column
fn notes_cell(notes: &str) -> String {
    let flat: String = notes
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.trim();

    if flat.chars().count() <= NOTES_MAX_CHARS {
        flat.to_string()
    } else {
        let cut: String = flat.chars().take(NOTES_MAX_CHARS - 3).collect();
        format!("{}...", cut.trim_end())
    }
}

fn row_cells(entry: &HealthEntry) -> [String; 6] {
    [
        format_timestamp(&entry.timestamp),
        entry.weight.to_string(),
        entry.blood_sugar.to_string(),
        entry.sleep_hours.to_string(),
        entry.mood.as_str().to_string(),
        notes_cell(&entry.notes),
    ]
}

fn pdf_err<E: std::fmt::Display>(e: E) -> ExchangeError {
    ExchangeError::Pdf(e.to_string())
}

// ============================================================================
// Export
// ============================================================================

/// Write the snapshot to `path`; returns the number of table pages
pub fn export_document(
    path: &Path,
    entries: &[HealthEntry],
    chart_png: Option<&[u8]>,
) -> ExchangeResult<usize> {
    let pages = paginate(entries.len());

    let (doc, page1, layer1) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (index, rows) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        let mut y = PAGE_HEIGHT - MARGIN_TOP;

        if index == 0 {
            add_text(
                &layer,
                &font_bold,
                DOCUMENT_TITLE,
                Mm(MARGIN_LEFT),
                Mm(y),
                TITLE_SIZE,
                COLOR_BLACK,
            );
            y -= ROW_PITCH;
        }

        for (header, offset) in CSV_HEADERS.iter().zip(COLUMN_OFFSETS) {
            add_text(
                &layer,
                &font_bold,
                header,
                Mm(MARGIN_LEFT + offset),
                Mm(y),
                TEXT_SIZE,
                COLOR_BLACK,
            );
        }
        add_line(
            &layer,
            Mm(MARGIN_LEFT),
            Mm(PAGE_WIDTH - MARGIN_LEFT),
            Mm(y - 2.0),
            COLOR_GRAY,
            0.5,
        );
        y -= ROW_PITCH;

        for entry in &entries[rows.clone()] {
            for (cell, offset) in row_cells(entry).iter().zip(COLUMN_OFFSETS) {
                add_text(
                    &layer,
                    &font,
                    cell,
                    Mm(MARGIN_LEFT + offset),
                    Mm(y),
                    TEXT_SIZE,
                    COLOR_BLACK,
                );
            }
            y -= ROW_PITCH;
        }
    }

    if let Some(png_bytes) = chart_png {
        let (page, layer) = doc.add_page(Mm(CHART_PAGE_WIDTH), Mm(CHART_PAGE_HEIGHT), "Chart Page");
        let layer = doc.get_page(page).get_layer(layer);
        let top = CHART_PAGE_HEIGHT - 20.0;

        add_text(&layer, &font_bold, "Trend", Mm(15.0), Mm(top), TITLE_SIZE, COLOR_BLACK);

        let dynamic_image = printpdf::image_crate::load_from_memory(png_bytes).map_err(pdf_err)?;
        let pdf_image = Image::from_dynamic_image(&dynamic_image);

        // Anchor the image's top edge just under the title
        let (_, height_px) = GenericImageView::dimensions(&dynamic_image);
        let height_mm = height_px as f32 / CHART_DPI * 25.4;
        let transform = ImageTransform {
            translate_x: Some(Mm(15.0)),
            translate_y: Some(Mm((top - 8.0 - height_mm).max(5.0))),
            dpi: Some(CHART_DPI),
            ..Default::default()
        };
        pdf_image.add_to_layer(layer, transform);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(pdf_err)?;

    tracing::info!(
        "Wrote {} entries to PDF across {} pages",
        entries.len(),
        pages.len()
    );
    Ok(pages.len())
}
