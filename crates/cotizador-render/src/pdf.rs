//! # PDF Renderer
//!
//! A4 quotation laid out with printpdf's builtin Helvetica fonts.
//!
//! ## Page Layout (mm, origin bottom-left)
//! ```text
//!  297 ┌──────────────────────────────────────────────┐
//!      │              AUTOROSEMBERG                   │  header, centered
//!      │        detail lines ... [ logo ]             │
//!      │ ┌──────────────────────────────────────────┐ │
//!      │ │ CLIENTE:  ...             COTIZACIÓN     │ │  info box
//!      │ │ DIRECCION: ...            N° COT-2       │ │
//!      │ │ C.C. ó NIT: ...           FECHA 16/10/.. │ │
//!      │ └──────────────────────────────────────────┘ │
//!      │ Unit │ Descripción │ V. Unitario │ V. Total  │  table, header row
//!      │  1   │ Pintura     │             │ $ 50.000  │  repeated after a
//!      │  ... │             │             │           │  page break
//!      │                            Total:  $ 50.000  │
//!      │   [      ]                [ firma ]          │
//!      │   ────────                ────────           │
//!      │ FIRMA COMPRADOR        FIRMA VENDEDOR        │
//!   0  └──────────────────────────────────────────────┘
//!      0                                           210
//! ```

use std::io::BufWriter;
use std::path::PathBuf;

use cotizador_core::document::{
    Block, ClientInfoBlock, HeaderBlock, ItemRow, ItemTable, QuotationInfoBlock, SignatureBlock,
};
use cotizador_core::{Document, ImageRef};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point,
};
use tracing::{debug, info};

use crate::assets::AssetResolver;
use crate::error::{RenderError, RenderResult};
use crate::output::{output_file_name, write_atomic};
use crate::{DocumentRenderer, RenderFormat, RenderedArtifact};

// =============================================================================
// Layout Constants
// =============================================================================

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TOP: f32 = PAGE_HEIGHT - MARGIN;
const BOTTOM: f32 = 20.0;

const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 5.0;
const ROW_PADDING: f32 = 2.0;

/// Column left edges and widths of the item table.
const COLUMNS: [(f32, f32); 4] = [(15.0, 15.0), (30.0, 100.0), (130.0, 35.0), (165.0, 30.0)];
const TABLE_HEADER_HEIGHT: f32 = LINE_HEIGHT + 2.0 * ROW_PADDING;

/// Client values sit between the labels and the quotation column.
const INFO_VALUE_X: f32 = MARGIN + 30.0;
const INFO_COLUMN_X: f32 = 145.0;
const INFO_VALUE_WIDTH: f32 = INFO_COLUMN_X - INFO_VALUE_X - 5.0;
const INFO_MAX_LINES: usize = 6;

const LOGO_MAX: (f32, f32) = (60.0, 30.0);
const SIGNATURE_MAX: (f32, f32) = (50.0, 25.0);
const SIGNATURE_CENTERS: [f32; 2] = [60.0, 150.0];
const SIGNATURE_BLOCK_HEIGHT: f32 = SIGNATURE_MAX.1 + 20.0;

const IMAGE_DPI: f32 = 300.0;
const PT_TO_MM: f32 = 0.352_778;

/// Approximate width of `text` in Helvetica at `size` points.
///
/// Builtin fonts carry no metrics; half an em per character is close enough
/// for centering and wrapping.
pub fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

/// Greedy word wrap to `max_width_mm`. Words longer than a line are split.
pub fn wrap_text(text: &str, max_width_mm: f32, size: f32) -> Vec<String> {
    let max_chars = ((max_width_mm / (size * 0.5 * PT_TO_MM)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrapped lines of a client value, at most [`INFO_MAX_LINES`]; a cut value
/// ends in `...`.
pub fn info_value_lines(value: &str) -> Vec<String> {
    let mut lines = wrap_text(value, INFO_VALUE_WIDTH, BODY_SIZE);
    if lines.len() > INFO_MAX_LINES {
        lines.truncate(INFO_MAX_LINES);
        if let Some(last) = lines.last_mut() {
            let keep = last.chars().count().saturating_sub(3);
            *last = last.chars().take(keep).collect::<String>() + "...";
        }
    }
    lines
}

/// Description lines of one table row that fit on an empty page below the
/// repeated table header.
fn max_row_lines() -> usize {
    (((TOP - BOTTOM - TABLE_HEADER_HEIGHT - 2.0 * ROW_PADDING) / LINE_HEIGHT).floor() as usize)
        .max(1)
}

/// Scale factor and resulting size (mm) that fit an image of `px` pixels
/// into `max` millimetres at [`IMAGE_DPI`], never enlarging past 4x.
pub fn fit_image(px: (u32, u32), max: (f32, f32)) -> (f32, f32, f32) {
    let natural_w = px.0.max(1) as f32 * 25.4 / IMAGE_DPI;
    let natural_h = px.1.max(1) as f32 * 25.4 / IMAGE_DPI;
    let scale = (max.0 / natural_w).min(max.1 / natural_h).min(4.0);
    (scale, natural_w * scale, natural_h * scale)
}

// =============================================================================
// Page Writer
// =============================================================================

/// Current layer plus a vertical cursor; opens new pages as content flows.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl<'a> PageWriter<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        page: PdfPageIndex,
        layer: PdfLayerIndex,
    ) -> RenderResult<Self> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        Ok(PageWriter {
            doc,
            layer: doc.get_page(page).get_layer(layer),
            regular,
            bold,
            y: TOP,
            pages: 1,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn centered(&self, text: &str, size: f32, center_x: f32, bold: bool) {
        let x = center_x - text_width_mm(text, size) / 2.0;
        self.text(text, size, x.max(MARGIN), bold);
    }

    fn hline(&self, x1: f32, x2: f32, y: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn rect(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
                (Point::new(Mm(x1), Mm(y2)), false),
            ],
            is_closed: true,
        });
    }

    /// Starts a new page when fewer than `height` mm remain.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.y - height >= BOTTOM {
            return false;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", self.pages + 1));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
        debug!(page = self.pages, "Started new PDF page");
        true
    }

    /// Places an image with its top edge at the cursor, centered on `center_x`.
    /// Returns the height used.
    fn image(&self, image: DynamicImage, center_x: f32, max: (f32, f32)) -> f32 {
        let (scale, width, height) = fit_image((image.width(), image.height()), max);
        Image::from_dynamic_image(&image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(center_x - width / 2.0)),
                translate_y: Some(Mm(self.y - height)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        height
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Writes `.pdf` files into an output directory.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    assets: AssetResolver,
    output_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(assets: AssetResolver, output_dir: impl Into<PathBuf>) -> Self {
        PdfRenderer {
            assets,
            output_dir: output_dir.into(),
        }
    }

    fn load_image(&self, image: &ImageRef) -> RenderResult<DynamicImage> {
        let asset = self.assets.resolve(image)?;
        let bytes = asset.read()?;
        let decoded = image_crate::load_from_memory(&bytes).map_err(|e| {
            RenderError::InvalidImage {
                path: asset.path.clone(),
                message: e.to_string(),
            }
        })?;
        // Alpha channels are dropped; the page is white.
        Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
    }

    /// Lays out the document and returns the PDF bytes.
    pub fn to_pdf_bytes(&self, document: &Document) -> RenderResult<Vec<u8>> {
        // Resolve every image up front so a missing asset fails before layout.
        let mut images = Vec::new();
        for image in document.image_refs() {
            images.push((image.path.clone(), self.load_image(image)?));
        }
        let mut take_image = |image: &ImageRef| -> Option<DynamicImage> {
            let pos = images.iter().position(|(path, _)| *path == image.path)?;
            Some(images.remove(pos).1)
        };

        let (doc, page, layer) =
            PdfDocument::new(&document.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let mut writer = PageWriter::new(&doc, page, layer)?;

        let client = document.blocks.iter().find_map(|b| match b {
            Block::ClientInfo(c) => Some(c),
            _ => None,
        });
        let info = document.blocks.iter().find_map(|b| match b {
            Block::QuotationInfo(q) => Some(q),
            _ => None,
        });

        for block in &document.blocks {
            match block {
                Block::Header(header) => {
                    let logo = take_image(&header.logo);
                    draw_header(&mut writer, header, logo);
                }
                // Drawn together as one box when the quotation info follows.
                Block::ClientInfo(_) => {}
                Block::QuotationInfo(_) => draw_info_box(&mut writer, client, info),
                Block::ItemTable(table) => draw_table(&mut writer, table),
                Block::Signatures(signatures) => {
                    let slots: Vec<Option<DynamicImage>> = signatures
                        .slots
                        .iter()
                        .map(|s| s.image.as_ref().and_then(&mut take_image))
                        .collect();
                    draw_signatures(&mut writer, signatures, slots);
                }
            }
        }

        let pages = writer.pages;
        drop(writer);
        let mut out = BufWriter::new(Vec::<u8>::new());
        doc.save(&mut out)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bytes = out
            .into_inner()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        debug!(pages, bytes = bytes.len(), "PDF laid out");
        Ok(bytes)
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Pdf
    }

    fn render(&self, document: &Document, suggested_file_name: &str) -> RenderResult<RenderedArtifact> {
        let bytes = self.to_pdf_bytes(document)?;
        let file_name = output_file_name(suggested_file_name, RenderFormat::Pdf.extension());
        let path = write_atomic(&self.output_dir, &file_name, &bytes)?;

        info!(path = %path.display(), bytes = bytes.len(), "PDF quotation written");
        Ok(RenderedArtifact {
            path,
            format: RenderFormat::Pdf,
            bytes_written: bytes.len() as u64,
        })
    }
}

// =============================================================================
// Blocks
// =============================================================================

fn draw_header(w: &mut PageWriter<'_>, header: &HeaderBlock, logo: Option<DynamicImage>) {
    let center = PAGE_WIDTH / 2.0;

    w.y -= 8.0;
    w.centered(&header.company_name, 22.0, center, true);
    w.y -= 3.0;
    for line in &header.details {
        w.y -= LINE_HEIGHT;
        w.centered(line, BODY_SIZE, center, false);
    }
    w.y -= 4.0;

    if let Some(logo) = logo {
        let used = w.image(logo, center, LOGO_MAX);
        w.y -= used + 4.0;
    }
}

fn draw_info_box(
    w: &mut PageWriter<'_>,
    client: Option<&ClientInfoBlock>,
    info: Option<&QuotationInfoBlock>,
) {
    let fields: Vec<(&str, Vec<String>)> = client
        .map(|c| {
            c.fields
                .iter()
                .map(|f| (f.label.as_str(), info_value_lines(&f.value)))
                .collect()
        })
        .unwrap_or_default();

    let client_height: f32 = fields
        .iter()
        .map(|(_, lines)| lines.len() as f32 * LINE_HEIGHT + 2.0)
        .sum();
    let height = client_height.max(4.0 * (LINE_HEIGHT + 2.0)) + 6.0;
    w.ensure_space(height);

    let top = w.y;
    w.rect(MARGIN, top, PAGE_WIDTH - MARGIN, top - height);

    let mut y = top - 6.0;
    for (label, lines) in &fields {
        w.y = y;
        w.text(label, BODY_SIZE, MARGIN + 3.0, true);
        for line in lines {
            w.text(line, BODY_SIZE, INFO_VALUE_X, false);
            w.hline(INFO_VALUE_X, INFO_COLUMN_X - 5.0, w.y - 1.5);
            w.y -= LINE_HEIGHT;
        }
        y -= lines.len() as f32 * LINE_HEIGHT + 2.0;
    }

    if let Some(info) = info {
        let mut y = top - 6.0;
        for (text, bold) in [
            (&info.title, true),
            (&info.number, false),
            (&info.date_label, true),
            (&info.date, false),
        ] {
            w.y = y;
            w.text(text, BODY_SIZE, INFO_COLUMN_X, bold);
            y -= LINE_HEIGHT + 2.0;
        }
    }

    w.y = top - height - 6.0;
}

fn table_header(w: &mut PageWriter<'_>, table: &ItemTable) {
    let row_top = w.y;
    w.y -= LINE_HEIGHT + ROW_PADDING;
    for (column, (x, width)) in table.columns.iter().zip(COLUMNS) {
        w.centered(column, BODY_SIZE, x + width / 2.0, true);
    }
    w.hline(MARGIN, PAGE_WIDTH - MARGIN, row_top);
    w.y -= ROW_PADDING;
    w.hline(MARGIN, PAGE_WIDTH - MARGIN, w.y);
}

/// Draws one row; a description taller than a page continues on the next
/// one, under a repeated header, without index or values.
fn draw_row(w: &mut PageWriter<'_>, table: &ItemTable, row: &ItemRow) {
    let description = wrap_text(&row.description, COLUMNS[1].1 - 4.0, BODY_SIZE);
    let mut remaining = description.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let wanted = remaining.len().min(max_row_lines());
        if w.ensure_space(wanted as f32 * LINE_HEIGHT + 2.0 * ROW_PADDING) {
            table_header(w, table);
        }

        let fits = ((w.y - BOTTOM - 2.0 * ROW_PADDING) / LINE_HEIGHT).floor().max(1.0) as usize;
        let (chunk, rest) = remaining.split_at(fits.min(remaining.len()));
        let height = chunk.len() as f32 * LINE_HEIGHT + 2.0 * ROW_PADDING;

        let row_top = w.y;
        w.y -= LINE_HEIGHT + ROW_PADDING / 2.0;
        if first {
            w.text(&row.index.to_string(), BODY_SIZE, COLUMNS[0].0 + 2.0, false);
            w.text(&row.unit_value, BODY_SIZE, COLUMNS[2].0 + 2.0, false);
            w.text(&row.total_value, BODY_SIZE, COLUMNS[3].0 + 2.0, false);
        }
        for line in chunk {
            w.text(line, BODY_SIZE, COLUMNS[1].0 + 2.0, false);
            w.y -= LINE_HEIGHT;
        }

        w.y = row_top - height;
        w.hline(MARGIN, PAGE_WIDTH - MARGIN, w.y);
        remaining = rest;
        first = false;
    }
}

fn draw_table(w: &mut PageWriter<'_>, table: &ItemTable) {
    w.ensure_space(3.0 * TABLE_HEADER_HEIGHT);
    table_header(w, table);

    for row in &table.rows {
        draw_row(w, table, row);
    }

    w.ensure_space(LINE_HEIGHT + 2.0 * ROW_PADDING);
    w.y -= LINE_HEIGHT + ROW_PADDING;
    let label_right = COLUMNS[3].0 - 2.0;
    let label_x = label_right - text_width_mm(&table.total.label, BODY_SIZE);
    w.text(&table.total.label, BODY_SIZE, label_x, true);
    w.text(&table.total.value, BODY_SIZE, COLUMNS[3].0 + 2.0, true);
    w.y -= ROW_PADDING;
    w.hline(COLUMNS[3].0, PAGE_WIDTH - MARGIN, w.y);
    w.y -= 10.0;
}

fn draw_signatures(
    w: &mut PageWriter<'_>,
    block: &SignatureBlock,
    images: Vec<Option<DynamicImage>>,
) {
    w.ensure_space(SIGNATURE_BLOCK_HEIGHT);
    let top = w.y - 5.0;

    for ((slot, image), center) in block.slots.iter().zip(images).zip(SIGNATURE_CENTERS) {
        w.y = top;
        if let Some(image) = image {
            w.image(image, center, SIGNATURE_MAX);
        }

        let line_y = top - SIGNATURE_MAX.1 - 2.0;
        w.hline(center - 30.0, center + 30.0, line_y);
        w.y = line_y - LINE_HEIGHT;
        w.centered(&slot.label, BODY_SIZE, center, true);
    }

    w.y = top - SIGNATURE_BLOCK_HEIGHT;
}

// =============================================================================
// Unit Tests
// =============================================================================
