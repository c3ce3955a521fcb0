//! Single-page PDF assembly with lopdf.

use crate::error::{ExportError, ExportResult};
use crate::markup::{Align, Block, DocumentMarkup};
use agriflow_core::storage::BoxFuture;
use agriflow_render::Surface;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::sync::Arc;

/// A4 portrait in points.
pub const A4: (f32, f32) = (595.28, 841.89);

const MARGIN: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 14.0;
const LEADING: f32 = 1.45;
/// Rough Helvetica advance per character, as a fraction of the font size.
const CHAR_WIDTH: f32 = 0.5;

/// What goes on one exported page.
#[derive(Debug, Clone)]
pub struct ExportPage {
    pub markup: DocumentMarkup,
    /// Layout surface placed at the markup's snapshot block.
    pub surface: Option<Arc<Surface>>,
    /// Document title stored in the PDF metadata.
    pub title: String,
}

/// Turns a page into document bytes.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, page: ExportPage) -> BoxFuture<'static, ExportResult<Vec<u8>>>;
}

/// Renders pages as single-page A4 PDFs with the standard Helvetica fonts.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    page_size: (f32, f32),
    margin: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            page_size: A4,
            margin: MARGIN,
        }
    }
}

/// Encode text for a WinAnsi font; characters outside Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH
}

/// Break `text` at spaces so each line fits `width`. Words longer than a
/// line are kept whole.
fn wrap_text(text: &str, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && text_width(&candidate, size) > width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

/// Accumulates content operations while moving a cursor down the page.
struct PageWriter {
    ops: Vec<Operation>,
    left: f32,
    right: f32,
    bottom: f32,
    y: f32,
    /// Set once anything was placed below the bottom margin.
    overflowed: bool,
}

impl PageWriter {
    fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            ops: Vec::new(),
            left: margin,
            right: page_width - margin,
            bottom: margin,
            y: page_height - margin,
            overflowed: false,
        }
    }

    fn text_at(&mut self, x: f32, font: &str, size: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), self.y.into()]));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(encode_text(text))]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn advance(&mut self, size: f32) {
        self.y -= size * LEADING;
        self.overflowed |= self.y < self.bottom;
    }

    fn line(&mut self, font: &str, size: f32, text: &str) {
        for part in wrap_text(text, size, self.right - self.left) {
            self.advance(size);
            self.text_at(self.left, font, size, &part);
        }
    }

    fn centered(&mut self, font: &str, size: f32, text: &str) {
        self.advance(size);
        let x = (self.left + self.right - text_width(text, size)) / 2.0;
        self.text_at(x.max(self.left), font, size, text);
    }

    fn rule(&mut self) {
        self.y -= 4.0;
        self.overflowed |= self.y < self.bottom;
        self.ops.push(Operation::new("w", vec![0.5f32.into()]));
        self.ops.push(Operation::new("m", vec![self.left.into(), self.y.into()]));
        self.ops.push(Operation::new("l", vec![self.right.into(), self.y.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn row(&mut self, font: &str, cells: &[String], columns: &[(f32, f32, Align)]) {
        self.advance(BODY_SIZE);
        for (cell, &(x, width, align)) in cells.iter().zip(columns) {
            let x = match align {
                Align::Left => x,
                Align::Right => x + width - text_width(cell, BODY_SIZE) - 2.0,
            };
            self.text_at(x, font, BODY_SIZE, cell);
        }
    }

    fn image(&mut self, name: &str, width_px: u32, height_px: u32) {
        let mut width = self.right - self.left;
        let mut height = height_px as f32 * width / width_px as f32;
        let available = self.y - self.bottom;
        if available <= 0.0 {
            self.overflowed = true;
            return;
        }
        if height > available {
            width *= available / height;
            height = available;
        }
        self.y -= height + 4.0;
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0f32.into(),
                0f32.into(),
                height.into(),
                self.left.into(),
                self.y.into(),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![name.into()]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the PDF synchronously.
    pub fn render_page(&self, page: &ExportPage) -> ExportResult<Vec<u8>> {
        let (page_width, page_height) = self.page_size;
        let mut doc = Document::with_version("1.5");
        let id_pages = doc.new_object_id();

        let id_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let id_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut writer = PageWriter::new(page_width, page_height, self.margin);

        let mut xobjects = lopdf::Dictionary::new();
        for block in &page.markup.blocks {
            match block {
                Block::Heading(text) => writer.centered("F2", HEADING_SIZE, text),
                Block::Text(text) => writer.line("F1", BODY_SIZE, text),
                Block::Rule => writer.rule(),
                Block::Table { columns, rows } => {
                    let total: f32 = columns.iter().map(|c| c.weight).sum();
                    let span = writer.right - writer.left;
                    let mut x = writer.left;
                    let layout: Vec<(f32, f32, Align)> = columns
                        .iter()
                        .map(|c| {
                            let width = span * c.weight / total.max(f32::EPSILON);
                            let slot = (x, width, c.align);
                            x += width;
                            slot
                        })
                        .collect();
                    let header: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
                    writer.row("F2", &header, &layout);
                    writer.rule();
                    for row in rows {
                        writer.row("F1", row, &layout);
                    }
                    writer.rule();
                }
                Block::Amount { label, value, emphasis } => {
                    let font = if *emphasis { "F2" } else { "F1" };
                    writer.advance(BODY_SIZE);
                    let label_x = writer.right - 220.0;
                    writer.text_at(label_x, font, BODY_SIZE, label);
                    let value_x = writer.right - text_width(value, BODY_SIZE);
                    writer.text_at(value_x, font, BODY_SIZE, value);
                }
                Block::Snapshot => match &page.surface {
                    Some(surface) => {
                        let image = Stream::new(
                            dictionary! {
                                "Type" => "XObject",
                                "Subtype" => "Image",
                                "Width" => surface.width() as i64,
                                "Height" => surface.height() as i64,
                                "ColorSpace" => "DeviceRGB",
                                "BitsPerComponent" => 8,
                            },
                            surface.to_rgb(),
                        );
                        let id_image = doc.add_object(image);
                        xobjects.set("Im1", id_image);
                        writer.image("Im1", surface.width(), surface.height());
                    }
                    None => log::warn!("Page has a snapshot block but no surface"),
                },
            }
        }

        if writer.overflowed {
            log::warn!("\"{}\" does not fit on one page; content below the margin is cut off", page.title);
        }
        let content = Content { operations: writer.ops };
        let id_content = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let id_resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => id_regular,
                "F2" => id_bold,
            },
            "XObject" => xobjects,
        });
        let id_page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => id_pages,
            "Contents" => id_content,
            "Resources" => id_resources,
        });
        doc.set_object(
            id_pages,
            dictionary! {
                "Type" => "Pages",
                "Count" => 1,
                "Kids" => vec![id_page.into()],
                "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            },
        );
        let id_catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => id_pages,
        });
        doc.trailer.set("Root", id_catalog);
        let id_info = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_text(&page.title)),
            "Creator" => Object::string_literal("AgriFlow"),
        });
        doc.trailer.set("Info", id_info);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ExportError::Io(e.to_string()))?;
        Ok(buffer)
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, page: ExportPage) -> BoxFuture<'static, ExportResult<Vec<u8>>> {
        let renderer = self.clone();
        Box::pin(async move {
            let bytes = renderer.render_page(&page)?;
            log::info!("Rendered \"{}\" ({} bytes)", page.title, bytes.len());
            Ok(bytes)
        })
    }
}
