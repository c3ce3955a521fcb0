//! CPU rasterization with tiny-skia.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{DrawCommand, Scene, build_scene};
use agriflow_core::shapes::SerializableColor;
use kurbo::{BezPath, PathEl};
use std::fmt;
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// A rendered frame: straight (non-premultiplied) RGBA8 pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel data.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// RGB8 pixel data with alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Pixel at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<SerializableColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some(SerializableColor::new(px[0], px[1], px[2], px[3]))
    }

    /// Encode RGBA pixel data to PNG bytes.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(format!("PNG header: {e}")))?;
            writer
                .write_image_data(&self.rgba)
                .map_err(|e| RendererError::Encode(format!("PNG data: {e}")))?;
        }
        Ok(png_data)
    }
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Rasterizes scenes into anti-aliased [`Surface`]s on the CPU.
#[derive(Debug, Clone, Default)]
pub struct RasterRenderer;

impl RasterRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterize `scene` onto a fresh `width` × `height` surface.
    pub fn rasterize(&self, scene: &Scene, width: u32, height: u32) -> RenderResult<Surface> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::Surface(format!("cannot allocate a {width}x{height} surface"))
        })?;

        for command in scene.commands() {
            match command {
                DrawCommand::Clear(color) => {
                    pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
                }
                DrawCommand::Stroke { path, color, width } => {
                    let Some(path) = skia_path(path) else {
                        log::debug!("Skipping empty path");
                        continue;
                    };
                    let mut paint = Paint::default();
                    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
                    let stroke = Stroke {
                        width: *width as f32,
                        line_cap: LineCap::Round,
                        ..Default::default()
                    };
                    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                }
            }
        }
        Ok(Surface::from_pixmap(&pixmap))
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<Surface> {
        let scene = build_scene(ctx);
        log::debug!(
            "Rendering {} shapes{} ({} commands)",
            ctx.shapes.len(),
            if ctx.candidate.is_some() { " + candidate" } else { "" },
            scene.len()
        );
        self.rasterize(&scene, ctx.spec.width, ctx.spec.height)
    }
}
