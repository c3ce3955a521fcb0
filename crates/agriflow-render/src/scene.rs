//! Display list construction.
//!
//! Building the scene is pure geometry; rasterization happens separately so
//! the paint order and the geometry of every stroke can be inspected.

use crate::renderer::RenderContext;
use agriflow_core::config::{MIN_GRID_STEP, SurfaceSpec};
use agriflow_core::shapes::{
    SerializableColor, Shape, ShapeKind, SymbolGlyph, arrowhead, normalized_rect, symbol_glyph,
};
use kurbo::{BezPath, Line, Point};

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(SerializableColor),
    /// Stroke a path.
    Stroke {
        path: BezPath,
        color: SerializableColor,
        width: f64,
    },
}

/// Ordered display list; later commands paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn stroke(&mut self, path: BezPath, color: SerializableColor, width: f64) {
        self.push(DrawCommand::Stroke { path, color, width });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn last(&self) -> Option<&DrawCommand> {
        self.commands.last()
    }
}

fn push_line(path: &mut BezPath, line: Line) {
    path.move_to(line.p0);
    path.line_to(line.p1);
}

fn grid_path(spec: &SurfaceSpec) -> BezPath {
    let mut path = BezPath::new();
    // f64::max also maps NaN to the minimum.
    let step = spec.grid_step.max(MIN_GRID_STEP);
    let (width, height) = (spec.width as f64, spec.height as f64);
    let mut x = 0.0;
    while x <= width {
        push_line(&mut path, Line::new((x, 0.0), (x, height)));
        x += step;
    }
    let mut y = 0.0;
    while y <= height {
        push_line(&mut path, Line::new((0.0, y), (width, y)));
        y += step;
    }
    path
}

/// Outline geometry of a shape.
///
/// Lines get an arrowhead at `end`; rectangles are normalized so the drag
/// direction does not matter; symbols are centred on `end` and ignore
/// `start`.
pub fn shape_path(shape: &Shape, spec: &SurfaceSpec) -> BezPath {
    let mut path = BezPath::new();
    match shape.kind() {
        ShapeKind::Line => {
            push_line(&mut path, Line::new(shape.start(), shape.end()));
            for barb in arrowhead(shape.start(), shape.end(), spec.arrow_length, spec.arrow_angle) {
                push_line(&mut path, barb);
            }
        }
        ShapeKind::Rectangle => {
            path = rect_path(normalized_rect(shape.start(), shape.end()));
        }
        ShapeKind::Symbol(variant) => match symbol_glyph(variant, shape.end()) {
            SymbolGlyph::Sprinkler { stem, arms } => {
                push_line(&mut path, stem);
                for arm in arms {
                    push_line(&mut path, arm);
                }
            }
            SymbolGlyph::Valve { square } => path = rect_path(square),
        },
    }
    path
}

fn rect_path(rect: kurbo::Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(rect.x0, rect.y0));
    path.line_to(Point::new(rect.x1, rect.y0));
    path.line_to(Point::new(rect.x1, rect.y1));
    path.line_to(Point::new(rect.x0, rect.y1));
    path.close_path();
    path
}

fn push_shape(scene: &mut Scene, shape: &Shape, spec: &SurfaceSpec) {
    let style = shape.style();
    scene.stroke(shape_path(shape, spec), style.stroke_color, style.stroke_width());
}

/// Build the full frame: background, grid, boundary, committed shapes in
/// order, then the candidate.
pub fn build_scene(ctx: &RenderContext) -> Scene {
    let spec = ctx.spec;
    let mut scene = Scene::new();
    scene.push(DrawCommand::Clear(spec.background));
    scene.stroke(grid_path(spec), spec.grid_color, spec.grid_width);
    scene.stroke(rect_path(spec.boundary), spec.boundary_color, spec.boundary_width);

    for shape in ctx.shapes {
        push_shape(&mut scene, shape, spec);
    }
    if let Some(candidate) = ctx.candidate {
        push_shape(&mut scene, candidate, spec);
    }
    scene
}
