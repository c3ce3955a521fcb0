//! Renderer trait abstraction.

use crate::raster::Surface;
use agriflow_core::config::SurfaceSpec;
use agriflow_core::shapes::Shape;
use agriflow_core::store::ShapeStore;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Inputs of a single frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Surface size, grid and boundary.
    pub spec: &'a SurfaceSpec,
    /// Committed shapes in paint order.
    pub shapes: &'a ShapeStore,
    /// Uncommitted shape being dragged; painted over everything else.
    pub candidate: Option<&'a Shape>,
}

impl<'a> RenderContext<'a> {
    /// Create a context without a candidate.
    pub fn new(spec: &'a SurfaceSpec, shapes: &'a ShapeStore) -> Self {
        Self {
            spec,
            shapes,
            candidate: None,
        }
    }

    /// Set the in-progress candidate.
    pub fn with_candidate(mut self, candidate: Option<&'a Shape>) -> Self {
        self.candidate = candidate;
        self
    }
}

/// Trait for rendering backends.
///
/// Rendering is a full redraw: the output depends on the context only, so
/// identical contexts give identical surfaces.
pub trait Renderer: Send + Sync {
    /// Render a frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<Surface>;
}
