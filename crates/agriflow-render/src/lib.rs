//! AgriFlow Render Library
//!
//! Turns the layout state (surface spec, committed shapes, in-progress
//! candidate) into a display list and rasterizes it on the CPU.

mod raster;
mod renderer;
mod scene;

pub use raster::{RasterRenderer, Surface};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DrawCommand, Scene, build_scene, shape_path};
