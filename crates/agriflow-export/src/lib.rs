//! AgriFlow Export Library
//!
//! The editing workspace that keeps the drawing session, the invoice document
//! and the rendered surface in step, plus the export pipeline that turns
//! snapshots of them into PDF and PNG artifacts.

pub mod error;
pub mod markup;
pub mod pdf;
pub mod pipeline;
pub mod sink;
pub mod workspace;

pub use error::{ExportError, ExportResult};
pub use markup::{Align, Block, Column, DocumentMarkup};
pub use pdf::{A4, DocumentRenderer, ExportPage, PdfRenderer};
pub use pipeline::{ExportOutcome, ExportPipeline};
pub use sink::{ArtifactSink, FileSink, MemorySink, sanitize_filename};
pub use workspace::{DocumentSnapshot, LayoutSnapshot, Workspace};
