//! Export errors.

use agriflow_core::storage::StorageError;
use agriflow_render::RendererError;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(#[from] RendererError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
