//! Export operations.
//!
//! Each export captures what it needs from the [`Workspace`] synchronously
//! and returns a future that owns that capture. Edits made after the call
//! returns do not reach the artifact being produced.

use crate::error::ExportResult;
use crate::markup::DocumentMarkup;
use crate::pdf::{DocumentRenderer, ExportPage, PdfRenderer};
use crate::sink::ArtifactSink;
use crate::workspace::{DocumentSnapshot, Workspace};
use agriflow_core::invoice::{DocumentVariant, InvoiceDocument};
use agriflow_core::storage::BoxFuture;
use std::sync::Arc;

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The artifact was produced and handed to the sink.
    Saved { filename: String, bytes: usize },
    /// Nothing to export yet; the surface was never initialized.
    Skipped,
}

fn filename(document: &InvoiceDocument, fallback: &str, suffix: &str) -> String {
    let farmer = document.details.farmer_name.trim();
    let stem = if farmer.is_empty() { fallback } else { farmer };
    format!("{stem}{suffix}")
}

/// Renders pages and hands the bytes to a sink.
#[derive(Clone)]
pub struct ExportPipeline {
    renderer: Arc<dyn DocumentRenderer>,
    sink: Arc<dyn ArtifactSink>,
}

impl ExportPipeline {
    pub fn new(renderer: Arc<dyn DocumentRenderer>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self { renderer, sink }
    }

    /// PDF pipeline writing to `sink`.
    pub fn pdf(sink: Arc<dyn ArtifactSink>) -> Self {
        Self::new(Arc::new(PdfRenderer::new()), sink)
    }

    fn finish(&self, page: ExportPage, filename: String) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        let renderer = Arc::clone(&self.renderer);
        let sink = Arc::clone(&self.sink);
        Box::pin(async move {
            let bytes = renderer.render(page).await?;
            let len = bytes.len();
            sink.save(bytes, &filename).await?;
            Ok(ExportOutcome::Saved { filename, bytes: len })
        })
    }

    fn skipped(what: &str) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        log::warn!("Cannot export {what}: drawing surface is not initialized");
        Box::pin(async { Ok(ExportOutcome::Skipped) })
    }

    /// Layout sheet with the current surface, saved as `<farmer>-layout.pdf`.
    pub fn export_layout(&self, workspace: &Workspace) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        let Some(snapshot) = workspace.capture_layout() else {
            return Self::skipped("layout");
        };
        let page = ExportPage {
            markup: DocumentMarkup::layout(&snapshot.document),
            surface: Some(snapshot.surface),
            title: format!("{} - layout", snapshot.document.header.title),
        };
        self.finish(page, filename(&snapshot.document, "layout", "-layout.pdf"))
    }

    fn render_document(&self, snapshot: DocumentSnapshot) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        let DocumentSnapshot {
            document,
            totals,
            policy,
        } = snapshot;
        let variant = document.variant;
        let fallback = match variant {
            DocumentVariant::Quotation => "quotation",
            DocumentVariant::TaxInvoice => "invoice",
        };
        let page = ExportPage {
            markup: DocumentMarkup::document(&document, &totals, &policy),
            surface: None,
            title: format!("{} {}", variant.title(), document.details.number.trim()),
        };
        let name = filename(&document, fallback, &format!("-{}.pdf", variant.slug()));
        self.finish(page, name)
    }

    /// The document under whatever variant the workspace currently holds.
    pub fn export_document(&self, workspace: &Workspace) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        self.render_document(workspace.capture_document())
    }

    pub fn export_quotation(&self, workspace: &Workspace) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        self.render_document(workspace.capture_document_as(DocumentVariant::Quotation))
    }

    /// The document as a tax invoice. The workspace keeps its variant.
    pub fn export_tax_invoice(&self, workspace: &Workspace) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        self.render_document(workspace.capture_document_as(DocumentVariant::TaxInvoice))
    }

    /// Raw surface as `<farmer>.png`.
    pub fn save_layout_png(&self, workspace: &Workspace) -> BoxFuture<'static, ExportResult<ExportOutcome>> {
        let Some(snapshot) = workspace.capture_layout() else {
            return Self::skipped("PNG");
        };
        let sink = Arc::clone(&self.sink);
        let filename = filename(&snapshot.document, "layout", ".png");
        Box::pin(async move {
            let bytes = snapshot.surface.encode_png()?;
            let len = bytes.len();
            sink.save(bytes, &filename).await?;
            Ok(ExportOutcome::Saved { filename, bytes: len })
        })
    }
}
