//! The editing workspace: drawing session, invoice document and the
//! rendered surface, kept in step by explicit redraws.

use agriflow_core::config::DesignerConfig;
use agriflow_core::input::{PointerEvent, SessionResponse};
use agriflow_core::invoice::{DocumentVariant, InvoiceDocument, Totals, TotalsPolicy};
use agriflow_core::shapes::{SerializableColor, SymbolVariant};
use agriflow_core::storage::{self, LAYOUT_KEY, Storage, StorageResult};
use agriflow_core::store::ShapeStore;
use agriflow_core::tools::{DrawSession, ToolKind};
use agriflow_render::{RasterRenderer, RenderContext, RenderResult, Renderer, Surface};
use std::sync::Arc;

/// Frozen copy of the layout for export.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    pub surface: Arc<Surface>,
    pub document: InvoiceDocument,
}

/// Frozen copy of the document and its totals for export.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub document: InvoiceDocument,
    pub totals: Totals,
    pub policy: TotalsPolicy,
}

/// Owns everything the user edits.
///
/// Every mutation that changes what the surface shows re-renders it before
/// returning, so the surface always reflects the current state once the
/// surface has been initialized.
pub struct Workspace {
    config: DesignerConfig,
    session: DrawSession,
    document: InvoiceDocument,
    renderer: RasterRenderer,
    surface: Option<Arc<Surface>>,
}

impl Workspace {
    /// Create a workspace with a fresh document. The surface stays
    /// uninitialized until [`Workspace::initialize_surface`].
    pub fn new(config: DesignerConfig) -> Self {
        let config = config.sanitized();
        let mut document = InvoiceDocument::default();
        document.totals_input.tax_percent = config.default_tax_percent;
        Self {
            config,
            session: DrawSession::new(),
            document,
            renderer: RasterRenderer::new(),
            surface: None,
        }
    }

    /// Load the configuration and last layout from `storage`.
    pub async fn restore(storage: &dyn Storage) -> Self {
        let config = DesignerConfig::load(storage).await;
        let shapes: ShapeStore = storage::load_or_default(storage, LAYOUT_KEY).await;
        let mut workspace = Self::new(config);
        log::info!("Restored layout with {} shapes", shapes.len());
        workspace.session = DrawSession::with_store(shapes);
        workspace
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn document(&self) -> &InvoiceDocument {
        &self.document
    }

    /// Mutable access to the document. Totals are derived on demand, so no
    /// redraw or recomputation is needed afterwards.
    pub fn document_mut(&mut self) -> &mut InvoiceDocument {
        &mut self.document
    }

    /// Current totals under the configured policy.
    pub fn totals(&self) -> Totals {
        self.document.totals(&self.config.totals)
    }

    /// Set the tax mode and rounding policy.
    pub fn set_totals_policy(&mut self, policy: TotalsPolicy) {
        self.config.totals = policy;
    }

    /// The last rendered frame, if the surface has been initialized.
    pub fn surface(&self) -> Option<&Arc<Surface>> {
        self.surface.as_ref()
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface.is_some()
    }

    /// Allocate the surface and render the first frame.
    pub fn initialize_surface(&mut self) -> RenderResult<()> {
        let surface = self.render_frame()?;
        self.surface = Some(Arc::new(surface));
        log::debug!("Surface initialized");
        Ok(())
    }

    fn render_frame(&mut self) -> RenderResult<Surface> {
        let ctx = RenderContext::new(&self.config.surface, self.session.store())
            .with_candidate(self.session.candidate());
        self.renderer.render(&ctx)
    }

    /// Re-render the surface. Does nothing before initialization.
    pub fn redraw(&mut self) -> RenderResult<()> {
        if self.surface.is_none() {
            return Ok(());
        }
        let surface = self.render_frame()?;
        self.surface = Some(Arc::new(surface));
        Ok(())
    }

    /// Feed a pointer event to the drawing session and redraw if needed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> RenderResult<SessionResponse> {
        let response = self.session.handle(event);
        if response.redraw {
            self.redraw()?;
        }
        Ok(response)
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.session.set_tool(tool);
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.session.set_stroke_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.session.set_stroke_width(width);
    }

    pub fn set_symbol_variant(&mut self, variant: SymbolVariant) {
        self.session.set_symbol_variant(variant);
    }

    /// Remove the last committed shape and redraw.
    pub fn undo(&mut self) -> RenderResult<()> {
        self.session.undo();
        self.redraw()
    }

    /// Remove all shapes and redraw.
    pub fn clear(&mut self) -> RenderResult<()> {
        self.session.clear();
        self.redraw()
    }

    /// Switch between quotation and tax invoice. Takes effect immediately:
    /// the next capture sees the new variant.
    pub fn set_document_variant(&mut self, variant: DocumentVariant) {
        self.document.variant = variant;
    }

    /// Snapshot the rendered layout, or `None` before initialization.
    pub fn capture_layout(&self) -> Option<LayoutSnapshot> {
        self.surface.as_ref().map(|surface| LayoutSnapshot {
            surface: Arc::clone(surface),
            document: self.document.clone(),
        })
    }

    /// Snapshot the document with freshly computed totals.
    pub fn capture_document(&self) -> DocumentSnapshot {
        self.capture_document_as(self.document.variant)
    }

    /// Snapshot the document as `variant` without changing the workspace.
    pub fn capture_document_as(&self, variant: DocumentVariant) -> DocumentSnapshot {
        let document = self.document.with_variant(variant);
        let policy = self.config.totals;
        DocumentSnapshot {
            totals: document.totals(&policy),
            document,
            policy,
        }
    }

    /// Persist the committed shapes under the layout key.
    pub async fn save_layout(&self, storage: &dyn Storage) -> StorageResult<()> {
        storage::save_json(storage, LAYOUT_KEY, self.session.store()).await
    }

    /// Persist the document under its invoice-number key.
    pub async fn save_document(&self, storage: &dyn Storage) -> StorageResult<()> {
        storage::save_json(storage, &self.document.storage_key(), &self.document).await
    }

    /// Replace the document with the saved invoice `number`, if there is one.
    pub async fn load_document(&mut self, storage: &dyn Storage, number: &str) -> StorageResult<bool> {
        let key = storage::invoice_key(number);
        match storage::load_json::<InvoiceDocument>(storage, &key).await? {
            Some(document) => {
                self.document = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
