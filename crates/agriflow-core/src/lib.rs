//! AgriFlow Core Library
//!
//! Platform-agnostic data structures and logic for the AgriFlow field layout
//! designer: the vector shape model, the drawing session state machine, the
//! invoice totals engine, the item catalog and the persistence boundary.

pub mod catalog;
pub mod config;
pub mod input;
pub mod invoice;
pub mod shapes;
pub mod storage;
pub mod store;
pub mod tools;

pub use catalog::{Catalog, CatalogError, CatalogForm, CatalogItem};
pub use config::{DesignerConfig, SurfaceSpec};
pub use input::{PointerEvent, SessionResponse};
pub use invoice::{
    Amount, DocumentVariant, InvoiceDocument, ItemField, LineItem, LineItems, RoundingPolicy, TaxMode,
    Totals, TotalsInput, TotalsPolicy, compute_totals,
};
pub use shapes::{SerializableColor, Shape, ShapeKind, ShapeStyle, SymbolVariant};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::ShapeStore;
pub use tools::{DrawSession, DrawState, ToolKind, ToolSettings};
