use agriflow_core::config::DesignerConfig;
use agriflow_core::input::PointerEvent;
use agriflow_core::invoice::{DocumentVariant, ItemField, LineItem};
use agriflow_core::shapes::SymbolVariant;
use agriflow_core::tools::ToolKind;
use agriflow_export::{ExportOutcome, ExportPipeline, FileSink, MemorySink, Workspace};
use kurbo::Point;
use pollster::block_on;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn drag(workspace: &mut Workspace, from: (f64, f64), to: (f64, f64)) {
    workspace
        .handle_pointer(PointerEvent::Down { position: Point::new(from.0, from.1) })
        .unwrap();
    workspace
        .handle_pointer(PointerEvent::Move { position: Point::new(to.0, to.1) })
        .unwrap();
    workspace
        .handle_pointer(PointerEvent::Up { position: Point::new(to.0, to.1) })
        .unwrap();
}

fn drawn_workspace() -> Workspace {
    let mut workspace = Workspace::new(DesignerConfig::default());
    workspace.initialize_surface().unwrap();
    drag(&mut workspace, (150.0, 150.0), (600.0, 150.0));
    workspace.set_tool(ToolKind::Rectangle);
    drag(&mut workspace, (620.0, 500.0), (140.0, 140.0));
    workspace.set_tool(ToolKind::Symbol);
    workspace.set_symbol_variant(SymbolVariant::Valve);
    drag(&mut workspace, (0.0, 0.0), (300.0, 300.0));
    workspace
}

fn saved_name(outcome: ExportOutcome) -> String {
    match outcome {
        ExportOutcome::Saved { filename, bytes } => {
            assert!(bytes > 0);
            filename
        }
        ExportOutcome::Skipped => panic!("export was skipped"),
    }
}

#[test]
fn test_draw_then_export_all() {
    init_logging();
    let sink = Arc::new(MemorySink::new());
    let pipeline = ExportPipeline::pdf(sink.clone());
    let mut workspace = drawn_workspace();
    workspace.document_mut().details.farmer_name = "Patil".to_string();
    assert_eq!(workspace.session().store().len(), 3);

    saved_name(block_on(pipeline.export_layout(&workspace)).unwrap());
    saved_name(block_on(pipeline.export_quotation(&workspace)).unwrap());
    saved_name(block_on(pipeline.export_tax_invoice(&workspace)).unwrap());
    saved_name(block_on(pipeline.save_layout_png(&workspace)).unwrap());

    assert_eq!(
        sink.filenames(),
        vec!["Patil-layout.pdf", "Patil-quotation.pdf", "Patil-taxinvoice.pdf", "Patil.png"]
    );
    for (name, bytes) in sink.artifacts() {
        if name.ends_with(".pdf") {
            assert!(bytes.starts_with(b"%PDF"), "{name} is not a PDF");
        } else {
            assert!(bytes.starts_with(b"\x89PNG"), "{name} is not a PNG");
        }
    }
}

#[test]
fn test_edits_after_capture_do_not_reach_export() {
    init_logging();
    let sink = Arc::new(MemorySink::new());
    let pipeline = ExportPipeline::pdf(sink.clone());
    let mut workspace = drawn_workspace();
    workspace.document_mut().details.farmer_name = "Patil".to_string();
    let captured = workspace.surface().unwrap().encode_png().unwrap();

    let png = pipeline.save_layout_png(&workspace);
    let quote = pipeline.export_quotation(&workspace);
    workspace.clear().unwrap();
    workspace.document_mut().details.farmer_name = "Jadhav".to_string();
    workspace.document_mut().remove_item(0);

    block_on(png).unwrap();
    block_on(quote).unwrap();

    let artifacts = sink.artifacts();
    assert_eq!(artifacts[0].0, "Patil.png");
    assert_eq!(artifacts[0].1, captured);
    assert_eq!(artifacts[1].0, "Patil-quotation.pdf");
    assert_ne!(workspace.surface().unwrap().encode_png().unwrap(), captured);
}

#[test]
fn test_uninitialized_surface_is_a_noop() {
    init_logging();
    let sink = Arc::new(MemorySink::new());
    let pipeline = ExportPipeline::pdf(sink.clone());
    let mut workspace = Workspace::new(DesignerConfig::default());
    drag(&mut workspace, (10.0, 10.0), (90.0, 90.0));

    assert_eq!(block_on(pipeline.export_layout(&workspace)).unwrap(), ExportOutcome::Skipped);
    assert_eq!(block_on(pipeline.save_layout_png(&workspace)).unwrap(), ExportOutcome::Skipped);
    assert!(sink.artifacts().is_empty());

    workspace.initialize_surface().unwrap();
    saved_name(block_on(pipeline.export_layout(&workspace)).unwrap());
}

#[test]
fn test_tax_invoice_export_keeps_variant() {
    init_logging();
    let sink = Arc::new(MemorySink::new());
    let pipeline = ExportPipeline::pdf(sink.clone());
    let workspace = Workspace::new(DesignerConfig::default());

    let name = saved_name(block_on(pipeline.export_tax_invoice(&workspace)).unwrap());
    assert_eq!(name, "invoice-taxinvoice.pdf");
    assert_eq!(workspace.document().variant, DocumentVariant::Quotation);
}

#[test]
fn test_line_item_edits_flow_into_totals() {
    init_logging();
    let mut workspace = Workspace::new(DesignerConfig::default());
    let before = workspace.totals().final_total;
    let index = workspace.document_mut().add_item(LineItem::blank());
    assert!(workspace.document_mut().update_item(index, ItemField::Quantity, "2"));
    assert!(workspace.document_mut().update_item(index, ItemField::UnitRate, "100"));

    let totals = workspace.totals();
    assert_eq!(totals.final_total - before, rust_decimal::Decimal::from(236));
    assert_eq!(workspace.capture_document().totals, totals);
}

#[test]
fn test_file_sink_receives_exports() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FileSink::new(dir.path()).unwrap());
    let pipeline = ExportPipeline::pdf(sink);
    let workspace = drawn_workspace();

    block_on(pipeline.export_layout(&workspace)).unwrap();
    block_on(pipeline.save_layout_png(&workspace)).unwrap();

    let pdf = std::fs::read(dir.path().join("layout-layout.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(dir.path().join("layout.png").exists());
}
