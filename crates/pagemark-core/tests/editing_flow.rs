//! End-to-end editing sessions driven through the public API.

use kurbo::{Point, Size, Vec2};
use pagemark_core::{
    AnnotationPatch, DocumentAnnotation, EditorConfig, EditorProfile, EditorSession,
    InteractionState, MemoryBackend, PageScale, SaveOutcome, SaveResponse, SerializableColor,
    ToolKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-2
}

fn open(profile: EditorProfile, scale: f64) -> EditorSession {
    init_logging();
    let config = EditorConfig::default().with_scale(PageScale::new(scale).unwrap());
    EditorSession::new("contract.pdf", profile, config, 3).unwrap()
}

#[test]
fn test_rectangle_place_drag_resize_save() {
    let mut session = open(EditorProfile::Markup, 1.5);
    session.set_tool(ToolKind::Rectangle).unwrap();

    session.pointer_down(Point::new(20.0, 20.0));
    session.pointer_move(Point::new(70.0, 50.0));
    session.pointer_move(Point::new(120.0, 80.0));
    session.pointer_up();
    assert!(session.apply_patch(AnnotationPatch::Width(200.0)).redraw);
    assert!(session.apply_patch(AnnotationPatch::Height(100.0)).redraw);

    let backend = MemoryBackend::new();
    let outcome = pollster::block_on(session.save(&backend));
    assert!(outcome.is_completed());

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document_id, "contract.pdf");
    match &requests[0].annotations[..] {
        [DocumentAnnotation::Rect { page, x1, y1, x2, y2, color }] => {
            assert_eq!(*page, 1);
            assert!(approx(*x1, 80.0));
            assert!(approx(*y1, 53.33));
            assert!(approx(*x2, 213.33));
            assert!(approx(*y2, 120.0));
            assert_eq!(*color, SerializableColor::accent());
        }
        other => panic!("unexpected annotations {:?}", other),
    }
}

#[test]
fn test_text_placement_at_scale_two() {
    let mut session = open(EditorProfile::Markup, 2.0);
    session.set_color("#ff0000".parse().unwrap());
    session.set_font_size(20.0);
    session.set_tool(ToolKind::Text).unwrap();

    let response = session.pointer_down(Point::new(30.0, 40.0));
    assert!(response.prompt_text);
    session.pointer_up();
    session.confirm_text("Approved");

    let json = serde_json::to_value(session.serialize()).unwrap();
    assert_eq!(json[0]["type"], "text");
    assert_eq!(json[0]["page"], 1);
    assert!(approx(json[0]["x"].as_f64().unwrap(), 15.0));
    assert!(approx(json[0]["y"].as_f64().unwrap(), 20.0));
    assert_eq!(json[0]["content"], "Approved");
    assert_eq!(json[0]["color"], "#ff0000");
    assert!(approx(json[0]["size"].as_f64().unwrap(), 20.0));
}

#[test]
fn test_drag_never_changes_size() {
    let mut session = open(EditorProfile::Markup, 1.5);
    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_up();
    session.apply_patch(AnnotationPatch::Width(33.3));
    session.apply_patch(AnnotationPatch::Height(17.7));
    let before = session.selected().and_then(|a| a.size()).unwrap();

    for step in 0..50 {
        let origin = session.selected().map(|a| a.origin()).unwrap();
        session.pointer_down(origin + Vec2::new(1.0, 1.0));
        let target = Point::new((step * 37 % 500) as f64 + 0.123, (step * 53 % 400) as f64 + 0.456);
        session.pointer_move(target);
        session.pointer_move(target + Vec2::new(0.1, -0.3));
        session.pointer_up();

        let after = session.selected().and_then(|a| a.size()).unwrap();
        assert_eq!(after.width.to_bits(), before.width.to_bits());
        assert_eq!(after.height.to_bits(), before.height.to_bits());
    }
}

#[test]
fn test_delete_invalidates_selection() {
    let mut session = open(EditorProfile::Markup, 1.5);
    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_up();
    let first = session.selection().unwrap();
    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(100.0, 100.0));
    session.pointer_up();
    let second = session.selection().unwrap();

    session.delete_selected();
    assert!(session.store().get(second).is_none());
    assert!(session.store().get(first).is_some());
    assert_eq!(session.selection(), None);

    // Clicking where the deleted shape was hits nothing.
    session.pointer_down(Point::new(105.0, 105.0));
    assert_eq!(session.selection(), None);
    assert_eq!(session.state(), InteractionState::Idle);
}

#[test]
fn test_pages_are_isolated() {
    let mut session = open(EditorProfile::Markup, 1.5);
    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_up();
    let on_first = session.selection().unwrap();

    assert!(session.next_page());
    // Selection survives navigation but the shape cannot be hit here.
    assert_eq!(session.selection(), Some(on_first));
    session.pointer_down(Point::new(12.0, 12.0));
    assert_eq!(session.selection(), None);

    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_up();
    assert_eq!(session.store().for_page(2).count(), 1);
    assert_eq!(session.store().for_page(1).count(), 1);

    let pages: Vec<u32> = session.serialize().iter().map(|a| a.page()).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn test_failed_save_then_retry() {
    let mut session = open(EditorProfile::Markup, 1.5);
    session.set_tool(ToolKind::Rectangle).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_up();
    let selected = session.selection();
    let snapshot = session.serialize();

    let backend = MemoryBackend::new();
    backend.fail_next("connection refused");
    backend.push_reply(Ok(SaveResponse::error("could not write output")));

    assert!(matches!(pollster::block_on(session.save(&backend)), SaveOutcome::Failed { .. }));
    assert!(matches!(pollster::block_on(session.save(&backend)), SaveOutcome::Failed { .. }));
    assert_eq!(session.serialize(), snapshot);
    assert_eq!(session.selection(), selected);

    // Editing still works between attempts.
    assert!(session.apply_patch(AnnotationPatch::Width(20.0)).redraw);

    let outcome = pollster::block_on(session.save(&backend));
    assert_eq!(
        outcome,
        SaveOutcome::Completed {
            download_url: Some("/download/annotated.pdf".to_string())
        }
    );
    assert_eq!(backend.request_count(), 3);
    assert!(!session.apply_patch(AnnotationPatch::Width(99.0)).redraw);
}

#[test]
fn test_signature_session() {
    let mut session = open(EditorProfile::Signature, 1.5);
    assert!(session.set_tool(ToolKind::Rectangle).is_err());

    session.capture_signature("data:image/png;base64,iVBORw0KGgo=");
    session.add_captured_signature().unwrap();
    let image = session.selected().and_then(|a| a.as_image()).unwrap();
    assert_eq!(image.size, Size::new(150.0, 75.0));

    // Drag it by its middle.
    session.pointer_down(Point::new(125.0, 87.5));
    session.pointer_move(Point::new(225.0, 187.5));
    session.pointer_up();

    let json = serde_json::to_value(session.serialize()).unwrap();
    assert_eq!(json[0]["type"], "image_base64");
    assert!(approx(json[0]["x1"].as_f64().unwrap(), 100.0));
    assert!(approx(json[0]["y1"].as_f64().unwrap(), 100.0));
    assert!(approx(json[0]["x2"].as_f64().unwrap(), 200.0));
    assert!(approx(json[0]["y2"].as_f64().unwrap(), 150.0));
    assert_eq!(json[0]["image_base64"], "data:image/png;base64,iVBORw0KGgo=");
}
