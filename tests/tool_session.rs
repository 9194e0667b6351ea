use egui::{Color32, pos2};
use sketch_scene::element::{ElementKind, FillMode, Geometry};
use sketch_scene::{RasterSurface, SessionOutcome, SketchCanvas, ToolKind};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas() -> SketchCanvas<RasterSurface> {
    init();
    SketchCanvas::new(RasterSurface::new(100, 100))
}

#[test]
fn test_rectangle_then_area_erase() {
    let mut canvas = canvas();
    canvas.set_tool(ToolKind::Rectangle);
    canvas.pointer_down(10.0, 10.0, None);
    canvas.pointer_move(30.0, 30.0, None);
    let outcome = canvas.pointer_up(50.0, 50.0);
    assert!(matches!(outcome, SessionOutcome::Committed(_)));

    let elements = canvas.store().list_all();
    assert_eq!(elements.len(), 1);
    match elements[0].geometry() {
        Geometry::Rectangle(rect) => {
            assert_eq!((rect.x, rect.y), (10.0, 10.0));
            assert_eq!((rect.width, rect.height), (40.0, 40.0));
        }
        other => panic!("unexpected geometry {other:?}"),
    }

    assert_eq!(canvas.erase_area(0.0, 0.0, 60.0, 60.0), 1);
    assert_eq!(canvas.store().count(), 0);
    assert_eq!(canvas.surface().painted_pixel_count(), 0);
}

#[test]
fn test_pen_stroke_keeps_every_sample() {
    let mut canvas = canvas();
    canvas.pointer_down(5.0, 5.0, Some(0.2));
    canvas.pointer_move(10.0, 8.0, Some(0.4));
    canvas.pointer_move(15.0, 12.0, Some(0.6));
    assert_eq!(canvas.session().sample_count(), 3);
    assert!(matches!(canvas.pointer_up(20.0, 20.0), SessionOutcome::Committed(_)));

    match canvas.store().elements()[0].geometry() {
        Geometry::Pen(pen) => {
            assert_eq!(pen.points.len(), 4);
            assert_eq!(pen.points[1].pressure, Some(0.4));
        }
        other => panic!("unexpected geometry {other:?}"),
    }
}

#[test]
fn test_pressure_dropped_when_disabled() {
    let mut canvas = canvas();
    canvas.settings_mut().pressure_sensitivity = false;
    canvas.pointer_down(5.0, 5.0, Some(0.9));
    canvas.pointer_up(20.0, 5.0);
    match canvas.store().elements()[0].geometry() {
        Geometry::Pen(pen) => assert!(!pen.has_pressure()),
        other => panic!("unexpected geometry {other:?}"),
    }
}

#[test]
fn test_click_with_pen_is_discarded() {
    let mut canvas = canvas();
    canvas.pointer_down(5.0, 5.0, None);
    assert_eq!(canvas.pointer_up(5.0, 5.0), SessionOutcome::Discarded);
    assert!(canvas.store().is_empty());
    assert_eq!(canvas.surface().painted_pixel_count(), 0);
}

#[test]
fn test_release_without_press_is_ignored() {
    let mut canvas = canvas();
    canvas.pointer_move(5.0, 5.0, None);
    assert_eq!(canvas.pointer_up(5.0, 5.0), SessionOutcome::Ignored);
    assert!(canvas.store().is_empty());
}

#[test]
fn test_cancel_restores_surface() {
    let mut canvas = canvas();
    canvas.set_tool(ToolKind::Ellipse);
    canvas.pointer_down(10.0, 10.0, None);
    canvas.pointer_move(60.0, 40.0, None);
    assert!(canvas.surface().painted_pixel_count() > 0);

    assert!(canvas.cancel_gesture());
    assert_eq!(canvas.surface().painted_pixel_count(), 0);
    assert!(!canvas.session().is_active());
    assert_eq!(canvas.pointer_up(60.0, 40.0), SessionOutcome::Ignored);
}

#[test]
fn test_eraser_gesture_removes_and_leaves_no_preview() {
    let mut canvas = canvas();
    canvas.set_tool(ToolKind::Line);
    canvas.pointer_down(10.0, 10.0, None);
    canvas.pointer_up(20.0, 20.0);
    canvas.pointer_down(70.0, 70.0, None);
    canvas.pointer_up(90.0, 90.0);
    assert_eq!(canvas.store().count(), 2);

    canvas.set_tool(ToolKind::AreaEraser);
    canvas.pointer_down(0.0, 0.0, None);
    canvas.pointer_move(30.0, 30.0, None);
    assert_eq!(canvas.pointer_up(30.0, 30.0), SessionOutcome::Erased(1));
    assert_eq!(canvas.store().elements()[0].kind(), ElementKind::Line);

    // The surface must match a plain redraw: no preview rectangle left behind
    let committed = canvas.surface().image().clone();
    canvas.redraw();
    assert_eq!(canvas.surface().image(), &committed);
}

#[test]
fn test_settings_flow_into_committed_style() {
    let mut canvas = canvas();
    canvas.set_tool(ToolKind::Circle);
    {
        let settings = canvas.settings_mut();
        settings.stroke_color = Color32::BLUE;
        settings.fill_mode = FillMode::Filled;
        settings.opacity = 0.5;
    }
    canvas.pointer_down(50.0, 50.0, None);
    canvas.pointer_up(60.0, 50.0);

    let element = &canvas.store().elements()[0];
    assert_eq!(element.style().stroke_color, Color32::BLUE);
    assert_eq!(element.style().fill_mode, FillMode::Filled);
    assert_eq!(element.style().opacity, 0.5);
    assert_eq!(element.bounds().center(), pos2(50.0, 50.0));
}

#[test]
fn test_translucent_pen_is_even_along_the_stroke() {
    for pressure in [None, Some(0.5)] {
        init();
        let mut canvas = SketchCanvas::new(RasterSurface::new(60, 30));
        canvas.settings_mut().opacity = 0.5;
        canvas.settings_mut().stroke_width = 4.0;
        canvas.pointer_down(5.0, 15.0, pressure);
        canvas.pointer_move(30.0, 15.0, pressure);
        canvas.pointer_up(55.0, 15.0);

        let at_sample = canvas.surface().pixel(30, 15).unwrap();
        assert_eq!(at_sample, canvas.surface().pixel(17, 15).unwrap(), "pressure {pressure:?}");
        assert_eq!(at_sample[3], 128);
    }
}
