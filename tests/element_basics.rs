use egui::{Color32, Rect, pos2};
use sketch_scene::element::{ElementKind, FillMode, Geometry, PenPoint, Style, factory};
use sketch_scene::{Element, SceneStore};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_factory_kinds() {
    init();
    let style = Style::default();
    let cases = [
        (factory::create_pen(style, vec![PenPoint::new(0.0, 0.0)]), ElementKind::Pen),
        (
            factory::create_rectangle(style, pos2(0.0, 0.0), pos2(4.0, 4.0), 0.0),
            ElementKind::Rectangle,
        ),
        (factory::create_circle(style, pos2(0.0, 0.0), pos2(3.0, 4.0)), ElementKind::Circle),
        (factory::create_ellipse(style, pos2(0.0, 0.0), pos2(4.0, 2.0)), ElementKind::Ellipse),
        (factory::create_line(style, pos2(0.0, 0.0), pos2(4.0, 4.0)), ElementKind::Line),
    ];
    for (element, kind) in cases {
        assert_eq!(element.kind(), kind);
    }
}

#[test]
fn test_circle_radius_is_drag_distance() {
    let circle = factory::create_circle(Style::default(), pos2(10.0, 10.0), pos2(13.0, 14.0));
    match circle.geometry {
        Geometry::Circle(c) => assert_eq!(c.radius, 5.0),
        other => panic!("unexpected geometry {other:?}"),
    }
}

#[test]
fn test_ellipse_inscribed_in_drag_box() {
    let ellipse = factory::create_ellipse(Style::default(), pos2(20.0, 10.0), pos2(0.0, 0.0));
    match ellipse.geometry {
        Geometry::Ellipse(e) => {
            assert_eq!((e.center_x, e.center_y), (10.0, 5.0));
            assert_eq!((e.radius_x, e.radius_y), (10.0, 5.0));
        }
        other => panic!("unexpected geometry {other:?}"),
    }
}

#[test]
fn test_negative_rectangle_bounds() {
    let mut store = SceneStore::new();
    let id = store.add_element(factory::create_rectangle(
        Style::default(),
        pos2(30.0, 30.0),
        pos2(10.0, 20.0),
        0.0,
    ));
    let element = store.get_by_id(id).unwrap();
    assert_eq!(element.bounds(), Rect::from_min_max(pos2(10.0, 20.0), pos2(30.0, 30.0)));
}

#[test]
fn test_element_json_layout() {
    init();
    let mut store = SceneStore::new();
    let style = Style::new(Color32::RED, 2.0).with_fill(None, FillMode::Both);
    let id = store.add_element(factory::create_line(style, pos2(1.0, 2.0), pos2(3.0, 4.0)));

    let value = serde_json::to_value(store.get_by_id(id).unwrap().as_ref()).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["kind"], "line");
    assert!(value["createdAt"].is_u64());
    assert_eq!(value["style"]["strokeWidth"], 2.0);
    assert_eq!(value["style"]["fillMode"], "both");
    assert_eq!(value["geometry"]["endY"], 4.0);

    let decoded: Element = serde_json::from_value(value).unwrap();
    assert_eq!(&decoded, store.get_by_id(id).unwrap().as_ref());
}

#[test]
fn test_pressure_is_optional_in_json() {
    let element: Element = serde_json::from_str(
        r#"{"id": 9, "kind": "pen", "geometry": {"points": [{"x": 1, "y": 2}, {"x": 3, "y": 4, "pressure": 0.8}]}}"#,
    )
    .unwrap();
    match element.geometry() {
        Geometry::Pen(pen) => {
            assert_eq!(pen.points[0].pressure, None);
            assert_eq!(pen.points[1].pressure, Some(0.8));
        }
        other => panic!("unexpected geometry {other:?}"),
    }
}
