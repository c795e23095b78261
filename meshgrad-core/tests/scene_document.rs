//! Scene document integration tests.
//!
//! Covers export/import through the editor, the validation error paths a
//! user can hit, and the round-trip law over generated scenes.

use meshgrad_core::{
    schema, CoreError, EditorState, FormatError, LayoutUpdate, MeshPoint, PointId, RenderQuality,
    Scene,
};
use proptest::prelude::*;

fn import_err(doc: &str) -> FormatError {
    match schema::deserialize(doc.as_bytes(), RenderQuality::default()) {
        Ok(scene) => panic!("expected rejection, got {scene:?}"),
        Err(e) => e,
    }
}

// ============================================================================
// Document Shape
// ============================================================================

#[test]
fn test_exported_document_uses_camel_case_layout() {
    let mut scene = Scene::new(640, 360);
    scene.background_color = "#102030".to_string();
    scene.insert_point(MeshPoint::new(10.0, 20.0).with_id(PointId::from_string("point-a")));

    let json = schema::serialize(&scene).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value["layout"]["width"], 640);
    assert_eq!(value["layout"]["height"], 360);
    assert_eq!(value["layout"]["backgroundColor"], "#102030");
    assert_eq!(value["layout"]["quality"], 2);
    assert_eq!(value["points"][0]["id"], "point-a");
    assert!(json.contains('\n'), "document should be pretty-printed");
}

#[test]
fn test_import_fills_optional_point_fields() {
    let doc = r##"{
        "layout": {"width": 800, "height": 500, "backgroundColor": "#000"},
        "points": [{"x": 1, "y": 2, "radius": 30, "color": "#fff"}]
    }"##;
    let scene = schema::deserialize(doc.as_bytes(), RenderQuality::MIN).expect("valid");

    let p = &scene.points()[0];
    assert!((p.blur - 0.4).abs() < 1e-6);
    assert!((p.opacity - 0.8).abs() < 1e-6);
    assert!(!p.id.as_str().is_empty());
    assert_eq!(scene.render_quality, RenderQuality::MIN);
}

#[test]
fn test_import_error_names_offending_field() {
    let err = import_err(
        r##"{"layout":{"width":8,"height":8,"backgroundColor":"#000"},
            "points":[{"x":1,"y":2,"radius":3,"color":"#fff"},{"x":"left","y":2,"radius":3,"color":"#fff"}]}"##,
    );
    assert_eq!(err.to_string(), "points[1].x must be a number");
}

#[test]
fn test_import_rejects_non_json() {
    let err = import_err("layout: yes");
    assert!(matches!(err, FormatError::Syntax(_)));
}

// ============================================================================
// Editor Round Trip
// ============================================================================

#[test]
fn test_editor_round_trip_preserves_quality_and_points() {
    let mut editor = EditorState::default();
    editor.set_layout(LayoutUpdate {
        width: Some(1024),
        render_quality: RenderQuality::new(4),
        ..LayoutUpdate::default()
    });
    editor.add_point();
    editor.set_point_color("#abcdef");
    let json = editor.export_json().expect("export");

    let mut restored = EditorState::default();
    restored.import_json(json.as_bytes()).expect("import");
    assert_eq!(restored.scene(), editor.scene());
    assert_eq!(restored.scene().render_quality.get(), 4);
}

#[test]
fn test_editor_rejects_bad_import_as_single_error() {
    let mut editor = EditorState::default();
    let before = editor.scene().clone();
    let err = editor.import_json(b"{\"points\": []}").expect_err("no layout");
    assert!(matches!(err, CoreError::Format(FormatError::Missing { .. })));
    assert_eq!(editor.scene(), &before);
}

#[test]
fn test_editor_rejects_number_beyond_f32_and_keeps_scene() {
    let mut editor = EditorState::default();
    let before = editor.scene().clone();
    let err = editor
        .import_json(
            br##"{"layout":{"width":800,"height":500,"backgroundColor":"#000"},
                 "points":[{"x":1e39,"y":2,"radius":3,"color":"#fff"}]}"##,
        )
        .expect_err("x overflows f32");
    assert!(matches!(
        err,
        CoreError::Format(FormatError::OutOfRange { ref path, .. }) if path == "points[0].x"
    ));
    assert_eq!(editor.scene(), &before);

    let json = editor.export_json().expect("export");
    assert!(!json.contains("null"));
    schema::deserialize(json.as_bytes(), RenderQuality::MIN).expect("own export re-imports");
}

#[test]
fn test_editor_rejects_oversized_canvas() {
    let mut editor = EditorState::default();
    let err = editor
        .import_json(
            br##"{"layout":{"width":400000,"height":400000,"backgroundColor":"#000","quality":4},
                 "points":[]}"##,
        )
        .expect_err("canvas too large");
    assert!(matches!(
        err,
        CoreError::Format(FormatError::OutOfRange { ref path, .. }) if path == "layout.width"
    ));
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_point() -> impl Strategy<Value = MeshPoint> {
    (
        0u32..10_000,
        -2000.0f32..2000.0,
        -2000.0f32..2000.0,
        any::<[u8; 3]>(),
        1.0f32..1000.0,
        0.0f32..1.0,
        0.0f32..1.0,
    )
        .prop_map(|(n, x, y, [r, g, b], radius, blur, opacity)| {
            MeshPoint::new(x, y)
                .with_id(PointId::from_string(format!("point-{n}")))
                .with_color(format!("#{r:02x}{g:02x}{b:02x}"))
                .with_radius(radius)
                .with_blur(blur)
                .with_opacity(opacity)
        })
}

fn arb_scene() -> impl Strategy<Value = Scene> {
    (
        1u32..5000,
        1u32..5000,
        any::<[u8; 3]>(),
        1u8..=4,
        prop::collection::vec(arb_point(), 0..12),
    )
        .prop_map(|(w, h, [r, g, b], q, points)| {
            let mut scene = Scene::new(w, h);
            scene.background_color = format!("#{r:02x}{g:02x}{b:02x}");
            scene.render_quality = RenderQuality::new(q).unwrap_or_default();
            scene.set_points(points);
            scene
        })
}

proptest! {
    #[test]
    fn prop_serialize_then_deserialize_is_identity(scene in arb_scene()) {
        let json = schema::serialize(&scene).expect("serialize");
        let restored = schema::deserialize(json.as_bytes(), RenderQuality::MIN)
            .expect("own output must validate");
        prop_assert_eq!(restored, scene);
    }

    #[test]
    fn prop_invalid_quality_keeps_fallback(q in 5i64..1000) {
        let doc = format!(
            r##"{{"layout":{{"width":10,"height":10,"backgroundColor":"#000","quality":{q}}},"points":[]}}"##
        );
        let fallback = RenderQuality::new(3).expect("valid");
        let scene = schema::deserialize(doc.as_bytes(), fallback).expect("valid");
        prop_assert_eq!(scene.render_quality, fallback);
    }
}
