//! Integration tests for the CLI commands against real files.

use meshgrad_cli::{commands, RenderJob};
use meshgrad_core::RenderQuality;
use meshgrad_renderer::export::{ExportConfig, ExportFormat};

#[test]
fn test_example_then_validate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scene.json");

    let written = commands::write_example(&path, 320, 200, RenderQuality::new(1)).expect("write");
    let loaded = commands::load_scene(&path, None).expect("load");

    assert_eq!(loaded, written);
    assert_eq!(loaded.point_count(), 3);
    assert_eq!(loaded.render_quality, RenderQuality::MIN);
}

#[test]
fn test_quality_override_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scene.json");
    commands::write_example(&path, 100, 60, None).expect("write");

    let loaded = commands::load_scene(&path, RenderQuality::new(4)).expect("load");
    assert_eq!(loaded.render_quality, RenderQuality::MAX);
}

#[test]
fn test_invalid_document_reports_path_and_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"layout":{"width":10,"height":10,"backgroundColor":0},"points":[]}"#,
    )
    .expect("write");

    let err = commands::load_scene(&path, None).expect_err("invalid");
    let message = format!("{err:#}");
    assert!(message.contains("broken.json"), "{message}");
    assert!(message.contains("layout.backgroundColor must be a string"), "{message}");
}

#[test]
fn test_render_job_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.json");
    let output = dir.path().join("out.png");
    commands::write_example(&input, 60, 40, RenderQuality::new(1)).expect("write");

    let job = RenderJob {
        input,
        output: output.clone(),
        format: ExportFormat::Png,
        export: ExportConfig {
            quality: RenderQuality::new(2),
            ..ExportConfig::default()
        },
    };
    let bytes = commands::render(&job).expect("render");

    let png = std::fs::read(&output).expect("output exists");
    assert_eq!(png.len(), bytes);
    assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    assert_eq!(width, 120);
}

#[test]
fn test_preview_writes_frames() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("frames");

    let frames = commands::preview(&out, 2, 16.0, RenderQuality::new(1)).expect("preview");
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|p| p.exists()));
    assert!(frames[0].ends_with("frame-0000.png"));
}
