//! The work behind each subcommand.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use meshgrad_core::{schema, EditorConfig, EditorState, RenderQuality, Scene};
use meshgrad_renderer::{PreviewPlayer, SceneExporter};

use crate::RenderJob;

/// Write the example scene for a canvas of the given size.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_example(
    path: &Path,
    width: u32,
    height: u32,
    quality: Option<RenderQuality>,
) -> anyhow::Result<Scene> {
    let mut config = EditorConfig::default().with_size(width, height);
    if let Some(quality) = quality {
        config = config.with_quality(quality);
    }
    let editor = EditorState::new(config);
    let json = editor.export_json()?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote example scene to {}", path.display());
    Ok(editor.scene().clone())
}

/// Read and validate a scene document.
///
/// `quality` replaces the document's own render quality when given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid scene.
pub fn load_scene(path: &Path, quality: Option<RenderQuality>) -> anyhow::Result<Scene> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut scene = schema::deserialize(&bytes, RenderQuality::default())
        .with_context(|| format!("{} is not a valid scene document", path.display()))?;
    if let Some(quality) = quality {
        scene.render_quality = quality;
    }
    tracing::debug!(
        "Loaded {} ({}x{}, {} points, quality {})",
        path.display(),
        scene.width,
        scene.height,
        scene.point_count(),
        scene.render_quality
    );
    Ok(scene)
}

/// Run a render job, returning the number of bytes written.
///
/// # Errors
///
/// Returns an error if the input is invalid, rendering fails or the output
/// cannot be written.
pub fn render(job: &RenderJob) -> anyhow::Result<usize> {
    let scene = load_scene(&job.input, None)?;
    let exporter = SceneExporter::new(job.export.clone());
    let bytes = exporter.export(&scene, job.format)?;
    fs::write(&job.output, &bytes).with_context(|| format!("writing {}", job.output.display()))?;
    Ok(bytes.len())
}

/// Render `frames` frames of the hero preview into `out_dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a frame fails.
pub fn preview(
    out_dir: &Path,
    frames: u32,
    interval_ms: f64,
    quality: Option<RenderQuality>,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut scene = Scene::hero();
    if let Some(quality) = quality {
        scene.render_quality = quality;
    }
    let mut player = PreviewPlayer::new(scene);

    let mut written = Vec::new();
    for i in 0..frames {
        let t = f64::from(i) * interval_ms;
        let Some(frame) = player.next_frame(t)? else {
            break;
        };
        let path = out_dir.join(format!("frame-{i:04}.png"));
        let png = frame
            .encode_png()
            .map_err(|e| anyhow::anyhow!("PNG encoding failed: {e}"))?;
        fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    tracing::info!("Wrote {} preview frames to {}", written.len(), out_dir.display());
    Ok(written)
}
