//! # Meshgrad Renderer
//!
//! Software compositor for mesh gradient scenes, built on tiny-skia.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  background fill                            │
//! ├─────────────────────────────────────────────┤
//! │  per point:  buffer pass ──▶ composite pass │
//! │              (ramp, blur)    (Plus blend)   │
//! ├─────────────────────────────────────────────┤
//! │  selection rings (display only)             │
//! └─────────────────────────────────────────────┘
//!           │                        │
//!       Renderer                SceneExporter
//!   (cached live frame)       (PNG / JPEG / JSON)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blur;
pub mod compositor;
pub mod error;
pub mod export;
pub mod preview;

pub use compositor::{compose, render_scene, RenderOptions};
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SceneExporter};
pub use preview::PreviewPlayer;

use meshgrad_core::{DragOutcome, EditorState, PointerEvent, Scene, SurfaceGeometry, Vec2};
use tiny_skia::Pixmap;

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Display box width used until the host reports a container size.
    pub display_width: f32,
    /// Display box height used until the host reports a container size.
    pub display_height: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            display_width: 800.0,
            display_height: 500.0,
        }
    }
}

/// The live display renderer.
///
/// The surface raster is always `scene size × quality`; it is presented
/// stretched to fill its container. A frame is only recomposited when the
/// editor revision or the surface geometry changed since the last one.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    origin: Vec2,
    display_width: f32,
    display_height: f32,
    frame: Option<Pixmap>,
    rendered: Option<(u64, SurfaceGeometry)>,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            origin: Vec2::default(),
            display_width: config.display_width,
            display_height: config.display_height,
            config,
            frame: None,
            rendered: None,
            frame_count: 0,
        }
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the display box to the container's size.
    ///
    /// Only the presentation changes; the raster size follows the scene.
    pub fn resize(&mut self, width: f32, height: f32) {
        tracing::debug!("Display resized to {width}x{height}");
        self.display_width = width;
        self.display_height = height;
    }

    /// Move the display box's top-left corner, in device pixels.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Current surface geometry for a scene.
    #[must_use]
    pub fn geometry(&self, scene: &Scene) -> SurfaceGeometry {
        SurfaceGeometry::unscaled(scene.width, scene.height, scene.render_quality).with_display(
            self.origin,
            self.display_width,
            self.display_height,
        )
    }

    /// Whether the next [`Renderer::render`] will recomposite.
    #[must_use]
    pub fn needs_redraw(&self, editor: &EditorState) -> bool {
        self.rendered != Some((editor.revision(), self.geometry(editor.scene())))
            || self.frame.is_none()
    }

    /// Render the editor's current state, reusing the cached frame if
    /// nothing changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be allocated.
    pub fn render(&mut self, editor: &EditorState) -> RenderResult<&Pixmap> {
        if self.needs_redraw(editor) {
            let scene = editor.scene();
            let geometry = self.geometry(scene);
            let indicator = editor
                .selected_point_id()
                .filter(|_| editor.show_indicators())
                .cloned();
            let options = RenderOptions {
                quality: scene.render_quality,
                blur: editor.use_blur(),
                indicator,
            };

            let (w, h) = geometry.raster_size();
            match self
                .frame
                .as_mut()
                .filter(|f| (f.width(), f.height()) == (w, h))
            {
                Some(frame) => compose(frame, scene, &options)?,
                None => self.frame = Some(render_scene(scene, &options)?),
            }

            self.rendered = Some((editor.revision(), geometry));
            self.frame_count += 1;
            tracing::trace!("Rendered frame {} at revision {}", self.frame_count, editor.revision());
        }
        self.frame
            .as_ref()
            .ok_or_else(|| RenderError::Surface("no frame rendered".to_string()))
    }

    /// The last rendered frame, if any.
    #[must_use]
    pub fn frame(&self) -> Option<&Pixmap> {
        self.frame.as_ref()
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Route a device-space pointer event to the editor through this
    /// surface's geometry.
    pub fn handle_pointer(&self, editor: &mut EditorState, event: PointerEvent) -> DragOutcome {
        let geometry = self.geometry(editor.scene());
        editor.handle_pointer(&geometry, event)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}
