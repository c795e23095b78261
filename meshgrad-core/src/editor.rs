//! Editor state: the scene plus transient selection, view options and change
//! notification.
//!
//! Every mutation bumps [`EditorState::revision`] and is announced to
//! subscribers as a [`SceneEvent`], so a renderer can redraw exactly when
//! something it depends on changed.

use crate::error::CoreResult;
use crate::interaction::{DragController, DragOutcome, PointerEvent, SELECTION_TOLERANCE};
use crate::scene::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::{
    schema, CoreError, LayoutUpdate, PointId, PointUpdate, RenderQuality, Scene, SurfaceGeometry,
};

/// Editor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Initial canvas width.
    pub width: u32,
    /// Initial canvas height.
    pub height: u32,
    /// Initial background color.
    pub background_color: String,
    /// Initial render quality.
    pub render_quality: RenderQuality,
    /// Pointer pick distance in scene pixels.
    pub selection_tolerance: f32,
    /// Draw the ring around the selected point.
    pub show_indicators: bool,
    /// Apply per-point blur.
    pub use_blur: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_string(),
            render_quality: RenderQuality::default(),
            selection_tolerance: SELECTION_TOLERANCE,
            show_indicators: true,
            use_blur: true,
        }
    }
}

impl EditorConfig {
    /// Set the initial canvas size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the initial render quality.
    #[must_use]
    pub fn with_quality(mut self, quality: RenderQuality) -> Self {
        self.render_quality = quality;
        self
    }

    /// Set the pick tolerance.
    #[must_use]
    pub fn with_selection_tolerance(mut self, tolerance: f32) -> Self {
        self.selection_tolerance = tolerance;
        self
    }
}

/// What changed in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A point was appended.
    PointAdded(PointId),
    /// A point's fields changed (including drag moves).
    PointUpdated(PointId),
    /// A point was deleted.
    PointRemoved(PointId),
    /// Canvas size, background or quality changed.
    LayoutChanged,
    /// The selection changed.
    SelectionChanged(Option<PointId>),
    /// Indicator or blur toggles changed.
    ViewOptionsChanged,
    /// The example gradient replaced all points.
    ExampleLoaded,
    /// An import replaced the whole scene.
    Imported,
}

/// Callback invoked after each change.
pub type SceneListener = Box<dyn FnMut(&SceneEvent)>;

/// The editor: authoritative scene plus transient UI state.
pub struct EditorState {
    scene: Scene,
    drag: DragController,
    show_indicators: bool,
    use_blur: bool,
    revision: u64,
    listeners: Vec<SceneListener>,
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("scene", &self.scene)
            .field("drag", &self.drag)
            .field("show_indicators", &self.show_indicators)
            .field("use_blur", &self.use_blur)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditorState {
    /// Create an editor. An empty scene is seeded with the example gradient.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let mut scene = Scene::new(config.width, config.height);
        scene.background_color = config.background_color.clone();
        scene.render_quality = config.render_quality;
        Self::with_scene(scene, &config)
    }

    /// Create an editor around an existing scene.
    ///
    /// The example gradient is loaded if the scene has no points. This
    /// happens only here: deleting the last point or importing an empty
    /// point list later leaves the scene empty.
    #[must_use]
    pub fn with_scene(mut scene: Scene, config: &EditorConfig) -> Self {
        if scene.is_empty() {
            scene.load_example();
        }
        Self {
            scene,
            drag: DragController::new(config.selection_tolerance),
            show_indicators: config.show_indicators,
            use_blur: config.use_blur,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SceneEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: SceneEvent) {
        self.revision += 1;
        tracing::trace!("Scene event {event:?} (revision {})", self.revision);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    /// The current scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Counter bumped on every change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Selected point id, if any.
    #[must_use]
    pub fn selected_point_id(&self) -> Option<&PointId> {
        self.drag.selected()
    }

    /// Whether a point is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Whether the selection ring is drawn.
    #[must_use]
    pub fn show_indicators(&self) -> bool {
        self.show_indicators
    }

    /// Whether per-point blur is applied.
    #[must_use]
    pub fn use_blur(&self) -> bool {
        self.use_blur
    }

    /// Add a point at a random position and select it.
    pub fn add_point(&mut self) -> PointId {
        let id = self.scene.add_point();
        self.drag.select(id.clone());
        self.notify(SceneEvent::PointAdded(id.clone()));
        self.notify(SceneEvent::SelectionChanged(Some(id.clone())));
        id
    }

    /// Select a point by id, or clear the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PointNotFound`] if the id is unknown.
    pub fn select(&mut self, id: Option<PointId>) -> CoreResult<()> {
        match id {
            Some(id) => {
                if self.scene.point(&id).is_none() {
                    return Err(CoreError::PointNotFound(id.to_string()));
                }
                self.drag.select(id.clone());
                self.notify(SceneEvent::SelectionChanged(Some(id)));
            }
            None => {
                self.drag.clear();
                self.notify(SceneEvent::SelectionChanged(None));
            }
        }
        Ok(())
    }

    /// Merge fields into a point. Unknown ids are ignored.
    pub fn update_point(&mut self, id: &PointId, update: PointUpdate) -> bool {
        if update.is_empty() || !self.scene.update_point(id, update) {
            return false;
        }
        self.notify(SceneEvent::PointUpdated(id.clone()));
        true
    }

    fn update_selected(&mut self, update: PointUpdate) -> bool {
        match self.drag.selected().cloned() {
            Some(id) => self.update_point(&id, update),
            None => false,
        }
    }

    /// Set the selected point's color.
    pub fn set_point_color(&mut self, color: impl Into<String>) -> bool {
        self.update_selected(PointUpdate::color(color))
    }

    /// Set the selected point's radius.
    pub fn set_point_radius(&mut self, radius: f32) -> bool {
        self.update_selected(PointUpdate::radius(radius))
    }

    /// Set the selected point's blur strength.
    pub fn set_point_blur(&mut self, blur: f32) -> bool {
        self.update_selected(PointUpdate::blur(blur))
    }

    /// Set the selected point's opacity.
    pub fn set_point_opacity(&mut self, opacity: f32) -> bool {
        self.update_selected(PointUpdate::opacity(opacity))
    }

    /// Delete a point, clearing the selection if it was selected.
    pub fn remove_point(&mut self, id: &PointId) -> bool {
        if self.scene.remove_point(id).is_none() {
            return false;
        }
        let was_selected = self.drag.forget(id);
        self.notify(SceneEvent::PointRemoved(id.clone()));
        if was_selected {
            self.notify(SceneEvent::SelectionChanged(None));
        }
        true
    }

    /// Delete the selected point.
    pub fn delete_selected_point(&mut self) -> bool {
        match self.drag.selected().cloned() {
            Some(id) => self.remove_point(&id),
            None => false,
        }
    }

    /// Update canvas-level fields.
    pub fn set_layout(&mut self, update: LayoutUpdate) {
        if update == LayoutUpdate::default() {
            return;
        }
        self.scene.set_layout(update);
        self.notify(SceneEvent::LayoutChanged);
    }

    /// Toggle the selection ring.
    pub fn set_show_indicators(&mut self, show: bool) {
        if self.show_indicators != show {
            self.show_indicators = show;
            self.notify(SceneEvent::ViewOptionsChanged);
        }
    }

    /// Toggle per-point blur.
    pub fn set_use_blur(&mut self, enabled: bool) {
        if self.use_blur != enabled {
            self.use_blur = enabled;
            self.notify(SceneEvent::ViewOptionsChanged);
        }
    }

    /// Replace all points with the example gradient.
    pub fn load_example(&mut self) {
        self.scene.load_example();
        if let Some(id) = self.drag.selected().cloned() {
            if self.scene.point(&id).is_none() {
                self.drag.clear();
            }
        }
        self.notify(SceneEvent::ExampleLoaded);
    }

    /// Serialize the scene to its JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> CoreResult<String> {
        schema::serialize(&self.scene).map_err(CoreError::Serialization)
    }

    /// Replace the scene from JSON bytes.
    ///
    /// On failure the current scene is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Format`] if the document is malformed.
    pub fn import_json(&mut self, bytes: &[u8]) -> CoreResult<()> {
        let scene = schema::deserialize(bytes, self.scene.render_quality).map_err(|e| {
            tracing::warn!("Rejected scene import: {e}");
            CoreError::from(e)
        })?;
        tracing::debug!(
            "Imported scene {}x{} with {} points",
            scene.width,
            scene.height,
            scene.point_count()
        );
        self.scene = scene;
        self.drag.clear();
        self.notify(SceneEvent::Imported);
        Ok(())
    }

    /// Feed a pointer event through the drag controller.
    pub fn handle_pointer(&mut self, geometry: &SurfaceGeometry, event: PointerEvent) -> DragOutcome {
        let outcome = self.drag.handle(&mut self.scene, geometry, event);
        match &outcome {
            DragOutcome::SelectionChanged(sel) => {
                self.notify(SceneEvent::SelectionChanged(sel.clone()));
            }
            DragOutcome::Moved(id) => self.notify(SceneEvent::PointUpdated(id.clone())),
            DragOutcome::Unchanged | DragOutcome::Released(_) => {}
        }
        outcome
    }

    /// Geometry of an unscaled surface for the current scene.
    #[must_use]
    pub fn surface_geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::unscaled(
            self.scene.width,
            self.scene.height,
            self.scene.render_quality,
        )
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
