//! Pointer hit-testing and point dragging.

use serde::{Deserialize, Serialize};

use crate::{PointId, PointUpdate, Scene, SurfaceGeometry, Vec2};

/// Default pick distance, in scene pixels.
pub const SELECTION_TOLERANCE: f32 = 15.0;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// A pointer event in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// What happened.
    pub phase: PointerPhase,
    /// Device X.
    pub x: f32,
    /// Device Y.
    pub y: f32,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }

    /// Device position of the event.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Selection and drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A point is selected but not being moved.
    Selected(PointId),
    /// A point is selected and follows the pointer.
    Dragging(PointId),
}

/// Outcome of feeding a pointer event to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing observable changed.
    Unchanged,
    /// The selection changed (to `None` when cleared).
    SelectionChanged(Option<PointId>),
    /// The dragged point moved.
    Moved(PointId),
    /// A drag finished; the point stays selected.
    Released(PointId),
}

/// Turns pointer events into selection changes and point moves.
///
/// Only one point is ever selected; pressing on another point moves the
/// selection there in the same step.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    tolerance: f32,
}

impl DragController {
    /// Create a controller with the given pick tolerance in scene pixels.
    #[must_use]
    pub fn new(tolerance: f32) -> Self {
        Self {
            state: DragState::Idle,
            tolerance,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Pick tolerance in scene pixels.
    #[must_use]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Currently selected point, dragging or not.
    #[must_use]
    pub fn selected(&self) -> Option<&PointId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Selected(id) | DragState::Dragging(id) => Some(id),
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Select a point without starting a drag.
    pub fn select(&mut self, id: PointId) {
        self.state = DragState::Selected(id);
    }

    /// Drop any selection.
    pub fn clear(&mut self) {
        self.state = DragState::Idle;
    }

    /// Dispatch a pointer event.
    pub fn handle(
        &mut self,
        scene: &mut Scene,
        geometry: &SurfaceGeometry,
        event: PointerEvent,
    ) -> DragOutcome {
        match event.phase {
            PointerPhase::Down => self.pointer_down(scene, geometry, event.position()),
            PointerPhase::Move => self.pointer_move(scene, geometry, event.position()),
            PointerPhase::Up | PointerPhase::Leave => self.pointer_up(),
        }
    }

    /// Pick the nearest point under the pointer and start dragging it.
    pub fn pointer_down(
        &mut self,
        scene: &Scene,
        geometry: &SurfaceGeometry,
        device: Vec2,
    ) -> DragOutcome {
        let at = geometry.device_to_scene(device);
        let hit = scene
            .nearest_point(at.x, at.y, self.tolerance)
            .map(|p| p.id.clone());
        let previous = self.selected().cloned();

        self.state = match &hit {
            Some(id) => {
                tracing::debug!("Pointer down on {id} at scene ({}, {})", at.x, at.y);
                DragState::Dragging(id.clone())
            }
            None => DragState::Idle,
        };

        if previous == hit {
            DragOutcome::Unchanged
        } else {
            DragOutcome::SelectionChanged(hit)
        }
    }

    /// Move the dragged point to the pointer, if dragging.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        geometry: &SurfaceGeometry,
        device: Vec2,
    ) -> DragOutcome {
        let DragState::Dragging(id) = &self.state else {
            return DragOutcome::Unchanged;
        };
        let at = geometry.device_to_scene(device);
        if scene.update_point(id, PointUpdate::position(at.x, at.y)) {
            DragOutcome::Moved(id.clone())
        } else {
            // The point vanished mid-drag (deleted or scene replaced).
            self.state = DragState::Idle;
            DragOutcome::SelectionChanged(None)
        }
    }

    /// End a drag; the point stays selected.
    pub fn pointer_up(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(id) => {
                self.state = DragState::Selected(id.clone());
                DragOutcome::Released(id)
            }
            other => {
                self.state = other;
                DragOutcome::Unchanged
            }
        }
    }

    /// Forget the selection if it refers to `id`.
    pub fn forget(&mut self, id: &PointId) -> bool {
        if self.selected() == Some(id) {
            self.state = DragState::Idle;
            true
        } else {
            false
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(SELECTION_TOLERANCE)
    }
}
