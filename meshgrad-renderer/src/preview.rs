//! Frame source for the floating hero preview.

use meshgrad_core::{AnimationHandle, FloatingAnimation, Scene};
use tiny_skia::Pixmap;

use crate::compositor::{render_scene, RenderOptions};
use crate::error::RenderResult;

/// Drives a [`FloatingAnimation`] over a scene and renders each tick.
///
/// The preview is non-interactive: no selection ring is ever drawn.
#[derive(Debug)]
pub struct PreviewPlayer {
    scene: Scene,
    animation: FloatingAnimation,
    handle: AnimationHandle,
    options: RenderOptions,
}

impl PreviewPlayer {
    /// Animate the given scene, rendering at its own quality with blur.
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        let (animation, handle) = FloatingAnimation::start();
        let options = RenderOptions::export(scene.render_quality, true);
        Self {
            scene,
            animation,
            handle,
            options,
        }
    }

    /// The hero preset.
    #[must_use]
    pub fn hero() -> Self {
        Self::new(Scene::hero())
    }

    /// Override the render options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// A handle that stops the preview when cancelled.
    #[must_use]
    pub fn handle(&self) -> AnimationHandle {
        self.handle.clone()
    }

    /// The scene as of the last tick.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Advance to display time `t_ms` and render.
    ///
    /// Returns `Ok(None)` once the preview has been cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be allocated.
    pub fn next_frame(&mut self, t_ms: f64) -> RenderResult<Option<Pixmap>> {
        if !self.animation.tick(&mut self.scene, t_ms) {
            return Ok(None);
        }
        render_scene(&self.scene, &self.options).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgrad_core::RenderQuality;

    fn tiny_hero() -> PreviewPlayer {
        let mut scene = Scene::hero();
        scene.width = 40;
        scene.height = 25;
        PreviewPlayer::new(scene).with_options(RenderOptions::export(RenderQuality::MIN, false))
    }

    #[test]
    fn test_frames_follow_the_animation() {
        let mut player = tiny_hero();
        let start = player.scene().points()[0].x;
        let frame = player.next_frame(16.0).expect("render").expect("running");
        assert_eq!((frame.width(), frame.height()), (40, 25));
        assert!((player.scene().points()[0].x - start).abs() > 0.0);
    }

    #[test]
    fn test_cancel_stops_frames() {
        let mut player = tiny_hero();
        player.handle().cancel();
        let before = player.scene().clone();
        assert!(player.next_frame(16.0).expect("no error").is_none());
        assert_eq!(player.scene(), &before);
    }
}
